//! Canonical wire codec for cross-chain contract call payloads.
//!
//! Byte strings are length-prefixed with a Bitcoin-style variable
//! length integer; fixed-width integers are little-endian; 256-bit
//! amounts occupy a fixed 32-byte little-endian field with the sign
//! bit kept clear so the target chain's big-int decoder never sees a
//! negative two's-complement value.

mod error;
mod sink;
mod source;
mod tx_args;

pub use error::Error;
pub use sink::Sink;
pub use source::Source;
pub use tx_args::TxArgs;
