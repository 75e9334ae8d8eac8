//! Committee (bookkeeper) key handling and quorum account key
//! material.
//!
//! The anchor chain's header verifier iterates committee keys in a
//! canonical order; both chains must derive byte-identical committee
//! encodings from the same consensus payload, so decoding, ordering
//! and re-encoding all live here in one place.

mod account;
mod bookkeeper;
mod curve;
mod error;
mod public_key;

pub use account::Account;
pub use bookkeeper::{encode_bookkeepers, extract_bookkeepers, ChainConfig, PeerConfig};
pub use curve::Curve;
pub use error::Error;
pub use public_key::PublicKey;
