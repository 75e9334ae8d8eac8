//! Blocking JSON-RPC clients for the two chains and the shared
//! confirmation discipline.
//!
//! The protocol is synchronous by design: every phase's input depends
//! on the previous phase's committed on-chain state, so the clients
//! expose plain blocking calls and explicit bounded waits instead of
//! an async surface.

pub mod anchor_client;
pub mod error;
mod rpc;
pub mod side_chain_client;
pub mod traits;

pub use anchor_client::AnchorClient;
pub use error::{ChainError, RpcRequestError};
pub use side_chain_client::SideChainClient;
pub use traits::{AnchorBlock, AnchorChain, SourceChain};
