use std::time::Duration;

use primitive_types::H256;
use thiserror::Error;

// NOTE: Error only for the transport/request layer, not for chain
// level rejections.
#[derive(Error, Debug)]
#[error("{client} error, method: {method} error: {source}")]
pub struct RpcRequestError {
    pub client: &'static str,
    pub method: String,
    pub source: anyhow::Error,
}

impl RpcRequestError {
    pub fn new<E: Into<anyhow::Error>>(client: &'static str, method: String, source: E) -> Self {
        RpcRequestError {
            client,
            method,
            source: source.into(),
        }
    }
}

/// Chain-level error taxonomy. The idempotent-conflict variants are
/// produced in exactly one place ([`classify_chain_error`]) so no
/// caller ever inspects free-text error strings.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("side chain already registered")]
    AlreadyRegistered,
    #[error("side chain registration already requested")]
    AlreadyRequested,
    #[error("genesis state had been initialized")]
    AlreadyInitialized,
    #[error("tx {tx_hash:#x} not confirmed within {timeout:?}")]
    ConfirmationTimeout { tx_hash: H256, timeout: Duration },
    #[error("chain rejected call (code {code}): {message}")]
    Rejected { code: i64, message: String },
    #[error(transparent)]
    Rpc(#[from] RpcRequestError),
}

impl ChainError {
    /// Re-running the tool against a partially initialized
    /// environment hits these; they mean the requested state already
    /// holds.
    pub fn is_idempotent_conflict(&self) -> bool {
        matches!(
            self,
            ChainError::AlreadyRegistered
                | ChainError::AlreadyRequested
                | ChainError::AlreadyInitialized
        )
    }
}

// Structured rejection codes the relay/management contracts return.
pub const CODE_ALREADY_REGISTERED: i64 = 45001;
pub const CODE_ALREADY_REQUESTED: i64 = 45002;
pub const CODE_ALREADY_INITIALIZED: i64 = 45003;

/// Map a JSON-RPC error payload to the tagged taxonomy. Chains that
/// predate the structured codes only return text, so their canonical
/// messages are matched here and nowhere else.
pub fn classify_chain_error(code: i64, message: &str) -> ChainError {
    match code {
        CODE_ALREADY_REGISTERED => return ChainError::AlreadyRegistered,
        CODE_ALREADY_REQUESTED => return ChainError::AlreadyRequested,
        CODE_ALREADY_INITIALIZED => return ChainError::AlreadyInitialized,
        _ => {}
    }
    if message.contains("already registered") {
        ChainError::AlreadyRegistered
    } else if message.contains("already requested") {
        ChainError::AlreadyRequested
    } else if message.contains("had been initialized") {
        ChainError::AlreadyInitialized
    } else {
        ChainError::Rejected {
            code,
            message: message.to_string(),
        }
    }
}
