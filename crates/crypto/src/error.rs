use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum Error {
    #[error("unknown curve label {0:#04x}")]
    UnknownCurveLabel(u8),
    #[error("unknown curve name {0:?}")]
    UnknownCurveName(String),
    #[error("malformed public key encoding")]
    MalformedKey,
    #[error("invalid hex in public key: {0}")]
    InvalidHex(String),
    #[error("compressed {0} point not supported, supply the uncompressed form")]
    CompressedPointUnsupported(&'static str),
    #[error("invalid uncompressed point for {curve}: expected {expected} bytes, got {got}")]
    InvalidPointLength {
        curve: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("malformed consensus payload: {0}")]
    MalformedConsensusPayload(String),
}
