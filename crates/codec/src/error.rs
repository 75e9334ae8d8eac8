use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum Error {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("value too large for a 32-byte unsigned amount")]
    ValueTooLarge,
    #[error("negative amount encoding")]
    NegativeValue,
}
