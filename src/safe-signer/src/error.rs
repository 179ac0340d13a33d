use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignatureError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature bundle of {actual} bytes is too short for position {position}, {expected} bytes required")]
    OutOfRange {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error("signature component exceeds its wire width: {0}")]
    ValueOverflow(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}
