use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error("drift: invalid date format: '{value}'. Use YYYY-MM-DD.")]
    InvalidDate { value: String },

    #[error("drift: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("drift: baseline has no segments")]
    EmptyBaseline,

    #[error("drift: index {index} out of range for {len} vectors")]
    IndexOutOfRange { index: usize, len: usize },
}
