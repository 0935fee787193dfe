//! Error types for Fourier operator construction and evaluation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FnoError {
    #[error("stage list mismatch: {kernels} kernel sizes vs {modes} mode counts")]
    StageCountMismatch { kernels: usize, modes: usize },

    #[error("hidden channel list must be one shorter than kernel list: {hidden} hidden widths vs {kernels} kernel sizes")]
    HiddenWidthMismatch { hidden: usize, kernels: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),
}
