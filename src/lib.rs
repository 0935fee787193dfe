//! # 1-D Fourier Neural Operator
//!
//! A learned mapping from an input field sampled on a 1-D grid to an output
//! field, used to approximate solution operators of PDEs and other
//! spatially-structured signals. Built on candle.
//!
//! ## Architecture
//!
//! ```text
//! (B, C_in, L)
//!      │
//!   Lift (per-position channel MLP)          C_in → W_0
//!      │
//!   FourierLayer1D ─ activation              W_0 → W_1
//!   FourierLayer1D ─ activation              W_1 → W_2
//!      ⋮                                       ⋮
//!   FourierLayer1D ─ activation              W_{K-1} → W_K
//!      │
//!   Reduce (per-position channel MLP)        W_K → C_out
//!      │
//! (B, C_out, L)
//! ```
//!
//! Each spectral stage truncates the signal to its lowest frequency modes,
//! mixes channels per mode with learned complex weights, reconstructs the
//! signal at the original resolution, and adds a local convolution bypass.
//! Stage widths are derived by chaining the lift output width through the
//! configured hidden widths down to the reduce input width, so channel
//! continuity holds by construction.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fourier_operator::{Fno1d, Fno1dConfig};
//! use candle_core::{DType, Device, Tensor};
//! use candle_nn::{VarBuilder, VarMap};
//!
//! let device = Device::Cpu;
//! let varmap = VarMap::new();
//! let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
//!
//! let model = Fno1d::new(Fno1dConfig::default(), vb)?;
//! let x = Tensor::randn(0f32, 1.0, (4, 2, 128), &device)?;
//! let y = model.forward(&x)?; // (4, 1, 128)
//! ```

pub mod activation;
pub mod channel_mlp;
pub mod error;
pub mod model;
pub mod spectral;


pub use activation::Activation;
pub use channel_mlp::{ChannelMlp, ChannelMlpConfig};
pub use error::FnoError;
pub use model::{num_parameters, plan_stages, Fno1d, Fno1dConfig, StackEntry, StageSpec};
pub use spectral::{FftNorm, FourierLayer1D, WeightNorm};

/// Result type for Fourier operator operations
pub type FnoResult<T> = Result<T, FnoError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Activation, ChannelMlp, ChannelMlpConfig, FftNorm, Fno1d, Fno1dConfig, FnoError,
        FnoResult, FourierLayer1D, StackEntry, StageSpec, WeightNorm,
    };
}
