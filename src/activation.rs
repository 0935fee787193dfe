//! Pointwise activation functions resolved by name
//!
//! Activations are stateless `Copy` values so a single resolved activation
//! can be reused at every interleave point of the spectral stack without
//! carrying per-call state.

use candle_core::Tensor;

use crate::FnoResult;

/// Pointwise nonlinearity applied between spectral stages and inside the
/// channel MLPs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Gelu,
    Relu,
    Silu,
    Tanh,
}

impl Default for Activation {
    fn default() -> Self {
        Activation::Gelu
    }
}

impl Activation {
    /// Resolve an activation from its configured name.
    ///
    /// Empty or unrecognized names fall back to GELU, the conventional
    /// default for Fourier neural operators.
    pub fn resolve(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "relu" => Activation::Relu,
            "silu" | "swish" => Activation::Silu,
            "tanh" => Activation::Tanh,
            "gelu" => Activation::Gelu,
            _ => Activation::default(),
        }
    }

    /// Apply the nonlinearity elementwise.
    pub fn forward(&self, x: &Tensor) -> FnoResult<Tensor> {
        let out = match self {
            Activation::Gelu => x.gelu_erf()?,
            Activation::Relu => x.relu()?,
            Activation::Silu => candle_nn::ops::silu(x)?,
            Activation::Tanh => x.tanh()?,
        };
        Ok(out)
    }
}
