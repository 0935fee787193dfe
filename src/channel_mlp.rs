//! Per-position channel MLP used to lift and reduce channel dimensions
//!
//! A `ChannelMlp` changes only the channel count of a `(batch, channels,
//! length)` signal: every spatial position goes through the same small MLP,
//! implemented as a chain of kernel-size-1 convolutions with an activation
//! between consecutive layers. One instance lifts the raw input channels to
//! the spectral working width, a second instance reduces the final spectral
//! width down to the output channels.

use candle_core::Tensor;
use candle_nn::{Conv1d, Conv1dConfig, Module, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::FnoError;
use crate::FnoResult;

/// Configuration for a channel MLP.
///
/// The model facade reads only `out_channels` (for the lift network) and
/// `in_channels` (for the reduce network); everything else is the MLP's own
/// business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMlpConfig {
    /// Channel count the MLP consumes
    pub in_channels: usize,
    /// Channel count the MLP produces
    pub out_channels: usize,
    /// Intermediate widths; empty means a single linear layer
    pub hidden_channels: Vec<usize>,
    /// Activation applied between consecutive layers
    pub activation: String,
}

impl Default for ChannelMlpConfig {
    fn default() -> Self {
        Self {
            in_channels: 2,
            out_channels: 32,
            hidden_channels: vec![64],
            activation: "gelu".to_string(),
        }
    }
}

/// Per-position channel transform: `(B, C_in, L) -> (B, C_out, L)`.
#[derive(Debug)]
pub struct ChannelMlp {
    layers: Vec<Conv1d>,
    activation: Activation,
    in_channels: usize,
    out_channels: usize,
}

impl ChannelMlp {
    pub fn new(config: &ChannelMlpConfig, vb: VarBuilder) -> FnoResult<Self> {
        if config.in_channels == 0 || config.out_channels == 0 {
            return Err(FnoError::InvalidParameter(
                "channel MLP widths must be positive".to_string(),
            ));
        }
        if config.hidden_channels.iter().any(|&w| w == 0) {
            return Err(FnoError::InvalidParameter(
                "channel MLP hidden widths must be positive".to_string(),
            ));
        }

        let mut widths = Vec::with_capacity(config.hidden_channels.len() + 2);
        widths.push(config.in_channels);
        widths.extend_from_slice(&config.hidden_channels);
        widths.push(config.out_channels);

        let mut layers = Vec::with_capacity(widths.len() - 1);
        for (i, pair) in widths.windows(2).enumerate() {
            let layer = candle_nn::conv1d(
                pair[0],
                pair[1],
                1,
                Conv1dConfig::default(),
                vb.pp(format!("layer_{}", i)),
            )?;
            layers.push(layer);
        }

        Ok(Self {
            layers,
            activation: Activation::resolve(&config.activation),
            in_channels: config.in_channels,
            out_channels: config.out_channels,
        })
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    /// Forward pass, preserving batch size and spatial length.
    pub fn forward(&self, x: &Tensor) -> FnoResult<Tensor> {
        let (_batch, channels, _length) = x.dims3()?;
        if channels != self.in_channels {
            return Err(FnoError::DimensionMismatch {
                expected: self.in_channels,
                got: channels,
            });
        }

        let last = self.layers.len() - 1;
        let mut h = x.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h)?;
            if i < last {
                h = self.activation.forward(&h)?;
            }
        }
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};
    use candle_nn::{VarBuilder, VarMap};

    fn builder(device: &Device) -> (VarMap, VarBuilder<'static>) {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        (varmap, vb)
    }

    #[test]
    fn test_forward_changes_only_channels() {
        let device = Device::Cpu;
        let (_varmap, vb) = builder(&device);
        let config = ChannelMlpConfig {
            in_channels: 3,
            out_channels: 8,
            hidden_channels: vec![16],
            activation: "gelu".to_string(),
        };
        let mlp = ChannelMlp::new(&config, vb).unwrap();

        let x = Tensor::randn(0f32, 1.0, (2, 3, 40), &device).unwrap();
        let y = mlp.forward(&x).unwrap();
        assert_eq!(y.dims3().unwrap(), (2, 8, 40));
    }

    #[test]
    fn test_empty_hidden_is_single_layer() {
        let device = Device::Cpu;
        let (_varmap, vb) = builder(&device);
        let config = ChannelMlpConfig {
            in_channels: 4,
            out_channels: 4,
            hidden_channels: vec![],
            activation: "gelu".to_string(),
        };
        let mlp = ChannelMlp::new(&config, vb).unwrap();

        let x = Tensor::randn(0f32, 1.0, (1, 4, 16), &device).unwrap();
        let y = mlp.forward(&x).unwrap();
        assert_eq!(y.dims3().unwrap(), (1, 4, 16));
    }

    #[test]
    fn test_wrong_input_channels_rejected() {
        let device = Device::Cpu;
        let (_varmap, vb) = builder(&device);
        let config = ChannelMlpConfig {
            in_channels: 3,
            out_channels: 8,
            hidden_channels: vec![],
            activation: "gelu".to_string(),
        };
        let mlp = ChannelMlp::new(&config, vb).unwrap();

        let x = Tensor::randn(0f32, 1.0, (2, 5, 40), &device).unwrap();
        let err = mlp.forward(&x).unwrap_err();
        assert!(matches!(
            err,
            FnoError::DimensionMismatch {
                expected: 3,
                got: 5
            }
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        let device = Device::Cpu;
        let (_varmap, vb) = builder(&device);
        let config = ChannelMlpConfig {
            in_channels: 3,
            out_channels: 0,
            hidden_channels: vec![],
            activation: "gelu".to_string(),
        };
        assert!(matches!(
            ChannelMlp::new(&config, vb),
            Err(FnoError::InvalidParameter(_))
        ));
    }
}
