//! 1-D Fourier Neural Operator assembly
//!
//! The model is a fixed pipeline: a channel MLP lifts the input channels to
//! the spectral working width, a stack of spectral stages interleaved with a
//! shared activation transforms the lifted signal, and a second channel MLP
//! reduces the final spectral width to the output channels.
//!
//! ```text
//! (B, C_in, L) → Lift → [FourierLayer1D → act] × K → Reduce → (B, C_out, L)
//! ```
//!
//! Stage widths are derived, not authored: the lift output width feeds the
//! first stage, the configured hidden widths chain the stages together, and
//! the reduce input width terminates the last stage. Validation of the
//! parallel configuration lists happens in [`plan_stages`] before any
//! parameter is registered, so an invalid configuration never partially
//! builds a model.

use candle_core::Tensor;
use candle_nn::{VarBuilder, VarMap};
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::channel_mlp::{ChannelMlp, ChannelMlpConfig};
use crate::error::FnoError;
use crate::spectral::{FftNorm, FourierLayer1D, WeightNorm};
use crate::FnoResult;

/// Derived parameters of one spectral stage. Pure data, produced by
/// [`plan_stages`] and consumed once at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub in_channels: usize,
    pub out_channels: usize,
    pub modes: usize,
    pub kernel: usize,
}

/// Validate the parallel stage lists and derive the per-stage channel chain.
///
/// The kernel and mode lists must have equal length K, and the hidden width
/// list must be exactly one entry shorter: the first stage consumes the lift
/// output and the last stage produces the reduce input, so K stages need only
/// K - 1 intermediate widths. An empty hidden list yields a single stage
/// mapping the lift output directly to the reduce input.
pub fn plan_stages(
    lift_out: usize,
    reduce_in: usize,
    hidden: &[usize],
    modes: &[usize],
    kernels: &[usize],
) -> FnoResult<Vec<StageSpec>> {
    if kernels.len() != modes.len() {
        return Err(FnoError::StageCountMismatch {
            kernels: kernels.len(),
            modes: modes.len(),
        });
    }
    if hidden.len() + 1 != kernels.len() {
        return Err(FnoError::HiddenWidthMismatch {
            hidden: hidden.len(),
            kernels: kernels.len(),
        });
    }
    if lift_out == 0 || reduce_in == 0 || hidden.iter().any(|&w| w == 0) {
        return Err(FnoError::InvalidParameter(
            "channel widths must be positive".to_string(),
        ));
    }
    if modes.iter().any(|&m| m == 0) || kernels.iter().any(|&k| k == 0) {
        return Err(FnoError::InvalidParameter(
            "mode counts and kernel sizes must be positive".to_string(),
        ));
    }

    let mut widths = Vec::with_capacity(hidden.len() + 2);
    widths.push(lift_out);
    widths.extend_from_slice(hidden);
    widths.push(reduce_in);

    let specs = widths
        .windows(2)
        .zip(modes.iter().zip(kernels.iter()))
        .map(|(pair, (&modes, &kernel))| StageSpec {
            in_channels: pair[0],
            out_channels: pair[1],
            modes,
            kernel,
        })
        .collect();
    Ok(specs)
}

/// One entry of the frozen stage stack.
#[derive(Debug)]
pub enum StackEntry {
    Spectral(FourierLayer1D),
    Activate(Activation),
}

impl StackEntry {
    pub fn forward(&self, x: &Tensor) -> FnoResult<Tensor> {
        match self {
            StackEntry::Spectral(layer) => layer.forward(x),
            StackEntry::Activate(act) => act.forward(x),
        }
    }
}

/// Configuration for the full 1-D Fourier Neural Operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fno1dConfig {
    /// Lift network; its `out_channels` is the first spectral width
    pub lift: ChannelMlpConfig,
    /// Reduce network; its `in_channels` is the last spectral width
    pub reduce: ChannelMlpConfig,
    /// Intermediate spectral widths, one fewer than the stage count
    pub hidden_channels: Vec<usize>,
    /// Retained frequency modes per stage
    pub modes: Vec<usize>,
    /// Bypass convolution kernel size per stage
    pub kernels: Vec<usize>,
    /// Activation between stages (and the default for the MLPs)
    pub activation: String,
    /// Spectral weight initialization, shared by every stage
    pub weight_norm: WeightNorm,
    /// FFT normalization convention, shared by every stage
    pub fft_norm: FftNorm,
}

impl Default for Fno1dConfig {
    fn default() -> Self {
        Self {
            lift: ChannelMlpConfig {
                in_channels: 2,
                out_channels: 32,
                hidden_channels: vec![64],
                activation: "gelu".to_string(),
            },
            reduce: ChannelMlpConfig {
                in_channels: 32,
                out_channels: 1,
                hidden_channels: vec![64],
                activation: "gelu".to_string(),
            },
            hidden_channels: vec![32],
            modes: vec![16, 16],
            kernels: vec![3, 3],
            activation: "gelu".to_string(),
            weight_norm: WeightNorm::Fan,
            fft_norm: FftNorm::Backward,
        }
    }
}

/// 1-D Fourier Neural Operator: lift → spectral stack → reduce.
#[derive(Debug)]
pub struct Fno1d {
    lift: ChannelMlp,
    stack: Vec<StackEntry>,
    reduce: ChannelMlp,
    config: Fno1dConfig,
}

impl Fno1d {
    /// Build the model from its configuration.
    ///
    /// The stage plan is validated first; on an invalid configuration no
    /// parameter is registered in the `VarBuilder`'s backing store.
    pub fn new(config: Fno1dConfig, vb: VarBuilder) -> FnoResult<Self> {
        let specs = plan_stages(
            config.lift.out_channels,
            config.reduce.in_channels,
            &config.hidden_channels,
            &config.modes,
            &config.kernels,
        )?;
        let activation = Activation::resolve(&config.activation);

        let lift = ChannelMlp::new(&config.lift, vb.pp("lift"))?;
        let reduce = ChannelMlp::new(&config.reduce, vb.pp("reduce"))?;

        let mut stack = Vec::with_capacity(specs.len() * 2);
        for (i, spec) in specs.iter().enumerate() {
            let layer = FourierLayer1D::new(
                spec.in_channels,
                spec.out_channels,
                spec.modes,
                spec.kernel,
                config.weight_norm,
                config.fft_norm,
                vb.pp(format!("stage_{}", i)),
            )?;
            stack.push(StackEntry::Spectral(layer));
            stack.push(StackEntry::Activate(activation));
        }

        Ok(Self {
            lift,
            stack,
            reduce,
            config,
        })
    }

    /// Forward pass: `(B, C_in, L) -> (B, C_out, L)`.
    ///
    /// The pipeline is fixed at construction; errors from any sub-component
    /// propagate unmodified.
    pub fn forward(&self, x: &Tensor) -> FnoResult<Tensor> {
        let mut h = self.lift.forward(x)?;
        for entry in &self.stack {
            h = entry.forward(&h)?;
        }
        self.reduce.forward(&h)
    }

    /// The frozen stage stack, alternating spectral stage and activation.
    pub fn stack(&self) -> &[StackEntry] {
        &self.stack
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn lift(&self) -> &ChannelMlp {
        &self.lift
    }

    pub fn reduce(&self) -> &ChannelMlp {
        &self.reduce
    }

    pub fn config(&self) -> &Fno1dConfig {
        &self.config
    }
}

/// Total number of scalar parameters registered in a variable store.
pub fn num_parameters(varmap: &VarMap) -> usize {
    varmap
        .all_vars()
        .iter()
        .map(|v| v.as_tensor().elem_count())
        .sum()
}
