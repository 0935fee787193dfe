//! 1-D spectral convolution stage
//!
//! A `FourierLayer1D` transforms a channeled signal in frequency space: it
//! projects the signal onto its lowest `modes` Fourier frequencies, mixes
//! channels per retained mode with learned complex weights, reconstructs the
//! signal at the original resolution, and adds a local convolution bypass.
//! The frequency projection is expressed as matrix products against cosine
//! and sine bases built for the observed spatial length, so the layer works
//! at any resolution where the retained modes are resolvable.

use candle_core::{Device, Tensor};
use candle_nn::{Conv1d, Conv1dConfig, Init, Module, VarBuilder};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::FnoError;
use crate::FnoResult;

/// Initialization scaling for the learned spectral weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightNorm {
    /// Scale the initial weight spread by `1 / (in_channels * out_channels)`
    Fan,
    /// Unit-variance initialization
    None,
}

impl Default for WeightNorm {
    fn default() -> Self {
        WeightNorm::Fan
    }
}

/// Normalization convention for the forward/inverse Fourier transform pair.
///
/// Matches the usual FFT conventions: `backward` scales the inverse by
/// `1/L`, `forward` scales the forward transform instead, and `ortho`
/// splits `1/sqrt(L)` across both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FftNorm {
    Backward,
    Ortho,
    Forward,
}

impl Default for FftNorm {
    fn default() -> Self {
        FftNorm::Backward
    }
}

impl FftNorm {
    /// (forward scale, inverse scale) for a signal of the given length.
    fn scales(&self, length: usize) -> (f64, f64) {
        let n = length as f64;
        match self {
            FftNorm::Backward => (1.0, 1.0 / n),
            FftNorm::Ortho => (1.0 / n.sqrt(), 1.0 / n.sqrt()),
            FftNorm::Forward => (1.0 / n, 1.0),
        }
    }
}

/// One spectral convolution stage: `(B, C_in, L) -> (B, C_out, L)`.
#[derive(Debug)]
pub struct FourierLayer1D {
    /// Real part of the per-mode channel mixing weights, `(C_in, C_out, M)`
    w_real: Tensor,
    /// Imaginary part, same shape
    w_imag: Tensor,
    /// Local convolution bypass
    bypass: Conv1d,
    in_channels: usize,
    out_channels: usize,
    modes: usize,
    kernel: usize,
    fft_norm: FftNorm,
}

impl FourierLayer1D {
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        modes: usize,
        kernel: usize,
        weight_norm: WeightNorm,
        fft_norm: FftNorm,
        vb: VarBuilder,
    ) -> FnoResult<Self> {
        if in_channels == 0 || out_channels == 0 || modes == 0 {
            return Err(FnoError::InvalidParameter(
                "spectral stage channels and modes must be positive".to_string(),
            ));
        }
        // Same-padding only preserves length for odd kernels.
        if kernel % 2 == 0 {
            return Err(FnoError::InvalidParameter(format!(
                "bypass kernel size must be odd, got {}",
                kernel
            )));
        }

        let stdev = match weight_norm {
            WeightNorm::Fan => 1.0 / (in_channels * out_channels) as f64,
            WeightNorm::None => 1.0,
        };
        let init = Init::Randn { mean: 0.0, stdev };
        let w_real = vb.get_with_hints((in_channels, out_channels, modes), "w_real", init)?;
        let w_imag = vb.get_with_hints((in_channels, out_channels, modes), "w_imag", init)?;

        let bypass = candle_nn::conv1d(
            in_channels,
            out_channels,
            kernel,
            Conv1dConfig {
                padding: (kernel - 1) / 2,
                ..Default::default()
            },
            vb.pp("bypass"),
        )?;

        Ok(Self {
            w_real,
            w_imag,
            bypass,
            in_channels,
            out_channels,
            modes,
            kernel,
            fft_norm,
        })
    }

    pub fn in_channels(&self) -> usize {
        self.in_channels
    }

    pub fn out_channels(&self) -> usize {
        self.out_channels
    }

    pub fn modes(&self) -> usize {
        self.modes
    }

    pub fn kernel(&self) -> usize {
        self.kernel
    }

    /// Cosine and sine bases, each shaped `(length, modes)`, with entry
    /// `(x, k) = trig(2 pi k x / length)`.
    fn fourier_basis(&self, length: usize, device: &Device) -> FnoResult<(Tensor, Tensor)> {
        let mut cos = vec![0f32; length * self.modes];
        let mut sin = vec![0f32; length * self.modes];
        for x in 0..length {
            for k in 0..self.modes {
                let angle = 2.0 * PI * (k * x) as f64 / length as f64;
                cos[x * self.modes + k] = angle.cos() as f32;
                sin[x * self.modes + k] = angle.sin() as f32;
            }
        }
        let cos = Tensor::from_vec(cos, (length, self.modes), device)?;
        let sin = Tensor::from_vec(sin, (length, self.modes), device)?;
        Ok((cos, sin))
    }

    /// Half-spectrum reconstruction weights `(1, 1, modes)`: the zero
    /// frequency (and the Nyquist bin when retained) counts once, every
    /// other retained mode counts twice via Hermitian symmetry.
    fn hermitian_weights(&self, length: usize, device: &Device) -> FnoResult<Tensor> {
        let mut w = vec![2f32; self.modes];
        w[0] = 1.0;
        if length % 2 == 0 && self.modes == length / 2 + 1 {
            w[self.modes - 1] = 1.0;
        }
        Ok(Tensor::from_vec(w, (1, 1, self.modes), device)?)
    }

    /// Forward pass. Fails when the input channel count differs from the
    /// construction width or when the signal is too short to resolve the
    /// retained modes.
    pub fn forward(&self, x: &Tensor) -> FnoResult<Tensor> {
        let (_batch, channels, length) = x.dims3()?;
        if channels != self.in_channels {
            return Err(FnoError::DimensionMismatch {
                expected: self.in_channels,
                got: channels,
            });
        }
        let resolvable = length / 2 + 1;
        if self.modes > resolvable {
            return Err(FnoError::DimensionMismatch {
                expected: resolvable,
                got: self.modes,
            });
        }

        let device = x.device();
        let (cos, sin) = self.fourier_basis(length, device)?;
        let (fwd_scale, inv_scale) = self.fft_norm.scales(length);

        // Truncated real DFT: X_k = scale * sum_x u[x] e^{-2 pi i k x / L}
        let xr = x.broadcast_matmul(&cos)?.affine(fwd_scale, 0.0)?;
        let xi = x.broadcast_matmul(&sin)?.affine(-fwd_scale, 0.0)?;

        // Complex channel mixing per retained mode, contracting C_in:
        // (B, C_in, 1, M) * (1, C_in, C_out, M) summed over dim 1.
        let xr4 = xr.unsqueeze(2)?;
        let xi4 = xi.unsqueeze(2)?;
        let wr = self.w_real.unsqueeze(0)?;
        let wi = self.w_imag.unsqueeze(0)?;
        let yr = (xr4.broadcast_mul(&wr)? - xi4.broadcast_mul(&wi)?)?.sum(1)?;
        let yi = (xr4.broadcast_mul(&wi)? + xi4.broadcast_mul(&wr)?)?.sum(1)?;

        // Inverse transform from the half spectrum back to length L.
        let herm = self.hermitian_weights(length, device)?;
        let yr = yr.broadcast_mul(&herm)?;
        let yi = yi.broadcast_mul(&herm)?;
        let spectral = (yr.broadcast_matmul(&cos.t()?)? - yi.broadcast_matmul(&sin.t()?)?)?
            .affine(inv_scale, 0.0)?;

        let local = self.bypass.forward(x)?;
        Ok((spectral + local)?)
    }
}
