//! Offline rendering of a [`ToneSpec`] into mono PCM.

use std::time::Duration;

use thiserror::Error;

use super::tone::ToneSpec;

/// Default output rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Lowest rate accepted on the command line
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest rate the renderer will allocate a buffer for
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Butterworth Q for the lowpass stage
const LOWPASS_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("Invalid tone: {0}")]
    InvalidSpec(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Lowpass cutoff {cutoff}Hz is not below the Nyquist frequency of {nyquist}Hz")]
    CutoffAboveNyquist { cutoff: f32, nyquist: f32 },
}

/// Rendered mono samples in `-1.0..=1.0`
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl ToneBuffer {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }

    /// Largest absolute sample
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// Samples as raw little-endian `f32`, the `FLOAT_LE` format of `aplay`
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|sample| sample.to_le_bytes())
            .collect()
    }
}

/// Renders tone specs at a fixed sample rate.
#[derive(Debug, Clone, Copy)]
pub struct ToneRenderer {
    sample_rate: u32,
}

impl ToneRenderer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn render(&self, spec: &ToneSpec) -> Result<ToneBuffer, SynthError> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(SynthError::InvalidSampleRate(self.sample_rate));
        }
        spec.validate()?;

        let rate = self.sample_rate as f32;
        let mut lowpass = spec
            .lowpass_hz
            .map(|cutoff| Biquad::lowpass(cutoff, rate, LOWPASS_Q))
            .transpose()?;

        let len = (spec.duration * rate).round() as usize;
        let mut phases = vec![0.0f32; spec.voices.len()];
        let mut samples = Vec::with_capacity(len);

        for n in 0..len {
            let t = n as f32 / rate;
            let mut mix = 0.0;
            for (voice, phase) in spec.voices.iter().zip(phases.iter_mut()) {
                mix += voice.waveform.sample(*phase);
                *phase = (*phase + voice.frequency_at(t) / rate).fract();
            }
            if let Some(filter) = lowpass.as_mut() {
                mix = filter.process(mix);
            }
            samples.push((mix * spec.gain.gain_at(t)).clamp(-1.0, 1.0));
        }

        Ok(ToneBuffer {
            sample_rate: self.sample_rate,
            samples,
        })
    }
}

impl Default for ToneRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// Direct form I biquad, RBJ cookbook coefficients
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn lowpass(cutoff: f32, sample_rate: f32, q: f32) -> Result<Self, SynthError> {
        let nyquist = sample_rate / 2.0;
        if !(cutoff > 0.0 && cutoff < nyquist) {
            return Err(SynthError::CutoffAboveNyquist { cutoff, nyquist });
        }

        let w0 = std::f32::consts::TAU * cutoff / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Ok(Self {
            b0: (1.0 - cos_w0) / 2.0 / a0,
            b1: (1.0 - cos_w0) / a0,
            b2: (1.0 - cos_w0) / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        })
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}
