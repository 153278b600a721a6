//! Tone descriptions for each sound profile.
//!
//! A [`ToneSpec`] is plain data: it is rebuilt for every play and rendered by
//! [`crate::notification::synth::ToneRenderer`].

use super::{config::SoundProfile, synth::SynthError};

/// Level every profile decays to
pub const GAIN_FLOOR: f32 = 0.01;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Sample the waveform at `phase`, a fraction of one cycle in `0.0..1.0`.
    /// Output is within `-1.0..=1.0`.
    pub fn sample(self, phase: f32) -> f32 {
        let phase = phase.rem_euclid(1.0);
        match self {
            Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Waveform::Sawtooth => {
                if phase < 0.5 {
                    2.0 * phase
                } else {
                    2.0 * phase - 2.0
                }
            }
        }
    }
}

/// Jump to `hz` at `at` seconds after the tone starts, holding until the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyStep {
    pub hz: f32,
    pub at: f32,
}

impl FrequencyStep {
    pub const fn new(hz: f32, at: f32) -> Self {
        Self { hz, at }
    }
}

/// A single oscillator
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Ordered by `at`; the first step starts at 0
    pub steps: Vec<FrequencyStep>,
}

impl Voice {
    pub fn new(waveform: Waveform, steps: Vec<FrequencyStep>) -> Self {
        Self { waveform, steps }
    }

    /// A voice that starts at `from` Hz and jumps to `to` Hz at `switch_at` seconds
    pub fn stepped(waveform: Waveform, from: f32, to: f32, switch_at: f32) -> Self {
        Self::new(
            waveform,
            vec![FrequencyStep::new(from, 0.0), FrequencyStep::new(to, switch_at)],
        )
    }

    /// Frequency in effect at `t` seconds
    pub fn frequency_at(&self, t: f32) -> f32 {
        self.steps
            .iter()
            .take_while(|step| step.at <= t)
            .last()
            .or(self.steps.first())
            .map_or(0.0, |step| step.hz)
    }
}

/// Exponential decay from `start` to `floor` over `decay` seconds, then held at `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainEnvelope {
    pub start: f32,
    pub floor: f32,
    pub decay: f32,
}

impl GainEnvelope {
    pub const fn new(start: f32, floor: f32, decay: f32) -> Self {
        Self { start, floor, decay }
    }

    /// Gain at `t` seconds. A non-positive start gain cannot ramp exponentially
    /// and stays silent.
    pub fn gain_at(&self, t: f32) -> f32 {
        if self.start <= 0.0 {
            return 0.0;
        }
        if t <= 0.0 {
            return self.start;
        }
        if t >= self.decay {
            return self.floor;
        }
        self.start * (self.floor / self.start).powf(t / self.decay)
    }
}

/// Everything needed to render one notification tone
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    pub voices: Vec<Voice>,
    /// Shared lowpass cutoff applied to the mixed voices, if any
    pub lowpass_hz: Option<f32>,
    pub gain: GainEnvelope,
    /// Seconds; oscillators stop here
    pub duration: f32,
}

impl ToneSpec {
    /// The tone for `profile`. Only `normal` follows the configured volume.
    pub fn for_profile(profile: SoundProfile, volume: f32) -> Self {
        match profile {
            SoundProfile::Normal => Self::normal(volume),
            SoundProfile::Simple => Self::simple(),
            SoundProfile::Special => Self::special(),
        }
    }

    pub fn normal(volume: f32) -> Self {
        Self {
            voices: vec![
                Voice::stepped(Waveform::Sine, 800.0, 600.0, 0.15),
                Voice::stepped(Waveform::Sine, 1200.0, 900.0, 0.15),
            ],
            lowpass_hz: Some(1000.0),
            gain: GainEnvelope::new(volume, GAIN_FLOOR, 0.30),
            duration: 0.30,
        }
    }

    pub fn simple() -> Self {
        Self {
            voices: vec![Voice::stepped(Waveform::Sine, 800.0, 600.0, 0.10)],
            lowpass_hz: None,
            gain: GainEnvelope::new(0.3, GAIN_FLOOR, 0.20),
            duration: 0.20,
        }
    }

    /// C major chord stepping up a third
    pub fn special() -> Self {
        Self {
            voices: vec![
                Voice::stepped(Waveform::Sine, 523.0, 659.0, 0.10),
                Voice::stepped(Waveform::Triangle, 659.0, 784.0, 0.10),
                Voice::stepped(Waveform::Sawtooth, 784.0, 1047.0, 0.10),
            ],
            lowpass_hz: None,
            gain: GainEnvelope::new(0.2, GAIN_FLOOR, 0.40),
            duration: 0.40,
        }
    }

    /// Check the tone can be rendered without clicks or nonsense values.
    pub fn validate(&self) -> Result<(), SynthError> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(SynthError::InvalidSpec(format!(
                "duration must be positive, got {}",
                self.duration
            )));
        }
        if self.voices.is_empty() {
            return Err(SynthError::InvalidSpec("tone has no voices".to_string()));
        }
        if !self.gain.start.is_finite() || self.gain.floor <= 0.0 {
            return Err(SynthError::InvalidSpec(format!(
                "invalid gain envelope {:?}",
                self.gain
            )));
        }
        // the envelope has to reach its floor before the oscillators stop
        if self.gain.decay > self.duration {
            return Err(SynthError::InvalidSpec(format!(
                "gain decays over {}s but the tone lasts {}s",
                self.gain.decay, self.duration
            )));
        }
        for voice in &self.voices {
            let Some(first) = voice.steps.first() else {
                return Err(SynthError::InvalidSpec("voice has no frequency".to_string()));
            };
            if first.at != 0.0 {
                return Err(SynthError::InvalidSpec(
                    "first frequency step must start at 0s".to_string(),
                ));
            }
            if voice.steps.windows(2).any(|pair| pair[1].at < pair[0].at) {
                return Err(SynthError::InvalidSpec(
                    "frequency steps are out of order".to_string(),
                ));
            }
            if let Some(step) = voice
                .steps
                .iter()
                .find(|step| !(step.hz.is_finite() && step.hz > 0.0))
            {
                return Err(SynthError::InvalidSpec(format!(
                    "invalid frequency {}",
                    step.hz
                )));
            }
        }
        Ok(())
    }
}
