//! Plays notification tones with a rich → simple → silent fallback chain.

use thiserror::Error;

use super::{
    config::SoundProfile,
    output::{AudioError, AudioOutput},
    synth::{SynthError, ToneRenderer},
    tone::ToneSpec,
};

/// Why a single tone could not be played
#[derive(Debug, Error)]
pub enum ToneError {
    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// What actually reached the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The requested profile played
    Played(SoundProfile),
    /// The requested profile failed and the simple tone played instead
    FellBack { requested: SoundProfile },
    /// Nothing played
    Silent,
}

pub struct ToneSynthesizer {
    renderer: ToneRenderer,
    output: Box<dyn AudioOutput>,
}

impl ToneSynthesizer {
    pub fn new(renderer: ToneRenderer, output: Box<dyn AudioOutput>) -> Self {
        Self { renderer, output }
    }

    /// Play the tone for `profile`. Never fails: errors degrade to the simple
    /// tone, then to silence.
    pub fn play(&self, profile: SoundProfile, volume: f32) -> PlayOutcome {
        let Err(e) = self.try_play(&ToneSpec::for_profile(profile, volume)) else {
            return PlayOutcome::Played(profile);
        };

        if profile == SoundProfile::Simple {
            tracing::debug!("Notification tone unavailable: {}", e);
            return PlayOutcome::Silent;
        }

        tracing::debug!(%profile, "Falling back to the simple tone: {}", e);
        match self.try_play(&ToneSpec::simple()) {
            Ok(()) => PlayOutcome::FellBack { requested: profile },
            Err(e) => {
                tracing::debug!("Notification tone unavailable: {}", e);
                PlayOutcome::Silent
            }
        }
    }

    fn try_play(&self, spec: &ToneSpec) -> Result<(), ToneError> {
        let buffer = self.renderer.render(spec)?;
        self.output.play(buffer)?;
        Ok(())
    }
}
