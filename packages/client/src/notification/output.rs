//! Audio sinks for rendered tones.

use std::{
    io::{self, Write},
    process::Stdio,
};

use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

use super::synth::ToneBuffer;

/// Default external PCM player
pub const DEFAULT_PLAYER: &str = "aplay";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to start audio player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to audio device: {0}")]
    Write(#[from] io::Error),
}

/// Destination for a rendered tone.
///
/// `play` hands the buffer off and returns without waiting for playback to finish.
#[cfg_attr(test, mockall::automock)]
pub trait AudioOutput: Send + Sync {
    fn play(&self, buffer: ToneBuffer) -> Result<(), AudioError>;
}

/// Streams raw `f32` PCM into the stdin of an `aplay`-compatible player.
#[derive(Debug, Clone)]
pub struct PcmPipeOutput {
    program: String,
}

impl PcmPipeOutput {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PcmPipeOutput {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER)
    }
}

impl AudioOutput for PcmPipeOutput {
    fn play(&self, buffer: ToneBuffer) -> Result<(), AudioError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        let mut child = {
            let _guard = runtime.enter();
            Command::new(&self.program)
                .args(["-q", "-t", "raw", "-f", "FLOAT_LE", "-c", "1", "-r"])
                .arg(buffer.sample_rate.to_string())
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(false)
                .spawn()
                .map_err(|source| AudioError::Spawn {
                    program: self.program.clone(),
                    source,
                })?
        };
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AudioError::Unavailable("player stdin not captured".to_string()))?;

        let program = self.program.clone();
        runtime.spawn(async move {
            if let Err(e) = stdin.write_all(&buffer.to_le_bytes()).await {
                tracing::debug!(%program, "Failed to stream tone: {}", e);
            }
            drop(stdin);
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::debug!(%program, %status, "Audio player exited with failure");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(%program, "Failed to wait for audio player: {}", e),
            }
        });

        Ok(())
    }
}

/// Rings the terminal bell; the tone itself is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioOutput for TerminalBell {
    fn play(&self, _buffer: ToneBuffer) -> Result<(), AudioError> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }
}

/// An environment without audio: every play fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudioOutput;

impl AudioOutput for NoAudioOutput {
    fn play(&self, _buffer: ToneBuffer) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("audio is disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> ToneBuffer {
        ToneBuffer {
            sample_rate: 8_000,
            samples: vec![0.0; 16],
        }
    }

    #[test]
    fn test_no_audio_output_always_fails() {
        // テスト項目: NoAudioOutput は常に Unavailable を返す
        let result = NoAudioOutput.play(buffer());

        assert!(matches!(result, Err(AudioError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_pipe_output_reports_missing_player() {
        // テスト項目: 存在しないプレイヤーは Spawn エラーになる
        // given (前提条件):
        let output = PcmPipeOutput::new("murmur-no-such-player-binary");

        // when (操作):
        let result = output.play(buffer());

        // then (期待する結果):
        assert!(matches!(result, Err(AudioError::Spawn { .. })));
    }

    #[test]
    fn test_pipe_output_needs_runtime() {
        // テスト項目: ランタイム外では Unavailable を返す
        let result = PcmPipeOutput::default().play(buffer());

        assert!(matches!(result, Err(AudioError::Unavailable(_))));
    }
}
