//! Command line configuration for the client.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    channel::{ChannelError, resolve_endpoint},
    notification::{
        NotificationConfig, SoundProfile,
        config::volume_from_percent,
        output::{AudioOutput, DEFAULT_PLAYER, NoAudioOutput, PcmPipeOutput, TerminalBell},
        synth::{DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE},
    },
};

/// Where notification tones are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AudioOutputKind {
    /// Stream PCM into an external player
    #[default]
    Pipe,
    /// Ring the terminal bell
    Bell,
    /// No audio device
    #[value(name = "none")]
    Disabled,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "murmur-client", version, about = "Murmur terminal chat client")]
pub struct ClientArgs {
    /// WebSocket URL of the relay (overrides --origin)
    #[arg(long)]
    pub url: Option<String>,

    /// Deployed origin, e.g. https://chat.example.com
    #[arg(long, env = "MURMUR_ORIGIN")]
    pub origin: Option<String>,

    /// Display name; prompted for when omitted
    #[arg(short, long)]
    pub name: Option<String>,

    /// Start with audio notifications off
    #[arg(long)]
    pub no_audio: bool,

    /// Notification volume, 0-100
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// Notification sound
    #[arg(long, value_enum, default_value_t = SoundProfile::Normal)]
    pub sound: SoundProfile,

    /// Start with toasts off
    #[arg(long)]
    pub no_visual: bool,

    #[arg(long, value_enum, default_value_t = AudioOutputKind::Pipe)]
    pub audio_output: AudioOutputKind,

    /// aplay-compatible player for --audio-output pipe
    #[arg(long, default_value = DEFAULT_PLAYER)]
    pub player: String,

    /// Tone sample rate in Hz, 8000-192000
    #[arg(
        long,
        default_value_t = DEFAULT_SAMPLE_RATE,
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MIN_SAMPLE_RATE)..=i64::from(MAX_SAMPLE_RATE))
    )]
    pub sample_rate: u32,

    /// Log file; the terminal is taken by the UI
    #[arg(long, default_value = "murmur-client.log")]
    pub log_file: PathBuf,
}

impl ClientArgs {
    /// Initial notification settings
    pub fn notification_config(&self) -> NotificationConfig {
        NotificationConfig {
            audio_enabled: !self.no_audio,
            volume: volume_from_percent(self.volume),
            sound_profile: self.sound,
            visual_enabled: !self.no_visual,
        }
    }

    pub fn endpoint(&self) -> Result<String, ChannelError> {
        resolve_endpoint(self.url.as_deref(), self.origin.as_deref())
    }

    pub fn audio_output(&self) -> Box<dyn AudioOutput> {
        match self.audio_output {
            AudioOutputKind::Pipe => Box::new(PcmPipeOutput::new(self.player.clone())),
            AudioOutputKind::Bell => Box::new(TerminalBell),
            AudioOutputKind::Disabled => Box::new(NoAudioOutput),
        }
    }
}
