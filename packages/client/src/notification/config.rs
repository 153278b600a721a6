//! Notification settings.
//!
//! The settings live in a `watch` channel: [`NotificationSettings`] owns the
//! only sender and is not `Clone`, so there is exactly one writer. Readers
//! borrow the current value at dispatch time and never keep a copy around.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use tokio::sync::watch;

/// Default volume, as a fraction of full scale
pub const DEFAULT_VOLUME: f32 = 0.4;

/// Which tone plays for an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SoundProfile {
    /// Two filtered sines with a falling step
    #[default]
    Normal,
    /// A single sine; also the fallback for the other profiles
    Simple,
    /// A three-voice major chord stepping up
    Special,
}

impl SoundProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundProfile::Normal => "normal",
            SoundProfile::Simple => "simple",
            SoundProfile::Special => "special",
        }
    }

    /// Next profile in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            SoundProfile::Normal => SoundProfile::Simple,
            SoundProfile::Simple => SoundProfile::Special,
            SoundProfile::Special => SoundProfile::Normal,
        }
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(SoundProfile::Normal),
            "simple" => Ok(SoundProfile::Simple),
            "special" => Ok(SoundProfile::Special),
            other => Err(format!("unknown sound profile: {other}")),
        }
    }
}

/// Snapshot of the notification settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationConfig {
    pub audio_enabled: bool,
    /// Fraction of full scale, within `0.0..=1.0`
    pub volume: f32,
    pub sound_profile: SoundProfile,
    pub visual_enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            volume: DEFAULT_VOLUME,
            sound_profile: SoundProfile::Normal,
            visual_enabled: true,
        }
    }
}

impl NotificationConfig {
    /// Volume as shown on the control, `0..=100`
    pub fn volume_percent(&self) -> u8 {
        (self.volume * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Volume label, e.g. `40%`
    pub fn volume_label(&self) -> String {
        format!("{}%", self.volume_percent())
    }
}

/// Convert a `0..=100` control value into a stored volume. Values above 100 clamp.
pub fn volume_from_percent(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// The single writer of the notification settings.
pub struct NotificationSettings {
    tx: watch::Sender<NotificationConfig>,
}

impl NotificationSettings {
    pub fn new(initial: NotificationConfig) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// A read-only view of the settings
    pub fn reader(&self) -> NotificationConfigReader {
        NotificationConfigReader {
            rx: self.tx.subscribe(),
        }
    }

    /// Current settings
    pub fn current(&self) -> NotificationConfig {
        *self.tx.borrow()
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.tx.send_modify(|config| config.audio_enabled = enabled);
        tracing::debug!(enabled, "Audio notifications toggled");
    }

    /// Set the volume from a `0..=100` control value; stored as `percent / 100`.
    pub fn set_volume_percent(&mut self, percent: u8) {
        let volume = volume_from_percent(percent);
        self.tx.send_modify(|config| config.volume = volume);
        tracing::debug!(volume, "Notification volume changed");
    }

    pub fn set_sound_profile(&mut self, profile: SoundProfile) {
        self.tx.send_modify(|config| config.sound_profile = profile);
        tracing::debug!(%profile, "Sound profile changed");
    }

    pub fn set_visual_enabled(&mut self, enabled: bool) {
        self.tx.send_modify(|config| config.visual_enabled = enabled);
        tracing::debug!(enabled, "Visual notifications toggled");
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

/// Read-only handle on the notification settings.
#[derive(Clone)]
pub struct NotificationConfigReader {
    rx: watch::Receiver<NotificationConfig>,
}

impl NotificationConfigReader {
    /// The settings as of right now
    pub fn current(&self) -> NotificationConfig {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 既定値は音声あり・音量 0.4・normal・視覚通知あり
        let config = NotificationConfig::default();

        assert!(config.audio_enabled);
        assert_eq!(config.volume, 0.4);
        assert_eq!(config.sound_profile, SoundProfile::Normal);
        assert!(config.visual_enabled);
        assert_eq!(config.volume_label(), "40%");
    }

    #[test]
    fn test_volume_control_40_stores_exactly_0_4() {
        // テスト項目: 音量コントロール 40 は 0.4 として保存される
        // given (前提条件):
        let mut settings = NotificationSettings::new(NotificationConfig {
            volume: 1.0,
            ..NotificationConfig::default()
        });

        // when (操作):
        settings.set_volume_percent(40);

        // then (期待する結果):
        assert_eq!(settings.current().volume, 0.4);
    }

    #[test]
    fn test_volume_control_clamps_above_100() {
        // テスト項目: 100 を超える値は 100 に丸められる
        let mut settings = NotificationSettings::default();

        settings.set_volume_percent(250);

        assert_eq!(settings.current().volume, 1.0);
        assert_eq!(settings.current().volume_label(), "100%");
    }

    #[test]
    fn test_mutators_touch_only_their_field() {
        // テスト項目: 各設定操作は対象のフィールドだけを変更する
        // given (前提条件):
        let mut settings = NotificationSettings::default();

        // when (操作):
        settings.set_audio_enabled(false);

        // then (期待する結果):
        let config = settings.current();
        assert!(!config.audio_enabled);
        assert_eq!(config.volume, 0.4);
        assert_eq!(config.sound_profile, SoundProfile::Normal);
        assert!(config.visual_enabled);

        settings.set_sound_profile(SoundProfile::Special);
        settings.set_visual_enabled(false);
        let config = settings.current();
        assert!(!config.audio_enabled);
        assert_eq!(config.sound_profile, SoundProfile::Special);
        assert!(!config.visual_enabled);
    }

    #[test]
    fn test_reader_sees_writes_immediately() {
        // テスト項目: 読み取り側は書き込み直後の値を参照する（古いコピーを持たない）
        // given (前提条件):
        let mut settings = NotificationSettings::default();
        let reader = settings.reader();
        assert!(reader.current().audio_enabled);

        // when (操作):
        settings.set_audio_enabled(false);
        settings.set_volume_percent(75);

        // then (期待する結果):
        assert!(!reader.current().audio_enabled);
        assert_eq!(reader.current().volume, 0.75);
    }

    #[test]
    fn test_sound_profile_cycle_and_parse() {
        // テスト項目: プロファイルは normal → simple → special → normal の順に切り替わる
        assert_eq!(SoundProfile::Normal.next(), SoundProfile::Simple);
        assert_eq!(SoundProfile::Simple.next(), SoundProfile::Special);
        assert_eq!(SoundProfile::Special.next(), SoundProfile::Normal);
        assert_eq!("special".parse::<SoundProfile>(), Ok(SoundProfile::Special));
        assert!("loud".parse::<SoundProfile>().is_err());
    }
}
