//! Notifications for inbound activity: synthesized tones and toasts.
//!
//! - [`config`]: the single-writer notification settings
//! - [`tone`] / [`synth`]: tone descriptions per sound profile and their rendering
//! - [`output`]: where rendered tones go
//! - [`player`]: the rich → simple → silent fallback chain
//! - [`toast`]: timed visual alerts
//! - [`dispatcher`]: glue invoked for every inbound chat message

pub mod config;
pub mod dispatcher;
pub mod output;
pub mod player;
pub mod synth;
pub mod toast;
pub mod tone;

pub use config::{NotificationConfig, NotificationConfigReader, NotificationSettings, SoundProfile};
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use output::{AudioError, AudioOutput};
pub use player::{PlayOutcome, ToneSynthesizer};
pub use synth::{SynthError, ToneBuffer, ToneRenderer};
pub use toast::{ToastId, ToastPresenter, ToastState, ToastSurface};
pub use tone::ToneSpec;
