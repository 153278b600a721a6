//! Timed visual alerts.
//!
//! Every toast is driven by its own timer task:
//! mounted (entering) → visible at 50ms → exiting at 3.0s → removed at 3.3s.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;

/// Length of the entrance transition
pub const ENTRANCE: Duration = Duration::from_millis(50);
/// When the exit transition starts
pub const EXIT_AT: Duration = Duration::from_millis(3_000);
/// Length of the exit transition
pub const EXIT: Duration = Duration::from_millis(300);
/// When the toast is gone
pub const REMOVE_AT: Duration = Duration::from_millis(3_300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastState {
    Entering,
    Visible,
    Exiting,
    Removed,
}

impl ToastState {
    /// State of a toast `elapsed` after it was created
    pub fn at(elapsed: Duration) -> Self {
        if elapsed < ENTRANCE {
            ToastState::Entering
        } else if elapsed < EXIT_AT {
            ToastState::Visible
        } else if elapsed < REMOVE_AT {
            ToastState::Exiting
        } else {
            ToastState::Removed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub text: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn state_at(&self, now: Instant) -> ToastState {
        ToastState::at(now.saturating_duration_since(self.created_at))
    }
}

/// Where toasts are drawn. `remove` must tolerate ids that are already gone.
pub trait ToastSurface: Send + Sync {
    fn mount(&self, toast: &Toast);
    fn set_state(&self, id: ToastId, state: ToastState);
    fn remove(&self, id: ToastId);
}

/// Handle on a presented toast
#[derive(Debug)]
pub struct ToastHandle {
    id: ToastId,
    task: JoinHandle<()>,
}

impl ToastHandle {
    pub fn id(&self) -> ToastId {
        self.id
    }

    /// Wait until the toast has been removed
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            tracing::warn!(id = %self.id, "Toast timer task failed: {}", e);
        }
    }
}

pub struct ToastPresenter {
    surface: Arc<dyn ToastSurface>,
    next_id: AtomicU64,
}

impl ToastPresenter {
    pub fn new(surface: Arc<dyn ToastSurface>) -> Self {
        Self {
            surface,
            next_id: AtomicU64::new(1),
        }
    }

    /// Show `text` and retire it on its own schedule.
    pub fn present(&self, text: impl Into<String>) -> ToastHandle {
        self.present_with_cancel(text, CancellationToken::new())
    }

    /// Like [`present`](Self::present); cancelling `cancel` removes the toast early.
    pub fn present_with_cancel(
        &self,
        text: impl Into<String>,
        cancel: CancellationToken,
    ) -> ToastHandle {
        let toast = Toast {
            id: ToastId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            text: text.into(),
            created_at: Instant::now(),
        };
        let id = toast.id;
        tracing::debug!(%id, text = %toast.text, "Presenting toast");
        self.surface.mount(&toast);

        let surface = Arc::clone(&self.surface);
        let task = tokio::spawn(async move {
            for (state, at) in [(ToastState::Visible, ENTRANCE), (ToastState::Exiting, EXIT_AT)] {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep_until(toast.created_at + at) => {
                        surface.set_state(id, state);
                    }
                }
            }
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(toast.created_at + REMOVE_AT) => {}
            }
            surface.remove(id);
            tracing::debug!(%id, "Toast removed");
        });

        ToastHandle { id, task }
    }
}
