//! Transient Notices
//!
//! Success/error banners that clear themselves after a short delay. The UI
//! subscribes to a watch channel and renders whatever is current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// How long a notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

// == Notifier ==
/// Holds the current notice. Posting replaces it and schedules a clear;
/// a clear only applies if no newer notice was posted in the meantime.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Arc<watch::Sender<Option<Notice>>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<Notice> {
        self.tx.borrow().clone()
    }

    /// Shows `notice` and clears it after the TTL. Outside a Tokio runtime
    /// the notice stays until replaced.
    pub fn post(&self, notice: Notice) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.tx.send_replace(Some(notice));

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime; notice will not auto-clear");
            return;
        };
        let tx = self.tx.clone();
        let current = self.generation.clone();
        let ttl = self.ttl;
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            if current.load(Ordering::SeqCst) == generation {
                tx.send_replace(None);
            }
        });
    }

    /// Removes the current notice immediately.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(None);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}
