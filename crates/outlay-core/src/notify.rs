//! Transient user notifications with automatic expiry
//!
//! Tracks the set of concurrently visible toast-style messages and
//! guarantees each one leaves the screen when its time-to-live elapses or
//! the user dismisses it, whichever comes first. The manager is the
//! receiver of failure information from the auth/store glue (error-level
//! messages); it has no failure modes of its own.
//!
//! Lifecycle per notification: created → visible → dismissing → removed.
//! Creation happens inside [`NotificationManager::post`] (the message is
//! visible immediately, no batching) and removal drops the entry from the
//! visible set, so [`Phase`] only models the two observable states in
//! between. `Dismissing` is the brief exit-animation window; it never
//! returns to `Visible`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

/// How long an entry lingers in [`Phase::Dismissing`] so the chrome can
/// play its exit animation. Must stay well under the shortest TTL.
pub const DISMISS_ANIMATION: Duration = Duration::from_millis(300);

/// Severity level of a notification.
///
/// Levels differ only in default TTL and presentation styling; the
/// lifecycle mechanics are identical for all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Heading shown above the message text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Font Awesome icon class for the toast badge.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "fa-info-circle",
            Self::Success => "fa-check-circle",
            Self::Warning => "fa-exclamation-triangle",
            Self::Error => "fa-exclamation-circle",
        }
    }

    /// How long a notification of this level stays up unless dismissed.
    /// Errors linger longest so they can actually be read.
    pub fn default_ttl(&self) -> Duration {
        match self {
            Self::Error => Duration::from_millis(6000),
            Self::Warning => Duration::from_millis(5000),
            Self::Success | Self::Info => Duration::from_millis(4000),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown notification level: {}", s)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of a posted notification, unique for the process lifetime.
/// Never reused, even after the notification is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable lifecycle phase of an on-screen notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Visible,
    /// Exit animation running; removal is already scheduled.
    Dismissing,
}

/// A short-lived, leveled message shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub level: Level,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Time from posting until automatic dismissal begins.
    pub ttl: Duration,
    pub phase: Phase,
}

struct Entry {
    notification: Notification,
    /// Pending TTL-expiry or removal timer. Aborted when the transition it
    /// guards is superseded; dropped (detached) when the entry is removed.
    timer: JoinHandle<()>,
}

// Ids are process-wide, not per-manager, so an id observed anywhere in the
// process is never seen twice.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to the shared notification state. Cheap to clone; all clones
/// observe the same visible set.
///
/// Must live inside a tokio runtime: posting schedules the expiry timer as
/// a task on it. `post`, `dismiss`, and timer callbacks serialize on the
/// internal mutex; across multiple notifications only each one's own TTL
/// deadline is guaranteed, not a global firing order.
#[derive(Clone)]
pub struct NotificationManager {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<HashMap<NotificationId, Entry>>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Post a notification with the level's default TTL.
    ///
    /// The message is visible immediately and the returned id can be used
    /// to dismiss it early. Every call produces a new, independent
    /// notification; identical messages are not de-duplicated.
    pub fn post(&self, level: Level, message: impl Into<String>) -> NotificationId {
        self.post_with_ttl(level, message, level.default_ttl())
    }

    /// Post with an explicit TTL instead of the level default.
    pub fn post_with_ttl(
        &self,
        level: Level,
        message: impl Into<String>,
        ttl: Duration,
    ) -> NotificationId {
        let id = NotificationId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            level,
            message: message.into(),
            created_at: Utc::now(),
            ttl,
            phase: Phase::Visible,
        };
        debug!(id = %id, level = %level, ttl_ms = ttl.as_millis() as u64, "Posting notification");

        // Spawn the timer while holding the lock: if the TTL is tiny, the
        // expiry callback blocks on the mutex until the entry exists.
        let mut entries = self.entries();
        let manager = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            manager.expire(id);
        });
        entries.insert(id, Entry { notification, timer });

        id
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.post(Level::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.post(Level::Success, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.post(Level::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.post(Level::Error, message)
    }

    /// Begin dismissal of a visible notification.
    ///
    /// Idempotent: unknown, already-dismissing, and already-removed ids
    /// are a no-op, so UI cleanup code never has to check liveness first.
    pub fn dismiss(&self, id: NotificationId) {
        self.begin_removal(id, "dismissed");
    }

    /// Snapshot of the currently displayed notifications (fully visible
    /// and exit-animating), in posting order.
    pub fn visible(&self) -> Vec<Notification> {
        let entries = self.entries();
        let mut list: Vec<Notification> = entries
            .values()
            .map(|entry| entry.notification.clone())
            .collect();
        list.sort_by_key(|n| n.id.0);
        list
    }

    fn expire(&self, id: NotificationId) {
        self.begin_removal(id, "expired");
    }

    /// Shared Visible → Dismissing transition for explicit dismissal and
    /// TTL expiry. The phase check is the double-removal guard: a timer
    /// firing after an explicit dismiss (or a second dismiss) finds the
    /// entry already past Visible and does nothing.
    fn begin_removal(&self, id: NotificationId, cause: &'static str) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(&id) else {
            return;
        };
        if entry.notification.phase != Phase::Visible {
            return;
        }
        entry.notification.phase = Phase::Dismissing;
        debug!(id = %id, cause, "Notification dismissing");

        // Cancel the pending TTL timer and replace it with the removal
        // timer that ends the exit animation.
        entry.timer.abort();
        let manager = self.clone();
        entry.timer = tokio::spawn(async move {
            tokio::time::sleep(DISMISS_ANIMATION).await;
            manager.remove(id);
        });
    }

    fn remove(&self, id: NotificationId) {
        let mut entries = self.entries();
        if entries.remove(&id).is_some() {
            debug!(id = %id, "Notification removed");
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<NotificationId, Entry>> {
        // Recover rather than panic if a holder panicked mid-update; the
        // map stays structurally valid either way.
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
