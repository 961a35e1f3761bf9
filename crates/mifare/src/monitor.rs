//! Tag-presence tracking as an explicit state machine
//!
//! The polling loop, its timer and any daemonization belong to the caller;
//! this module only decides what a poll outcome *means*. Feed every poll
//! result through [`TagMonitor::observe`] and dispatch whatever event
//! comes back.

use std::time::Duration;

use nfcdump_core::Target;
use tracing::debug;

/// A tag status change worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEvent {
    /// A tag entered the field (or replaced the tracked one).
    Inserted(Target),
    /// The tracked tag left the field.
    Removed(Target),
    /// No tag has been present for the configured expiry interval.
    Expired,
}

/// Handler for tag events.
pub trait TagEventHandler {
    /// Handle one event.
    fn handle(&mut self, event: TagEvent);
}

impl<F> TagEventHandler for F
where
    F: FnMut(TagEvent),
{
    fn handle(&mut self, event: TagEvent) {
        self(event)
    }
}

/// Presence tracker fed by an external polling loop.
///
/// States are `Idle` (no tag tracked) and present; transitions emit
/// [`TagEvent`]s. While the field stays empty an optional expiry timer
/// accumulates the elapsed poll time and fires [`TagEvent::Expired`] each
/// time the interval passes. A tag sitting in the field does not expire;
/// the accumulator only runs while nothing is present.
#[derive(Debug)]
pub struct TagMonitor {
    current: Option<Target>,
    expire_after: Option<Duration>,
    idle_for: Duration,
}

impl TagMonitor {
    /// Monitor without expiry reporting.
    pub const fn new() -> Self {
        Self {
            current: None,
            expire_after: None,
            idle_for: Duration::ZERO,
        }
    }

    /// Monitor that emits [`TagEvent::Expired`] once the field has been
    /// empty for `interval`.
    pub const fn with_expiry(interval: Duration) -> Self {
        Self {
            current: None,
            expire_after: Some(interval),
            idle_for: Duration::ZERO,
        }
    }

    /// The tag currently tracked as present, if any.
    pub const fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Consume one poll outcome.
    ///
    /// `seen` is whatever the poll selected and `elapsed` the time spent
    /// since the previous observation. The same UID seen again is not an
    /// event; a different UID counts as a fresh insertion.
    pub fn observe(&mut self, seen: Option<Target>, elapsed: Duration) -> Option<TagEvent> {
        match seen {
            Some(seen) => {
                if self
                    .current
                    .as_ref()
                    .is_some_and(|current| current.uid == seen.uid)
                {
                    // State unchanged.
                    return None;
                }
                self.idle_for = Duration::ZERO;
                self.current = Some(seen);
                debug!(uid = %seen.uid, "event detected: tag inserted");
                Some(TagEvent::Inserted(seen))
            }
            None => {
                if let Some(removed) = self.current.take() {
                    self.idle_for = Duration::ZERO;
                    debug!(uid = %removed.uid, "event detected: tag removed");
                    return Some(TagEvent::Removed(removed));
                }

                // Field still empty: run the expiry timer if configured.
                let interval = self.expire_after?;
                self.idle_for += elapsed;
                if self.idle_for >= interval {
                    debug!("timeout on tag removed");
                    self.idle_for = Duration::ZERO;
                    return Some(TagEvent::Expired);
                }
                None
            }
        }
    }
}

impl Default for TagMonitor {
    fn default() -> Self {
        Self::new()
    }
}
