//! Notification policy
//!
//! A customer who asked for a specific barber is only told when they are next
//! for that barber. A floating customer is told when they are next for any
//! active barber, or when their estimated wait for that barber is at or under
//! the shop's threshold. Entries already notified never qualify.

use crate::services::estimator::QueuedEntry;

/// Why an entry qualified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyReason {
    /// Position 0 in the barber's queue
    FrontOfQueue,
    /// Floating entry whose estimated wait is within the shop threshold
    WithinThreshold,
}

impl NotifyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyReason::FrontOfQueue => "front_of_queue",
            NotifyReason::WithinThreshold => "within_threshold",
        }
    }
}

impl std::fmt::Display for NotifyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one queued entry against the shop threshold (minutes)
pub fn classify(queued: &QueuedEntry<'_>, threshold_minutes: f64) -> Option<NotifyReason> {
    if queued.entry.notified {
        return None;
    }

    if queued.position == 0 {
        return Some(NotifyReason::FrontOfQueue);
    }

    if !queued.is_specific && queued.estimated_wait <= threshold_minutes {
        return Some(NotifyReason::WithinThreshold);
    }

    None
}

/// Eligible entries of a queue view, in position order
pub fn eligible_entries<'q, 'a>(
    queue: &'q [QueuedEntry<'a>],
    threshold_minutes: f64,
) -> impl Iterator<Item = (&'q QueuedEntry<'a>, NotifyReason)> {
    queue
        .iter()
        .filter_map(move |queued| classify(queued, threshold_minutes).map(|reason| (queued, reason)))
}
