//! Queue position and wait estimation for a single barber's view

use crate::domain::types::{Barber, QueueEntry};

/// Service time (minutes) used when a barber has no usable average
pub const DEFAULT_CUT_MINUTES: f64 = 15.0;

/// An entry placed in one barber's queue view
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedEntry<'a> {
    pub entry: &'a QueueEntry,
    /// Zero-based rank in the barber-filtered, time-ordered queue
    pub position: usize,
    /// `position * service_time(barber)` in minutes
    pub estimated_wait: f64,
    /// Entry explicitly requested this barber
    pub is_specific: bool,
}

/// Average cut time if positive, otherwise [`DEFAULT_CUT_MINUTES`]
pub fn service_time(barber: &Barber) -> f64 {
    match barber.average_cut_time {
        Some(minutes) if minutes > 0.0 => minutes,
        _ => DEFAULT_CUT_MINUTES,
    }
}

/// Build `barber`'s queue view from a shop's waiting entries.
///
/// `entries` must already be ordered by `joined_at` ascending; the order is
/// preserved and positions are assigned after filtering out entries pinned to
/// other barbers.
pub fn estimate_queue<'a>(barber: &Barber, entries: &'a [QueueEntry]) -> Vec<QueuedEntry<'a>> {
    let minutes = service_time(barber);

    entries
        .iter()
        .filter(|entry| entry.is_relevant_to(&barber.id))
        .enumerate()
        .map(|(position, entry)| QueuedEntry {
            entry,
            position,
            estimated_wait: position as f64 * minutes,
            is_specific: entry.requested_barber_id.as_ref() == Some(&barber.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BarberId, EntryId};
    use chrono::{Duration, TimeZone, Utc};

    fn barber(id: &str, average_cut_time: Option<f64>) -> Barber {
        Barber { id: BarberId::from(id), average_cut_time }
    }

    fn entry(id: &str, requested: Option<&str>, minute: i64) -> QueueEntry {
        QueueEntry {
            id: EntryId::from(id),
            requested_barber_id: requested.map(BarberId::from),
            joined_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minute),
            notified: false,
            customer_name: format!("customer-{id}"),
            phone_number: "+61400000000".to_string(),
        }
    }

    #[test]
    fn test_service_time_defaults() {
        assert_eq!(service_time(&barber("b", None)), 15.0);
        assert_eq!(service_time(&barber("b", Some(0.0))), 15.0);
        assert_eq!(service_time(&barber("b", Some(-5.0))), 15.0);
        assert_eq!(service_time(&barber("b", Some(25.0))), 25.0);
        assert_eq!(service_time(&barber("b", Some(12.5))), 12.5);
    }

    #[test]
    fn test_positions_and_waits() {
        let b = barber("b1", Some(20.0));
        let entries = vec![entry("1", None, 0), entry("2", None, 1), entry("3", None, 2)];

        let queue = estimate_queue(&b, &entries);
        assert_eq!(queue.len(), 3);
        for (i, queued) in queue.iter().enumerate() {
            assert_eq!(queued.position, i);
            assert_eq!(queued.estimated_wait, i as f64 * 20.0);
        }
        assert_eq!(queue[0].estimated_wait, 0.0);
    }

    #[test]
    fn test_entries_for_other_barbers_filtered_out() {
        let b = barber("b1", None);
        let entries = vec![
            entry("1", Some("b2"), 0),
            entry("2", Some("b1"), 1),
            entry("3", None, 2),
            entry("4", Some("b2"), 3),
            entry("5", Some("b1"), 4),
        ];

        let queue = estimate_queue(&b, &entries);
        let ids: Vec<&str> = queue.iter().map(|q| q.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "5"]);
        assert!(queue[0].is_specific);
        assert!(!queue[1].is_specific);
        assert!(queue[2].is_specific);
        assert_eq!(queue[2].position, 2);
        assert_eq!(queue[2].estimated_wait, 30.0);
    }

    #[test]
    fn test_zero_average_uses_default() {
        let b = barber("b1", Some(0.0));
        let entries = vec![entry("1", None, 0), entry("2", None, 1)];

        let queue = estimate_queue(&b, &entries);
        assert_eq!(queue[1].estimated_wait, 15.0);
    }

    #[test]
    fn test_empty_queue() {
        let b = barber("b1", Some(10.0));
        assert!(estimate_queue(&b, &[]).is_empty());
    }

    #[test]
    fn test_fractional_average() {
        let b = barber("b1", Some(12.5));
        let entries = vec![entry("1", None, 0), entry("2", None, 1), entry("3", None, 2)];

        let queue = estimate_queue(&b, &entries);
        assert_eq!(queue[1].estimated_wait, 12.5);
        assert_eq!(queue[2].estimated_wait, 25.0);
    }
}
