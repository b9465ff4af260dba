//! Per-run counters and the end-of-run summary log line
//!
//! A run is sequential, so plain integers suffice; the summary is owned by
//! the run controller and handed back when the run completes.

use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Shops returned by the data source
    pub shops: u64,
    /// Shops whose barber list could not be loaded
    pub shops_skipped: u64,
    /// Active barbers visited
    pub barbers: u64,
    /// Barbers whose queue could not be loaded
    pub barbers_skipped: u64,
    /// (barber, entry) pairs classified
    pub entries_evaluated: u64,
    /// (barber, entry) pairs classified eligible
    pub eligible: u64,
    /// Eligible pairs skipped because the entry was already attempted this run
    pub duplicates_suppressed: u64,
    /// Messages accepted by the dispatcher
    pub sent: u64,
    /// Messages the dispatcher failed to send
    pub send_failures: u64,
    /// Sent messages whose notified flag could not be recorded
    pub persist_failures: u64,
    /// Messages that would have been sent in dry-run mode
    pub would_send: u64,
}

impl RunSummary {
    /// Delivery attempts made (successful or not)
    pub fn attempts(&self) -> u64 {
        self.sent + self.send_failures
    }

    /// Whether anything went wrong that an operator should look at
    pub fn has_failures(&self) -> bool {
        self.shops_skipped > 0
            || self.barbers_skipped > 0
            || self.send_failures > 0
            || self.persist_failures > 0
    }

    /// Log summary
    pub fn log(&self) {
        info!(
            shops = %self.shops,
            shops_skipped = %self.shops_skipped,
            barbers = %self.barbers,
            barbers_skipped = %self.barbers_skipped,
            entries_evaluated = %self.entries_evaluated,
            eligible = %self.eligible,
            duplicates_suppressed = %self.duplicates_suppressed,
            sent = %self.sent,
            send_failures = %self.send_failures,
            persist_failures = %self.persist_failures,
            would_send = %self.would_send,
            "run_summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_default() {
        let summary = RunSummary::default();
        assert_eq!(summary.attempts(), 0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn test_has_failures() {
        let summary = RunSummary { sent: 3, send_failures: 1, ..Default::default() };
        assert_eq!(summary.attempts(), 4);
        assert!(summary.has_failures());

        let summary = RunSummary { barbers_skipped: 1, ..Default::default() };
        assert!(summary.has_failures());

        let summary = RunSummary { sent: 2, duplicates_suppressed: 5, ..Default::default() };
        assert!(!summary.has_failures());
    }
}
