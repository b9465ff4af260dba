//! Notification run controller
//!
//! One pass over the system of record:
//! shops -> active barbers -> barber queue view (position order) ->
//! classify -> send -> record `notified`.
//!
//! Failures are isolated to the smallest unit of work. Only a failure to
//! list shops aborts the run, and it does so before any side effect.


use crate::domain::types::{Barber, EntryId, Shop};
use crate::infra::metrics::RunSummary;
use crate::io::error::LoadError;
use crate::io::traits::{Dispatcher, QueueSource};
use crate::services::eligibility::{classify, NotifyReason};
use crate::services::estimator::{estimate_queue, QueuedEntry};
use crate::services::message::render_message;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not load shops: {0}")]
    ShopsUnavailable(#[source] LoadError),
}

/// Mutable state scoped to a single run
#[derive(Default)]
struct RunState {
    summary: RunSummary,
    /// Entries already handed to the dispatcher (or logged, in dry-run) this run
    attempted: HashSet<EntryId>,
}

pub struct Notifier<S, D> {
    source: S,
    dispatcher: D,
    template: String,
    dry_run: bool,
}

impl<S: QueueSource, D: Dispatcher> Notifier<S, D> {
    pub fn new(source: S, dispatcher: D, template: impl Into<String>) -> Self {
        Self { source, dispatcher, template: template.into(), dry_run: false }
    }

    /// Classify and log without sending or recording anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one notification pass
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let shops = self.source.list_shops().await.map_err(RunError::ShopsUnavailable)?;
        info!(shops = %shops.len(), dry_run = %self.dry_run, "run_started");

        let mut state = RunState::default();
        for shop in &shops {
            self.process_shop(shop, &mut state).await;
        }

        state.summary.log();
        Ok(state.summary)
    }

    async fn process_shop(&self, shop: &Shop, state: &mut RunState) {
        state.summary.shops += 1;

        let barbers = match self.source.list_active_barbers(&shop.id).await {
            Ok(barbers) => barbers,
            Err(e) => {
                state.summary.shops_skipped += 1;
                warn!(shop_id = %shop.id, error = %e, "shop_skipped");
                return;
            }
        };

        debug!(shop_id = %shop.id, barbers = %barbers.len(), "shop_loaded");
        for barber in &barbers {
            self.process_barber(shop, barber, state).await;
        }
    }

    async fn process_barber(&self, shop: &Shop, barber: &Barber, state: &mut RunState) {
        state.summary.barbers += 1;

        let entries = match self.source.list_waiting_queue(&shop.id).await {
            Ok(entries) => entries,
            Err(e) => {
                state.summary.barbers_skipped += 1;
                warn!(shop_id = %shop.id, barber_id = %barber.id, error = %e, "barber_skipped");
                return;
            }
        };

        let threshold = shop.threshold_minutes();
        let queue = estimate_queue(barber, &entries);

        for queued in &queue {
            state.summary.entries_evaluated += 1;

            let Some(reason) = classify(queued, threshold) else {
                continue;
            };
            state.summary.eligible += 1;

            // A floating entry can qualify under several barbers in one pass
            if !state.attempted.insert(queued.entry.id.clone()) {
                state.summary.duplicates_suppressed += 1;
                debug!(
                    entry_id = %queued.entry.id,
                    barber_id = %barber.id,
                    "notification_duplicate_suppressed"
                );
                continue;
            }

            self.notify(shop, barber, queued, reason, &mut state.summary).await;
        }
    }

    async fn notify(
        &self,
        shop: &Shop,
        barber: &Barber,
        queued: &QueuedEntry<'_>,
        reason: NotifyReason,
        summary: &mut RunSummary,
    ) {
        let entry = queued.entry;
        let body = render_message(&self.template, &entry.customer_name);

        if self.dry_run {
            summary.would_send += 1;
            info!(
                shop_id = %shop.id,
                barber_id = %barber.id,
                entry_id = %entry.id,
                customer = %entry.customer_name,
                position = %queued.position,
                estimated_wait = %queued.estimated_wait,
                reason = %reason,
                "notification_dry_run"
            );
            return;
        }

        let message_id = match self.dispatcher.send(&entry.phone_number, &body).await {
            Ok(message_id) => message_id,
            Err(e) => {
                summary.send_failures += 1;
                error!(
                    shop_id = %shop.id,
                    barber_id = %barber.id,
                    entry_id = %entry.id,
                    customer = %entry.customer_name,
                    error = %e,
                    "notification_send_failed"
                );
                return;
            }
        };

        summary.sent += 1;
        info!(
            shop_id = %shop.id,
            barber_id = %barber.id,
            entry_id = %entry.id,
            customer = %entry.customer_name,
            position = %queued.position,
            estimated_wait = %queued.estimated_wait,
            reason = %reason,
            message_id = %message_id,
            "notification_sent"
        );

        // The message is out; failing here risks a repeat on the next run
        if let Err(e) = self.source.mark_notified(&entry.id).await {
            summary.persist_failures += 1;
            error!(
                shop_id = %shop.id,
                entry_id = %entry.id,
                customer = %entry.customer_name,
                error = %e,
                "notified_persist_failed"
            );
        }
    }
}
