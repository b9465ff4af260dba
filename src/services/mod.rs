//! Services - business logic
//!
//! This module contains the wait-estimation and notification logic:
//! - `estimator` - Queue positions and estimated waits per barber
//! - `eligibility` - Notification policy
//! - `message` - Message body rendering
//! - `notifier` - Run controller tying loads, policy and sends together

pub mod eligibility;
pub mod estimator;
pub mod message;
pub mod notifier;

// Re-export commonly used types
pub use eligibility::{classify, eligible_entries, NotifyReason};
pub use estimator::{estimate_queue, service_time, QueuedEntry, DEFAULT_CUT_MINUTES};
pub use notifier::{Notifier, RunError};
