//! Domain models - queue snapshot types
//!
//! This module contains the data read from the system of record:
//! - `Shop` - a barbershop and its notify threshold
//! - `Barber` - an active barber and their average cut time
//! - `QueueEntry` - one waiting customer

pub mod types;

// Re-export commonly used types at module level
pub use types::{Barber, BarberId, EntryId, MessageId, QueueEntry, Shop, ShopId};
