//! Collaborator seams for the notification run
//!
//! The run controller only talks to the outside world through these traits,
//! so production adapters (Supabase, Twilio) and in-memory fakes are
//! interchangeable.

use crate::domain::types::{Barber, EntryId, MessageId, QueueEntry, Shop, ShopId};
use crate::io::error::{DispatchError, LoadError, PersistError};
use async_trait::async_trait;
use std::sync::Arc;

/// Read side of the system of record plus the notified-flag write
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// All shops with their notify threshold
    async fn list_shops(&self) -> Result<Vec<Shop>, LoadError>;

    /// Barbers of `shop_id` whose status is active
    async fn list_active_barbers(&self, shop_id: &ShopId) -> Result<Vec<Barber>, LoadError>;

    /// Waiting entries of `shop_id`, ordered by `joined_at` ascending
    async fn list_waiting_queue(&self, shop_id: &ShopId) -> Result<Vec<QueueEntry>, LoadError>;

    /// Set `notified = true` on one entry
    async fn mark_notified(&self, entry_id: &EntryId) -> Result<(), PersistError>;
}

/// Outbound message channel
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, DispatchError>;
}

#[async_trait]
impl<T: QueueSource + ?Sized> QueueSource for Arc<T> {
    async fn list_shops(&self) -> Result<Vec<Shop>, LoadError> {
        (**self).list_shops().await
    }

    async fn list_active_barbers(&self, shop_id: &ShopId) -> Result<Vec<Barber>, LoadError> {
        (**self).list_active_barbers(shop_id).await
    }

    async fn list_waiting_queue(&self, shop_id: &ShopId) -> Result<Vec<QueueEntry>, LoadError> {
        (**self).list_waiting_queue(shop_id).await
    }

    async fn mark_notified(&self, entry_id: &EntryId) -> Result<(), PersistError> {
        (**self).mark_notified(entry_id).await
    }
}

#[async_trait]
impl<T: Dispatcher + ?Sized> Dispatcher for Arc<T> {
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, DispatchError> {
        (**self).send(to, body).await
    }
}
