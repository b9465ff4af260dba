//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `traits` - Collaborator seams (`QueueSource`, `Dispatcher`)
//! - `error` - Load, dispatch and persist failures
//! - `supabase` - PostgREST client for shops, barbers and queue entries
//! - `twilio` - SMS dispatcher

pub mod error;
pub mod supabase;
pub mod traits;
pub mod twilio;

// Re-export commonly used types
pub use error::{DispatchError, LoadError, PersistError};
pub use supabase::SupabaseClient;
pub use traits::{Dispatcher, QueueSource};
pub use twilio::TwilioDispatcher;
