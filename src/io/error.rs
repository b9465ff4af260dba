//! Failures surfaced by the external collaborators

use crate::domain::types::EntryId;
use thiserror::Error;

/// Reading shops, barbers or queue entries failed
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for {resource} failed: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{resource} returned HTTP {status}: {body}")]
    Status { resource: &'static str, status: u16, body: String },
    #[error("failed to decode {resource}: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Recording the notified flag failed after a successful send
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("marking entry {entry_id} notified failed: {source}")]
    Transport {
        entry_id: EntryId,
        #[source]
        source: reqwest::Error,
    },
    #[error("marking entry {entry_id} notified returned HTTP {status}: {body}")]
    Status { entry_id: EntryId, status: u16, body: String },
}

/// Sending a message failed; the entry stays eligible for the next run
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no phone number to send to")]
    MissingRecipient,
    #[error("message request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("message rejected with HTTP {status} (code {code:?}): {message}")]
    Rejected { status: u16, code: Option<i64>, message: String },
    #[error("failed to decode message response: {0}")]
    Decode(#[from] serde_json::Error),
}
