//! image-registry - validate, upload and register images against a records API
//!
//! This crate provides the client side of an "add image" flow:
//! - Declarative validation of title, description and image size
//! - Swappable upload backends (local filesystem, GCS) returning public URLs
//! - A records API client with a staleness-tracking query cache
//! - A submission sequencer reporting through an injected notifier

pub mod api;
pub mod cache;
pub mod config;
pub mod form;
pub mod notify;
pub mod object_store;
pub mod search;
pub mod submission;
pub mod validation;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;

use cache::RecordsCache;
use search::ProductSearch;
use submission::Submission;

/// Shared application state
pub struct AppState {
    pub cache: Arc<RecordsCache>,
    pub search: ProductSearch,
    pub submission: Submission,
    pub uploader: Arc<dyn object_store::Uploader>,
}
