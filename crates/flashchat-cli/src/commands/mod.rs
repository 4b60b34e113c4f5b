//! Command handlers.
//!
//! Each handler collects its field values, calls the dispatch client, and
//! returns the text to print. Failures come back as [`AppError`] so the
//! caller can exit non-zero.
//!
//! [`AppError`]: crate::error::AppError

pub mod bulk;
pub mod lookup;
pub mod send;
pub mod stats;
pub mod webhook;

use clap::Args;
use flashchat_client::ReferenceEntity;

/// Optional link back to the record a message is about.
#[derive(Args, Debug, Clone, Default)]
pub struct ReferenceArgs {
    /// Entity type of the originating record (e.g. "Sales Order")
    #[arg(long, requires = "ref_id")]
    pub ref_type: Option<String>,

    /// Identifier of the originating record
    #[arg(long, requires = "ref_type")]
    pub ref_id: Option<String>,
}

impl ReferenceArgs {
    pub fn entity(&self) -> Option<ReferenceEntity> {
        match (&self.ref_type, &self.ref_id) {
            (Some(entity_type), Some(entity_id)) => {
                Some(ReferenceEntity::new(entity_type.clone(), entity_id.clone()))
            }
            _ => None,
        }
    }
}
