//! FlashChat messaging gateway client.
//!
//! [`MessageRequestBuilder`] validates caller input into a
//! [`MessageRequest`]; [`DispatchClient`] routes it to the matching gateway
//! operation and normalizes whatever comes back into a [`DispatchResult`].

mod builder;
mod bulk;
mod client;
mod dispatcher;
mod envelope;
mod error;
mod operation;
pub mod phone;
mod refresher;
mod stats;
mod template;
mod types;
mod webhook;

pub use builder::{MessageRequestBuilder, RawFields, DEFAULT_OTP_EXPIRY_SECONDS};
pub use bulk::{BulkJob, BulkOutcome, BulkRecord, BulkRunner, BulkSummary};
pub use client::{DispatchClient, DEFAULT_TIMEOUT};
pub use dispatcher::MessageDispatcher;
pub use error::{
    ClientError, DispatchError, ParseError, TemplateError, ValidationError, WebhookError,
    UNKNOWN_ERROR,
};
pub use operation::Operation;
pub use refresher::{StatsRefresher, DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
pub use stats::{DashboardStats, PeriodStats, StatsWindow};
pub use template::{MessageTemplate, DEFAULT_COMPANY_NAME};
pub use types::*;
pub use webhook::{verify_signature, WebhookEvent, WebhookReceiver, SIGNATURE_HEADER};
