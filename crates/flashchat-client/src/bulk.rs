//! Bulk dispatch over a set of records.

use crate::builder::{MessageRequestBuilder, RawFields};
use crate::dispatcher::MessageDispatcher;
use crate::error::ValidationError;
use crate::phone::{select_primary_phone, PhoneEntry};
use crate::template::MessageTemplate;
use crate::types::{DispatchResult, MessageRequest, MessageType, ReferenceEntity, SimSlot};
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// What to send to every record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJob {
    pub message_type: MessageType,
    /// Body template; ignored for OTP.
    #[serde(default)]
    pub template: MessageTemplate,
    /// Template values shared by every record, e.g. `company_name`.
    #[serde(default)]
    pub defaults: HashMap<String, String>,
    #[serde(default)]
    pub channel_account: Option<String>,
    #[serde(default)]
    pub sim_slot: Option<SimSlot>,
    #[serde(default)]
    pub otp_expiry_seconds: Option<i64>,
    /// Entity type recorded as the reference of each message.
    #[serde(default)]
    pub entity_type: Option<String>,
}

/// One target record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRecord {
    pub record_id: String,
    #[serde(default)]
    pub phones: Vec<PhoneEntry>,
    #[serde(default)]
    pub context: HashMap<String, String>,
}

/// Outcome for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub record_id: String,
    pub outcome: Result<DispatchResult, ValidationError>,
}

/// Counts over a bulk run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkSummary {
    pub sent: usize,
    pub failed: usize,
    pub invalid: usize,
}

impl BulkSummary {
    pub fn from_outcomes(outcomes: &[BulkOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, o| {
                match &o.outcome {
                    Ok(result) if result.success => summary.sent += 1,
                    Ok(_) => summary.failed += 1,
                    Err(_) => summary.invalid += 1,
                }
                summary
            })
    }
}

/// Sends one message per record through a dispatcher.
pub struct BulkRunner<D> {
    dispatcher: D,
}

impl<D: MessageDispatcher> BulkRunner<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// Build the request for one record without sending it.
    pub fn prepare(job: &BulkJob, record: &BulkRecord) -> Result<MessageRequest, ValidationError> {
        let body = match job.message_type {
            MessageType::Otp => None,
            _ => {
                let mut context = job.defaults.clone();
                context.extend(record.context.clone());
                Some(job.template.render(&context))
            }
        };

        let fields = RawFields {
            phone_number: select_primary_phone(&record.phones).map(str::to_string),
            body,
            channel_account: job.channel_account.clone(),
            sim_slot: job.sim_slot,
            otp_expiry_seconds: job.otp_expiry_seconds,
            reference_entity: job
                .entity_type
                .as_ref()
                .map(|t| ReferenceEntity::new(t.clone(), record.record_id.clone())),
        };

        MessageRequestBuilder::build(job.message_type, &fields)
    }

    /// Send to every record concurrently.
    ///
    /// Records that fail validation are reported without a send. Outcomes
    /// are returned in input order.
    #[instrument(skip_all, fields(message_type = %job.message_type, records = records.len()))]
    pub async fn run(&self, job: &BulkJob, records: &[BulkRecord]) -> Vec<BulkOutcome> {
        let sends = records.iter().map(|record| async move {
            let outcome = match Self::prepare(job, record) {
                Ok(request) => Ok(self.dispatcher.send(&request).await),
                Err(e) => Err(e),
            };
            BulkOutcome {
                record_id: record.record_id.clone(),
                outcome,
            }
        });

        let outcomes = join_all(sends).await;
        let summary = BulkSummary::from_outcomes(&outcomes);
        info!(
            "Bulk {} run: {} sent, {} failed, {} invalid",
            job.message_type, summary.sent, summary.failed, summary.invalid
        );
        outcomes
    }
}
