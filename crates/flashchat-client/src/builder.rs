//! Request validation and normalization.

use crate::error::ValidationError;
use crate::types::{MessagePayload, MessageRequest, MessageType, ReferenceEntity, SimSlot};
use serde::Deserialize;

/// OTP lifetime applied when the caller leaves it unset.
pub const DEFAULT_OTP_EXPIRY_SECONDS: u32 = 300;

/// Field values as collected from a form or command line.
///
/// Every slot is optional; which ones are required depends on the message
/// type and is checked by [`MessageRequestBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFields {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub channel_account: Option<String>,
    #[serde(default)]
    pub sim_slot: Option<SimSlot>,
    #[serde(default)]
    pub otp_expiry_seconds: Option<i64>,
    #[serde(default)]
    pub reference_entity: Option<ReferenceEntity>,
}

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.channel_account = Some(account.into());
        self
    }

    pub fn sim(mut self, slot: SimSlot) -> Self {
        self.sim_slot = Some(slot);
        self
    }

    pub fn expiry(mut self, seconds: i64) -> Self {
        self.otp_expiry_seconds = Some(seconds);
        self
    }

    pub fn reference(mut self, reference: ReferenceEntity) -> Self {
        self.reference_entity = Some(reference);
        self
    }
}

/// Turns raw field values into a [`MessageRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageRequestBuilder;

impl MessageRequestBuilder {
    /// Validate `fields` for `message_type`.
    ///
    /// Rules are checked in a fixed order and the first failure is
    /// returned: phone, then WhatsApp account, then body (SMS and
    /// WhatsApp), then OTP expiry. Values are trimmed; fields that do not
    /// apply to the message type are dropped.
    pub fn build(
        message_type: MessageType,
        fields: &RawFields,
    ) -> Result<MessageRequest, ValidationError> {
        let phone_number = required(&fields.phone_number, ValidationError::MissingPhone)?;

        let payload = match message_type {
            MessageType::Sms => MessagePayload::Sms {
                body: required(&fields.body, ValidationError::MissingMessage)?,
                sim_slot: fields.sim_slot,
            },
            MessageType::WhatsApp => {
                let channel_account =
                    required(&fields.channel_account, ValidationError::MissingAccount)?;
                MessagePayload::WhatsApp {
                    channel_account,
                    body: required(&fields.body, ValidationError::MissingMessage)?,
                }
            }
            MessageType::Otp => MessagePayload::Otp {
                expiry_seconds: otp_expiry(fields.otp_expiry_seconds)?,
            },
        };

        Ok(MessageRequest {
            phone_number,
            payload,
            reference_entity: fields.reference_entity.clone(),
        })
    }
}

fn required(value: &Option<String>, missing: ValidationError) -> Result<String, ValidationError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(missing)
}

fn otp_expiry(seconds: Option<i64>) -> Result<u32, ValidationError> {
    match seconds {
        None => Ok(DEFAULT_OTP_EXPIRY_SECONDS),
        Some(s) if s > 0 => u32::try_from(s).map_err(|_| ValidationError::InvalidExpiry),
        Some(_) => Err(ValidationError::InvalidExpiry),
    }
}
