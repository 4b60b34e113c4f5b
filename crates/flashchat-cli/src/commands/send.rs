//! SMS, WhatsApp and OTP sends.

use super::ReferenceArgs;
use crate::error::{AppError, AppResult};
use clap::Args;
use flashchat_client::phone::advise;
use flashchat_client::{
    DispatchClient, DispatchResult, MessageRequestBuilder, MessageType, RawFields, SimSlot,
    WhatsAppAccount,
};
use tracing::warn;

#[derive(Args, Debug)]
pub struct SmsArgs {
    /// Recipient phone number, with country code (e.g. +966501234567)
    #[arg(long)]
    pub phone: Option<String>,

    /// Message text
    #[arg(long)]
    pub message: Option<String>,

    /// SIM slot on the sending device (1 or 2)
    #[arg(long)]
    pub sim: Option<SimSlot>,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

#[derive(Args, Debug)]
pub struct WhatsAppArgs {
    /// Recipient phone number, with country code
    #[arg(long)]
    pub phone: Option<String>,

    /// Sending account, either its id or an "<id> - <phone>" label
    #[arg(long)]
    pub account: Option<String>,

    /// Message text
    #[arg(long)]
    pub message: Option<String>,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

#[derive(Args, Debug)]
pub struct OtpArgs {
    /// Recipient phone number, with country code
    #[arg(long)]
    pub phone: Option<String>,

    /// Seconds until the code expires (default 300)
    #[arg(long, allow_negative_numbers = true)]
    pub expire: Option<i64>,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

impl SmsArgs {
    pub fn fields(&self) -> RawFields {
        RawFields {
            phone_number: self.phone.clone(),
            body: self.message.clone(),
            sim_slot: self.sim,
            reference_entity: self.reference.entity(),
            ..RawFields::default()
        }
    }
}

impl WhatsAppArgs {
    pub fn fields(&self) -> RawFields {
        RawFields {
            phone_number: self.phone.clone(),
            body: self.message.clone(),
            channel_account: self
                .account
                .as_deref()
                .map(|a| WhatsAppAccount::parse_label(a).to_string()),
            reference_entity: self.reference.entity(),
            ..RawFields::default()
        }
    }
}

impl OtpArgs {
    pub fn fields(&self) -> RawFields {
        RawFields {
            phone_number: self.phone.clone(),
            otp_expiry_seconds: self.expire,
            reference_entity: self.reference.entity(),
            ..RawFields::default()
        }
    }
}

/// Validate, send, and describe the outcome.
pub async fn run(
    client: &DispatchClient,
    message_type: MessageType,
    fields: RawFields,
) -> AppResult<String> {
    if let Some(phone) = &fields.phone_number {
        for advisory in advise(phone) {
            warn!("{}: {}", phone.trim(), advisory.message());
        }
    }

    let request = MessageRequestBuilder::build(message_type, &fields)?;
    let result = client.send(&request).await;
    render(message_type, &result)
}

pub fn render(message_type: MessageType, result: &DispatchResult) -> AppResult<String> {
    if !result.success {
        return Err(AppError::SendFailed {
            message_type,
            error: result.error().to_string(),
        });
    }

    Ok(match message_type {
        MessageType::Sms => "SMS sent successfully".into(),
        MessageType::WhatsApp => "WhatsApp message sent successfully".into(),
        MessageType::Otp => match result.otp_code() {
            Some(code) => format!("OTP sent successfully. OTP: {}", code),
            None => "OTP sent successfully".into(),
        },
    })
}
