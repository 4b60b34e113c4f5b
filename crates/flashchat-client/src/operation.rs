//! Remote operations and request routing.

use crate::types::{MessagePayload, MessageRequest, MessageType};
use reqwest::Method;
use serde_json::{Map, Value};

/// A named operation exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SendSms,
    SendWhatsApp,
    SendOtp,
    VerifyOtp,
    ListWhatsAppAccounts,
    ListDevices,
    GetDashboardStats,
}

impl Operation {
    /// Send operation for a message type.
    pub fn for_message(message_type: MessageType) -> Self {
        match message_type {
            MessageType::Sms => Self::SendSms,
            MessageType::WhatsApp => Self::SendWhatsApp,
            MessageType::Otp => Self::SendOtp,
        }
    }

    /// Path relative to the gateway base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::SendSms => "send-sms",
            Self::SendWhatsApp => "send-whatsapp",
            Self::SendOtp => "send-otp",
            Self::VerifyOtp => "verify-otp",
            Self::ListWhatsAppAccounts => "whatsapp-accounts",
            Self::ListDevices => "devices",
            Self::GetDashboardStats => "dashboard-stats",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::ListWhatsAppAccounts | Self::ListDevices | Self::GetDashboardStats => Method::GET,
            _ => Method::POST,
        }
    }

    /// Key a list payload is stored under in the normalized result.
    pub(crate) fn list_key(&self) -> &'static str {
        match self {
            Self::ListWhatsAppAccounts => "accounts",
            Self::ListDevices => "devices",
            _ => "items",
        }
    }
}

/// Select the operation for `request` and assemble its argument bag.
pub(crate) fn route(request: &MessageRequest) -> (Operation, Map<String, Value>) {
    let mut args = Map::new();

    match &request.payload {
        MessagePayload::Sms { body, sim_slot } => {
            args.insert("phone".into(), request.phone_number.clone().into());
            args.insert("message".into(), body.clone().into());
            if let Some(slot) = sim_slot {
                args.insert("sim".into(), slot.as_str().into());
            }
        }
        MessagePayload::WhatsApp {
            channel_account,
            body,
        } => {
            args.insert("account".into(), channel_account.clone().into());
            args.insert("recipient".into(), request.phone_number.clone().into());
            args.insert("message".into(), body.clone().into());
        }
        MessagePayload::Otp { expiry_seconds } => {
            args.insert("phone".into(), request.phone_number.clone().into());
            args.insert("expire".into(), (*expiry_seconds).into());
        }
    }

    if let Some(reference) = &request.reference_entity {
        args.insert(
            "referenceEntityType".into(),
            reference.entity_type.clone().into(),
        );
        args.insert("referenceEntityId".into(), reference.entity_id.clone().into());
    }

    (Operation::for_message(request.message_type()), args)
}
