//! FlashChat request, result and payload types.

use crate::error::{DispatchError, ParseError, UNKNOWN_ERROR};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Kind of message, selecting both the required fields and the remote
/// operation.
///
/// Deserializes through [`FromStr`], so any casing is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MessageType {
    #[serde(rename = "SMS")]
    Sms,
    #[serde(rename = "WhatsApp")]
    WhatsApp,
    #[serde(rename = "OTP")]
    Otp,
}

impl MessageType {
    pub const ALL: [MessageType; 3] = [Self::Sms, Self::WhatsApp, Self::Otp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::WhatsApp => "WhatsApp",
            Self::Otp => "OTP",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" => Ok(Self::Sms),
            "whatsapp" => Ok(Self::WhatsApp),
            "otp" => Ok(Self::Otp),
            _ => Err(ParseError {
                what: "message type",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MessageType {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// SIM slot used by the sending device for SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimSlot {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl SimSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
        }
    }
}

impl FromStr for SimSlot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            _ => Err(ParseError {
                what: "SIM slot",
                value: s.to_string(),
            }),
        }
    }
}

/// Link from a message back to the business record that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    pub entity_type: String,
    pub entity_id: String,
}

impl ReferenceEntity {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }
}

/// Type-specific part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePayload {
    Sms {
        body: String,
        sim_slot: Option<SimSlot>,
    },
    WhatsApp {
        channel_account: String,
        body: String,
    },
    Otp {
        expiry_seconds: u32,
    },
}

/// A validated request, ready to dispatch.
///
/// Built by [`MessageRequestBuilder`](crate::MessageRequestBuilder); the
/// payload enum guarantees that a body exists exactly for SMS and WhatsApp,
/// an expiry exactly for OTP, and a channel account exactly for WhatsApp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub phone_number: String,
    pub payload: MessagePayload,
    pub reference_entity: Option<ReferenceEntity>,
}

impl MessageRequest {
    pub fn message_type(&self) -> MessageType {
        match self.payload {
            MessagePayload::Sms { .. } => MessageType::Sms,
            MessagePayload::WhatsApp { .. } => MessageType::WhatsApp,
            MessagePayload::Otp { .. } => MessageType::Otp,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match &self.payload {
            MessagePayload::Sms { body, .. } | MessagePayload::WhatsApp { body, .. } => Some(body),
            MessagePayload::Otp { .. } => None,
        }
    }

    pub fn channel_account(&self) -> Option<&str> {
        match &self.payload {
            MessagePayload::WhatsApp {
                channel_account, ..
            } => Some(channel_account),
            _ => None,
        }
    }

    pub fn sim_slot(&self) -> Option<SimSlot> {
        match self.payload {
            MessagePayload::Sms { sim_slot, .. } => sim_slot,
            _ => None,
        }
    }

    pub fn otp_expiry_seconds(&self) -> Option<u32> {
        match self.payload {
            MessagePayload::Otp { expiry_seconds } => Some(expiry_seconds),
            _ => None,
        }
    }
}

/// Which side of the wire a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Transport,
    Business,
}

/// Uniform outcome of every remote call.
///
/// `error_message` and `failure_kind` are set iff `success` is false, and
/// `error_message` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub success: bool,
    pub data: Option<Map<String, Value>>,
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
}

impl DispatchResult {
    pub fn ok(data: Option<Map<String, Value>>) -> Self {
        Self {
            success: true,
            data: data.filter(|d| !d.is_empty()),
            error_message: None,
            failure_kind: None,
        }
    }

    pub fn failed(error: DispatchError) -> Self {
        let failure_kind = match error {
            DispatchError::Transport(_) => FailureKind::Transport,
            DispatchError::Business(_) => FailureKind::Business,
        };
        let message = error.message().trim();
        let error_message = if message.is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message.to_string()
        };

        Self {
            success: false,
            data: None,
            error_message: Some(error_message),
            failure_kind: Some(failure_kind),
        }
    }

    /// Error text for display; empty on success.
    pub fn error(&self) -> &str {
        self.error_message.as_deref().unwrap_or_default()
    }

    /// Generated code carried by a successful OTP send.
    pub fn otp_code(&self) -> Option<&str> {
        self.data.as_ref()?.get("otpCode")?.as_str()
    }

    /// Decode one payload field.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.data.as_ref()?.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Decode the whole payload.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Option<T> {
        let data = self.data.as_ref()?;
        serde_json::from_value(Value::Object(data.clone())).ok()
    }
}

impl From<Result<Option<Map<String, Value>>, DispatchError>> for DispatchResult {
    fn from(result: Result<Option<Map<String, Value>>, DispatchError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e),
        }
    }
}

/// A WhatsApp-capable sending account configured on the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WhatsAppAccount {
    #[serde(deserialize_with = "required_lenient_string")]
    pub unique: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created: Option<String>,
}

impl WhatsAppAccount {
    /// Accounts listed in a successful `list_whatsapp_accounts` result.
    pub fn from_result(result: &DispatchResult) -> Vec<Self> {
        result.decode("accounts").unwrap_or_default()
    }

    /// `"<unique> - <phone>"`, the form shown in account pickers.
    pub fn label(&self) -> String {
        match &self.phone {
            Some(phone) => format!("{} - {}", self.unique, phone),
            None => self.unique.clone(),
        }
    }

    /// Recover the account identifier from a [`label`](Self::label).
    pub fn parse_label(label: &str) -> &str {
        label.split(" - ").next().unwrap_or(label).trim()
    }
}

/// A sending device connected to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub partner: Option<String>,
}

impl Device {
    pub fn from_result(result: &DispatchResult) -> Vec<Self> {
        result.decode("devices").unwrap_or_default()
    }
}

/// Result of an OTP verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct OtpVerification {
    #[serde(default)]
    pub valid: bool,
}

impl OtpVerification {
    pub fn from_result(result: &DispatchResult) -> Option<Self> {
        if !result.success {
            return None;
        }
        Some(result.decode_data().unwrap_or_default())
    }
}

/// Accept strings, numbers and booleans as text; the gateway is not
/// consistent about identifier types.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn required_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("expected a value"))
}
