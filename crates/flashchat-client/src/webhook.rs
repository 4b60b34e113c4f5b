//! Inbound gateway notifications.
//!
//! The gateway POSTs a JSON body tagged by `event` and, when a webhook
//! secret is configured, signs the raw body with HMAC-SHA256 in the
//! [`SIGNATURE_HEADER`] header as lowercase hex.

use crate::error::WebhookError;
use crate::types::{lenient_string, MessageType};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-FlashChat-Signature";

/// A notification pushed by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WebhookEvent {
    /// Delivery progress for a message sent earlier.
    MessageStatusUpdate {
        #[serde(default, deserialize_with = "lenient_string")]
        message_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        status: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        delivered_at: Option<String>,
    },
    /// A message sent to one of the gateway's numbers.
    MessageReceived {
        #[serde(default, deserialize_with = "lenient_string")]
        phone: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        message: Option<String>,
        #[serde(rename = "type", default = "inbound_type")]
        message_type: MessageType,
        #[serde(default, deserialize_with = "lenient_string")]
        received_at: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        device_id: Option<String>,
    },
    CampaignUpdate {
        #[serde(default, deserialize_with = "lenient_string")]
        campaign_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        status: Option<String>,
        #[serde(default)]
        statistics: Map<String, Value>,
    },
    DeviceStatus {
        #[serde(default, deserialize_with = "lenient_string")]
        device_id: Option<String>,
        #[serde(default, deserialize_with = "lenient_string")]
        status: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

fn inbound_type() -> MessageType {
    MessageType::Sms
}

impl WebhookEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageStatusUpdate { .. } => "message_status_update",
            Self::MessageReceived { .. } => "message_received",
            Self::CampaignUpdate { .. } => "campaign_update",
            Self::DeviceStatus { .. } => "device_status",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the fields needed to act on the event are present.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::MessageStatusUpdate {
                message_id, status, ..
            } => message_id.is_some() && status.is_some(),
            Self::MessageReceived { phone, message, .. } => phone.is_some() && message.is_some(),
            Self::CampaignUpdate { campaign_id, .. } => campaign_id.is_some(),
            Self::DeviceStatus { device_id, status } => device_id.is_some() && status.is_some(),
            Self::Unknown => false,
        }
    }
}

/// Check `signature` (hex, optionally `sha256=`-prefixed) against the
/// HMAC-SHA256 of `body` under `secret`. The comparison is constant-time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Authenticates and decodes webhook deliveries.
///
/// Without a secret every delivery is accepted unsigned.
pub struct WebhookReceiver {
    secret: Option<SecretString>,
}

impl WebhookReceiver {
    pub fn new(secret: Option<SecretString>) -> Self {
        Self {
            secret: secret.filter(|s| !s.expose_secret().is_empty()),
        }
    }

    pub fn receive(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookEvent, WebhookError> {
        if let Some(secret) = &self.secret {
            let valid = signature.is_some_and(|s| verify_signature(secret.expose_secret(), body, s));
            if !valid {
                warn!("Rejected webhook with missing or invalid signature");
                return Err(WebhookError::InvalidSignature);
            }
        }

        let event: WebhookEvent = serde_json::from_slice(body)?;
        match &event {
            WebhookEvent::Unknown => warn!("Unknown webhook event"),
            event => debug!("Received {} webhook", event.name()),
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"event": "message_status_update", "message_id": 981, "status": "delivered"}"#;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    fn receiver() -> WebhookReceiver {
        WebhookReceiver::new(Some(SecretString::new(SECRET.to_string())))
    }

    #[test]
    fn test_verify_signature() {
        let signature = sign(SECRET, BODY);
        assert!(verify_signature(SECRET, BODY, &signature));
        assert!(verify_signature(SECRET, BODY, &format!("sha256={}", signature)));
        assert!(verify_signature(SECRET, BODY, &signature.to_uppercase()));

        assert!(!verify_signature("other", BODY, &signature));
        assert!(!verify_signature(SECRET, b"{}", &signature));
        assert!(!verify_signature(SECRET, BODY, "not-hex"));
        assert!(!verify_signature(SECRET, BODY, ""));
    }

    #[test]
    fn test_receive_signed() {
        let event = receiver().receive(BODY, Some(&sign(SECRET, BODY))).unwrap();
        assert_eq!(
            event,
            WebhookEvent::MessageStatusUpdate {
                message_id: Some("981".into()),
                status: Some("delivered".into()),
                delivered_at: None,
            }
        );
        assert!(event.is_complete());
    }

    #[test]
    fn test_receive_rejects_bad_or_missing_signature() {
        let bad = sign("other", BODY);
        assert!(matches!(
            receiver().receive(BODY, Some(&bad)),
            Err(WebhookError::InvalidSignature)
        ));
        assert!(matches!(
            receiver().receive(BODY, None),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn test_unsigned_accepted_without_secret() {
        for secret in [None, Some(SecretString::new(String::new()))] {
            let event = WebhookReceiver::new(secret).receive(BODY, None).unwrap();
            assert_eq!(event.name(), "message_status_update");
        }
    }

    #[test]
    fn test_event_kinds() {
        let receiver = WebhookReceiver::new(None);

        let event = receiver
            .receive(br#"{"event": "message_received", "phone": "+15555555555", "message": "STOP"}"#, None)
            .unwrap();
        assert!(matches!(
            event,
            WebhookEvent::MessageReceived { message_type: MessageType::Sms, .. }
        ));

        let event = receiver
            .receive(br#"{"event": "message_received", "phone": "+1", "message": "hi", "type": "whatsapp"}"#, None)
            .unwrap();
        assert!(matches!(
            event,
            WebhookEvent::MessageReceived { message_type: MessageType::WhatsApp, .. }
        ));

        let event = receiver
            .receive(br#"{"event": "campaign_update", "campaign_id": "C-7", "statistics": {"sent": 10}}"#, None)
            .unwrap();
        assert_eq!(event.name(), "campaign_update");
        assert!(event.is_complete());

        let event = receiver
            .receive(br#"{"event": "device_status", "device_id": "d1"}"#, None)
            .unwrap();
        assert!(!event.is_complete());
    }

    #[test]
    fn test_unknown_and_malformed() {
        let receiver = WebhookReceiver::new(None);

        let event = receiver.receive(br#"{"event": "billing_alert"}"#, None).unwrap();
        assert_eq!(event, WebhookEvent::Unknown);
        assert!(!event.is_complete());

        assert!(matches!(
            receiver.receive(b"not json", None),
            Err(WebhookError::Malformed(_))
        ));
    }
}
