//! Verify and describe a captured webhook delivery.

use crate::error::AppResult;
use flashchat_client::{WebhookEvent, WebhookReceiver};
use std::path::Path;

pub async fn run(
    receiver: &WebhookReceiver,
    file: &Path,
    signature: Option<&str>,
) -> AppResult<String> {
    let body = tokio::fs::read(file).await?;
    let event = receiver.receive(&body, signature)?;
    Ok(render(&event))
}

pub fn render(event: &WebhookEvent) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    match event {
        WebhookEvent::Unknown => "Ignored unknown event".into(),
        event if !event.is_complete() => format!("Ignored incomplete {} event", event.name()),
        WebhookEvent::MessageStatusUpdate {
            message_id,
            status,
            delivered_at,
        } => match delivered_at {
            Some(at) => format!("Message {}: {} at {}", field(message_id), field(status), at),
            None => format!("Message {}: {}", field(message_id), field(status)),
        },
        WebhookEvent::MessageReceived {
            phone,
            message,
            message_type,
            ..
        } => format!("Inbound {} from {}: {}", message_type, field(phone), field(message)),
        WebhookEvent::CampaignUpdate {
            campaign_id,
            status,
            statistics,
        } => format!(
            "Campaign {}: {} ({} statistics)",
            field(campaign_id),
            status.as_deref().unwrap_or("updated"),
            statistics.len()
        ),
        WebhookEvent::DeviceStatus { device_id, status } => {
            format!("Device {}: {}", field(device_id), field(status))
        }
    }
}
