//! FlashChat gateway HTTP client.

use crate::builder::{MessageRequestBuilder, RawFields};
use crate::dispatcher::MessageDispatcher;
use crate::envelope::interpret;
use crate::error::{ClientError, DispatchError, ValidationError};
use crate::operation::{route, Operation};
use crate::stats::StatsWindow;
use crate::types::*;
use async_trait::async_trait;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// FlashChat gateway client.
///
/// Every call is a single attempt and always resolves to a
/// [`DispatchResult`]; transport errors never escape as `Err`. The client
/// holds no per-call state and is cheap to clone.
#[derive(Clone)]
pub struct DispatchClient {
    client: Client,
    base_url: String,
    api_secret: SecretString,
}

impl DispatchClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_secret: SecretString::new(api_secret.into()),
        })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the gateway answers with a successful envelope.
    pub async fn health_check(&self) -> bool {
        self.list_devices().await.success
    }

    /// Send a built request through the operation for its message type.
    #[instrument(skip(self, request), fields(message_type = %request.message_type()))]
    pub async fn send(&self, request: &MessageRequest) -> DispatchResult {
        let (operation, args) = route(request);
        debug!("Routing {} to {}", request.message_type(), operation.path());

        let result: DispatchResult = self.invoke(operation, args, &[]).await.into();
        if !result.success {
            warn!(
                "Failed to send {} to {}: {}",
                request.message_type(),
                request.phone_number,
                result.error()
            );
        }
        result
    }

    /// Check an OTP code.
    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, code: &str) -> DispatchResult {
        let mut args = Map::new();
        args.insert("otp_code".into(), code.trim().into());
        self.invoke(Operation::VerifyOtp, args, &[]).await.into()
    }

    /// List WhatsApp accounts; decode with [`WhatsAppAccount::from_result`].
    #[instrument(skip(self))]
    pub async fn list_whatsapp_accounts(&self) -> DispatchResult {
        self.invoke(Operation::ListWhatsAppAccounts, Map::new(), &[])
            .await
            .into()
    }

    /// List connected devices; decode with [`Device::from_result`].
    #[instrument(skip(self))]
    pub async fn list_devices(&self) -> DispatchResult {
        self.invoke(Operation::ListDevices, Map::new(), &[])
            .await
            .into()
    }

    /// Fetch aggregate statistics, optionally for a time window.
    #[instrument(skip(self))]
    pub async fn get_stats(&self, window: Option<&StatsWindow>) -> DispatchResult {
        let query = window.map(StatsWindow::query).unwrap_or_default();
        self.invoke(Operation::GetDashboardStats, Map::new(), &query)
            .await
            .into()
    }

    /// Deliver `body` over WhatsApp through the first listed account, or
    /// over SMS when no account is listed or the WhatsApp send fails.
    ///
    /// Input is validated as an SMS before any call is made.
    #[instrument(skip(self, body, reference))]
    pub async fn send_with_fallback(
        &self,
        phone: &str,
        body: &str,
        reference: Option<ReferenceEntity>,
    ) -> Result<DispatchResult, ValidationError> {
        let mut fields = RawFields::new().phone(phone).body(body);
        fields.reference_entity = reference;
        let sms = MessageRequestBuilder::build(MessageType::Sms, &fields)?;

        let accounts = self.list_whatsapp_accounts().await;
        if !accounts.success {
            warn!(
                "Could not list WhatsApp accounts, using SMS: {}",
                accounts.error()
            );
            return Ok(self.send(&sms).await);
        }

        match WhatsAppAccount::from_result(&accounts).into_iter().next() {
            Some(account) => {
                let whatsapp = MessageRequestBuilder::build(
                    MessageType::WhatsApp,
                    &fields.account(account.unique),
                )?;
                let result = self.send(&whatsapp).await;
                if result.success {
                    return Ok(result);
                }
                warn!("WhatsApp delivery failed, falling back to SMS");
            }
            None => debug!("No WhatsApp accounts available, using SMS"),
        }

        Ok(self.send(&sms).await)
    }

    /// Call one remote operation.
    async fn invoke(
        &self,
        operation: Operation,
        args: Map<String, Value>,
        query: &[(&str, String)],
    ) -> Result<Option<Map<String, Value>>, DispatchError> {
        let url = format!("{}/{}", self.base_url, operation.path());

        let request = if operation.method() == Method::GET {
            self.client.get(url).query(query)
        } else {
            self.client.post(url).json(&args)
        };

        let response = request
            .header(
                "Authorization",
                format!("Bearer {}", self.api_secret.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            "{} -> {}: {}",
            operation.path(),
            status,
            body.chars().take(200).collect::<String>()
        );

        interpret(operation, status, &body)
    }
}

#[async_trait]
impl MessageDispatcher for DispatchClient {
    async fn send(&self, request: &MessageRequest) -> DispatchResult {
        DispatchClient::send(self, request).await
    }
}
