//! OTP verification and gateway listings.

use crate::error::{AppError, AppResult};
use flashchat_client::{Device, DispatchClient, DispatchResult, OtpVerification, WhatsAppAccount};

pub async fn verify_otp(client: &DispatchClient, code: &str) -> AppResult<String> {
    let result = client.verify_otp(code).await;
    render_verification(&result)
}

pub async fn accounts(client: &DispatchClient) -> AppResult<String> {
    let result = client.list_whatsapp_accounts().await;
    render_accounts(&result)
}

pub async fn devices(client: &DispatchClient) -> AppResult<String> {
    let result = client.list_devices().await;
    render_devices(&result)
}

fn failed(operation: &'static str, result: &DispatchResult) -> AppError {
    AppError::RequestFailed {
        operation,
        error: result.error().to_string(),
    }
}

pub fn render_verification(result: &DispatchResult) -> AppResult<String> {
    let verification =
        OtpVerification::from_result(result).ok_or_else(|| failed("OTP verification", result))?;

    Ok(if verification.valid {
        "OTP is valid".into()
    } else {
        "OTP is invalid or expired".into()
    })
}

pub fn render_accounts(result: &DispatchResult) -> AppResult<String> {
    if !result.success {
        return Err(failed("Listing WhatsApp accounts", result));
    }

    let accounts = WhatsAppAccount::from_result(result);
    if accounts.is_empty() {
        return Ok("No WhatsApp accounts configured".into());
    }

    Ok(accounts
        .iter()
        .map(|a| match &a.status {
            Some(status) => format!("{} [{}]", a.label(), status),
            None => a.label(),
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn render_devices(result: &DispatchResult) -> AppResult<String> {
    if !result.success {
        return Err(failed("Listing devices", result));
    }

    let devices = Device::from_result(result);
    if devices.is_empty() {
        return Ok("No devices connected".into());
    }

    Ok(devices
        .iter()
        .map(|d| {
            let name = d.name.as_deref().unwrap_or("Unnamed device");
            let details: Vec<&str> = [d.manufacturer.as_deref(), d.version.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if details.is_empty() {
                name.to_string()
            } else {
                format!("{} ({})", name, details.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
