//! Response envelope normalization.
//!
//! The gateway answers `{success, error?, data?}`, but not reliably: error
//! text may be a string, an object, or missing, and payloads may sit under
//! `data` or at the top level.

use crate::error::{DispatchError, UNKNOWN_ERROR};
use crate::operation::Operation;
use reqwest::StatusCode;
use serde_json::{Map, Value};

const ENVELOPE_KEYS: [&str; 3] = ["success", "error", "message"];

/// Interpret a raw HTTP response for `operation`.
pub(crate) fn interpret(
    operation: Operation,
    status: StatusCode,
    body: &str,
) -> Result<Option<Map<String, Value>>, DispatchError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(envelope)) if status.is_success() => normalize(operation, envelope),
        Ok(Value::Object(mut envelope)) if is_envelope(&envelope) => {
            envelope.insert("success".into(), Value::Bool(false));
            normalize(operation, envelope)
        }
        _ if status.is_success() => Err(DispatchError::Transport(
            "Invalid response from gateway".into(),
        )),
        _ => {
            let body = body.trim();
            Err(DispatchError::Transport(if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, body)
            }))
        }
    }
}

/// Fold an envelope into a payload or a business failure.
pub(crate) fn normalize(
    operation: Operation,
    mut envelope: Map<String, Value>,
) -> Result<Option<Map<String, Value>>, DispatchError> {
    if !envelope.get("success").is_some_and(is_truthy) {
        return Err(DispatchError::Business(error_text(&envelope)));
    }

    let mut payload = match envelope.remove("data") {
        Some(Value::Object(data)) => data,
        Some(Value::Array(items)) => {
            let mut data = Map::new();
            data.insert(operation.list_key().into(), Value::Array(items));
            data
        }
        Some(Value::Null) | None => envelope
            .into_iter()
            .filter(|(k, _)| !ENVELOPE_KEYS.contains(&k.as_str()))
            .collect(),
        Some(other) => {
            let mut data = Map::new();
            data.insert("value".into(), other);
            data
        }
    };

    if operation == Operation::SendOtp {
        if let Some(code) = payload.remove("otp_code") {
            payload.insert("otpCode".into(), code);
        }
    }

    Ok((!payload.is_empty()).then_some(payload))
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("success") || map.contains_key("error")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => false,
    }
}

fn error_text(envelope: &Map<String, Value>) -> String {
    let usable = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let error = envelope.get("error");
    usable(error)
        .or_else(|| usable(error.and_then(|e| e.get("message"))))
        .or_else(|| usable(envelope.get("message")))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_missing_error_is_unknown() {
        let result = normalize(Operation::SendSms, envelope(json!({"success": false})));
        assert_eq!(result, Err(DispatchError::Business("Unknown error".into())));
    }

    #[test]
    fn test_empty_error_object_is_unknown() {
        let result = normalize(
            Operation::SendSms,
            envelope(json!({"success": false, "error": {}})),
        );
        assert_eq!(result, Err(DispatchError::Business("Unknown error".into())));
    }

    #[test]
    fn test_error_sources_in_order() {
        let cases = [
            (json!({"success": false, "error": "Invalid account"}), "Invalid account"),
            (
                json!({"success": false, "error": {"message": "Rate limit"}}),
                "Rate limit",
            ),
            (json!({"error": "  ", "message": "Bad number"}), "Bad number"),
        ];
        for (body, expected) in cases {
            let result = normalize(Operation::SendSms, envelope(body));
            assert_eq!(result, Err(DispatchError::Business(expected.into())));
        }
    }

    #[test]
    fn test_missing_success_is_failure() {
        let result = normalize(Operation::SendSms, envelope(json!({"data": {"id": 1}})));
        assert!(matches!(result, Err(DispatchError::Business(_))));
    }

    #[test]
    fn test_truthiness() {
        for success in [json!(true), json!(1), json!("yes")] {
            let result = normalize(Operation::SendSms, envelope(json!({"success": success})));
            assert_eq!(result, Ok(None));
        }
        for success in [json!(false), json!(0), json!(""), json!(null), json!({})] {
            let result = normalize(Operation::SendSms, envelope(json!({"success": success})));
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_otp_code_renamed() {
        let result = normalize(
            Operation::SendOtp,
            envelope(json!({"success": true, "data": {"otp_code": "482913"}})),
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.get("otpCode"), Some(&json!("482913")));
        assert!(!result.contains_key("otp_code"));
    }

    #[test]
    fn test_list_payload_wrapped() {
        let result = normalize(
            Operation::ListDevices,
            envelope(json!({"success": true, "data": [{"name": "Pixel"}]})),
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.get("devices"), Some(&json!([{"name": "Pixel"}])));
    }

    #[test]
    fn test_top_level_payload() {
        let result = normalize(
            Operation::VerifyOtp,
            envelope(json!({"success": true, "valid": true, "message": "ok"})),
        )
        .unwrap()
        .unwrap();
        assert_eq!(Value::Object(result), json!({"valid": true}));
    }

    #[test]
    fn test_interpret_http_error_with_envelope() {
        let result = interpret(
            Operation::SendWhatsApp,
            StatusCode::BAD_REQUEST,
            r#"{"success": true, "error": "Invalid account"}"#,
        );
        assert_eq!(result, Err(DispatchError::Business("Invalid account".into())));
    }

    #[test]
    fn test_interpret_http_error_without_envelope() {
        let result = interpret(
            Operation::SendSms,
            StatusCode::BAD_GATEWAY,
            "upstream unavailable",
        );
        assert_eq!(
            result,
            Err(DispatchError::Transport(
                "HTTP 502 Bad Gateway: upstream unavailable".into()
            ))
        );

        let result = interpret(Operation::SendSms, StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            result,
            Err(DispatchError::Transport("HTTP 500 Internal Server Error".into()))
        );
    }

    #[test]
    fn test_interpret_non_json_success() {
        let result = interpret(Operation::SendSms, StatusCode::OK, "<html>");
        assert!(matches!(result, Err(DispatchError::Transport(_))));
    }
}
