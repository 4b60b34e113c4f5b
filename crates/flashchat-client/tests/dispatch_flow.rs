//! End-to-end flows against a mock gateway.

mod common;

use common::{mock_gateway, test_client};
use flashchat_client::*;
use serde_json::json;
use std::time::Duration;
use tokio_stream::StreamExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_whatsapp_build_and_send() {
    let mock_server = mock_gateway().await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp"))
        .and(body_json(json!({
            "account": "acct1",
            "recipient": "+966501234567",
            "message": "Hello"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fields = RawFields::new()
        .phone("+966501234567")
        .account("acct1")
        .body("Hello");
    let request = MessageRequestBuilder::build(MessageType::WhatsApp, &fields).unwrap();

    let client = test_client(&mock_server);
    let result = client.send(&request).await;

    assert_eq!(
        result,
        DispatchResult {
            success: true,
            data: None,
            error_message: None,
            failure_kind: None,
        }
    );
}

#[tokio::test]
async fn test_quick_send_account_label_round_trip() {
    let mock_server = mock_gateway().await;

    Mock::given(method("GET"))
        .and(path("/whatsapp-accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"unique": "acct7", "phone": "+15555555555"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/send-whatsapp"))
        .and(body_json(json!({
            "account": "acct7",
            "recipient": "+14155551234",
            "message": "Hi",
            "referenceEntityType": "Contact",
            "referenceEntityId": "CONT-0042"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let accounts = WhatsAppAccount::from_result(&client.list_whatsapp_accounts().await);
    let selected = accounts[0].label();

    let fields = RawFields::new()
        .phone("+14155551234")
        .account(WhatsAppAccount::parse_label(&selected))
        .body("Hi")
        .reference(ReferenceEntity::new("Contact", "CONT-0042"));
    let request = MessageRequestBuilder::build(MessageType::WhatsApp, &fields).unwrap();

    assert!(client.send(&request).await.success);
}

#[tokio::test]
async fn test_bulk_run_through_http_client() {
    let mock_server = mock_gateway().await;

    Mock::given(method("POST"))
        .and(path("/send-sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let job: BulkJob = serde_json::from_value(json!({
        "messageType": "SMS",
        "template": "Hi {customer_name}, your order {order_id} has shipped.",
        "entityType": "Sales Order"
    }))
    .unwrap();
    let records: Vec<BulkRecord> = serde_json::from_value(json!([
        {
            "recordId": "SO-0001",
            "phones": [{"phone": "+111", "is_primary_phone": true}],
            "context": {"customer_name": "Ana", "order_id": "SO-0001"}
        },
        {
            "recordId": "SO-0002",
            "phones": [{"phone": "+222"}],
            "context": {"customer_name": "Ben", "order_id": "SO-0002"}
        }
    ]))
    .unwrap();

    let runner = BulkRunner::new(test_client(&mock_server));
    let outcomes = runner.run(&job, &records).await;

    assert_eq!(
        BulkSummary::from_outcomes(&outcomes),
        BulkSummary {
            sent: 2,
            failed: 0,
            invalid: 0
        }
    );
}

#[tokio::test]
async fn test_stats_refresher_yields_and_skips_failures() {
    let mock_server = mock_gateway().await;

    Mock::given(method("GET"))
        .and(path("/dashboard-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dashboard-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"this_week": {"total_sent": 8, "total_delivered": 6}, "today": {}}
        })))
        .mount(&mock_server)
        .await;

    let refresher = StatsRefresher::new(test_client(&mock_server), Duration::from_millis(10));
    let mut stream = Box::pin(refresher.stream());

    let stats = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.this_week.total_sent, 8);
    assert_eq!(stats.success_rate(), 75);
}

#[tokio::test]
async fn test_stats_refresher_with_zero_interval() {
    let mock_server = mock_gateway().await;

    Mock::given(method("GET"))
        .and(path("/dashboard-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"this_week": {"total_sent": 2, "total_delivered": 2}}
        })))
        .mount(&mock_server)
        .await;

    let refresher = StatsRefresher::new(test_client(&mock_server), Duration::ZERO);
    let mut stream = Box::pin(refresher.stream());

    let stats = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stats.success_rate(), 100);
}
