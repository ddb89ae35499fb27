//! Outbound client behaviour against a mock provider.

use serde_json::json;

use onramp_gateway::onramp::envelope::decode;
use onramp_gateway::onramp::{sign, OnrampClient, OnrampError};

mod common;
use common::{closed_base_url, test_config, MockProvider, TEST_API_KEY, TEST_API_SECRET};

#[tokio::test]
async fn test_authenticated_request_is_signed() {
    let mock = MockProvider::start(|_| {
        (200, r#"{"status":1,"data":{"status":"SUCCESS"}}"#.to_string())
    })
    .await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();

    let response = client.kyc_status("cust-1").await.unwrap();
    assert_eq!(response["data"]["status"], "SUCCESS");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/onramp/api/v2/whiteLabel/kyc/status");
    assert_eq!(request.header("apikey"), Some(TEST_API_KEY));
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let payload = request.header("payload").unwrap();
    let envelope = decode(payload).unwrap();
    assert_eq!(envelope.body, json!({ "customerId": "cust-1" }));
    assert_eq!(Some(envelope.timestamp.as_str()), request.header("timestamp"));
    assert_eq!(
        request.header("signature"),
        Some(sign(payload.as_bytes(), TEST_API_SECRET).as_str())
    );

    // The original body travels alongside the envelope.
    assert_eq!(request.json(), envelope.body);
}

#[tokio::test]
async fn test_each_request_gets_its_own_envelope() {
    let mock = MockProvider::start(|_| (200, "{}".to_string())).await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();

    client.kyc_status("a").await.unwrap();
    client.kyc_status("b").await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].header("payload"), requests[1].header("payload"));
    assert_ne!(requests[0].header("signature"), requests[1].header("signature"));
}

#[tokio::test]
async fn test_error_body_becomes_api_error() {
    let mock = MockProvider::start(|_| (400, r#"{"error":"Invalid amount"}"#.to_string())).await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();

    let err = client
        .create_onramp_quote(&json!({ "fromAmount": "0" }))
        .await
        .unwrap_err();
    match err {
        OnrampError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid amount");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_reports_status() {
    let mock = MockProvider::start(|_| (502, "<html>bad gateway</html>".to_string())).await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();

    let err = client.offramp_transaction("c", "t").await.unwrap_err();
    assert!(matches!(err, OnrampError::UnexpectedStatus { status: 502 }));
    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[tokio::test]
async fn test_transport_failure_is_transport_error() {
    let client = OnrampClient::new(&test_config(&closed_base_url().await).provider).unwrap();
    let err = client.kyc_status("cust-1").await.unwrap_err();
    assert!(matches!(err, OnrampError::Transport(_)));
}

#[tokio::test]
async fn test_public_lookup_returns_data_without_auth_headers() {
    let mock = MockProvider::start(|_| {
        (200, r#"{"status":1,"data":{"1":{"UPI":"UPI"}}}"#.to_string())
    })
    .await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();

    let methods = client.payment_method_types().await;
    assert_eq!(methods, json!({ "1": { "UPI": "UPI" } }));

    let request = &mock.requests()[0];
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.path,
        "/onramp/api/v2/common/public/fetchPaymentMethodType"
    );
    assert!(request.header("apikey").is_none());
    assert!(request.header("signature").is_none());
}

#[tokio::test]
async fn test_public_lookup_failure_is_empty() {
    let mock = MockProvider::start(|_| (500, r#"{"error":"down"}"#.to_string())).await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();
    assert_eq!(client.payment_method_types().await, json!({}));

    let client = OnrampClient::new(&test_config(&closed_base_url().await).provider).unwrap();
    assert_eq!(client.payment_method_types().await, json!({}));
}

#[tokio::test]
async fn test_public_lookup_without_object_data_is_empty() {
    let mock = MockProvider::start(|_| (200, r#"{"status":1,"data":false}"#.to_string())).await;
    let client = OnrampClient::new(&test_config(&mock.base_url()).provider).unwrap();
    assert_eq!(client.payment_method_types().await, json!({}));
}
