//! End-to-end tests for every gateway route against a mock upstream.

use axum::http::StatusCode;
use eventbrite_gateway::upstream::templates::{create_event_template, update_event_template};
use mockito::{Matcher, Server};
use serde_json::{json, Value};

mod common;

use common::{raw_get, start_gateway, test_config, TEST_TOKEN};

const BEARER: &str = "Bearer test-token";

async fn upstream() -> (mockito::ServerGuard, String) {
    let server = Server::new_async().await;
    let base = format!("{}/v3", server.url());
    (server, base)
}

#[tokio::test]
async fn test_list_events_relays_status_and_body() {
    let (mut server, base) = upstream().await;
    let mock = server
        .mock("GET", "/v3/events/")
        .match_header("authorization", BEARER)
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"events":[{"id":"1"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let res = gateway.client.get(gateway.url("/events")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "200 OK", "body": r#"{"events":[{"id":"1"}]}"# })
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_event_issues_exactly_one_get() {
    let (mut server, base) = upstream().await;
    let mock = server
        .mock("GET", "/v3/events/555123/")
        .match_header("authorization", format!("Bearer {}", TEST_TOKEN).as_str())
        .with_status(200)
        .with_body(r#"{"id":"555123"}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let res = gateway
        .client
        .get(gateway.url("/events/555123"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"], r#"{"id":"555123"}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_event_ignores_inbound_body() {
    let (mut server, base) = upstream().await;
    let expected = serde_json::to_value(create_event_template()).unwrap();
    let mock = server
        .mock("POST", "/v3/organizations/org-1/events/")
        .match_header("authorization", BEARER)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(expected))
        .with_status(201)
        .with_body(r#"{"id":"new"}"#)
        .expect(2)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    let first = gateway
        .client
        .post(gateway.url("/createEvent"))
        .json(&json!({ "event": { "name": { "html": "<p>Mine</p>" } } }))
        .send()
        .await
        .unwrap();
    let second = gateway
        .client
        .post(gateway.url("/createEvent"))
        .body("not even json")
        .send()
        .await
        .unwrap();

    for res in [first, second] {
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "201 Created");
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_event_sends_update_template() {
    let (mut server, base) = upstream().await;
    let expected = serde_json::to_value(update_event_template()).unwrap();
    let mock = server
        .mock("POST", "/v3/events/77/")
        .match_header("authorization", BEARER)
        .match_body(Matcher::Json(expected))
        .with_body(r#"{"id":"77"}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let res = gateway
        .client
        .post(gateway.url("/events/77"))
        .json(&json!({ "ignored": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_and_delete_routes() {
    let (mut server, base) = upstream().await;
    let cancel = server
        .mock("POST", "/v3/events/9/cancel/")
        .match_header("authorization", BEARER)
        .with_body(r#"{"canceled":true}"#)
        .expect(1)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/v3/events/9/")
        .match_header("authorization", BEARER)
        .with_body(r#"{"deleted":true}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    let res = gateway
        .client
        .post(gateway.url("/events/9/cancel"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"], r#"{"canceled":true}"#);

    let res = gateway
        .client
        .delete(gateway.url("/events/9"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"], r#"{"deleted":true}"#);

    cancel.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_non_utf8_id_is_forwarded() {
    let (mut server, base) = upstream().await;
    let get = server
        .mock("GET", "/v3/events/%FF/")
        .match_header("authorization", BEARER)
        .with_body("odd id")
        .expect(1)
        .create_async()
        .await;
    let cancel = server
        .mock("POST", "/v3/events/a%2Fb/cancel/")
        .with_body("slash id")
        .expect(1)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    let res = gateway
        .client
        .get(gateway.url("/events/%FF"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "200 OK", "body": "odd id" }));

    let res = gateway
        .client
        .post(gateway.url("/events/a%2Fb/cancel"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"], "slash id");

    get.assert_async().await;
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected_before_upstream() {
    let (mut server, base) = upstream().await;
    let never = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    for path in ["/events/%2E%2E", "/events/.."] {
        let (status, body) = raw_get(gateway.addr, path).await;
        assert_eq!(status, 400, "{}", path);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("'..'"), "{}", body);
    }

    never.assert_async().await;
}

#[tokio::test]
async fn test_upstream_error_status_is_wrapped_in_200() {
    let (mut server, base) = upstream().await;
    let _not_found = server
        .mock("GET", "/v3/events/404/")
        .with_status(404)
        .with_body(r#"{"error":"NOT_FOUND"}"#)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let res = gateway
        .client
        .get(gateway.url("/events/404"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(text.contains(r#""status":"404 Not Found""#), "got {}", text);
}

#[tokio::test]
async fn test_mirroring_upstream_status() {
    let (mut server, base) = upstream().await;
    let _not_found = server
        .mock("GET", "/v3/events/404/")
        .with_status(404)
        .with_body("missing")
        .create_async()
        .await;

    let mut config = test_config(&base);
    config.responses.mirror_upstream_status = true;
    let gateway = start_gateway(config).await;

    let res = gateway
        .client
        .get(gateway.url("/events/404"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "404 Not Found", "body": "missing" }));
}

#[tokio::test]
async fn test_body_is_relayed_verbatim() {
    let raw = "plain text\r\n  with \"quotes\", <tags> & ünïcødé\t{not json";
    let (mut server, base) = upstream().await;
    let _plain = server
        .mock("GET", "/v3/events/")
        .with_header("content-type", "text/plain")
        .with_body(raw)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let res = gateway.client.get(gateway.url("/events")).send().await.unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"].as_str(), Some(raw));
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let (mut server, base) = upstream().await;
    let _alpha = server
        .mock("GET", "/v3/events/")
        .match_header("x-request-id", "alpha")
        .with_body("A")
        .create_async()
        .await;
    let _beta = server
        .mock("GET", "/v3/events/")
        .match_header("x-request-id", "beta")
        .with_body("B")
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;
    let fetch = |id: &'static str| {
        let request = gateway
            .client
            .get(gateway.url("/events"))
            .header("x-request-id", id);
        async move {
            let body: Value = request.send().await.unwrap().json().await.unwrap();
            body["body"].as_str().unwrap().to_string()
        }
    };

    for _ in 0..5 {
        let (a, b) = tokio::join!(fetch("alpha"), fetch("beta"));
        assert_eq!(a, "A");
        assert_eq!(b, "B");
    }
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let (mut server, base) = upstream().await;
    let _any = server
        .mock("GET", "/v3/events/")
        .match_header("x-request-id", Matcher::Any)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    let res = gateway.client.get(gateway.url("/events")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());

    let res = gateway
        .client
        .get(gateway.url("/events"))
        .header("x-request-id", "caller-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "caller-chosen");
}

#[tokio::test]
async fn test_unknown_routes_are_not_relayed() {
    let (mut server, base) = upstream().await;
    let never = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let gateway = start_gateway(test_config(&base)).await;

    let res = gateway.client.get(gateway.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = gateway
        .client
        .put(gateway.url("/events/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    never.assert_async().await;
}
