//! Integration tests for the CouchDB repository against a mock server
//!
//! These tests verify that:
//! - Every operation issues exactly one request with the right method and target
//! - Success bodies and status reason texts land in the envelope unchanged
//! - Stale revisions surface as conflicts and are never retried
//! - Identical configuration yields identical clients
//! - Failure reasons carry the store's own status line text

use chrono::{NaiveDate, TimeZone, Utc};
use mockito::Matcher;
use pharmastore::adapters::couchdb::{ClientFactory, CouchRepository, WriteResult};
use pharmastore::adapters::database::DocumentRepository;
use pharmastore::config::{secret_string, CouchDbConfig};
use pharmastore::core::OperationContext;
use pharmastore::domain::{
    DocumentId, FaultKind, PharmaDetails, Revision, UpdatePharmaDetails,
};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn couch_config(url: &str) -> CouchDbConfig {
    CouchDbConfig {
        url: url.to_string(),
        database: "pharma".to_string(),
        username: "admin".to_string(),
        password: Some(secret_string("secret".to_string())),
        ..Default::default()
    }
}

fn repository(url: &str) -> CouchRepository {
    CouchRepository::new(&couch_config(url)).unwrap()
}

/// Answers every request with `status_line` and an empty body
///
/// mockito always writes the canonical reason phrase, so this serves
/// non-canonical ones.
async fn status_line_server(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

fn ctx() -> OperationContext {
    OperationContext::with_timeout(Duration::from_secs(10))
}

#[tokio::test]
async fn test_create_scenario() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/pharma")
        .match_body(Matcher::PartialJson(json!({"Name": "Aspirin"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"id":"1","rev":"1-a"}"#)
        .expect(1)
        .create_async()
        .await;

    let doc = PharmaDetails::builder().name("Aspirin").build().unwrap();
    let envelope = repository(&server.url()).create_document(&ctx(), &doc).await;

    mock.assert_async().await;
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "isSuccess": true,
            "successContent": "{\"ok\":true,\"id\":\"1\",\"rev\":\"1-a\"}"
        })
    );

    let written = WriteResult::from_body(envelope.success_content().unwrap()).unwrap();
    assert_eq!(written.id, "1");
    assert_eq!(written.rev, "1-a");
}

#[tokio::test]
async fn test_update_conflict_scenario() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/pharma/1")
        .match_query(Matcher::UrlEncoded("rev".into(), "1-a".into()))
        .with_status(409)
        .with_body(r#"{"error":"conflict","reason":"Document update conflict."}"#)
        .expect(1)
        .create_async()
        .await;

    let update = UpdatePharmaDetails::new(
        DocumentId::new("1").unwrap(),
        Revision::new("1-a").unwrap(),
        "Aspirin",
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    );
    let envelope = repository(&server.url())
        .update_document(&ctx(), &update)
        .await;

    // Exactly one request: conflicts are not retried.
    mock.assert_async().await;
    assert!(!envelope.is_success());
    assert_eq!(envelope.failure_reason(), Some("Conflict"));
    assert_eq!(envelope.fault_kind(), Some(FaultKind::ConcurrencyConflict));

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["isSuccess"], false);
    assert_eq!(value["failureReason"], "Conflict");
    assert_eq!(value["faultKind"], "concurrency_conflict");
}

#[tokio::test]
async fn test_update_body_excludes_id_and_rev() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/pharma/lot-7")
        .match_query(Matcher::UrlEncoded("rev".into(), "3-c".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "Name": "Ibuprofen",
            "ExpiredOn": "2027-06-30",
            "UpdatedOn": "2025-01-15T09:30:00Z"
        })))
        .with_status(201)
        .with_body(r#"{"ok":true,"id":"lot-7","rev":"4-d"}"#)
        .create_async()
        .await;

    let update = UpdatePharmaDetails::new(
        DocumentId::new("lot-7").unwrap(),
        Revision::new("3-c").unwrap(),
        "Ibuprofen",
        NaiveDate::from_ymd_opt(2027, 6, 30).unwrap(),
    )
    .with_updated_on(Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap());

    let envelope = repository(&server.url())
        .update_document(&ctx(), &update)
        .await;

    mock.assert_async().await;
    assert!(envelope.is_success());
}

#[tokio::test]
async fn test_read_missing_document() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/pharma/ghost")
        .with_status(404)
        .with_body(r#"{"error":"not_found","reason":"missing"}"#)
        .create_async()
        .await;

    let envelope = repository(&server.url())
        .get_document(&ctx(), &DocumentId::new("ghost").unwrap())
        .await;

    assert!(!envelope.is_success());
    assert!(envelope.success_content().is_none());
    assert_eq!(envelope.failure_reason(), Some("Not Found"));
}

#[tokio::test]
async fn test_failure_reason_is_store_reason_text() {
    let url = status_line_server("HTTP/1.1 404 Object Not Found").await;

    let envelope = repository(&url)
        .get_document(&ctx(), &DocumentId::new("ghost").unwrap())
        .await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.failure_reason(), Some("Object Not Found"));
    assert_eq!(envelope.fault_kind(), Some(FaultKind::HttpStatus));
}

#[tokio::test]
async fn test_conflict_keeps_store_reason_text() {
    let url = status_line_server("HTTP/1.1 409 Document Update Conflict").await;

    let envelope = repository(&url)
        .delete_document(
            &ctx(),
            &DocumentId::new("1").unwrap(),
            &Revision::new("1-a").unwrap(),
        )
        .await;

    assert!(envelope.is_conflict());
    assert_eq!(envelope.failure_reason(), Some("Document Update Conflict"));
}

#[tokio::test]
async fn test_delete_conflict_and_success() {
    let mut server = mockito::Server::new_async().await;
    let stale = server
        .mock("DELETE", "/pharma/1")
        .match_query(Matcher::UrlEncoded("rev".into(), "1-a".into()))
        .with_status(409)
        .create_async()
        .await;
    let current = server
        .mock("DELETE", "/pharma/1")
        .match_query(Matcher::UrlEncoded("rev".into(), "2-b".into()))
        .with_status(200)
        .with_body(r#"{"ok":true,"id":"1","rev":"3-c"}"#)
        .create_async()
        .await;

    let repo = repository(&server.url());
    let id = DocumentId::new("1").unwrap();

    let conflict = repo
        .delete_document(&ctx(), &id, &Revision::new("1-a").unwrap())
        .await;
    assert!(conflict.is_conflict());

    let deleted = repo
        .delete_document(&ctx(), &id, &Revision::new("2-b").unwrap())
        .await;
    assert!(deleted.is_success());

    stale.assert_async().await;
    current.assert_async().await;
}

#[tokio::test]
async fn test_server_error_reason() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/pharma/1")
        .with_status(503)
        .create_async()
        .await;

    let envelope = repository(&server.url())
        .get_document(&ctx(), &DocumentId::new("1").unwrap())
        .await;

    assert_eq!(envelope.failure_reason(), Some("Service Unavailable"));
    assert_eq!(envelope.fault_kind(), Some(FaultKind::HttpStatus));
    assert!(!FaultKind::HttpStatus.is_retryable());
}

#[tokio::test]
async fn test_every_request_carries_same_authorization() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
        .with_status(200)
        .with_body("{}")
        .expect(3)
        .create_async()
        .await;

    let repo = repository(&server.url());
    for id in ["a", "b", "c"] {
        let envelope = repo
            .get_document(&ctx(), &DocumentId::new(id).unwrap())
            .await;
        assert!(envelope.is_success());
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_host_is_contained() {
    let doc = PharmaDetails::builder().name("Aspirin").build().unwrap();
    let envelope = repository("http://127.0.0.1:1")
        .create_document(&ctx(), &doc)
        .await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.fault_kind(), Some(FaultKind::Network));
    assert!(FaultKind::Network.is_retryable());
}

#[test]
fn test_identical_configuration_identical_factories() {
    let first = ClientFactory::new(&couch_config("http://couch.example.com:5984")).unwrap();
    let second = ClientFactory::new(&couch_config("http://couch.example.com:5984")).unwrap();

    assert_eq!(first.base_url(), second.base_url());
    assert_eq!(first.authorization(), second.authorization());

    let id = DocumentId::new("1").unwrap();
    let rev = Revision::new("1-a").unwrap();
    assert_eq!(first.revision_url(&id, &rev), second.revision_url(&id, &rev));
}
