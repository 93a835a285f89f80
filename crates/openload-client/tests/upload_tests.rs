//! Upload pipeline behavior: hashing, ticketing, multipart streaming.

use bytes::Bytes;
use openload_client::{Config, Credentials, Error, Openload, UploadRequest};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{any, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYLOAD: &[u8] = b"abcdefghij";
const PAYLOAD_SHA1: &str = "d68c19a0a345b7eab78d5e11e991c026ec60db63";

fn envelope(result: serde_json::Value) -> serde_json::Value {
    json!({ "status": 200, "msg": "OK", "result": result })
}

fn uploaded_file() -> serde_json::Value {
    json!({
        "id": "0yiQTPzi4Y4",
        "name": "a.txt",
        "size": 10,
        "sha1": PAYLOAD_SHA1,
        "content_type": "text/plain",
        "url": "https://openload.co/f/0yiQTPzi4Y4/a.txt"
    })
}

fn client_for(server: &MockServer) -> Openload {
    Openload::with_config(
        Credentials::new("test-login", "test-key"),
        Config::new(server.uri()),
    )
    .expect("client should build")
}

fn buffer_request() -> UploadRequest {
    UploadRequest::from_buffer(Bytes::from_static(PAYLOAD))
        .file_name("a.txt")
        .content_type("text/plain")
}

/// Mount the ticket endpoint, pinned to the known payload digest.
async fn mount_ticket(server: &MockServer, expect: u64) {
    Mock::given(method("GET"))
        .and(path("/1/file/ul"))
        .and(query_param("login", "test-login"))
        .and(query_param("sha1", PAYLOAD_SHA1))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "url": format!("{}/ul/ticket-1", server.uri()),
            "valid_until": "2026-12-31 23:59:59"
        }))))
        .expect(expect)
        .mount(server)
        .await;
}

#[tokio::test]
async fn buffer_upload_hashes_tickets_and_streams() {
    let server = MockServer::start().await;
    mount_ticket(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .and(body_string_contains("name=\"file1\""))
        .and(body_string_contains("filename=\"a.txt\""))
        .and(body_string_contains("text/plain"))
        .and(body_string_contains("abcdefghij"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(uploaded_file())))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client_for(&server).upload(buffer_request()).await.unwrap();
    assert_eq!(uploaded.sha1, PAYLOAD_SHA1);
    assert_eq!(uploaded.size, 10);
    assert_eq!(uploaded.name, "a.txt");
}

#[tokio::test]
async fn buffer_without_metadata_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload(UploadRequest::from_buffer(Bytes::from_static(PAYLOAD)))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn failed_ticket_request_stops_the_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/file/ul"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 509, "msg": "bandwidth usage too high", "result": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).upload(buffer_request()).await.unwrap_err();
    assert_eq!(err.api_status(), Some(509));
}

#[tokio::test]
async fn empty_upload_response_is_its_own_error() {
    let server = MockServer::start().await;
    mount_ticket(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).upload(buffer_request()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn rejected_upload_surfaces_the_envelope_error() {
    let server = MockServer::start().await;
    mount_ticket(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 403, "msg": "wrong sha1 uploaded", "result": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).upload(buffer_request()).await.unwrap_err();
    assert_eq!(err.api_status(), Some(403));
}

#[tokio::test]
async fn path_upload_derives_filename_and_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("a.txt");
    std::fs::write(&file_path, PAYLOAD).unwrap();

    let server = MockServer::start().await;
    mount_ticket(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .and(body_string_contains("filename=\"a.txt\""))
        .and(body_string_contains("text/plain"))
        .and(body_string_contains("abcdefghij"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(uploaded_file())))
        .expect(1)
        .mount(&server)
        .await;

    let uploaded = client_for(&server)
        .upload(UploadRequest::from_path(&file_path))
        .await
        .unwrap();
    assert_eq!(uploaded.name, "a.txt");
}

#[tokio::test]
async fn folder_parameter_reaches_the_ticket_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/file/ul"))
        .and(query_param("sha1", PAYLOAD_SHA1))
        .and(query_param("folder", "4248"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "url": format!("{}/ul/ticket-1", server.uri())
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(uploaded_file())))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .upload(buffer_request().folder("4248"))
        .await
        .unwrap();
}

#[tokio::test]
async fn each_upload_fetches_a_fresh_ticket() {
    let server = MockServer::start().await;
    mount_ticket(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(uploaded_file())))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.upload(buffer_request()).await.unwrap();
    client.upload(buffer_request()).await.unwrap();
}

#[tokio::test]
async fn progress_reports_every_chunk_up_to_the_total() {
    // spans several 64 KiB stream chunks
    let data = vec![0x61_u8; 200 * 1024];
    let total = data.len() as u64;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/file/ul"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "url": format!("{}/ul/ticket-1", server.uri())
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ul/ticket-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "id": "blob", "name": "blob.bin", "size": total, "sha1": "x"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let events: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    client_for(&server)
        .upload_with_progress(
            UploadRequest::from_buffer(data)
                .file_name("blob.bin")
                .content_type("application/octet-stream"),
            Box::new(move |progress| {
                sink.lock()
                    .unwrap()
                    .push((progress.bytes_uploaded, progress.total_bytes));
            }),
        )
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert!(events.len() >= 4, "expected one event per chunk");
    assert!(events.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert_eq!(events.last().unwrap().0, total);
    assert!(events.iter().all(|(_, reported_total)| *reported_total == total));
}
