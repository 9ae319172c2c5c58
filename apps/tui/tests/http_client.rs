use std::time::Duration;

use rider_dash::api::HttpClient;
use rider_dash_core::api::{RequestKind, Route};
use rider_dash_core::{ApiError, FetchOutcome, FetchRequest, HealthStatus, TabId, Ticket};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one canned response and hands back the request line it saw.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0_u8; 8192];
        let read = socket.read(&mut buffer).await.unwrap();
        let request = String::from_utf8_lossy(&buffer[..read]).to_string();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request.lines().next().unwrap_or_default().to_string()
    });
    (base, handle)
}

fn demand_ticket() -> Ticket {
    Ticket::for_tab(TabId::Demand, RequestKind::Collection, 1)
}

fn client(base: &str) -> HttpClient {
    HttpClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn get_returns_parsed_json() {
    let (base, server) = serve_once("200 OK", r#"{"Pune":[{"store":"A"}]}"#).await;
    let request = FetchRequest::get(demand_ticket(), "/demand/forecast?city=Pune");
    let outcome = client(&base).execute(&request).await;

    assert_eq!(outcome, FetchOutcome::Json(json!({"Pune": [{"store": "A"}]})));
    assert_eq!(server.await.unwrap(), "GET /demand/forecast?city=Pune HTTP/1.1");
}

#[tokio::test]
async fn get_with_error_status_fails() {
    let (base, _server) = serve_once("404 Not Found", r#"{"detail":"missing"}"#).await;
    let request = FetchRequest::get(demand_ticket(), "/launch/X/plan");
    let outcome = client(&base).execute(&request).await;
    assert_eq!(outcome, FetchOutcome::Failed(ApiError::Status(404)));
}

#[tokio::test]
async fn get_with_broken_body_is_a_decode_error() {
    let (base, _server) = serve_once("200 OK", "not json").await;
    let request = FetchRequest::get(demand_ticket(), "/demand/forecast");
    let outcome = client(&base).execute(&request).await;
    assert!(matches!(outcome, FetchOutcome::Failed(ApiError::Decode(_))));
}

#[tokio::test]
async fn post_reports_status_and_raw_body() {
    let (base, server) = serve_once("500 Internal Server Error", "boom").await;
    let ticket = Ticket::for_tab(TabId::Beckn, RequestKind::Probe { path: "/beckn/bpp/search".into() }, 0);
    let request = FetchRequest::post(ticket, "/beckn/bpp/search", Some(json!({"context": {}})));
    let outcome = client(&base).execute(&request).await;

    assert_eq!(
        outcome,
        FetchOutcome::Status {
            code: 500,
            body: "boom".into()
        }
    );
    assert_eq!(server.await.unwrap(), "POST /beckn/bpp/search HTTP/1.1");
}

#[tokio::test]
async fn health_keeps_the_body_of_an_error_status() {
    let (base, _server) = serve_once("503 Service Unavailable", r#"{"status":"degraded"}"#).await;
    let outcome = client(&base).execute(&HealthStatus::request()).await;

    assert_eq!(
        outcome,
        FetchOutcome::Status {
            code: 503,
            body: r#"{"status":"degraded"}"#.into()
        }
    );
    assert_eq!(
        HealthStatus::from_outcome(&outcome),
        HealthStatus::Reported("degraded".to_string())
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let request = FetchRequest::get(Ticket::new(Route::Health, RequestKind::Health, 0), "/healthz");
    let outcome = client(&base).execute(&request).await;
    assert!(matches!(outcome, FetchOutcome::Failed(ApiError::Transport(_))));
}

#[tokio::test]
async fn spawned_request_delivers_its_ticket() {
    let (base, _server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let ticket = Ticket::new(Route::Health, RequestKind::Health, 0);
    client(&base).spawn(FetchRequest::get(ticket.clone(), "/healthz"), tx);

    let (delivered, outcome) = rx.recv().await.unwrap();
    assert_eq!(delivered, ticket);
    assert!(outcome.is_success());
}
