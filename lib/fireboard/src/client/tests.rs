use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use super::*;
use crate::DegreeType;

const KEY: &str = "0123456789abcdef";

type Reply = std::result::Result<Json<Value>, StatusCode>;

fn is_authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Token {KEY}");
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) == Some(expected.as_str())
}

async fn login(Json(body): Json<Value>) -> Reply {
    if body["username"] == "pitmaster@example.com" && body["password"] == "hunter2" {
        Ok(Json(json!({ "key": KEY })))
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}

fn authorized(body: Value) -> impl Fn(HeaderMap) -> std::future::Ready<Reply> + Clone {
    move |headers: HeaderMap| {
        std::future::ready(if is_authorized(&headers) {
            Ok(Json(body.clone()))
        } else {
            Err(StatusCode::UNAUTHORIZED)
        })
    }
}

fn fake_fireboard() -> Router {
    Router::new()
        .route("/api/rest-auth/login/", post(login))
        .route(
            "/api/v1/devices.json",
            get(authorized(json!([{
                "hardware_id": "ABC123",
                "uuid": "uuid-1",
                "title": "Smoker",
                "degreetype": 2,
                "channels": [{"channel": 1, "channel_label": "Probe 1"}],
                "latest_temps": [{"channel": 1, "temp": 225.5, "degreetype": 2}]
            }]))),
        )
        .route(
            "/api/v1/devices/uuid-1.json",
            get(authorized(json!({"hardware_id": "ABC123", "title": "Smoker"}))),
        )
        .route(
            "/api/v1/devices/uuid-1/temps.json",
            get(authorized(json!([
                {"channel": 1, "temp": 225.5, "degreetype": 2, "created": "2019-05-02T10:00:00Z"},
                {"channel": 2, "temp": 98.1, "degreetype": 2}
            ]))),
        )
        .route(
            "/api/v1/devices/uuid-1/drivelog.json",
            get(authorized(json!({"modetype": 2, "setpoint": 250.0, "driveper": 0.4}))),
        )
        .route(
            "/api/v1/sessions.json",
            get(authorized(json!([{"id": 5, "title": "Brisket"}]))),
        )
        .route(
            "/api/v1/sessions/5.json",
            get(authorized(json!({"id": 5, "title": "Brisket", "duration": "12:00:00"}))),
        )
        .route(
            "/api/v1/sessions/5/chart.json",
            get(authorized(json!([{"label": "Probe 1", "degreetype": 1, "x": [1, 2], "y": [20.0, 21.0]}]))),
        )
        .route("/api/v1/sessions/6.json", get(|| async { "<html>oops</html>" }))
        .route(
            "/api/v1/sessions/7.json",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/api")
}

async fn logged_in_client() -> Client {
    let base_url = serve(fake_fireboard()).await;
    let mut client = Client::with_base_url(&base_url).unwrap();
    client.login("pitmaster@example.com", "hunter2").await.unwrap();
    client
}

#[tokio::test]
async fn test_login() {
    let base_url = serve(fake_fireboard()).await;
    let mut client = Client::with_base_url(&base_url).unwrap();

    let token = client.login("pitmaster@example.com", "hunter2").await.unwrap();
    assert_eq!(token, KEY);
    assert_eq!(client.token(), Some(KEY));
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let base_url = serve(fake_fireboard()).await;
    let mut client = Client::with_base_url(&base_url).unwrap();
    client.login("pitmaster@example.com", "hunter2").await.unwrap();

    let err = client.login("pitmaster@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_login_missing_credentials() {
    let mut client = Client::with_base_url("http://127.0.0.1:9/api").unwrap();

    let err = client.login("", "hunter2").await.unwrap_err();
    assert!(matches!(err, Error::MissingCredentials));
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_requires_login() {
    let base_url = serve(fake_fireboard()).await;
    let client = Client::with_base_url(&base_url).unwrap();

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_logout() {
    let mut client = logged_in_client().await;
    client.logout();

    assert!(matches!(client.list_sessions().await, Err(Error::NotLoggedIn)));
}

#[tokio::test]
async fn test_list_devices() {
    let client = logged_in_client().await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);

    let device = &devices[0];
    assert_eq!(device.hardware_id, "ABC123");
    assert_eq!(device.degreetype, Some(DegreeType::Fahrenheit));
    assert_eq!(device.channel(1).unwrap().channel_label.as_deref(), Some("Probe 1"));
    assert_eq!(device.latest_temp(1).unwrap().temp, Some(225.5));
}

#[tokio::test]
async fn test_device_endpoints() {
    let client = logged_in_client().await;

    let device = client.get_device("uuid-1").await.unwrap();
    assert_eq!(device.title.as_deref(), Some("Smoker"));

    let temps = client.get_device_temps("uuid-1").await.unwrap();
    assert_eq!(temps.len(), 2);
    assert_eq!(temps[1].channel, 2);
    assert_eq!(temps[1].temp, Some(98.1));

    let drivelog = client.get_device_drivelog("uuid-1").await.unwrap();
    assert_eq!(drivelog.modetype, Some(2));
    assert_eq!(drivelog.setpoint, Some(250.0));
}

#[tokio::test]
async fn test_session_endpoints() {
    let client = logged_in_client().await;

    let sessions = client.list_sessions().await.unwrap();
    assert_eq!(sessions[0].id, 5);

    let session = client.get_session(5).await.unwrap();
    assert_eq!(session.duration.as_deref(), Some("12:00:00"));

    let chart = client.get_session_chart(5).await.unwrap();
    assert_eq!(chart[0].points().collect::<Vec<_>>(), vec![(1, 20.0), (2, 21.0)]);
}

#[tokio::test]
async fn test_rejected_token() {
    let base_url = serve(fake_fireboard()).await;
    let mut client = Client::with_base_url(&base_url).unwrap();
    client.token = Some("expired".to_string());

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
    assert_eq!(err.kind(), ErrorKind::Auth);
}

#[tokio::test]
async fn test_api_errors() {
    let client = logged_in_client().await;

    let err = client.get_session(6).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert_eq!(err.kind(), ErrorKind::Api);

    let err = client.get_session(7).await.unwrap_err();
    assert!(matches!(err, Error::Status(500)));
    assert_eq!(err.kind(), ErrorKind::Api);

    let err = client.get_device("missing").await.unwrap_err();
    assert!(matches!(err, Error::Status(404)));
}

#[tokio::test]
async fn test_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = Client::with_base_url(&format!("http://{addr}/api")).unwrap();
    client.token = Some(KEY.to_string());

    let err = client.list_devices().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[test]
fn test_invalid_base_url() {
    let err = Client::with_base_url("not a url").err().unwrap();
    assert!(matches!(err, Error::UrlParse(_)));
}
