mod error;
pub use error::{Error, ErrorKind};

#[cfg(test)]
mod tests;

use std::time::Duration;

use log::{debug, error, trace};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ChartSeries, Device, DriveLog, Result, Session, Temperature};

const BASE_URL: &str = "https://fireboard.io/api";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only client for the FireBoard cloud. A token is obtained once with
/// [`Client::login`] and is never refreshed automatically.
#[derive(Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http_client = reqwest::Client::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&str> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            username: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            key: String,
        }

        self.token = None;

        if username.is_empty() || password.is_empty() {
            error!("login failure, username or password not set");
            return Err(Error::MissingCredentials);
        }

        let url = self.url("rest-auth/login/");
        debug!("login as {username}");

        let response = self
            .http_client
            .post(&url)
            .json(&Credentials { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        trace!("login response: {}", String::from_utf8_lossy(&body));

        if matches!(status.as_u16(), 400 | 401 | 403) {
            error!("login failure, status code {status}");
            return Err(Error::InvalidCredentials);
        } else if !status.is_success() {
            error!("login failure, status code {status}");
            return Err(Error::Status(status.as_u16()));
        }

        let LoginResponse { key } = serde_json::from_slice(&body)?;
        if key.is_empty() {
            return Err(Error::InvalidCredentials);
        }

        Ok(self.token.insert(key).as_str())
    }

    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        self.get("devices.json").await
    }

    pub async fn get_device(&self, uuid: &str) -> Result<Device> {
        self.get(&format!("devices/{uuid}.json")).await
    }

    pub async fn get_device_temps(&self, uuid: &str) -> Result<Vec<Temperature>> {
        self.get(&format!("devices/{uuid}/temps.json")).await
    }

    pub async fn get_device_drivelog(&self, uuid: &str) -> Result<DriveLog> {
        self.get(&format!("devices/{uuid}/drivelog.json")).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.get("sessions.json").await
    }

    pub async fn get_session(&self, session_id: u64) -> Result<Session> {
        self.get(&format!("sessions/{session_id}.json")).await
    }

    pub async fn get_session_chart(&self, session_id: u64) -> Result<Vec<ChartSeries>> {
        self.get(&format!("sessions/{session_id}/chart.json")).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.token.as_deref().ok_or(Error::NotLoggedIn)?;

        let url = self.url(&format!("v1/{path}"));
        debug!("GET {url}");

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, format!("Token {token}"))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        trace!("{path}: {}", String::from_utf8_lossy(&body));

        match status.as_u16() {
            401 | 403 => Err(Error::Unauthorized),
            code if !status.is_success() => Err(Error::Status(code)),
            _ => Ok(serde_json::from_slice(&body)?),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
