//! HTTP transport.
//!
//! The endpoint clients only build URLs; sending them is delegated to a
//! [`Transport`]. [`HttpTransport`] is the default, backed by `reqwest`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;

use crate::error::{LinkscapeError, Result};

const USER_AGENT: &str = concat!("linkscape/", env!("CARGO_PKG_VERSION"));

/// Performs a single request and decodes the JSON response.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `method` to `url`, with `body` as JSON if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, the API answers
    /// with a non-success status, or the body is not JSON.
    async fn perform(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value>;
}

/// `reqwest`-backed transport.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a transport with the default client settings.
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(LinkscapeError::HttpError)?;

        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = Self::extract_error_message(response, status).await;
        Err(LinkscapeError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error_message").and_then(|m| m.as_str()) {
                return err.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, url, body))]
    async fn perform(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(LinkscapeError::HttpError)?;
        let response = Self::check_response(response).await?;
        let text = response.text().await.map_err(LinkscapeError::HttpError)?;
        Ok(serde_json::from_str(&text)?)
    }
}
