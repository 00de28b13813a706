//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::errors::DeployError;
use crate::utils::version_info;

/// Status and body of a completed request.
///
/// Non-success statuses are not errors at this layer; callers decide which
/// codes they accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DeployError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Authenticated JSON client rooted at one API base URL
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client. `timeout` of `None` waits indefinitely.
    pub fn new(
        base_url: &str,
        token: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, DeployError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let mut builder = Client::builder()
            .user_agent(format!("pagedrop/{}", version_info().version))
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<ApiResponse, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let request = self.client.get(&url);
        self.send(request).await
    }

    /// Make a POST request
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self.client.post(&url).json(body);
        self.send(request).await
    }

    /// Make a PUT request
    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse, DeployError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("PUT {}", url);

        let request = self.client.put(&url).json(body);
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, DeployError> {
        let response = request
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("-> {}", status);
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
