//! Evaluation endpoint transport

use std::time::Duration;

use async_trait::async_trait;
use hosting_models::EvaluationPayload;
use reqwest::Client;
use tracing::debug;

use crate::errors::DeployError;

/// One POST of the evaluation payload. Returns the response status; an
/// `Err` means the request never produced one.
#[async_trait]
pub trait EvaluationTransport: Send + Sync {
    async fn post(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, DeployError>;
}

pub struct EvaluationClient {
    client: Client,
}

impl EvaluationClient {
    /// `timeout` bounds each individual POST
    pub fn new(timeout: Duration) -> Result<Self, DeployError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EvaluationTransport for EvaluationClient {
    async fn post(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, DeployError> {
        debug!("POST {}", url);
        let response = self.client.post(url).json(payload).send().await?;
        Ok(response.status().as_u16())
    }
}
