//! Gemini text generation client

use std::time::Duration;

use async_trait::async_trait;
use hosting_models::{GenerateContentRequest, GenerateContentResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use crate::errors::DeployError;

/// Single-shot prompt to text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DeployError>;
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, DeployError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, DeployError> {
        let url = self.endpoint();
        debug!("POST {} ({} prompt chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| DeployError::GenerationError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Generation failed: {} - {}", status, body);
            return Err(DeployError::GenerationError(format!("{}: {}", status, body)));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DeployError::GenerationError(e.to_string()))?;

        body.text()
            .ok_or_else(|| DeployError::GenerationError("response contained no text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(
            "https://generativelanguage.googleapis.com/v1beta/",
            "gemini-2.5-flash",
            SecretString::from("key".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
