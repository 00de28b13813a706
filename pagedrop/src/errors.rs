//! Error types for pagedrop

use thiserror::Error;

/// Main error type for the deploy pipeline
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Repository provisioning failed for {repo}: {message}")]
    ProvisioningError { repo: String, message: String },

    #[error("File upload failed for {path}: {message}")]
    PublishError { path: String, message: String },

    #[error("Failed to enable GitHub Pages for {repo}: {message}")]
    ActivationError { repo: String, message: String },

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Invalid attachment {name}: {message}")]
    AttachmentError { name: String, message: String },

    #[error("Evaluation delivery gave up after {attempts} attempts: {last_error}")]
    DeliveryExhausted { attempts: u32, last_error: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
