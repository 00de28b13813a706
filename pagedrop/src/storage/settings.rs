//! Settings file management

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::DeployError;
use crate::logs::LogLevel;

/// Service settings. Read once at start-up and handed to whoever needs them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Emit JSON log lines
    #[serde(default)]
    pub json_logs: bool,

    /// GitHub account and credentials
    #[serde(default)]
    pub github: GitHubSettings,

    /// Text generation service
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// HTTP front door
    #[serde(default)]
    pub server: ServerSettings,

    /// Deploy pipeline tuning
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Evaluation callback retry policy
    #[serde(default)]
    pub notifier: NotifierSettings,
}

/// GitHub settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    /// Account owning the generated repositories
    #[serde(default)]
    pub user: String,

    /// Personal access token
    #[serde(default, skip_serializing)]
    pub token: String,

    /// REST API root
    #[serde(default = "default_github_api_url")]
    pub api_base_url: String,

    /// Per-request timeout; requests wait indefinitely when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            user: String::new(),
            token: String::new(),
            api_base_url: default_github_api_url(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("user", &self.user)
            .field("token", &redacted(&self.token))
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Gemini settings
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    #[serde(default, skip_serializing)]
    pub api_key: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            base_url: default_gemini_url(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Front door settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret every deploy request must carry
    #[serde(default = "default_secret", skip_serializing)]
    pub secret: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_secret() -> String {
    "aryan-secret".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secret: default_secret(),
        }
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &redacted(&self.secret))
            .finish()
    }
}

/// Deploy settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Pause after publishing, in seconds
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

fn default_settle_delay() -> u64 {
    5
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            settle_delay_secs: default_settle_delay(),
        }
    }
}

/// Notifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierSettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,

    /// Timeout of each POST
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_max_attempts() -> u32 {
    6
}

fn default_base_delay() -> u64 {
    1
}

fn default_max_delay() -> u64 {
    60
}

fn default_notify_timeout() -> u64 {
    10
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay(),
            max_delay_secs: default_max_delay(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Settings {
    /// Defaults, overlaid with `path` when given, then with the environment
    pub async fn load(path: Option<&Path>) -> Result<Self, DeployError> {
        let mut settings = match path {
            Some(path) => Self::read_file(path).await?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a JSON settings file
    pub async fn read_file(path: &Path) -> Result<Self, DeployError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DeployError::ConfigError(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            DeployError::ConfigError(format!(
                "Failed to parse settings file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Override fields from environment variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup("GITHUB_USER") {
            self.github.user = user;
        }
        if let Some(token) = lookup("GH_TOKEN") {
            self.github.token = token;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(secret) = lookup("APP_SECRET") {
            self.server.secret = secret;
        }
        if let Some(host) = lookup("BIND_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| DeployError::ConfigError(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level.parse().map_err(DeployError::ConfigError)?;
        }
        Ok(())
    }

    /// Whether the front door still accepts the built-in secret
    pub fn uses_default_secret(&self) -> bool {
        self.server.secret == default_secret()
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.github.user.trim().is_empty() {
            return Err(DeployError::ConfigError("GITHUB_USER is not set".to_string()));
        }
        if self.github.token.is_empty() {
            return Err(DeployError::ConfigError("GH_TOKEN is not set".to_string()));
        }
        if self.gemini.api_key.is_empty() {
            return Err(DeployError::ConfigError("GEMINI_API_KEY is not set".to_string()));
        }
        if self.server.secret.is_empty() {
            return Err(DeployError::ConfigError("APP_SECRET must not be empty".to_string()));
        }
        if self.uses_default_secret() {
            warn!("APP_SECRET is not set, falling back to the built-in shared secret");
        }
        if self.notifier.max_attempts == 0 {
            return Err(DeployError::ConfigError(
                "notifier.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
