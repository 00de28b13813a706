//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::deploy::orchestrator::DeployOptions;
use crate::notifier::NotifierOptions;
use crate::storage::settings::Settings;
use crate::utils::CooldownOptions;

/// Main application options
#[derive(Debug)]
pub struct AppOptions {
    /// GitHub client configuration
    pub github: GitHubOptions,

    /// Gemini client configuration
    pub gemini: GeminiOptions,

    /// Server configuration
    pub server: ServerOptions,

    /// Shared secret every deploy request must carry
    pub secret: SecretString,

    /// Deploy pipeline options
    pub deploy: DeployOptions,

    /// Evaluation callback options
    pub notifier: NotifierOptions,

    /// Per-POST timeout for the evaluation callback
    pub notify_timeout: Duration,
}

impl AppOptions {
    /// Convert validated settings into runtime options
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            github: GitHubOptions {
                user: settings.github.user.clone(),
                token: SecretString::from(settings.github.token.clone()),
                api_base_url: settings.github.api_base_url.clone(),
                timeout: settings.github.timeout_secs.map(Duration::from_secs),
            },
            gemini: GeminiOptions {
                api_key: SecretString::from(settings.gemini.api_key.clone()),
                model: settings.gemini.model.clone(),
                base_url: settings.gemini.base_url.clone(),
                timeout: settings.gemini.timeout_secs.map(Duration::from_secs),
            },
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            secret: SecretString::from(settings.server.secret.clone()),
            deploy: DeployOptions {
                settle_delay: Duration::from_secs(settings.deploy.settle_delay_secs),
            },
            notifier: NotifierOptions {
                max_attempts: settings.notifier.max_attempts,
                cooldown: CooldownOptions {
                    base_delay: Duration::from_secs(settings.notifier.base_delay_secs),
                    max_delay: Duration::from_secs(settings.notifier.max_delay_secs),
                    ..Default::default()
                },
            },
            notify_timeout: Duration::from_secs(settings.notifier.timeout_secs),
        }
    }
}

/// GitHub client options
#[derive(Debug)]
pub struct GitHubOptions {
    pub user: String,
    pub token: SecretString,
    pub api_base_url: String,
    pub timeout: Option<Duration>,
}

/// Gemini client options
#[derive(Debug)]
pub struct GeminiOptions {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

/// Local HTTP server options
#[derive(Debug)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.github.user = "octocat".to_string();
        settings.github.timeout_secs = Some(30);
        settings.deploy.settle_delay_secs = 0;

        let options = AppOptions::from_settings(&settings);

        assert_eq!(options.github.user, "octocat");
        assert_eq!(options.github.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.gemini.timeout, None);
        assert_eq!(options.deploy.settle_delay, Duration::ZERO);
        assert_eq!(options.notifier.max_attempts, 6);
        assert_eq!(options.notifier.cooldown.max_delay, Duration::from_secs(60));
        assert_eq!(options.notify_timeout, Duration::from_secs(10));
        assert!(!format!("{:?}", options).contains("aryan-secret"));
    }
}
