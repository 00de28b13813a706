//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::{AppOptions, ServerOptions};
use crate::deploy::orchestrator::Deployer;
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::http::evaluation::EvaluationClient;
use crate::http::gemini::GeminiClient;
use crate::http::github::GitHubClient;
use crate::notifier::Notifier;
use crate::server::serve::serve;
use crate::server::state::ServerState;

/// Run the service until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DeployError> {
    info!("Initializing pagedrop...");

    let (server_options, state) = init(options)?;

    let handle = serve(&server_options, Arc::new(state), shutdown_signal).await?;
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            error!("Server task failed: {}", e);
            Err(DeployError::ServerError(e.to_string()))
        }
    }
}

// =============================== INITIALIZATION ================================== //

fn init(options: AppOptions) -> Result<(ServerOptions, ServerState), DeployError> {
    let AppOptions {
        github,
        gemini,
        server,
        secret,
        deploy,
        notifier,
        notify_timeout,
    } = options;

    info!("Publishing apps as GitHub user {}", github.user);
    let http = HttpClient::new(&github.api_base_url, github.token, github.timeout)?;
    let hosting = Arc::new(GitHubClient::new(http, github.user));

    let generator = Arc::new(GeminiClient::new(
        &gemini.base_url,
        gemini.model,
        gemini.api_key,
        gemini.timeout,
    )?);

    let transport = Arc::new(EvaluationClient::new(notify_timeout)?);

    let deployer = Deployer::new(hosting, generator, deploy);
    let notifier = Notifier::new(transport, notifier);

    Ok((server, ServerState::new(deployer, notifier, secret)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::settings::Settings;

    #[test]
    fn test_init_wires_owner() {
        let mut settings = Settings::default();
        settings.github.user = "octocat".to_string();
        settings.server.port = 9100;

        let (server, state) = init(AppOptions::from_settings(&settings)).unwrap();

        assert_eq!(server.port, 9100);
        assert_eq!(state.deployer.owner(), "octocat");
    }
}
