//! GitHub Pages activation

use hosting_models::PagesRequest;
use tracing::{debug, error, info};

use crate::errors::DeployError;
use crate::http::github::HostingApi;
use crate::models::deployment::DEFAULT_BRANCH;
use crate::naming::RepositoryName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStatus {
    Enabled,
    AlreadyEnabled,
}

/// Serve the repository's default branch root as a static site
pub async fn activate_site(
    api: &dyn HostingApi,
    repo: &RepositoryName,
) -> Result<SiteStatus, DeployError> {
    let response = api
        .enable_pages(repo.as_str(), &PagesRequest::branch_root(DEFAULT_BRANCH))
        .await?;

    match response.status {
        201 => {
            info!("GitHub Pages enabled for {}", repo);
            Ok(SiteStatus::Enabled)
        }
        409 => {
            debug!("GitHub Pages already enabled for {}", repo);
            Ok(SiteStatus::AlreadyEnabled)
        }
        status => {
            error!("Failed to enable GitHub Pages: {} - {}", status, response.body);
            Err(DeployError::ActivationError {
                repo: repo.to_string(),
                message: format!("{}: {}", status, response.body),
            })
        }
    }
}
