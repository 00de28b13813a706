//! Repository provisioning

use hosting_models::CreateRepositoryRequest;
use tracing::{debug, error, info};

use crate::errors::DeployError;
use crate::http::github::HostingApi;
use crate::naming::RepositoryName;

/// How `ensure_repository` found things
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// The lookup found it; nothing was created
    Existing,
    /// We created it
    Created,
    /// The create raced with another one and lost
    AlreadyExists,
}

/// Make sure `repo` exists under the API owner, creating it if needed.
///
/// Public, auto-initialised with an MIT license, issues, wiki and projects
/// disabled. A 422 from the create is taken to mean somebody else created it
/// first. Any other failure is returned as-is, never retried here.
pub async fn ensure_repository(
    api: &dyn HostingApi,
    repo: &RepositoryName,
) -> Result<Provisioned, DeployError> {
    let lookup = api.get_repository(repo.as_str()).await?;
    if lookup.status == 200 {
        debug!("Repository {}/{} already exists", api.owner(), repo);
        return Ok(Provisioned::Existing);
    }

    info!("Creating repository {}/{}", api.owner(), repo);
    let request = CreateRepositoryRequest::public_mit(repo.as_str());
    let response = api.create_repository(&request).await?;

    match response.status {
        201 => Ok(Provisioned::Created),
        422 => {
            info!("Repository {} was created concurrently, continuing", repo);
            Ok(Provisioned::AlreadyExists)
        }
        status => {
            error!("Repo create failed: {} - {}", status, response.body);
            Err(DeployError::ProvisioningError {
                repo: repo.to_string(),
                message: format!("{}: {}", status, response.body),
            })
        }
    }
}
