//! Deploy orchestration

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use crate::deploy::attachments::inline_bytes;
use crate::deploy::generator::generate;
use crate::deploy::pages::activate_site;
use crate::deploy::provisioner::ensure_repository;
use crate::deploy::publisher::publish;
use crate::deploy::readme::render_readme;
use crate::errors::DeployError;
use crate::http::gemini::TextGenerator;
use crate::http::github::HostingApi;
use crate::models::deployment::{DeployReport, DeployResult};
use crate::models::request::DeployRequest;
use crate::naming::{derive_repository_name, RepositoryName};

pub const ENTRY_POINT_PATH: &str = "index.html";
pub const README_PATH: &str = "README.md";
/// Empty marker that turns off Jekyll processing on GitHub Pages
pub const NOJEKYLL_PATH: &str = ".nojekyll";

/// Deployer options
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Wait after publishing so the Pages build has a chance to start.
    /// Not a guarantee that the site is live.
    pub settle_delay: Duration,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
        }
    }
}

/// Runs the publish sequence for one request at a time.
///
/// Any step failing stops the deploy on the spot. Files already written
/// stay in place; running the deploy again is the recovery path, since
/// provisioning and publishing are both idempotent.
pub struct Deployer {
    hosting: Arc<dyn HostingApi>,
    generator: Arc<dyn TextGenerator>,
    options: DeployOptions,
}

impl Deployer {
    pub fn new(
        hosting: Arc<dyn HostingApi>,
        generator: Arc<dyn TextGenerator>,
        options: DeployOptions,
    ) -> Self {
        Self {
            hosting,
            generator,
            options,
        }
    }

    /// Account the apps are published under
    pub fn owner(&self) -> &str {
        self.hosting.owner()
    }

    /// Build and publish the app described by `request`
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeployReport, DeployError> {
        if request.task.is_empty() {
            return Err(DeployError::ValidationError("task must not be empty".to_string()));
        }

        let repo = derive_repository_name(&request.task);
        let span = info_span!(
            "deploy",
            repo = %repo,
            deploy_id = %uuid::Uuid::new_v4()
        );

        self.run(request, repo).instrument(span).await
    }

    async fn run(
        &self,
        request: &DeployRequest,
        repo: RepositoryName,
    ) -> Result<DeployReport, DeployError> {
        let api = self.hosting.as_ref();
        let result = DeployResult::for_repository(api.owner(), &repo);
        let mut published = Vec::new();
        let mut skipped_attachments = Vec::new();

        info!("Deploying task {:?} to {}/{}", request.task, api.owner(), repo);

        ensure_repository(api, &repo).await?;

        let markup = generate(self.generator.as_ref(), &request.brief, &request.attachments).await?;
        publish(api, &repo, ENTRY_POINT_PATH, markup.as_bytes(), "Update index.html").await?;
        published.push(ENTRY_POINT_PATH.to_string());

        let readme = render_readme(&request.brief, &result.pages_url);
        publish(api, &repo, README_PATH, readme.as_bytes(), "Update README.md").await?;
        published.push(README_PATH.to_string());

        publish(api, &repo, NOJEKYLL_PATH, b"", "Add .nojekyll").await?;
        published.push(NOJEKYLL_PATH.to_string());

        activate_site(api, &repo).await?;

        for attachment in &request.attachments {
            match inline_bytes(attachment)? {
                Some(bytes) => {
                    let message = format!("Add {}", attachment.name);
                    publish(api, &repo, &attachment.name, &bytes, &message).await?;
                    published.push(attachment.name.clone());
                }
                None => {
                    warn!(
                        "Skipping attachment {} with external URL {}",
                        attachment.name, attachment.url
                    );
                    skipped_attachments.push(attachment.name.clone());
                }
            }
        }

        if !self.options.settle_delay.is_zero() {
            info!("Waiting {:?} for the Pages build to start", self.options.settle_delay);
            tokio::time::sleep(self.options.settle_delay).await;
        }

        info!("Deployed {} files to {}", published.len(), result.pages_url);
        Ok(DeployReport {
            repository: repo.to_string(),
            result,
            published,
            skipped_attachments,
        })
    }
}
