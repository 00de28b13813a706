//! GitHub REST client

use async_trait::async_trait;
use hosting_models::{CreateRepositoryRequest, PagesRequest, PutContentRequest};
use url::Url;

use crate::errors::DeployError;
use crate::http::client::{ApiResponse, HttpClient};

/// Code-hosting operations the deploy pipeline needs.
///
/// Implementations return the raw status and body; a transport failure is
/// the only error. Kept as a trait so tests can swap in an in-memory host.
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Account that owns every repository we create
    fn owner(&self) -> &str;

    /// `GET /repos/{owner}/{repo}`
    async fn get_repository(&self, repo: &str) -> Result<ApiResponse, DeployError>;

    /// `POST /user/repos`
    async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<ApiResponse, DeployError>;

    /// `GET /repos/{owner}/{repo}/contents/{path}`
    async fn get_file(&self, repo: &str, path: &str) -> Result<ApiResponse, DeployError>;

    /// `PUT /repos/{owner}/{repo}/contents/{path}`
    async fn put_file(
        &self,
        repo: &str,
        path: &str,
        body: &PutContentRequest,
    ) -> Result<ApiResponse, DeployError>;

    /// `POST /repos/{owner}/{repo}/pages`
    async fn enable_pages(&self, repo: &str, body: &PagesRequest)
        -> Result<ApiResponse, DeployError>;
}

/// Build a percent-encoded API path from raw segments
pub fn api_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<String, DeployError> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| DeployError::Internal(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| DeployError::Internal("cannot build API path".to_string()))?
        .extend(segments);
    Ok(url.path().to_string())
}

fn contents_path(owner: &str, repo: &str, path: &str) -> Result<String, DeployError> {
    let segments = ["repos", owner, repo, "contents"]
        .into_iter()
        .chain(path.split('/').filter(|s| !s.is_empty()));
    api_path(segments)
}

/// `HostingApi` backed by api.github.com
pub struct GitHubClient {
    http: HttpClient,
    owner: String,
}

impl GitHubClient {
    pub fn new(http: HttpClient, owner: impl Into<String>) -> Self {
        Self {
            http,
            owner: owner.into(),
        }
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    fn owner(&self) -> &str {
        &self.owner
    }

    async fn get_repository(&self, repo: &str) -> Result<ApiResponse, DeployError> {
        let path = api_path(["repos", self.owner.as_str(), repo])?;
        self.http.get(&path).await
    }

    async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<ApiResponse, DeployError> {
        self.http.post("/user/repos", request).await
    }

    async fn get_file(&self, repo: &str, path: &str) -> Result<ApiResponse, DeployError> {
        let path = contents_path(&self.owner, repo, path)?;
        self.http.get(&path).await
    }

    async fn put_file(
        &self,
        repo: &str,
        path: &str,
        body: &PutContentRequest,
    ) -> Result<ApiResponse, DeployError> {
        let path = contents_path(&self.owner, repo, path)?;
        self.http.put(&path, body).await
    }

    async fn enable_pages(
        &self,
        repo: &str,
        body: &PagesRequest,
    ) -> Result<ApiResponse, DeployError> {
        let path = api_path(["repos", self.owner.as_str(), repo, "pages"])?;
        self.http.post(&path, body).await
    }
}
