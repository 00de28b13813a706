//! Deploy outcome models

use hosting_models::EvaluationPayload;
use serde::{Deserialize, Serialize};

use crate::models::request::DeployRequest;
use crate::naming::RepositoryName;

/// Branch every file is committed to and Pages is served from
pub const DEFAULT_BRANCH: &str = "main";

/// Public locations of a published app
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployResult {
    pub repo_url: String,

    /// Branch pointer, not a content hash
    pub commit_sha: String,

    pub pages_url: String,
}

impl DeployResult {
    /// Derive every URL from the account and repository name
    pub fn for_repository(account: &str, repo: &RepositoryName) -> Self {
        Self {
            repo_url: format!("https://github.com/{}/{}", account, repo),
            commit_sha: DEFAULT_BRANCH.to_string(),
            pages_url: pages_url(account, repo),
        }
    }
}

pub fn pages_url(account: &str, repo: &RepositoryName) -> String {
    format!("https://{}.github.io/{}/", account, repo)
}

/// What `deploy` hands back to its caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployReport {
    pub repository: String,
    pub result: DeployResult,

    /// Files written, in publish order
    pub published: Vec<String>,

    /// Attachments referenced by external URL, which are never fetched
    pub skipped_attachments: Vec<String>,
}

/// Correlate a request's identity fields with its result
pub fn notification_payload(request: &DeployRequest, result: &DeployResult) -> EvaluationPayload {
    EvaluationPayload {
        email: request.email.clone(),
        task: request.task.clone(),
        round: request.round,
        nonce: request.nonce.clone(),
        repo_url: result.repo_url.clone(),
        commit_sha: result.commit_sha.clone(),
        pages_url: result.pages_url.clone(),
    }
}
