//! Create-or-update file publishing

use base64::{engine::general_purpose::STANDARD, Engine};
use hosting_models::{ContentResponse, PutContentRequest};
use tracing::{debug, error};

use crate::errors::DeployError;
use crate::http::github::HostingApi;
use crate::models::deployment::DEFAULT_BRANCH;
use crate::naming::RepositoryName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
}

/// Current blob sha of `path`, if the file exists
pub async fn current_version(
    api: &dyn HostingApi,
    repo: &RepositoryName,
    path: &str,
) -> Result<Option<String>, DeployError> {
    let response = api.get_file(repo.as_str(), path).await?;
    if response.status != 200 {
        debug!("{} not found in {} ({})", path, repo, response.status);
        return Ok(None);
    }

    let content: ContentResponse = response.json().map_err(|e| DeployError::PublishError {
        path: path.to_string(),
        message: format!("unreadable contents response: {}", e),
    })?;
    Ok(Some(content.sha))
}

/// Write `content` to `path` on the default branch.
///
/// Reads the file's sha first and sends it back when present, so a second
/// publish of the same path is an update rather than a rejected create.
/// The read and the write are separate calls; a concurrent writer in
/// between makes the write fail.
pub async fn publish(
    api: &dyn HostingApi,
    repo: &RepositoryName,
    path: &str,
    content: &[u8],
    message: &str,
) -> Result<PublishOutcome, DeployError> {
    let sha = current_version(api, repo, path).await?;
    let outcome = if sha.is_some() {
        PublishOutcome::Updated
    } else {
        PublishOutcome::Created
    };

    let body = PutContentRequest {
        message: message.to_string(),
        content: STANDARD.encode(content),
        branch: DEFAULT_BRANCH.to_string(),
        sha,
    };

    let response = api.put_file(repo.as_str(), path, &body).await?;
    if !matches!(response.status, 200 | 201) {
        error!("File upload failed: {} {} - {}", path, response.status, response.body);
        return Err(DeployError::PublishError {
            path: path.to_string(),
            message: format!("{}: {}", response.status, response.body),
        });
    }

    debug!("{:?} {} ({} bytes) in {}", outcome, path, content.len(), repo);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::derive_repository_name;
    use crate::test_support::FakeHost;

    #[tokio::test]
    async fn test_first_publish_creates_without_sha() {
        let host = FakeHost::new("octocat").with_repository("demo");
        let repo = derive_repository_name("demo");

        let outcome = publish(&host, &repo, "index.html", b"<h1>hi</h1>", "Update index.html")
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Created);
        assert_eq!(host.puts(), vec![("index.html".to_string(), None)]);
        assert_eq!(host.file("demo", "index.html").unwrap().content, b"<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_republish_sends_current_sha() {
        let host = FakeHost::new("octocat").with_repository("demo");
        let repo = derive_repository_name("demo");

        publish(&host, &repo, "index.html", b"v1", "first").await.unwrap();
        let first_sha = host.file("demo", "index.html").unwrap().sha;
        let outcome = publish(&host, &repo, "index.html", b"v2", "second")
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Updated);
        assert_eq!(host.puts()[1], ("index.html".to_string(), Some(first_sha)));
        let stored = host.file("demo", "index.html").unwrap();
        assert_eq!(stored.content, b"v2");
        assert_eq!(stored.message, "second");
    }

    #[tokio::test]
    async fn test_empty_content() {
        let host = FakeHost::new("octocat").with_repository("demo");
        let repo = derive_repository_name("demo");

        publish(&host, &repo, ".nojekyll", b"", "Add .nojekyll").await.unwrap();
        assert!(host.file("demo", ".nojekyll").unwrap().content.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_write_names_path_and_body() {
        let host = FakeHost::new("octocat")
            .with_repository("demo")
            .failing_on("README.md", 500);
        let repo = derive_repository_name("demo");

        let err = publish(&host, &repo, "README.md", b"# hi", "Update README.md")
            .await
            .unwrap_err();

        match err {
            DeployError::PublishError { path, message } => {
                assert_eq!(path, "README.md");
                assert!(message.contains("500"));
                assert!(message.contains("scripted failure"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
