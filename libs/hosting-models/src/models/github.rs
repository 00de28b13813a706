//! GitHub REST v3 bodies

use serde::{Deserialize, Serialize};

/// Body of `POST /user/repos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub private: bool,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub auto_init: bool,
    pub license_template: String,
}

impl CreateRepositoryRequest {
    /// Public, auto-initialised, MIT licensed, with issues, wiki and projects off
    pub fn public_mit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private: false,
            has_issues: false,
            has_projects: false,
            has_wiki: false,
            auto_init: true,
            license_template: "mit".to_string(),
        }
    }
}

/// Subset of the `GET /repos/{owner}/{repo}/contents/{path}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    pub sha: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64 encoded file content
    pub content: String,
    pub branch: String,
    /// Blob sha of the file being replaced; omitted when creating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Body of `POST /repos/{owner}/{repo}/pages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagesRequest {
    pub source: PagesSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagesSource {
    pub branch: String,
    pub path: String,
}

impl PagesRequest {
    /// Serve from the root of `branch`
    pub fn branch_root(branch: impl Into<String>) -> Self {
        Self {
            source: PagesSource {
                branch: branch.into(),
                path: "/".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_content_omits_missing_sha() {
        let body = PutContentRequest {
            message: "Add .nojekyll".to_string(),
            content: String::new(),
            branch: "main".to_string(),
            sha: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("sha").is_none());
        assert_eq!(value["branch"], "main");
    }

    #[test]
    fn test_create_repository_defaults() {
        let value = serde_json::to_value(CreateRepositoryRequest::public_mit("demo")).unwrap();
        assert_eq!(value["private"], false);
        assert_eq!(value["auto_init"], true);
        assert_eq!(value["license_template"], "mit");
        assert_eq!(value["has_wiki"], false);
    }

    #[test]
    fn test_content_response_ignores_extra_fields() {
        let raw = r#"{"sha":"abc123","path":"index.html","size":12,"type":"file","url":"x"}"#;
        let parsed: ContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.sha, "abc123");
    }
}
