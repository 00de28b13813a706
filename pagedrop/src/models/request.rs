//! Incoming deploy request

use serde::{Deserialize, Serialize};

fn default_round() -> u32 {
    1
}

fn default_attachment_name() -> String {
    "attachment.bin".to_string()
}

/// A file supplied with the task, either inline (`data:` URL) or by reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// File name inside the repository
    #[serde(default = "default_attachment_name")]
    pub name: String,

    /// `data:<mime>;base64,<payload>` or an external URL
    #[serde(default)]
    pub url: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Whether the bytes are embedded in the request
    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }
}

/// A request to build and publish one app
#[derive(Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    pub email: String,

    /// Shared secret checked by the front door
    #[serde(default, skip_serializing)]
    pub secret: String,

    /// Free-text task label, source of the repository name
    pub task: String,

    pub nonce: String,

    #[serde(default)]
    pub brief: String,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    pub evaluation_url: String,

    #[serde(default = "default_round")]
    pub round: u32,
}

impl DeployRequest {
    /// Minimal request, mostly useful in tests and tooling
    pub fn new(task: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            email: String::new(),
            secret: String::new(),
            task: task.into(),
            nonce: String::new(),
            brief: brief.into(),
            attachments: Vec::new(),
            evaluation_url: String::new(),
            round: default_round(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl std::fmt::Debug for DeployRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployRequest")
            .field("email", &self.email)
            .field("task", &self.task)
            .field("nonce", &self.nonce)
            .field("round", &self.round)
            .field("attachments", &self.attachments.len())
            .field("evaluation_url", &self.evaluation_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_payload() {
        let raw = r#"{
            "email": "student@example.com",
            "secret": "s3cret",
            "task": "Build a todo app",
            "nonce": "n-1",
            "evaluation_url": "https://eval.example.com/notify",
            "attachments": [{"url": "https://example.com/a.png"}]
        }"#;
        let request: DeployRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.round, 1);
        assert_eq!(request.brief, "");
        assert_eq!(request.attachments[0].name, "attachment.bin");
        assert!(!request.attachments[0].is_inline());
    }

    #[test]
    fn test_debug_hides_secret() {
        let mut request = DeployRequest::new("t", "b");
        request.secret = "hunter2".to_string();
        assert!(!format!("{request:?}").contains("hunter2"));
        assert!(serde_json::to_value(&request).unwrap().get("secret").is_none());
    }
}
