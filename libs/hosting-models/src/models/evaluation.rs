//! Evaluation callback body

use serde::{Deserialize, Serialize};

/// Posted to the evaluator once a deploy has finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvaluationPayload {
    pub email: String,
    pub task: String,
    pub round: u32,
    pub nonce: String,
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}
