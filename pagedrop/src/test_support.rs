//! In-memory stand-ins for the remote APIs, for tests only.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use hosting_models::{CreateRepositoryRequest, EvaluationPayload, PagesRequest, PutContentRequest};
use serde_json::json;

use crate::errors::DeployError;
use crate::http::client::ApiResponse;
use crate::http::evaluation::EvaluationTransport;
use crate::http::gemini::TextGenerator;
use crate::http::github::HostingApi;

/// One call made against [`FakeHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    GetRepository(String),
    CreateRepository(CreateRepositoryRequest),
    GetFile { repo: String, path: String },
    PutFile { repo: String, path: String, sha: Option<String> },
    EnablePages(String),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content: Vec<u8>,
    pub sha: String,
    pub message: String,
}

#[derive(Default)]
struct HostState {
    repos: HashSet<String>,
    pages: HashSet<String>,
    files: HashMap<(String, String), StoredFile>,
    calls: Vec<HostCall>,
    revision: u64,
    create_status: Option<u16>,
    pages_status: Option<u16>,
    failing_path: Option<(String, u16)>,
}

/// Behaves like the GitHub endpoints the pipeline uses: 404 for missing
/// things, 422 on duplicate repositories, 409 on stale file shas and on a
/// second Pages activation.
pub struct FakeHost {
    owner: String,
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            state: Mutex::new(HostState::default()),
        }
    }

    pub fn with_repository(self, repo: &str) -> Self {
        self.state.lock().unwrap().repos.insert(repo.to_string());
        self
    }

    /// Seed an existing file. Shas are handed out as `sha-1`, `sha-2`, ...
    pub fn with_file(self, repo: &str, path: &str, content: &[u8]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.revision += 1;
            let sha = format!("sha-{}", state.revision);
            state.files.insert(
                (repo.to_string(), path.to_string()),
                StoredFile {
                    content: content.to_vec(),
                    sha,
                    message: "seed".to_string(),
                },
            );
        }
        self
    }

    /// Answer every repository create with `status`
    pub fn with_create_status(self, status: u16) -> Self {
        self.state.lock().unwrap().create_status = Some(status);
        self
    }

    /// Answer every Pages activation with `status`
    pub fn with_pages_status(self, status: u16) -> Self {
        self.state.lock().unwrap().pages_status = Some(status);
        self
    }

    /// Reject every write to `path` with `status`
    pub fn failing_on(self, path: &str, status: u16) -> Self {
        self.state.lock().unwrap().failing_path = Some((path.to_string(), status));
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, HostCall::CreateRepository(_)))
            .count()
    }

    /// Paths written, in order
    pub fn puts(&self) -> Vec<(String, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::PutFile { path, sha, .. } => Some((path, sha)),
                _ => None,
            })
            .collect()
    }

    pub fn file(&self, repo: &str, path: &str) -> Option<StoredFile> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
    }

    pub fn has_repository(&self, repo: &str) -> bool {
        self.state.lock().unwrap().repos.contains(repo)
    }

    pub fn pages_enabled(&self, repo: &str) -> bool {
        self.state.lock().unwrap().pages.contains(repo)
    }
}

#[async_trait]
impl HostingApi for FakeHost {
    fn owner(&self) -> &str {
        &self.owner
    }

    async fn get_repository(&self, repo: &str) -> Result<ApiResponse, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::GetRepository(repo.to_string()));
        if state.repos.contains(repo) {
            Ok(ApiResponse::new(200, json!({ "name": repo }).to_string()))
        } else {
            Ok(ApiResponse::new(404, r#"{"message":"Not Found"}"#))
        }
    }

    async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<ApiResponse, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::CreateRepository(request.clone()));
        if let Some(status) = state.create_status {
            if status == 201 {
                state.repos.insert(request.name.clone());
            }
            return Ok(ApiResponse::new(status, r#"{"message":"scripted"}"#));
        }
        if !state.repos.insert(request.name.clone()) {
            return Ok(ApiResponse::new(
                422,
                r#"{"message":"Repository creation failed.","errors":[{"message":"name already exists on this account"}]}"#,
            ));
        }
        Ok(ApiResponse::new(201, json!({ "name": request.name }).to_string()))
    }

    async fn get_file(&self, repo: &str, path: &str) -> Result<ApiResponse, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::GetFile {
            repo: repo.to_string(),
            path: path.to_string(),
        });
        match state.files.get(&(repo.to_string(), path.to_string())) {
            Some(file) => Ok(ApiResponse::new(
                200,
                json!({ "sha": file.sha, "path": path, "size": file.content.len() }).to_string(),
            )),
            None => Ok(ApiResponse::new(404, r#"{"message":"Not Found"}"#)),
        }
    }

    async fn put_file(
        &self,
        repo: &str,
        path: &str,
        body: &PutContentRequest,
    ) -> Result<ApiResponse, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::PutFile {
            repo: repo.to_string(),
            path: path.to_string(),
            sha: body.sha.clone(),
        });

        if let Some((failing, status)) = &state.failing_path {
            if failing == path {
                return Ok(ApiResponse::new(*status, r#"{"message":"scripted failure"}"#));
            }
        }

        let key = (repo.to_string(), path.to_string());
        let existing = state.files.get(&key).map(|f| f.sha.clone());
        match (existing, body.sha.as_deref()) {
            (Some(_), None) => {
                return Ok(ApiResponse::new(
                    422,
                    r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#,
                ));
            }
            (Some(current), Some(given)) if current != given => {
                return Ok(ApiResponse::new(409, r#"{"message":"does not match"}"#));
            }
            _ => {}
        }

        let content = match STANDARD.decode(&body.content) {
            Ok(content) => content,
            Err(_) => return Ok(ApiResponse::new(422, r#"{"message":"content is not valid Base64"}"#)),
        };

        state.revision += 1;
        let sha = format!("sha-{}", state.revision);
        let created = state
            .files
            .insert(
                key,
                StoredFile {
                    content,
                    sha: sha.clone(),
                    message: body.message.clone(),
                },
            )
            .is_none();

        let status = if created { 201 } else { 200 };
        Ok(ApiResponse::new(status, json!({ "content": { "sha": sha } }).to_string()))
    }

    async fn enable_pages(
        &self,
        repo: &str,
        _body: &PagesRequest,
    ) -> Result<ApiResponse, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::EnablePages(repo.to_string()));
        if let Some(status) = state.pages_status {
            return Ok(ApiResponse::new(status, r#"{"message":"scripted"}"#));
        }
        if state.pages.insert(repo.to_string()) {
            Ok(ApiResponse::new(201, r#"{"status":"queued"}"#))
        } else {
            Ok(ApiResponse::new(
                409,
                r#"{"message":"GitHub Pages is already enabled."}"#,
            ))
        }
    }
}

/// Returns fixed markup and remembers every prompt
pub struct FakeGenerator {
    markup: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn returning(markup: &str) -> Self {
        Self {
            markup: Ok(markup.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            markup: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DeployError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.markup
            .clone()
            .map_err(DeployError::GenerationError)
    }
}

/// Plays back scripted outcomes; once the script runs out, every further
/// call answers with the fallback.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<u16, String>>>,
    fallback: Result<u16, String>,
    calls: Mutex<Vec<(String, EvaluationPayload)>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<u16, String>>, fallback: Result<u16, String>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Never succeeds
    pub fn always_failing() -> Self {
        Self::new(Vec::new(), Err("connection refused".to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, EvaluationPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EvaluationTransport for ScriptedTransport {
    async fn post(&self, url: &str, payload: &EvaluationPayload) -> Result<u16, DeployError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(DeployError::Internal)
    }
}

/// Records requested sleeps instead of waiting
#[derive(Default)]
pub struct SleepRecorder {
    sleeps: Mutex<Vec<Duration>>,
}

impl SleepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleep(&self, duration: Duration) -> std::future::Ready<()> {
        self.sleeps.lock().unwrap().push(duration);
        std::future::ready(())
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

/// `data:` URL carrying `bytes`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
