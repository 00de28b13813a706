//! End-to-end deploy tests against the in-memory host

use std::sync::Arc;
use std::time::Duration;

use pagedrop::deploy::orchestrator::{DeployOptions, Deployer};
use pagedrop::errors::DeployError;
use pagedrop::models::request::{Attachment, DeployRequest};
use pagedrop::test_support::{data_url, FakeGenerator, FakeHost, HostCall};
use tokio_test::{assert_err, assert_ok};

const MARKUP: &str = "<!doctype html><title>todo</title>";

fn deployer(host: &Arc<FakeHost>, generator: &Arc<FakeGenerator>) -> Deployer {
    Deployer::new(
        host.clone(),
        generator.clone(),
        DeployOptions {
            settle_delay: Duration::ZERO,
        },
    )
}

fn fixtures() -> (Arc<FakeHost>, Arc<FakeGenerator>) {
    (
        Arc::new(FakeHost::new("octocat")),
        Arc::new(FakeGenerator::returning(MARKUP)),
    )
}

#[tokio::test]
async fn test_todo_app_publishes_three_files() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("Build a todo app", "A list with add and remove");

    let report = assert_ok!(deployer(&host, &generator).deploy(&request).await);

    assert_eq!(report.repository, "Build-a-todo-app");
    assert_eq!(
        report.result.pages_url,
        "https://octocat.github.io/Build-a-todo-app/"
    );
    assert_eq!(
        report.result.repo_url,
        "https://github.com/octocat/Build-a-todo-app"
    );
    assert_eq!(report.result.commit_sha, "main");
    assert_eq!(report.published, vec!["index.html", "README.md", ".nojekyll"]);
    assert!(report.skipped_attachments.is_empty());

    let puts: Vec<String> = host.puts().into_iter().map(|(path, _)| path).collect();
    assert_eq!(puts, vec!["index.html", "README.md", ".nojekyll"]);

    let index = host.file("Build-a-todo-app", "index.html").unwrap();
    assert_eq!(index.content, MARKUP.as_bytes());
    assert_eq!(index.message, "Update index.html");

    let readme = host.file("Build-a-todo-app", "README.md").unwrap();
    let readme = String::from_utf8(readme.content).unwrap();
    assert!(readme.contains("> A list with add and remove"));
    assert!(readme.contains("https://octocat.github.io/Build-a-todo-app/"));

    assert!(host.file("Build-a-todo-app", ".nojekyll").unwrap().content.is_empty());
    assert!(host.pages_enabled("Build-a-todo-app"));
}

#[tokio::test]
async fn test_steps_run_in_order() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("demo", "brief")
        .with_attachment(Attachment::new("hello.txt", data_url("text/plain", b"Hello")));

    assert_ok!(deployer(&host, &generator).deploy(&request).await);

    let calls = host.calls();
    let position = |wanted: &HostCall| calls.iter().position(|c| c == wanted).unwrap();
    let put = |path: &str| {
        calls
            .iter()
            .position(|c| matches!(c, HostCall::PutFile { path: p, .. } if p == path))
            .unwrap()
    };

    assert_eq!(calls[0], HostCall::GetRepository("demo".to_string()));
    assert!(matches!(calls[1], HostCall::CreateRepository(ref r) if r.name == "demo"));
    let pages = position(&HostCall::EnablePages("demo".to_string()));
    assert!(put("index.html") < put("README.md"));
    assert!(put("README.md") < put(".nojekyll"));
    assert!(put(".nojekyll") < pages);
    assert!(pages < put("hello.txt"));
}

#[tokio::test]
async fn test_inline_and_external_attachments() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("attachments demo", "brief")
        .with_attachment(Attachment::new(
            "hello.txt",
            "data:text/plain;base64,SGVsbG8=",
        ))
        .with_attachment(Attachment::new("logo.png", "https://example.com/logo.png"));

    let report = assert_ok!(deployer(&host, &generator).deploy(&request).await);

    let stored = host.file("attachments-demo", "hello.txt").unwrap();
    assert_eq!(stored.content, b"Hello");
    assert_eq!(stored.message, "Add hello.txt");
    assert!(host.file("attachments-demo", "logo.png").is_none());
    assert_eq!(report.skipped_attachments, vec!["logo.png"]);
    assert_eq!(report.published.len(), 4);

    // Both names reach the prompt even though only one is published
    let prompt = &generator.prompts()[0];
    assert!(prompt.contains("- hello.txt\n- logo.png\n"));
}

#[tokio::test]
async fn test_redeploy_updates_in_place() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("Build a todo app", "brief");
    let deployer = deployer(&host, &generator);

    assert_ok!(deployer.deploy(&request).await);
    let first_sha = host.file("Build-a-todo-app", "index.html").unwrap().sha;

    assert_ok!(deployer.deploy(&request).await);

    assert_eq!(host.create_calls(), 1);
    let puts = host.puts();
    assert_eq!(puts.len(), 6);
    assert!(puts[..3].iter().all(|(_, sha)| sha.is_none()));
    assert_eq!(puts[3], ("index.html".to_string(), Some(first_sha)));
    assert!(puts[3..].iter().all(|(_, sha)| sha.is_some()));
}

#[tokio::test]
async fn test_existing_repository_is_reused() {
    let host = Arc::new(FakeHost::new("octocat").with_repository("demo"));
    let generator = Arc::new(FakeGenerator::returning(MARKUP));

    assert_ok!(deployer(&host, &generator).deploy(&DeployRequest::new("demo", "")).await);
    assert_eq!(host.create_calls(), 0);
}

#[tokio::test]
async fn test_create_race_is_tolerated() {
    let host = Arc::new(FakeHost::new("octocat").with_create_status(422));
    let generator = Arc::new(FakeGenerator::returning(MARKUP));

    assert_ok!(deployer(&host, &generator).deploy(&DeployRequest::new("demo", "")).await);
}

#[tokio::test]
async fn test_publish_failure_stops_the_deploy() {
    let host = Arc::new(FakeHost::new("octocat").failing_on("README.md", 409));
    let generator = Arc::new(FakeGenerator::returning(MARKUP));

    let err = assert_err!(deployer(&host, &generator).deploy(&DeployRequest::new("demo", "")).await);

    assert!(matches!(err, DeployError::PublishError { ref path, .. } if path == "README.md"));
    // index.html stays behind, nothing after the failure ran
    assert!(host.file("demo", "index.html").is_some());
    assert!(host.file("demo", ".nojekyll").is_none());
    assert!(!host.pages_enabled("demo"));
}

#[tokio::test]
async fn test_generation_failure_publishes_nothing() {
    let host = Arc::new(FakeHost::new("octocat"));
    let generator = Arc::new(FakeGenerator::failing("model overloaded"));

    let err = assert_err!(deployer(&host, &generator).deploy(&DeployRequest::new("demo", "")).await);

    assert!(matches!(err, DeployError::GenerationError(_)));
    assert!(host.has_repository("demo"));
    assert!(host.puts().is_empty());
}

#[tokio::test]
async fn test_activation_failure_is_fatal() {
    let host = Arc::new(FakeHost::new("octocat").with_pages_status(403));
    let generator = Arc::new(FakeGenerator::returning(MARKUP));
    let request = DeployRequest::new("demo", "")
        .with_attachment(Attachment::new("a.txt", data_url("text/plain", b"a")));

    let err = assert_err!(deployer(&host, &generator).deploy(&request).await);

    assert!(matches!(err, DeployError::ActivationError { .. }));
    assert!(host.file("demo", "a.txt").is_none());
}

#[tokio::test]
async fn test_malformed_data_url_is_fatal() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("demo", "")
        .with_attachment(Attachment::new("broken.bin", "data:application/octet-stream;base64,%%%"));

    let err = assert_err!(deployer(&host, &generator).deploy(&request).await);
    assert!(matches!(err, DeployError::AttachmentError { ref name, .. } if name == "broken.bin"));
}

#[tokio::test]
async fn test_empty_task_is_rejected() {
    let (host, generator) = fixtures();

    let err = assert_err!(deployer(&host, &generator).deploy(&DeployRequest::new("", "")).await);

    assert!(matches!(err, DeployError::ValidationError(_)));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_blank_task_still_deploys() {
    let (host, generator) = fixtures();

    let report = assert_ok!(deployer(&host, &generator).deploy(&DeployRequest::new("  ", "")).await);

    assert_eq!(report.repository, "-");
    assert!(host.file("-", "index.html").is_some());
}

#[tokio::test]
async fn test_percent_encoded_attachment_is_published() {
    let (host, generator) = fixtures();
    let request = DeployRequest::new("demo", "")
        .with_attachment(Attachment::new("note.txt", "data:text/plain,Hello%20World"));

    let report = assert_ok!(deployer(&host, &generator).deploy(&request).await);

    assert!(report.published.contains(&"note.txt".to_string()));
    assert_eq!(host.file("demo", "note.txt").unwrap().content, b"Hello World");
}

#[tokio::test]
async fn test_first_deploy_over_existing_files() {
    let host = Arc::new(
        FakeHost::new("octocat")
            .with_repository("demo")
            .with_file("demo", "index.html", b"<p>old</p>")
            .with_file("demo", "README.md", b"# old"),
    );
    let generator = Arc::new(FakeGenerator::returning(MARKUP));

    assert_ok!(deployer(&host, &generator).deploy(&DeployRequest::new("demo", "")).await);

    let puts = host.puts();
    assert_eq!(puts[0], ("index.html".to_string(), Some("sha-1".to_string())));
    assert_eq!(puts[1], ("README.md".to_string(), Some("sha-2".to_string())));
    assert_eq!(puts[2], (".nojekyll".to_string(), None));
    assert_eq!(host.file("demo", "index.html").unwrap().content, MARKUP.as_bytes());
}
