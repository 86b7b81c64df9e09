#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end synchronization against a mock registry over HTTP.

use {
    skillsync_config::SkillsyncConfig,
    skillsync_registry::{FailureReason, LocalVersionStore, Synchronizer, integrity},
};

const REVIEW: &str = "---\nname: review\ndescription: Review a pull request\n---\nRead the diff.\n";
const DEPLOY: &str = "---\nname: deploy\ndescription: Ship a release\n---\nTag and push.\n";
const LINT: &str = "---\nname: lint\ndescription: Run linters\n---\ncargo clippy\n";

fn config_for(server: &mockito::Server) -> SkillsyncConfig {
    let mut config = SkillsyncConfig::default();
    config.registry.manifest_url = format!("{}/manifest.json", server.url());
    config.registry.base_url = format!("{}/files/", server.url());
    config.registry.timeout_secs = 5;
    config
}

fn manifest_body(version: &str, files: &[(&str, String)]) -> String {
    let files: Vec<_> = files
        .iter()
        .map(|(path, sha)| serde_json::json!({"path": path, "sha256": sha}))
        .collect();
    serde_json::json!({
        "name": "agent-skills",
        "version": version,
        "releaseDate": "2026-10-01",
        "repository": "https://github.com/example/agent-skills",
        "files": files,
    })
    .to_string()
}

async fn serve_file(server: &mut mockito::Server, path: &str, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", format!("/files/{path}").as_str())
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn installs_release_then_short_circuits() {
    let mut server = mockito::Server::new_async().await;
    let tmp = tempfile::tempdir().unwrap();

    let _manifest = server
        .mock("GET", "/manifest.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(manifest_body("1.2.0", &[
            ("review/SKILL.md", integrity::digest(REVIEW.as_bytes())),
            ("deploy/SKILL.md", integrity::digest(DEPLOY.as_bytes())),
            ("lint/SKILL.md", integrity::digest(LINT.as_bytes())),
        ]))
        .expect(2)
        .create_async()
        .await;
    let review = serve_file(&mut server, "review/SKILL.md", 200, REVIEW).await;
    let deploy = serve_file(&mut server, "deploy/SKILL.md", 200, DEPLOY).await;
    let lint = serve_file(&mut server, "lint/SKILL.md", 200, LINT).await;

    let sync = Synchronizer::from_config(&config_for(&server), tmp.path().to_path_buf()).unwrap();

    let report = sync.synchronize().await.unwrap();
    assert_eq!(report.version_before, None);
    assert_eq!(report.version_after, "1.2.0");
    assert_eq!(report.succeeded().count(), 3);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("lint/SKILL.md")).unwrap(),
        LINT
    );
    assert_eq!(
        LocalVersionStore::in_target(tmp.path()).read().as_deref(),
        Some("1.2.0")
    );

    // Second pass: manifest fetched again, no further file requests.
    let again = sync.synchronize().await.unwrap();
    assert!(again.is_up_to_date());

    review.assert_async().await;
    deploy.assert_async().await;
    lint.assert_async().await;
}

#[tokio::test]
async fn partial_failure_reports_each_path() {
    let mut server = mockito::Server::new_async().await;
    let tmp = tempfile::tempdir().unwrap();

    let _manifest = server
        .mock("GET", "/manifest.json")
        .with_status(200)
        .with_body(manifest_body("2.0.0", &[
            ("review/SKILL.md", integrity::digest(REVIEW.as_bytes())),
            ("deploy/SKILL.md", integrity::digest(DEPLOY.as_bytes())),
            ("lint/SKILL.md", integrity::digest(LINT.as_bytes())),
        ]))
        .create_async()
        .await;
    let _review = serve_file(&mut server, "review/SKILL.md", 200, REVIEW).await;
    let _deploy = serve_file(&mut server, "deploy/SKILL.md", 404, "not found").await;
    let _lint = serve_file(&mut server, "lint/SKILL.md", 200, "tampered content").await;

    let sync = Synchronizer::from_config(&config_for(&server), tmp.path().to_path_buf()).unwrap();
    let report = sync.synchronize().await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.succeeded().count(), 1);

    let reason = |path: &str| {
        report
            .outcomes
            .iter()
            .find(|o| o.path == path)
            .and_then(|o| o.failure_reason)
    };
    assert_eq!(reason("review/SKILL.md"), None);
    assert_eq!(reason("deploy/SKILL.md"), Some(FailureReason::HttpError));
    assert_eq!(reason("lint/SKILL.md"), Some(FailureReason::HashMismatch));

    assert!(tmp.path().join("review/SKILL.md").exists());
    assert!(!tmp.path().join("deploy/SKILL.md").exists());
    assert!(!tmp.path().join("lint/SKILL.md").exists());
    assert_eq!(report.version_after, "2.0.0");
}

#[tokio::test]
async fn unreachable_manifest_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let tmp = tempfile::tempdir().unwrap();
    let _manifest = server
        .mock("GET", "/manifest.json")
        .with_status(500)
        .create_async()
        .await;

    let sync = Synchronizer::from_config(&config_for(&server), tmp.path().to_path_buf()).unwrap();
    let err = sync.synchronize().await.unwrap_err();
    assert!(matches!(
        err,
        skillsync_registry::SyncError::UnreachableRegistry { .. }
    ));
    assert_eq!(LocalVersionStore::in_target(tmp.path()).read(), None);
}
