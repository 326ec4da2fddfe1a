//! Integration tests for the GitHub-backed template host against a mock
//! server.

use std::sync::Arc;

use mockito::{Matcher, ServerGuard};
use taskbeacon_mcp::{BridgeError, CatalogService, Config, GithubConfig, GithubHost, TemplateHost};

fn config_for(server: &ServerGuard) -> Config {
    Config {
        github: GithubConfig {
            api_base_url: server.url(),
            raw_base_url: server.url(),
            ..GithubConfig::default()
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn catalog_preserves_hosting_api_order() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/orgs/TaskBeacon/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name":"zzz-task"},{"name":"aaa-task"},{"name":"mmm-task"}]"#)
        .create_async()
        .await;

    let host = GithubHost::new(&config_for(&server)).unwrap();
    let names = host.list_repo_names().await.unwrap();
    assert_eq!(names, vec!["zzz-task", "aaa-task", "mmm-task"]);
}

#[tokio::test]
async fn non_success_catalog_response_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/orgs/TaskBeacon/repos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let host = GithubHost::new(&config_for(&server)).unwrap();
    let err = host.list_repo_names().await.unwrap_err();
    assert!(matches!(err, BridgeError::RemoteService { status: 500, .. }));
}

#[tokio::test]
async fn branches_are_truncated_to_the_configured_cap() {
    let mut server = mockito::Server::new_async().await;
    let body: Vec<String> = (0..12).map(|i| format!(r#"{{"name":"b{i}"}}"#)).collect();
    // The request asks for exactly the branch cap; an unmatched query
    // would degrade to empty and fail the length assertion below.
    let _m = server
        .mock("GET", "/repos/TaskBeacon/stroop-task/branches")
        .match_query(Matcher::UrlEncoded("per_page".into(), "10".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", body.join(",")))
        .create_async()
        .await;

    let host = GithubHost::new(&config_for(&server)).unwrap();
    let branches = host.list_branches("stroop-task").await;
    assert_eq!(branches.len(), 10);
    assert_eq!(branches[0], "b0");
    assert_eq!(branches[9], "b9");
}

#[tokio::test]
async fn failed_branch_listing_degrades_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/TaskBeacon/stroop-task/branches")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let host = GithubHost::new(&config_for(&server)).unwrap();
    assert!(host.list_branches("stroop-task").await.is_empty());
}

#[tokio::test]
async fn readme_fetch_uses_the_default_branch() {
    let mut server = mockito::Server::new_async().await;
    let _found = server
        .mock("GET", "/TaskBeacon/stroop-task/main/README.md")
        .with_status(200)
        .with_body("# Stroop\nA color-word task")
        .create_async()
        .await;

    let host = GithubHost::new(&config_for(&server)).unwrap();
    assert_eq!(
        host.fetch_readme("stroop-task").await.as_deref(),
        Some("# Stroop\nA color-word task")
    );
    // No mock registered for this repo: 501 from mockito, degraded to None
    assert_eq!(host.fetch_readme("gonogo-task").await, None);
}

#[tokio::test]
async fn excluded_repos_never_reach_the_catalog() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/orgs/TaskBeacon/repos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"name":"stroop-task"},{"name":"task-registry"},{"name":"gonogo-task"},{"name":".github"},{"name":"taskbeacon.github.io"}]"#,
        )
        .create_async()
        .await;

    let config = config_for(&server);
    let host = Arc::new(GithubHost::new(&config).unwrap());
    let catalog = CatalogService::new(host, &config);

    let repos = catalog.task_repos().await.unwrap();
    assert_eq!(repos, vec!["stroop-task", "gonogo-task"]);
}
