use std::time::Duration;

use git_context_engine::{
    GitContextEngineError, GitLabClient, HttpTimeouts, ProviderConfig, RawFileSource,
    TransportError, fetch_resolved_diffs, parse_merge_request_url,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const TOKEN: &str = "test-token";

fn client_for(server: &ServerGuard, mr_url: &str) -> (GitLabClient, git_context_engine::MergeRequestRef) {
    let parsed = parse_merge_request_url(mr_url).expect("valid url");
    assert_eq!(parsed.api_root, format!("{}/api/v4", server.url()));
    let cfg = ProviderConfig::new(parsed.api_root, TOKEN, HttpTimeouts::default()).unwrap();
    (GitLabClient::new(cfg).unwrap(), parsed.reference)
}

fn project_path_re(rest: &str) -> Matcher {
    Matcher::Regex(format!(r"^/api/v4/projects/group(%2F|/)proj{rest}$"))
}

async fn mock_meta(server: &mut ServerGuard, body: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", project_path_re("/merge_requests/7"))
        .match_header("PRIVATE-TOKEN", TOKEN)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_changes(server: &mut ServerGuard, changes: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", project_path_re("/merge_requests/7/changes"))
        .match_header("PRIVATE-TOKEN", TOKEN)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "changes": changes }).to_string())
        .create_async()
        .await
}

async fn mock_raw(
    server: &mut ServerGuard,
    file: &str,
    git_ref: &str,
    status: usize,
    body: &[u8],
) -> mockito::Mock {
    server
        .mock(
            "GET",
            project_path_re(&format!("/repository/files/{}/raw", regex_escape(file))),
        )
        .match_query(Matcher::UrlEncoded("ref".into(), git_ref.into()))
        .match_header("PRIVATE-TOKEN", TOKEN)
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

fn regex_escape(s: &str) -> String {
    s.replace('.', r"\.")
}

#[tokio::test]
async fn overflowed_file_is_rebuilt_from_raw_contents() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = mock_meta(
        &mut server,
        json!({ "iid": 7, "diff_refs": { "base_sha": "aaa", "head_sha": "bbb", "start_sha": "aaa" } }),
    )
    .await;
    let _changes = mock_changes(
        &mut server,
        json!([{
            "old_path": "f.py",
            "new_path": "f.py",
            "new_file": false,
            "deleted_file": false,
            "diff": null
        }]),
    )
    .await;
    let base = mock_raw(&mut server, "f.py", "aaa", 200, b"x=1\n").await;
    let head = mock_raw(&mut server, "f.py", "bbb", 200, b"x=2\n").await;

    let diffs = fetch_resolved_diffs(&client, &mr).await.unwrap();

    base.assert_async().await;
    head.assert_async().await;
    assert_eq!(diffs.len(), 1);
    let d = &diffs[0];
    assert!(d.was_generated());
    assert!(!d.is_binary());
    assert_eq!(d.old_path(), Some("f.py"));
    assert_eq!(d.new_path(), Some("f.py"));
    assert!(d.diff_text().lines().any(|l| l == "-x=1"));
    assert!(d.diff_text().lines().any(|l| l == "+x=2"));
}

#[tokio::test]
async fn complete_server_diff_needs_no_raw_fetch() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = mock_meta(
        &mut server,
        json!({ "diff_refs": { "base_sha": "aaa", "head_sha": "bbb" } }),
    )
    .await;
    let _changes = mock_changes(
        &mut server,
        json!([{ "old_path": "a.rs", "new_path": "a.rs", "diff": "@@ -1 +1 @@\n-a\n+b\n" }]),
    )
    .await;
    let raw = server
        .mock("GET", Matcher::Regex(r"/raw".into()))
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let diffs = fetch_resolved_diffs(&client, &mr).await.unwrap();

    raw.assert_async().await;
    assert_eq!(diffs[0].diff_text(), "@@ -1 +1 @@\n-a\n+b\n");
    assert!(!diffs[0].was_generated());
}

#[tokio::test]
async fn not_found_and_binary_content_become_binary_marker() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = mock_meta(
        &mut server,
        json!({ "diff_refs": { "base_sha": "aaa", "head_sha": "bbb" } }),
    )
    .await;
    let _changes = mock_changes(
        &mut server,
        json!([{ "old_path": "logo.png", "new_path": "logo.png", "too_large": true }]),
    )
    .await;
    let _base = mock_raw(&mut server, "logo.png", "aaa", 404, b"").await;
    let _head = mock_raw(&mut server, "logo.png", "bbb", 200, b"\x89PNG\x00\x00").await;

    let diffs = fetch_resolved_diffs(&client, &mr).await.unwrap();

    assert!(diffs[0].is_binary());
    assert_eq!(diffs[0].diff_text(), "");
    assert!(!diffs[0].was_generated());
}

#[tokio::test]
async fn raw_fetch_server_error_aborts_run() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = mock_meta(
        &mut server,
        json!({ "diff_refs": { "base_sha": "aaa", "head_sha": "bbb" } }),
    )
    .await;
    let _changes = mock_changes(
        &mut server,
        json!([{ "old_path": "f.py", "new_path": "f.py", "overflow": true, "diff": "" }]),
    )
    .await;
    let _base = mock_raw(&mut server, "f.py", "aaa", 500, b"boom").await;

    let err = fetch_resolved_diffs(&client, &mr).await.unwrap_err();
    assert!(matches!(
        err,
        GitContextEngineError::Transport(TransportError::Server(500))
    ));
}

#[tokio::test]
async fn missing_diff_refs_is_invalid_response() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = mock_meta(&mut server, json!({ "iid": 7, "diff_refs": null })).await;

    let err = client.get_diff_refs(&mr).await.unwrap_err();
    assert!(matches!(
        err,
        GitContextEngineError::Transport(TransportError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn unauthorized_metadata_is_transport_error() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, mr) = client_for(&server, &url);

    let _meta = server
        .mock("GET", project_path_re("/merge_requests/7"))
        .with_status(401)
        .create_async()
        .await;

    let err = client.get_diff_refs(&mr).await.unwrap_err();
    assert!(matches!(
        err,
        GitContextEngineError::Transport(TransportError::Unauthorized)
    ));
}

#[tokio::test]
async fn latin1_file_is_decoded() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, _mr) = client_for(&server, &url);

    let _raw = mock_raw(&mut server, "legacy.txt", "bbb", 200, b"caf\xe9\n").await;

    let text = client
        .fetch_text("group/proj", "bbb", "legacy.txt")
        .await
        .unwrap();
    assert_eq!(text.as_deref(), Some("café\n"));
}

#[tokio::test]
async fn nested_file_path_is_percent_encoded() {
    let mut server = Server::new_async().await;
    let url = format!("{}/group/proj/-/merge_requests/7", server.url());
    let (client, _mr) = client_for(&server, &url);

    let raw = server
        .mock("GET", project_path_re(r"/repository/files/src%2Fa\.py/raw"))
        .match_query(Matcher::UrlEncoded("ref".into(), "bbb".into()))
        .match_header("PRIVATE-TOKEN", TOKEN)
        .with_status(200)
        .with_body("print(1)\n")
        .create_async()
        .await;

    let text = client.fetch_text("group/proj", "bbb", "src/a.py").await.unwrap();

    raw.assert_async().await;
    assert_eq!(text.as_deref(), Some("print(1)\n"));
}

#[tokio::test]
async fn stalled_server_is_timeout_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let timeouts = HttpTimeouts {
        meta: Duration::from_millis(200),
        changes: Duration::from_millis(200),
        raw_file: Duration::from_millis(200),
    };
    let cfg = ProviderConfig::new(format!("http://{addr}/api/v4"), TOKEN, timeouts).unwrap();
    let client = GitLabClient::new(cfg).unwrap();

    let err = client
        .fetch_text("group/proj", "bbb", "f.py")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GitContextEngineError::Transport(TransportError::Timeout)
    ));
}
