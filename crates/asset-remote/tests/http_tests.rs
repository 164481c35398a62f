//! Tests for the HTTP clients against a local one-shot server

use std::time::Duration;

use asset_core::{Credential, FetchError, Fetcher, RenderError, RenderRequest, Renderer};
use asset_remote::{GitLabRenderer, HttpFetcher};
use asset_test_utils::http::{serve_once, serve_stalled, serve_with};
use asset_test_utils::tree::SkillTree;
use pretty_assertions::assert_eq;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5)).unwrap()
}

fn renderer(base: &str) -> GitLabRenderer {
    GitLabRenderer::new(base, Duration::from_secs(5)).unwrap()
}

fn request(text: &str) -> RenderRequest {
    RenderRequest {
        text: text.to_string(),
        project: None,
    }
}

#[test]
fn test_fetch_returns_body() {
    let (url, server) = serve_with(200, "text/markdown", "# Page\n");
    let content = fetcher().fetch(&format!("{url}/docs/page.md")).unwrap();

    assert_eq!(content, "# Page\n");
    assert!(server.join().unwrap().starts_with("GET /docs/page.md "));
}

#[test]
fn test_fetch_maps_status_codes() {
    let (url, _server) = serve_once(404, "");
    assert!(matches!(
        fetcher().fetch(&format!("{url}/missing.md")),
        Err(FetchError::NotFound(_))
    ));

    let (url, _server) = serve_once(503, "");
    assert_eq!(
        fetcher().fetch(&format!("{url}/busy.md")),
        Err(FetchError::Http { status: 503 })
    );
}

#[test]
fn test_fetch_timeout_is_distinct() {
    let (url, _server) = serve_stalled(Duration::from_secs(3));
    let fetcher = HttpFetcher::new(Duration::from_millis(300)).unwrap();

    assert!(matches!(
        fetcher.fetch(&format!("{url}/slow.md")),
        Err(FetchError::Timeout { .. })
    ));
}

#[test]
fn test_fetch_reads_file_urls() {
    let tree = SkillTree::new();
    tree.file("upstream/page.md", "# Local\n");

    assert_eq!(
        fetcher().fetch(&tree.file_url("upstream/page.md")).unwrap(),
        "# Local\n"
    );
    assert!(matches!(
        fetcher().fetch(&tree.file_url("upstream/absent.md")),
        Err(FetchError::NotFound(_))
    ));
}

#[test]
fn test_fetch_rejects_unknown_scheme() {
    assert!(matches!(
        fetcher().fetch("ftp://example.com/page.md"),
        Err(FetchError::Transport(_))
    ));
}

#[test]
fn test_render_sends_token_and_body() {
    let (url, server) = serve_once(201, r#"{"html":"<h1>Hi</h1>"}"#);
    let credential = Credential::new("glpat-test");
    let request = RenderRequest {
        text: "# Hi".to_string(),
        project: Some("group/proj".to_string()),
    };

    let html = renderer(&url).render(&credential, &request).unwrap();
    let raw = server.join().unwrap();

    assert_eq!(html, "<h1>Hi</h1>");
    assert!(raw.starts_with("POST /api/v4/markdown "));
    assert!(raw.to_ascii_lowercase().contains("private-token: glpat-test"));
    assert!(raw.contains(r##""text":"# Hi""##));
    assert!(raw.contains(r#""gfm":true"#));
    assert!(raw.contains(r#""project":"group/proj""#));
}

#[test]
fn test_render_http_error_carries_body() {
    let (url, _server) = serve_once(401, r#"{"message":"401 Unauthorized"}"#);
    let err = renderer(&url)
        .render(&Credential::new("bad"), &request("x"))
        .unwrap_err();

    assert_eq!(
        err,
        RenderError::Http {
            status: 401,
            body: r#"{"message":"401 Unauthorized"}"#.to_string(),
        }
    );
}

#[test]
fn test_render_error_field_is_invalid_response() {
    let (url, _server) = serve_once(200, r#"{"error":"text is missing"}"#);
    let err = renderer(&url)
        .render(&Credential::new("t"), &request("x"))
        .unwrap_err();
    assert_eq!(err, RenderError::InvalidResponse("text is missing".to_string()));
}

#[test]
fn test_render_without_html_is_invalid_response() {
    let (url, _server) = serve_once(200, r#"{"unexpected":true}"#);
    assert!(matches!(
        renderer(&url).render(&Credential::new("t"), &request("x")),
        Err(RenderError::InvalidResponse(_))
    ));

    let (url, _server) = serve_with(200, "text/html", "<html>login</html>");
    assert!(matches!(
        renderer(&url).render(&Credential::new("t"), &request("x")),
        Err(RenderError::InvalidResponse(_))
    ));
}

#[test]
fn test_render_timeout_is_distinct() {
    let (url, _server) = serve_stalled(Duration::from_secs(3));
    let renderer = GitLabRenderer::new(&url, Duration::from_millis(300)).unwrap();

    assert!(matches!(
        renderer.render(&Credential::new("t"), &request("x")),
        Err(RenderError::Timeout { .. })
    ));
}
