//! Tests for render validation

use std::cell::RefCell;

use asset_core::{
    Credential, RenderError, RenderInput, RenderRequest, RenderValidator, Renderer,
};
use asset_test_utils::tree::SkillTree;
use pretty_assertions::assert_eq;

/// Echoes the request as HTML, or fails with a canned error.
#[derive(Default)]
struct FakeRenderer {
    error: Option<RenderError>,
    requests: RefCell<Vec<RenderRequest>>,
    tokens: RefCell<Vec<String>>,
}

impl Renderer for FakeRenderer {
    fn render(
        &self,
        credential: &Credential,
        request: &RenderRequest,
    ) -> Result<String, RenderError> {
        self.requests.borrow_mut().push(request.clone());
        self.tokens.borrow_mut().push(credential.expose().to_string());
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(format!("<p>{}</p>", request.text.trim())),
        }
    }
}

#[test]
fn test_missing_credential_fails_before_any_request() {
    let renderer = FakeRenderer::default();
    let validator = RenderValidator::new(&renderer);

    let err = validator
        .validate(None, &RenderInput::Inline("# Hi".to_string()), None)
        .unwrap_err();

    assert!(err.is_missing_credential());
    assert!(renderer.requests.borrow().is_empty());
}

#[test]
fn test_missing_credential_wins_over_unreadable_input() {
    let validator = RenderValidator::new(FakeRenderer::default());
    let err = validator
        .validate(None, &RenderInput::File("/no/such/file.md".into()), None)
        .unwrap_err();
    assert!(err.is_missing_credential());
}

#[test]
fn test_inline_round_trip() {
    let renderer = FakeRenderer::default();
    let credential = Credential::new("token-123");

    let result = RenderValidator::new(&renderer)
        .validate(
            Some(&credential),
            &RenderInput::Inline("hello".to_string()),
            Some("group/project"),
        )
        .unwrap();

    assert_eq!(result.rendered_output, "<p>hello</p>");
    assert_eq!(result.input_len, 5);
    assert_eq!(
        renderer.requests.borrow()[0],
        RenderRequest {
            text: "hello".to_string(),
            project: Some("group/project".to_string()),
        }
    );
    assert_eq!(renderer.tokens.borrow()[0], "token-123");
}

#[test]
fn test_file_input_and_persisted_output() {
    let tree = SkillTree::new();
    let input = tree.file("doc.md", "from file\n");
    let credential = Credential::new("t");

    let result = RenderValidator::new(FakeRenderer::default())
        .validate(Some(&credential), &RenderInput::File(input), None)
        .unwrap();
    result.persist(&tree.path("out/rendered.html")).unwrap();

    assert_eq!(tree.read("out/rendered.html"), "<p>from file</p>");
}

#[test]
fn test_unreadable_input_is_input_error() {
    let credential = Credential::new("t");
    let err = RenderValidator::new(FakeRenderer::default())
        .validate(
            Some(&credential),
            &RenderInput::File("/no/such/file.md".into()),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, RenderError::Input { .. }));
}

#[test]
fn test_renderer_errors_pass_through() {
    let renderer = FakeRenderer {
        error: Some(RenderError::Http {
            status: 401,
            body: "{\"message\":\"401 Unauthorized\"}".to_string(),
        }),
        ..Default::default()
    };
    let credential = Credential::new("bad");

    let err = RenderValidator::new(&renderer)
        .validate(
            Some(&credential),
            &RenderInput::Inline("x".to_string()),
            None,
        )
        .unwrap_err();

    assert!(!err.is_missing_credential());
    assert!(err.to_string().contains("401 Unauthorized"));
}
