mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{Part, ai_state, document, generate_request, json_body, stored_files, stub_state};
use quizforge_gateway::router;
use quizforge_synthesizer::providers::mock::MockProvider;
use serde_json::json;
use tower::ServiceExt;

const CAPITAL: &str = r#"{"questions":[{"question":"What is the capital of France?","options":["Paris","Lyon","Nice","Lille"],"correct":0}]}"#;

fn mock(response: &str) -> Arc<MockProvider> {
    Arc::new(MockProvider::new("mock").with_response(response))
}

#[tokio::test]
async fn request_without_document_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[Part::Text {
            name: "mode",
            value: "material",
        }]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await, json!({ "error": "No document uploaded" }));
    assert!(provider.last_request().is_none());
}

#[tokio::test]
async fn non_multipart_body_counts_as_missing_document() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(stub_state(tmp.path()));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"document":"notes.txt"}"#))
        .expect("request build should succeed");
    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "No document uploaded");
}

#[tokio::test]
async fn disallowed_mime_type_is_rejected_before_storage() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[document("diagram.png", "image/png", b"\x89PNG\r\n")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Only PDF, DOC, DOCX, and TXT files are allowed" })
    );
    assert!(stored_files(tmp.path()).is_empty());
    assert!(provider.last_request().is_none());
}

#[tokio::test]
async fn second_document_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(stub_state(tmp.path()));

    let resp = app
        .oneshot(generate_request(&[
            document("a.txt", "text/plain", b"first"),
            document("b.txt", "text/plain", b"second"),
        ]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await["error"],
        "Only one document may be uploaded per request"
    );
    assert!(stored_files(tmp.path()).is_empty());
}

#[tokio::test]
async fn stub_returns_placeholder_quiz() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(stub_state(tmp.path()));

    let resp = app
        .oneshot(generate_request(&[document("slides.pdf", "application/pdf", b"%PDF-1.4 not really")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "slides.pdf");
    assert_eq!(body["quiz"]["title"], "Quiz for slides.pdf");
    assert_eq!(body["quiz"]["totalQuestions"], 3);

    let questions = body["quiz"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    for q in questions {
        assert_eq!(q["options"].as_array().unwrap().len(), 4);
    }
    assert_eq!(stored_files(tmp.path()).len(), 1);
}

#[tokio::test]
async fn text_upload_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[document(
            "notes.txt",
            "text/plain",
            b"Paris is the capital of France.",
        )]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["filename"], "notes.txt");
    assert_eq!(body["quiz"]["title"], "Quiz for notes.txt");
    assert_eq!(body["quiz"]["totalQuestions"], 1);
    assert_eq!(
        body["quiz"]["questions"],
        json!([{
            "question": "What is the capital of France?",
            "options": ["Paris", "Lyon", "Nice", "Lille"],
            "correct": 0
        }])
    );
    assert!(body["quiz"]["id"].as_i64().unwrap() > 0);

    let sent = provider.last_request().expect("model should be called");
    assert!(sent.user_prompt.starts_with("You are a quiz formatter."));
    assert!(sent.user_prompt.contains("Paris is the capital of France."));

    let stored = stored_files(tmp.path());
    assert_eq!(stored.len(), 1);
    let name = stored[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.ends_with("-notes.txt"), "unexpected stored name {name}");
}

#[tokio::test]
async fn content_type_parameters_are_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(ai_state(tmp.path(), mock(CAPITAL), true));

    let resp = app
        .oneshot(generate_request(&[document(
            "notes.txt",
            "Text/Plain; charset=utf-8",
            b"Paris is the capital of France.",
        )]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn document_without_content_type_is_treated_as_text() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[Part::File {
            name: "document",
            filename: "notes.txt",
            content_type: None,
            data: b"Paris is the capital of France.",
        }]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["filename"], "notes.txt");
    assert_eq!(body["quiz"]["totalQuestions"], 1);
    assert!(provider.last_request().is_some());
    assert_eq!(stored_files(tmp.path()).len(), 1);
}

#[tokio::test]
async fn mode_field_selects_material_prompt() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[
            Part::Text {
                name: "mode",
                value: "material",
            },
            document("notes.txt", "text/plain", b"Paris is the capital of France."),
        ]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let sent = provider.last_request().unwrap();
    assert!(sent.user_prompt.contains("generate a quiz with 5 multiple-choice questions"));
}

#[tokio::test]
async fn unknown_mode_is_a_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(ai_state(tmp.path(), mock(CAPITAL), true));

    let resp = app
        .oneshot(generate_request(&[
            document("notes.txt", "text/plain", b"Paris is the capital of France."),
            Part::Text {
                name: "mode",
                value: "freestyle",
            },
        ]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["error"].as_str().unwrap().contains("freestyle"));
    assert!(stored_files(tmp.path()).is_empty());
}

#[tokio::test]
async fn non_json_completion_is_a_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(ai_state(tmp.path(), mock("Sure! Here is your quiz."), true));

    let resp = app
        .oneshot(generate_request(&[document("notes.txt", "text/plain", b"Some notes.")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
    assert!(body["details"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn completion_with_three_options_fails_validation() {
    let tmp = tempfile::tempdir().unwrap();
    let completion = r#"{"questions":[{"question":"Q?","options":["a","b","c"],"correct":0}]}"#;
    let app = router(ai_state(tmp.path(), mock(completion), true));

    let resp = app
        .oneshot(generate_request(&[document("notes.txt", "text/plain", b"Some notes.")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert!(body["details"].as_str().unwrap().contains("quiz validation"));
}

#[tokio::test]
async fn docx_fails_at_extraction_without_model_call() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = mock(CAPITAL);
    let app = router(ai_state(tmp.path(), provider.clone(), true));

    let resp = app
        .oneshot(generate_request(&[document(
            "essay.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            b"PK\x03\x04",
        )]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Failed to generate quiz");
    assert!(body["details"].as_str().unwrap().contains("unsupported document type"));
    assert!(provider.last_request().is_none());
}

#[tokio::test]
async fn provider_failure_is_reported_in_details() {
    let tmp = tempfile::tempdir().unwrap();
    let provider = Arc::new(MockProvider::new("gemini").failing("429 quota exceeded"));
    let app = router(ai_state(tmp.path(), provider, true));

    let resp = app
        .oneshot(generate_request(&[document("notes.txt", "text/plain", b"Some notes.")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(resp).await["details"].as_str().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn uploads_are_removed_when_not_retained() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(ai_state(tmp.path(), mock(CAPITAL), false));

    let resp = app
        .oneshot(generate_request(&[document(
            "notes.txt",
            "text/plain",
            b"Paris is the capital of France.",
        )]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(stored_files(tmp.path()).is_empty());
}

#[tokio::test]
async fn traversal_in_filename_stays_inside_upload_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let app = router(stub_state(tmp.path()));

    let resp = app
        .oneshot(generate_request(&[document("../../escape.txt", "text/plain", b"x")]))
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["filename"], "../../escape.txt");

    let stored = stored_files(tmp.path());
    assert_eq!(stored.len(), 1);
    assert!(stored[0].file_name().unwrap().to_str().unwrap().ends_with("-escape.txt"));
    assert!(!tmp.path().parent().unwrap().join("escape.txt").exists());
}
