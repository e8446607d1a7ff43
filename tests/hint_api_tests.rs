mod common;

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::{json, post_json, send, state_with, LogCapture, MockProvider};
use ode_tutor::error::USER_ERROR_MESSAGE;
use ode_tutor::logic::attempts_exhausted_notice;
use ode_tutor::routes::{build_handler_router, build_local_router};
use ode_tutor::ProviderKind;

fn history(turns: usize) -> Vec<serde_json::Value> {
    (0..turns)
        .map(|i| json!({ "user": format!("student turn {i}"), "ai": format!("tutor turn {i}") }))
        .collect()
}

#[tokio::test]
async fn hint_goes_to_the_configured_provider_once() {
    common::init_tracing();
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let body = json!({
        "currentStep": 1,
        "userInput": "6 ו-2",
        "problemData": { "correctAnswer": "λ=6,4" },
        "conversationHistory": []
    });
    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let out = json(&bytes);
    assert_eq!(out["provider"], "google");
    assert!(out["hint"].as_str().is_some_and(|h| !h.is_empty()));
    assert_eq!(provider.calls(), 1);

    let prompt = provider.last_prompt().unwrap();
    assert!(prompt.contains("## Current Step: 1"));
    assert!(prompt.contains("λ=6,4"));
    assert!(prompt.contains("6 ו-2"));
}

#[tokio::test]
async fn replayed_history_reaches_the_prompt_in_order() {
    let provider = MockProvider::replying(ProviderKind::OpenRouter);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let body = json!({
        "currentStep": 2,
        "userInput": "[-1, 1, 1]",
        "problemData": { "correctAnswer": "v₁ = [-1, 1, 1]^T" },
        "conversationHistory": history(3)
    });
    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes)["provider"], "openrouter");

    let prompt = provider.last_prompt().unwrap();
    let mut last = 0;
    for i in 0..3 {
        for text in [format!("student turn {i}"), format!("tutor turn {i}")] {
            let at = prompt.find(&text).expect("turn text in prompt");
            assert!(at >= last, "{text} out of order");
            last = at;
        }
    }
}

#[tokio::test]
async fn null_history_and_turn_fields_are_treated_as_empty() {
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let body = json!({
        "currentStep": 1,
        "userInput": "6 ו-2",
        "problemData": { "correctAnswer": "λ=6,4", "fullSolution": null },
        "conversationHistory": null
    });
    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes)["provider"], "google");

    let body = json!({
        "currentStep": 2,
        "userInput": "[-1, 1, 1]",
        "problemData": { "correctAnswer": null },
        "conversationHistory": [{ "user": "first try", "ai": null }]
    });
    let (status, _, _) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(provider.last_prompt().unwrap().contains("first try"));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn logs_carry_input_length_not_student_text() {
    let capture = LogCapture::default();
    let _guard = tracing::subscriber::set_default(capture.subscriber());
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let answer = "eigenvalues are six and four";
    let body = json!({ "currentStep": 1, "userInput": answer, "problemData": { "correctAnswer": "λ=6,4" } });
    let (status, _, _) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let logs = capture.text();
    assert!(logs.contains("Prompt assembled"), "{logs}");
    assert!(logs.contains(&format!("input_len={}", answer.len())), "{logs}");
    assert!(!logs.contains(answer), "{logs}");
}

#[tokio::test]
async fn attempt_limit_reveals_solution_without_calling_provider() {
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    for (turns, step) in [(10, 1), (12, 4), (10, 99)] {
        let body = json!({
            "currentStep": step,
            "userInput": "anything",
            "problemData": { "correctAnswer": "x", "fullSolution": "FULL SOLUTION TEXT" },
            "conversationHistory": history(turns)
        });
        let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        let out = json(&bytes);
        assert_eq!(out["hint"], format!("{}FULL SOLUTION TEXT", attempts_exhausted_notice()));
        assert!(out.get("provider").is_none());
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn unparsable_body_is_a_500_envelope() {
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", "{ this is not json")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let out = json(&bytes);
    assert_eq!(out["error"], USER_ERROR_MESSAGE);
    assert_eq!(out["provider"], "google");
    assert!(out["details"].as_str().unwrap().contains("malformed"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn out_of_range_step_is_rejected() {
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    for step in [0, 6] {
        let body = json!({ "currentStep": step, "userInput": "x", "problemData": { "correctAnswer": "y" } });
        let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&bytes)["details"].as_str().unwrap().contains("currentStep"));
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn provider_failure_is_a_500_envelope_with_details() {
    let provider = MockProvider::failing(ProviderKind::OpenRouter, 503);
    let app = build_local_router(state_with(provider.clone(), PathBuf::from(".")));

    let body = json!({ "currentStep": 3, "userInput": "x", "problemData": { "correctAnswer": "y" } });
    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let out = json(&bytes);
    assert_eq!(out["error"], USER_ERROR_MESSAGE);
    assert_eq!(out["provider"], "openrouter");
    assert!(out["details"].as_str().unwrap().contains("503"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn options_on_any_path_is_an_empty_200() {
    let app = build_local_router(state_with(MockProvider::replying(ProviderKind::Google), PathBuf::from(".")));

    for uri in ["/api/ai-hint", "/index.html", "/no/such/thing"] {
        let req = Request::builder().method("OPTIONS").uri(uri).body(Body::empty()).unwrap();
        let (status, headers, bytes) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(bytes.is_empty());
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers["access-control-allow-methods"].to_str().unwrap().contains("POST"));
        assert!(headers["access-control-allow-headers"].to_str().unwrap().to_lowercase().contains("content-type"));
    }
}

#[tokio::test]
async fn browser_preflight_gets_cors_headers() {
    let app = build_local_router(state_with(MockProvider::replying(ProviderKind::Google), PathBuf::from(".")));

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/ai-hint")
        .header("origin", "http://localhost:5500")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, headers, bytes) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.is_empty());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers["access-control-allow-methods"].to_str().unwrap().contains("POST"));
}

#[tokio::test]
async fn hosted_handler_pins_origin_and_rejects_other_methods() {
    let provider = MockProvider::replying(ProviderKind::Google);
    let app = build_handler_router(
        state_with(provider.clone(), PathBuf::from(".")),
        "https://shir-openu.github.io",
    )
    .unwrap();

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/ai-hint")
        .header("origin", "https://shir-openu.github.io")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "https://shir-openu.github.io");
    assert_eq!(headers["access-control-allow-methods"], "POST,OPTIONS");

    let req = Request::builder().method("GET").uri("/api/ai-hint").body(Body::empty()).unwrap();
    let (status, _, bytes) = send(&app, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json(&bytes)["error"], "Method not allowed");

    let body = json!({ "currentStep": 5, "userInput": "a₁ = -1", "problemData": { "correctAnswer": "a = [-1,0,0]" } });
    let (status, _, bytes) = send(&app, post_json("/api/ai-hint", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes)["provider"], "google");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn hosted_handler_does_not_serve_files() {
    let app = build_handler_router(
        state_with(MockProvider::replying(ProviderKind::Google), PathBuf::from(".")),
        "https://shir-openu.github.io",
    )
    .unwrap();
    let req = Request::builder().method("GET").uri("/Cargo.toml").body(Body::empty()).unwrap();
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_provider() {
    let app = build_local_router(state_with(MockProvider::replying(ProviderKind::OpenRouter), PathBuf::from(".")));
    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let (status, _, bytes) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&bytes), json!({ "ok": true, "provider": "openrouter" }));
}
