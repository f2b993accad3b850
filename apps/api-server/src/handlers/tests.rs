use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use parley_core::AppendStrategy;
use parley_core::ports::TokenService;
use parley_infra::{InMemoryDocumentStore, JwtConfig, JwtTokenService};

use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "parley-test".to_string(),
    }))
}

macro_rules! app {
    ($tokens:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(AppState::with_store(
                    Arc::new(InMemoryDocumentStore::new()),
                    AppendStrategy::AtomicUnion,
                    None,
                )))
                .app_data(web::Data::new($tokens))
                .configure(super::configure_routes),
        )
        .await
    };
}

fn bearer(tokens: &Arc<dyn TokenService>, user_id: &str) -> (header::HeaderName, String) {
    let token = tokens
        .generate_token(user_id, &format!("{user_id}@example.com"))
        .unwrap();
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_reports_in_memory_store() {
    let app = app!(token_service());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[actix_web::test]
async fn test_inbound_request_id_is_echoed() {
    let app = app!(token_service());

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "trace-me-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-me-42");
}

#[actix_web::test]
async fn test_missing_or_bad_token_is_unauthenticated() {
    let app = app!(token_service());

    let anonymous = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "unauthenticated");

    let forged = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .set_json(json!({ "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, forged).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_post_and_comment_flow() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let alice = bearer(&tokens, "alice");
    let bob = bearer(&tokens, "bob");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(alice.clone())
        .set_json(json!({ "content": "this is fuck bad" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["content"], "this is *beep* bad");
    assert_eq!(post["authorId"], "alice");
    assert_eq!(post["authorEmail"], "alice@example.com");
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .insert_header(bob.clone())
        .set_json(json!({ "content": "you are an idiot" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let added: Value = test::read_body_json(resp).await;
    assert_eq!(added["success"], true);
    assert_eq!(added["comment"]["content"], "you are an idiot");
    let comment_id = added["comment"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bob.clone())
        .set_json(json!({ "content": "hijacked" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "permission-denied");

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(alice.clone())
        .set_json(json!({ "content": "Edited, kampret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "content": "edited, *beep*" }));

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(bob.clone())
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts[0]["content"], "edited, *beep*");
    assert_eq!(posts[0]["comments"][0]["id"], comment_id.as_str());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}/comments/{comment_id}"))
        .insert_header(bob)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(alice.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(alice)
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts, json!([]));
}

#[actix_web::test]
async fn test_missing_content_is_invalid_argument() {
    let tokens = token_service();
    let app = app!(tokens.clone());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, "alice"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid-argument");
}

#[actix_web::test]
async fn test_malformed_json_uses_problem_format() {
    let tokens = token_service();
    let app = app!(tokens.clone());

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(&tokens, "alice"))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid-argument");
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn test_comment_on_missing_post_is_not_found() {
    let tokens = token_service();
    let app = app!(tokens.clone());

    let req = test::TestRequest::post()
        .uri("/api/posts/nope/comments")
        .insert_header(bearer(&tokens, "alice"))
        .set_json(json!({ "content": "hello?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "not-found");
}

#[actix_web::test]
async fn test_comment_content_is_moderated() {
    let tokens = token_service();
    let app = app!(tokens.clone());
    let alice = bearer(&tokens, "alice");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(alice.clone())
        .set_json(json!({ "content": "topic" }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .insert_header(alice.clone())
        .set_json(json!({ "content": "Dasar ANJING" }))
        .to_request();
    let added: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(added["comment"]["content"], "dasar *beep*");

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(alice)
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts[0]["comments"][0]["content"], "dasar *beep*");
}
