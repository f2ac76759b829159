mod common;

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use jwt_strategy::middleware::{self, Authenticated};
use jwt_strategy::secret::provider_with_done;
use jwt_strategy::{
    JwtStrategy, SecretOrKey, Verdict, VerifyContext, callback_sync, callback_with_done, extract,
};

use common::{SECRET, payload, sign};

async fn whoami(Extension(auth): Extension<Authenticated<Value>>) -> Json<Value> {
    Json(auth.user)
}

async fn echo(
    Extension(auth): Extension<Authenticated<Value>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    Json(json!({ "sub": auth.user["sub"], "body": body }))
}

fn app(strategy: JwtStrategy<Value>) -> Router {
    let routes = Router::new()
        .route("/me", get(whoami))
        .route("/echo", post(echo));
    middleware::apply(routes, Arc::new(strategy))
}

fn header_strategy() -> JwtStrategy<Value> {
    JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key(SecretOrKey::secret(SECRET))
        .verify(callback_sync(|ctx: VerifyContext| {
            Ok(Verdict::accept(ctx.decoded.payload))
        }))
        .build()
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_token_is_401_with_challenge() {
    let response = app(header_strategy())
        .oneshot(Request::get("/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "No auth token");
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let token = sign(payload());
    let response = app(header_strategy())
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sub"], "1234567890");
}

#[tokio::test]
async fn token_in_json_body_and_body_still_readable() {
    let strategy = JwtStrategy::builder()
        .extract_token(extract::from_body_field("auth_token"))
        .secret_or_key(SecretOrKey::secret(SECRET))
        .verify(callback_sync(|ctx: VerifyContext| {
            Ok(Verdict::accept(ctx.decoded.payload))
        }))
        .build()
        .unwrap();

    let token = sign(payload());
    let request = Request::post("/echo")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "auth_token": token, "note": "hello" }).to_string(),
        ))
        .unwrap();

    let response = app(strategy).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sub"], "1234567890");
    assert_eq!(body["body"]["note"], "hello");
}

#[tokio::test]
async fn token_in_form_body() {
    let strategy = JwtStrategy::builder()
        .extract_token(extract::from_body_field("auth_token"))
        .secret_or_key(SecretOrKey::secret(SECRET))
        .verify(callback_sync(|ctx: VerifyContext| {
            Ok(Verdict::accept(ctx.decoded.payload))
        }))
        .build()
        .unwrap();

    let token = sign(payload());
    let request = Request::get("/me")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("auth_token={token}&x=1")))
        .unwrap();

    let response = app(strategy).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn strategy_error_is_500() {
    let strategy = JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key_provider(provider_with_done(|_input, done| {
            done.err("key store unavailable".into())
        }))
        .verify(callback_sync(|ctx: VerifyContext| {
            Ok(Verdict::accept(ctx.decoded.payload))
        }))
        .build()
        .unwrap();

    let token = sign(payload());
    let response = app(strategy)
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
}

#[tokio::test]
async fn rejection_status_is_honoured() {
    let strategy = JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key(SecretOrKey::secret(SECRET))
        .verify(callback_with_done(|_ctx: VerifyContext, done| {
            done.ok(Verdict::<Value>::reject_with_status(
                Some(json!({ "message": "account disabled" })),
                StatusCode::FORBIDDEN,
            ))
        }))
        .build()
        .unwrap();

    let token = sign(payload());
    let response = app(strategy)
        .oneshot(
            Request::get("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "account disabled");
}
