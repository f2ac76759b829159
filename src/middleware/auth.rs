//! strategy 実行 → 結果を HTTP に写像 → `Authenticated<U>` を extensions に入れる
//!
//! - success: `Authenticated<U>` を request extensions に格納して次へ
//! - fail:    401 (または strategy 指定の status) + `WWW-Authenticate: Bearer`
//! - error:   500

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, Request, StatusCode, header, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::request::AuthRequest;
use crate::strategy::{AuthOutcome, FailInfo, Strategy};

/// Upper bound for bodies buffered so that body extractors can see them.
pub const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;

/// Authenticated principal placed into request extensions.
#[derive(Debug, Clone)]
pub struct Authenticated<U> {
    pub user: U,
    pub info: Option<Value>,
}

/// Run `strategy` in front of every route of `router`.
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes::router();
/// let v1 = jwt_strategy::middleware::apply(v1, strategy.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply<S, St>(router: Router<St>, strategy: Arc<S>) -> Router<St>
where
    S: Strategy + 'static,
    S::User: Clone + Send + Sync,
    St: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(strategy, authenticate::<S>))
}

async fn authenticate<S>(
    State(strategy): State<Arc<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: Strategy + 'static,
    S::User: Clone + Send + Sync,
{
    let (parts, body) = req.into_parts();

    let (parsed_body, body) = match buffer_body(&parts, body).await {
        Ok(buffered) => buffered,
        Err(response) => return response,
    };

    let mut auth_req = AuthRequest::from_parts(&parts);
    if let Some(parsed) = parsed_body {
        auth_req = auth_req.with_body(parsed);
    }

    match strategy.authenticate(&auth_req).await {
        AuthOutcome::Success { user, info } => {
            let mut req = Request::from_parts(parts, body);
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(Authenticated { user, info });
            next.run(req).await
        }
        AuthOutcome::Fail { info, status } => {
            tracing::debug!(
                strategy = strategy.name(),
                reason = %info,
                "authentication failed"
            );
            unauthorized(status.unwrap_or(StatusCode::UNAUTHORIZED), &info)
        }
        AuthOutcome::Error(err) => {
            tracing::error!(strategy = strategy.name(), error = %err, "authentication error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            )
        }
    }
}

// Buffer JSON / url-encoded bodies so body extractors can read them, then
// hand the same bytes to the downstream handler.
async fn buffer_body(parts: &Parts, body: Body) -> Result<(Option<Value>, Body), Response> {
    let Some(kind) = body_kind(parts) else {
        return Ok((None, body));
    };

    let bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY_BYTES)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "failed to buffer request body");
            error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
            )
        })?;

    let parsed = match kind {
        BodyKind::Json => serde_json::from_slice::<Value>(&bytes).ok(),
        BodyKind::Form => Some(parse_form(&bytes)),
    };

    Ok((parsed, Body::from(bytes)))
}

#[derive(Debug, Clone, Copy)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(parts: &Parts) -> Option<BodyKind> {
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())?;
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => Some(BodyKind::Json),
        "application/x-www-form-urlencoded" => Some(BodyKind::Form),
        _ => None,
    }
}

fn parse_form(bytes: &Bytes) -> Value {
    let fields: Map<String, Value> = url::form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Value::Object(fields)
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

fn error_response(status: StatusCode, code: &'static str, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorBody { code, message },
    };
    (status, Json(body)).into_response()
}

fn unauthorized(status: StatusCode, info: &FailInfo) -> Response {
    let mut response = error_response(status, "UNAUTHORIZED", info.to_string());
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}
