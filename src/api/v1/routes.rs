/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は public、/me は JWT strategy の middleware の内側
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new().route("/me", get(me));
    let protected = jwt_strategy::middleware::apply(protected, state.auth.clone());

    Router::new()
        .route("/health", get(health))
        .merge(protected)
}
