/*
 * Responsibility
 * - GET /me (認証済み主体をそのまま返す)
 * - strategy が組み立てた AuthCtx が handler まで届くことの確認用
 */
use axum::Json;

use crate::api::v1::extractors::{AuthCtx, AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(auth): AuthCtxExtractor) -> Json<AuthCtx> {
    tracing::debug!(user_id = %auth.user_id, "resolved current user");
    Json(auth)
}
