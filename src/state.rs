/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: 起動時に組み立てた JwtStrategy (設定は immutable)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use jwt_strategy::JwtStrategy;

use crate::api::v1::extractors::AuthCtx;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<JwtStrategy<AuthCtx>>,
}

impl AppState {
    pub fn new(auth: Arc<JwtStrategy<AuthCtx>>) -> Self {
        Self { auth }
    }
}
