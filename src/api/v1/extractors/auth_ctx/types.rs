/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - strategy の verify callback が組み立て、middleware が request extensions に格納する
 *
 * Notes
 * - JWT の検証ロジックは jwt_strategy (lib) 側の責務
 * - ここは「型（契約）」として固定化する
 */

use serde::Serialize;
use uuid::Uuid;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は内部ユーザーID（`sub` を UUID として解釈）
/// - `scopes` / `roles` は coarse-grained な権限情報
/// - `jti` は監査/相関用
#[derive(Debug, Clone, Serialize)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub scopes: Vec<String>,
    pub roles: Vec<String>,
    pub jti: Option<String>,
}
