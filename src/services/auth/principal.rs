use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use jwt_strategy::{BoxError, Verdict, VerifyContext};

use crate::api::v1::extractors::AuthCtx;

/// Access token claims the application cares about.
///
/// NOTE:
/// - `iss` (and `aud` when configured) is required and checked by the strategy.
/// - `exp` is checked when present.
/// - `scope` is space separated; `roles` is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,

    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Verify callback: turn verified claims into an `AuthCtx`.
///
/// - project convention: `sub` is a UUID
/// - claims that do not fit are a rejection, not an error
pub fn resolve_principal(ctx: VerifyContext) -> Result<Verdict<AuthCtx>, BoxError> {
    let claims = match serde_json::from_value::<AccessTokenClaims>(ctx.decoded.payload) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "access token claims do not match");
            return Ok(Verdict::reject_with_info(json!({ "message": "invalid claims" })));
        }
    };

    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        return Ok(Verdict::reject_with_info(
            json!({ "message": "invalid 'sub' (expected UUID)" }),
        ));
    };

    let scopes = claims
        .scope
        .as_deref()
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let auth_ctx = AuthCtx {
        user_id,
        scopes,
        roles: claims.roles.unwrap_or_default(),
        jti: claims.jti,
    };

    Ok(Verdict::accept(auth_ctx))
}
