/*
 * Responsibility
 * - host framework から見た strategy の契約 (Strategy trait)
 * - 1 回の認証試行の結果 (AuthOutcome: success / fail / error)
 */
mod callback;
mod error;
mod jwt;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

use crate::request::AuthRequest;
use crate::verify::VerifyError;

pub use callback::{
    CallbackFn, CallbackSync, CallbackWithDone, Verdict, VerifyCallback, VerifyContext,
    callback_fn, callback_sync, callback_with_done,
};
pub use error::{BuildError, StrategyError};
pub use jwt::{JwtStrategy, JwtStrategyBuilder, STRATEGY_NAME};

/// A named authentication strategy.
///
/// `authenticate` returns exactly one outcome per call.
#[async_trait]
pub trait Strategy: Send + Sync {
    type User: Send + 'static;

    fn name(&self) -> &'static str;

    async fn authenticate(&self, request: &AuthRequest) -> AuthOutcome<Self::User>;
}

#[derive(Debug)]
pub enum AuthOutcome<U> {
    /// Authenticated principal.
    Success { user: U, info: Option<Value> },
    /// Rejected credential. `status` overrides the default 401.
    Fail {
        info: FailInfo,
        status: Option<StatusCode>,
    },
    /// Unexpected failure (configuration, backing store, callback error).
    Error(StrategyError),
}

impl<U> AuthOutcome<U> {
    pub fn fail(info: FailInfo) -> Self {
        Self::Fail { info, status: None }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Why an attempt was rejected.
#[derive(Debug, thiserror::Error)]
pub enum FailInfo {
    #[error("No auth token")]
    NoToken,

    /// The verifier's own error, unchanged.
    #[error(transparent)]
    Verification(#[from] VerifyError),

    /// The verify callback declined the principal.
    #[error("{}", rejection_message(.0))]
    Rejected(Option<Value>),
}

impl FailInfo {
    pub fn verify_error(&self) -> Option<&VerifyError> {
        match self {
            Self::Verification(err) => Some(err),
            _ => None,
        }
    }
}

fn rejection_message(info: &Option<Value>) -> String {
    info.as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unauthorized")
        .to_string()
}
