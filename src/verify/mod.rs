//! Verification adapter.
//!
//! The strategy never calls a JWT library directly. It hands a
//! [`VerifyRequest`] to a [`JwtVerifier`], which may be the default
//! [`JsonWebTokenVerifier`], an async closure ([`verifier_fn`]) or a
//! callback-style closure ([`verifier_with_done`]). [`VerificationAdapter`]
//! turns whichever one is configured into a [`VerificationOutcome`].

mod callback;
mod jwt;
mod options;

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Header, errors::ErrorKind};
use serde_json::Value;

use crate::BoxError;
use crate::secret::SecretOrKey;

pub use callback::{CallbackVerifier, VerifierFn, verifier_fn, verifier_with_done};
pub use jwt::{JsonWebTokenVerifier, verify_token};
pub use options::{InvalidDuration, VerifyOptions, parse_duration};

/// Everything a verifier needs for one token.
#[derive(Clone)]
pub struct VerifyRequest {
    pub token: String,
    pub secret_or_key: SecretOrKey,
    pub options: VerifyOptions,
}

impl std::fmt::Debug for VerifyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("VerifyRequest")
            .field("secret_or_key", &self.secret_or_key)
            .field("options", &self.options)
            .finish()
    }
}

/// A verified token. `payload` holds the application visible claims.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub payload: Value,
    pub header: Option<Header>,
    pub signature: Option<String>,
}

impl DecodedToken {
    /// For verifiers that only produce claims.
    pub fn from_payload(payload: Value) -> Self {
        Self {
            payload,
            header: None,
            signature: None,
        }
    }
}

/// Errors returned by token verification.
///
/// Errors from the underlying verifier are kept as they are so callers can
/// tell an expired token from a bad signature.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("invalid secret or key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("maxAge exceeded")]
    MaxAgeExceeded,

    #[error("iat required when maxAge is specified")]
    MissingIssuedAt,

    #[error("jwt payload must be a JSON object")]
    InvalidPayload,

    #[error("verifier completed without a result")]
    Abandoned,

    // Custom verifiers
    #[error("{0}")]
    Other(BoxError),
}

impl VerifyError {
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Jwt(e) if matches!(e.kind(), ErrorKind::ExpiredSignature))
    }

    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, Self::Jwt(e) if matches!(e.kind(), ErrorKind::InvalidSignature))
    }

    pub fn is_not_active(&self) -> bool {
        matches!(self, Self::Jwt(e) if matches!(e.kind(), ErrorKind::ImmatureSignature))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Jwt(e) if matches!(
                e.kind(),
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_)
            )
        )
    }
}

#[async_trait]
pub trait JwtVerifier: Send + Sync {
    async fn verify(&self, request: VerifyRequest) -> Result<DecodedToken, VerifyError>;
}

#[derive(Debug)]
pub enum VerificationOutcome {
    Verified(DecodedToken),
    Failed(VerifyError),
}

/// Runs the configured verifier and normalizes its result.
#[derive(Clone)]
pub struct VerificationAdapter {
    verifier: Arc<dyn JwtVerifier>,
}

impl std::fmt::Debug for VerificationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationAdapter").finish_non_exhaustive()
    }
}

impl Default for VerificationAdapter {
    fn default() -> Self {
        Self::new(Arc::new(JsonWebTokenVerifier))
    }
}

impl VerificationAdapter {
    pub fn new(verifier: Arc<dyn JwtVerifier>) -> Self {
        Self { verifier }
    }

    pub async fn verify(
        &self,
        token: &str,
        secret_or_key: &SecretOrKey,
        options: &VerifyOptions,
    ) -> VerificationOutcome {
        let request = VerifyRequest {
            token: token.to_string(),
            secret_or_key: secret_or_key.clone(),
            options: options.clone(),
        };

        match self.verifier.verify(request).await {
            Ok(decoded) if decoded.payload.is_object() => VerificationOutcome::Verified(decoded),
            Ok(_) => VerificationOutcome::Failed(VerifyError::InvalidPayload),
            Err(err) => VerificationOutcome::Failed(err),
        }
    }
}
