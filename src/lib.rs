//! JWT bearer-token authentication strategy.
//!
//! A [`JwtStrategy`] pulls a token out of an [`AuthRequest`] with a
//! [`TokenExtractor`], resolves the secret or public key that should verify it,
//! runs a [`JwtVerifier`] and finally hands the decoded token to a user supplied
//! verify callback. Every attempt ends in exactly one [`AuthOutcome`]:
//! success, fail (rejected with info) or error.
//!
//! ```ignore
//! use jwt_strategy::{JwtStrategy, SecretOrKey, Verdict, callback_sync, extract};
//!
//! let strategy = JwtStrategy::<serde_json::Value>::builder()
//!     .secret_or_key(SecretOrKey::secret("secret"))
//!     .extract_token(extract::from_auth_header_as_bearer_token())
//!     .verify(callback_sync(|ctx| Ok(Verdict::accept(ctx.decoded.payload))))
//!     .build()?;
//! ```
//!
//! [`middleware::apply`] plugs any [`Strategy`] into an axum router.

pub mod auth_header;
pub mod done;
pub mod extract;
pub mod middleware;
pub mod request;
pub mod secret;
pub mod strategy;
pub mod verify;

pub use auth_header::AuthHeader;
pub use done::Done;
pub use extract::TokenExtractor;
pub use request::AuthRequest;
pub use secret::{SecretOrKey, SecretOrKeyProvider, UnverifiedToken};
pub use strategy::{
    AuthOutcome, BuildError, FailInfo, JwtStrategy, Strategy, StrategyError, Verdict,
    VerifyCallback, VerifyContext, callback_fn, callback_sync, callback_with_done,
};
pub use verify::{
    DecodedToken, JsonWebTokenVerifier, JwtVerifier, VerificationOutcome, VerifyError,
    VerifyOptions, VerifyRequest,
};

/// Error type used for failures coming out of user supplied code
/// (secret providers, verify callbacks, custom verifiers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
