use crate::BoxError;
use crate::secret::ResolveError;

/// Invalid strategy configuration, reported by `JwtStrategyBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("JwtStrategy requires a verify callback")]
    MissingVerifyCallback,

    #[error("JwtStrategy requires a secret or key")]
    MissingSecretOrKey,

    #[error("JwtStrategy has been given both a secret_or_key and a secret_or_key_provider")]
    ConflictingKeySources,

    #[error("JwtStrategy requires a function to retrieve the jwt from requests (see extract_token)")]
    MissingExtractor,

    /// The static secret or key cannot be turned into a decoding key.
    #[error("JwtStrategy secret or key is unusable: {0}")]
    InvalidKey(String),
}

/// Internal failures reported on the strategy's error channel.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error(transparent)]
    SecretResolution(#[from] ResolveError),

    #[error("verify callback failed: {0}")]
    Callback(#[source] BoxError),

    /// A provider supplied key that cannot be used for verification.
    #[error("secret or key is unusable: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
}
