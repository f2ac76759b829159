use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::{AuthOutcome, BuildError, FailInfo, Strategy, StrategyError};
use super::{Verdict, VerifyCallback, VerifyContext};
use crate::extract::TokenExtractor;
use crate::request::AuthRequest;
use crate::secret::{ResolveError, SecretOrKey, SecretOrKeyProvider, SecretResolver};
use crate::verify::{
    JwtVerifier, VerificationAdapter, VerificationOutcome, VerifyError, VerifyOptions,
};

/// Name the strategy registers under.
pub const STRATEGY_NAME: &str = "jwt";

/// JWT bearer strategy.
///
/// Per attempt: extract token → resolve secret/key → verify → verify callback.
/// The configuration is fixed at `build()` time and shared by all attempts.
pub struct JwtStrategy<U> {
    extractor: Box<dyn TokenExtractor>,
    resolver: SecretResolver,
    verification: VerificationAdapter,
    verify_options: VerifyOptions,
    pass_req_to_callback: bool,
    verify: Arc<dyn VerifyCallback<U>>,
}

impl<U> std::fmt::Debug for JwtStrategy<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtStrategy")
            .field("resolver", &self.resolver)
            .field("verify_options", &self.verify_options)
            .field("pass_req_to_callback", &self.pass_req_to_callback)
            .finish_non_exhaustive()
    }
}

impl<U: Send + 'static> JwtStrategy<U> {
    pub fn builder() -> JwtStrategyBuilder<U> {
        JwtStrategyBuilder::default()
    }

    pub fn verify_options(&self) -> &VerifyOptions {
        &self.verify_options
    }

    async fn run(&self, request: &AuthRequest) -> AuthOutcome<U> {
        let Some(token) = self.extractor.extract(request) else {
            debug!(strategy = STRATEGY_NAME, "no auth token in request");
            return AuthOutcome::fail(FailInfo::NoToken);
        };

        let secret_or_key = match self.resolver.resolve(request, &token).await {
            Ok(key) => key,
            Err(ResolveError::Malformed(err)) => {
                warn!(strategy = STRATEGY_NAME, error = %err, "malformed token");
                return AuthOutcome::fail(FailInfo::Verification(VerifyError::Jwt(err)));
            }
            Err(err) => {
                error!(strategy = STRATEGY_NAME, error = %err, "secret or key resolution failed");
                return AuthOutcome::Error(StrategyError::SecretResolution(err));
            }
        };

        let decoded = match self
            .verification
            .verify(&token, &secret_or_key, &self.verify_options)
            .await
        {
            VerificationOutcome::Verified(decoded) => decoded,
            VerificationOutcome::Failed(VerifyError::InvalidKey(err)) => {
                error!(strategy = STRATEGY_NAME, error = %err, "secret or key is unusable");
                return AuthOutcome::Error(StrategyError::InvalidKey(err));
            }
            VerificationOutcome::Failed(err) => {
                warn!(strategy = STRATEGY_NAME, error = %err, "jwt verification failed");
                return AuthOutcome::fail(FailInfo::Verification(err));
            }
        };

        let ctx = VerifyContext {
            decoded,
            request: self.pass_req_to_callback.then(|| request.clone()),
        };

        match self.verify.verify(ctx).await {
            Ok(Verdict::Accept { user, info }) => {
                debug!(strategy = STRATEGY_NAME, "authenticated");
                AuthOutcome::Success { user, info }
            }
            Ok(Verdict::Reject { info, status }) => {
                debug!(strategy = STRATEGY_NAME, "verify callback rejected the token");
                AuthOutcome::Fail {
                    info: FailInfo::Rejected(info),
                    status,
                }
            }
            Err(err) => {
                error!(strategy = STRATEGY_NAME, error = %err, "verify callback failed");
                AuthOutcome::Error(StrategyError::Callback(err))
            }
        }
    }
}

#[async_trait]
impl<U: Send + 'static> Strategy for JwtStrategy<U> {
    type User = U;

    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    async fn authenticate(&self, request: &AuthRequest) -> AuthOutcome<U> {
        self.run(request).await
    }
}

/// Collects options for a [`JwtStrategy`]. `build()` validates them.
pub struct JwtStrategyBuilder<U> {
    secret_or_key: Option<SecretOrKey>,
    secret_or_key_provider: Option<Arc<dyn SecretOrKeyProvider>>,
    extract_token: Option<Box<dyn TokenExtractor>>,
    verifier: Option<Arc<dyn JwtVerifier>>,
    verify_options: VerifyOptions,
    pass_req_to_callback: bool,
    verify: Option<Arc<dyn VerifyCallback<U>>>,
}

impl<U> Default for JwtStrategyBuilder<U> {
    fn default() -> Self {
        Self {
            secret_or_key: None,
            secret_or_key_provider: None,
            extract_token: None,
            verifier: None,
            verify_options: VerifyOptions::default(),
            pass_req_to_callback: false,
            verify: None,
        }
    }
}

impl<U: Send + 'static> JwtStrategyBuilder<U> {
    pub fn secret_or_key(mut self, secret_or_key: SecretOrKey) -> Self {
        self.secret_or_key = Some(secret_or_key);
        self
    }

    pub fn secret_or_key_provider(mut self, provider: impl SecretOrKeyProvider + 'static) -> Self {
        self.secret_or_key_provider = Some(Arc::new(provider));
        self
    }

    pub fn extract_token(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extract_token = Some(Box::new(extractor));
        self
    }

    /// Replace the default `jsonwebtoken` based verifier.
    pub fn verifier(mut self, verifier: impl JwtVerifier + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    pub fn verify_options(mut self, options: VerifyOptions) -> Self {
        self.verify_options = options;
        self
    }

    pub fn pass_req_to_callback(mut self, pass: bool) -> Self {
        self.pass_req_to_callback = pass;
        self
    }

    pub fn verify(mut self, callback: impl VerifyCallback<U> + 'static) -> Self {
        self.verify = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Result<JwtStrategy<U>, BuildError> {
        let verify = self.verify.ok_or(BuildError::MissingVerifyCallback)?;

        let secret_or_key = self.secret_or_key.filter(|key| !key.is_empty());
        let resolver = match (secret_or_key, self.secret_or_key_provider) {
            (Some(_), Some(_)) => return Err(BuildError::ConflictingKeySources),
            (None, None) => return Err(BuildError::MissingSecretOrKey),
            (Some(key), None) => {
                // PEM は起動時に検証する
                key.decoding_key()
                    .map_err(|err| BuildError::InvalidKey(err.to_string()))?;
                SecretResolver::from_secret(key)
            }
            (None, Some(provider)) => SecretResolver::from_provider(provider),
        };

        let extractor = self.extract_token.ok_or(BuildError::MissingExtractor)?;

        let verification = self
            .verifier
            .map(VerificationAdapter::new)
            .unwrap_or_default();

        Ok(JwtStrategy {
            extractor,
            resolver,
            verification,
            verify_options: self.verify_options,
            pass_req_to_callback: self.pass_req_to_callback,
            verify,
        })
    }
}
