//! Secret / key resolution.
//!
//! A strategy is configured with either a static [`SecretOrKey`] or a
//! [`SecretOrKeyProvider`]. Providers see the token's header and payload
//! (decoded, but not verified) so they can pick a key by `kid`, `iss`, tenant
//! claims and so on.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use base64::Engine as _;
use jsonwebtoken::{Algorithm, DecodingKey, Header, errors::ErrorKind};
use serde_json::Value;

use crate::BoxError;
use crate::done::{self, Done};
use crate::request::AuthRequest;

/// Key material used to verify a token.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretOrKey {
    /// HMAC shared secret (HS256/HS384/HS512).
    Secret(Vec<u8>),
    /// RSA public key, PEM encoded (RS*/PS*).
    RsaPem(Vec<u8>),
    /// EC public key, PEM encoded (ES256/ES384).
    EcPem(Vec<u8>),
    /// Ed25519 public key, PEM encoded (EdDSA).
    EdPem(Vec<u8>),
}

impl SecretOrKey {
    pub fn secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::Secret(secret.into())
    }

    pub fn rsa_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::RsaPem(pem.into())
    }

    pub fn ec_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::EcPem(pem.into())
    }

    pub fn ed_pem(pem: impl Into<Vec<u8>>) -> Self {
        Self::EdPem(pem.into())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Self::Secret(b) | Self::RsaPem(b) | Self::EcPem(b) | Self::EdPem(b) => b,
        }
    }

    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        match self {
            Self::Secret(secret) => Ok(DecodingKey::from_secret(secret)),
            Self::RsaPem(pem) => DecodingKey::from_rsa_pem(pem),
            Self::EcPem(pem) => DecodingKey::from_ec_pem(pem),
            Self::EdPem(pem) => DecodingKey::from_ed_pem(pem),
        }
    }

    /// Algorithms accepted for this key when none are configured.
    pub fn default_algorithms(&self) -> Vec<Algorithm> {
        match self {
            Self::Secret(_) => vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            Self::RsaPem(_) => vec![
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
            ],
            Self::EcPem(_) => vec![Algorithm::ES256, Algorithm::ES384],
            Self::EdPem(_) => vec![Algorithm::EdDSA],
        }
    }
}

impl std::fmt::Debug for SecretOrKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        let kind = match self {
            Self::Secret(_) => "Secret",
            Self::RsaPem(_) => "RsaPem",
            Self::EcPem(_) => "EcPem",
            Self::EdPem(_) => "EdPem",
        };
        f.debug_tuple(kind).field(&"..").finish()
    }
}

/// Header and payload of a token, decoded without checking the signature.
/// Only meant for key selection.
#[derive(Debug, Clone)]
pub struct UnverifiedToken {
    pub header: Header,
    pub payload: Value,
}

impl UnverifiedToken {
    pub fn decode(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let header = jsonwebtoken::decode_header(token)?;

        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(ErrorKind::InvalidToken.into()),
        };

        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken))?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|_| jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken))?;

        Ok(Self { header, payload })
    }
}

/// Resolves the key for a token at request time.
///
/// Returns:
/// - `Ok(Some(key))` => verify with `key`
/// - `Ok(None)`      => no key for this token
/// - `Err(_)`        => backend failure
#[async_trait]
pub trait SecretOrKeyProvider: Send + Sync {
    async fn provide(
        &self,
        request: &AuthRequest,
        raw_token: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<SecretOrKey>, BoxError>;
}

/// Owned arguments handed to closure based providers.
#[derive(Debug, Clone)]
pub struct ProviderInput {
    pub request: AuthRequest,
    pub raw_token: String,
    pub token: UnverifiedToken,
}

pub struct ProviderFn<F>(F);

/// Provider from an async closure.
pub fn provider_fn<F, Fut>(f: F) -> ProviderFn<F>
where
    F: Fn(ProviderInput) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<SecretOrKey>, BoxError>> + Send + 'static,
{
    ProviderFn(f)
}

#[async_trait]
impl<F, Fut> SecretOrKeyProvider for ProviderFn<F>
where
    F: Fn(ProviderInput) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<SecretOrKey>, BoxError>> + Send + 'static,
{
    async fn provide(
        &self,
        request: &AuthRequest,
        raw_token: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<SecretOrKey>, BoxError> {
        (self.0)(ProviderInput {
            request: request.clone(),
            raw_token: raw_token.to_string(),
            token: token.clone(),
        })
        .await
    }
}

pub struct ProviderWithDone<F>(F);

/// Provider from a closure that reports through a [`Done`] continuation.
pub fn provider_with_done<F>(f: F) -> ProviderWithDone<F>
where
    F: Fn(ProviderInput, Done<Option<SecretOrKey>, BoxError>) + Send + Sync,
{
    ProviderWithDone(f)
}

#[async_trait]
impl<F> SecretOrKeyProvider for ProviderWithDone<F>
where
    F: Fn(ProviderInput, Done<Option<SecretOrKey>, BoxError>) + Send + Sync,
{
    async fn provide(
        &self,
        request: &AuthRequest,
        raw_token: &str,
        token: &UnverifiedToken,
    ) -> Result<Option<SecretOrKey>, BoxError> {
        let (done, pending) = done::channel();
        (self.0)(
            ProviderInput {
                request: request.clone(),
                raw_token: raw_token.to_string(),
                token: token.clone(),
            },
            done,
        );
        pending.wait().await.map_err(BoxError::from)?
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The token could not even be decoded to pick a key.
    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("secret or key provider failed: {0}")]
    Provider(#[source] BoxError),

    #[error("no secret or key available for token")]
    NoSecret,
}

#[derive(Clone)]
enum KeySource {
    Static(SecretOrKey),
    Provider(Arc<dyn SecretOrKeyProvider>),
}

/// Uniform async access to a static key or a provider.
#[derive(Clone)]
pub struct SecretResolver {
    source: KeySource,
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            KeySource::Static(_) => "static",
            KeySource::Provider(_) => "provider",
        };
        f.debug_struct("SecretResolver")
            .field("source", &source)
            .finish()
    }
}

impl SecretResolver {
    pub fn from_secret(secret_or_key: SecretOrKey) -> Self {
        Self {
            source: KeySource::Static(secret_or_key),
        }
    }

    pub fn from_provider(provider: Arc<dyn SecretOrKeyProvider>) -> Self {
        Self {
            source: KeySource::Provider(provider),
        }
    }

    pub async fn resolve(
        &self,
        request: &AuthRequest,
        raw_token: &str,
    ) -> Result<SecretOrKey, ResolveError> {
        match &self.source {
            KeySource::Static(key) => Ok(key.clone()),
            KeySource::Provider(provider) => {
                let token = UnverifiedToken::decode(raw_token).map_err(ResolveError::Malformed)?;
                provider
                    .provide(request, raw_token, &token)
                    .await
                    .map_err(ResolveError::Provider)?
                    .ok_or(ResolveError::NoSecret)
            }
        }
    }
}
