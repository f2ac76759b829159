use std::future::Future;

use async_trait::async_trait;

use super::{DecodedToken, JwtVerifier, VerifyError, VerifyRequest};
use crate::done::{self, Done};

pub struct VerifierFn<F>(F);

/// Verifier from an async closure.
pub fn verifier_fn<F, Fut>(f: F) -> VerifierFn<F>
where
    F: Fn(VerifyRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<DecodedToken, VerifyError>> + Send + 'static,
{
    VerifierFn(f)
}

#[async_trait]
impl<F, Fut> JwtVerifier for VerifierFn<F>
where
    F: Fn(VerifyRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<DecodedToken, VerifyError>> + Send + 'static,
{
    async fn verify(&self, request: VerifyRequest) -> Result<DecodedToken, VerifyError> {
        (self.0)(request).await
    }
}

/// Verifier that reports through a [`Done`] continuation.
pub struct CallbackVerifier<F>(F);

pub fn verifier_with_done<F>(f: F) -> CallbackVerifier<F>
where
    F: Fn(VerifyRequest, Done<DecodedToken, VerifyError>) + Send + Sync,
{
    CallbackVerifier(f)
}

#[async_trait]
impl<F> JwtVerifier for CallbackVerifier<F>
where
    F: Fn(VerifyRequest, Done<DecodedToken, VerifyError>) + Send + Sync,
{
    async fn verify(&self, request: VerifyRequest) -> Result<DecodedToken, VerifyError> {
        let (done, pending) = done::channel();
        (self.0)(request, done);
        pending.wait().await.map_err(|_| VerifyError::Abandoned)?
    }
}
