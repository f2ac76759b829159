//! The user supplied verify callback.
//!
//! Given a verified token, the callback decides who the principal is. It can
//! be written as an async closure ([`callback_fn`]), a plain closure
//! ([`callback_sync`]) or a closure completing a [`Done`]
//! ([`callback_with_done`]).

use std::future::Future;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

use crate::BoxError;
use crate::done::{self, Done};
use crate::request::AuthRequest;
use crate::verify::DecodedToken;

/// Input of the verify callback.
#[derive(Debug, Clone)]
pub struct VerifyContext {
    pub decoded: DecodedToken,
    // Only set when the strategy is built with `pass_req_to_callback(true)`.
    pub request: Option<AuthRequest>,
}

impl VerifyContext {
    pub fn payload(&self) -> &Value {
        &self.decoded.payload
    }
}

/// Decision of the verify callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<U> {
    Accept {
        user: U,
        info: Option<Value>,
    },
    Reject {
        info: Option<Value>,
        status: Option<StatusCode>,
    },
}

impl<U> Verdict<U> {
    pub fn accept(user: U) -> Self {
        Self::Accept { user, info: None }
    }

    pub fn accept_with_info(user: U, info: Value) -> Self {
        Self::Accept {
            user,
            info: Some(info),
        }
    }

    pub fn reject() -> Self {
        Self::Reject {
            info: None,
            status: None,
        }
    }

    pub fn reject_with_info(info: Value) -> Self {
        Self::Reject {
            info: Some(info),
            status: None,
        }
    }

    pub fn reject_with_status(info: Option<Value>, status: StatusCode) -> Self {
        Self::Reject {
            info,
            status: Some(status),
        }
    }
}

#[async_trait]
pub trait VerifyCallback<U>: Send + Sync {
    async fn verify(&self, ctx: VerifyContext) -> Result<Verdict<U>, BoxError>;
}

pub struct CallbackFn<F>(F);

pub fn callback_fn<U, F, Fut>(f: F) -> CallbackFn<F>
where
    F: Fn(VerifyContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, BoxError>> + Send + 'static,
{
    CallbackFn(f)
}

#[async_trait]
impl<U, F, Fut> VerifyCallback<U> for CallbackFn<F>
where
    U: Send + 'static,
    F: Fn(VerifyContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Verdict<U>, BoxError>> + Send + 'static,
{
    async fn verify(&self, ctx: VerifyContext) -> Result<Verdict<U>, BoxError> {
        (self.0)(ctx).await
    }
}

pub struct CallbackSync<F>(F);

pub fn callback_sync<U, F>(f: F) -> CallbackSync<F>
where
    F: Fn(VerifyContext) -> Result<Verdict<U>, BoxError> + Send + Sync,
{
    CallbackSync(f)
}

#[async_trait]
impl<U, F> VerifyCallback<U> for CallbackSync<F>
where
    U: Send + 'static,
    F: Fn(VerifyContext) -> Result<Verdict<U>, BoxError> + Send + Sync,
{
    async fn verify(&self, ctx: VerifyContext) -> Result<Verdict<U>, BoxError> {
        (self.0)(ctx)
    }
}

pub struct CallbackWithDone<F>(F);

pub fn callback_with_done<U, F>(f: F) -> CallbackWithDone<F>
where
    F: Fn(VerifyContext, Done<Verdict<U>, BoxError>) + Send + Sync,
{
    CallbackWithDone(f)
}

#[async_trait]
impl<U, F> VerifyCallback<U> for CallbackWithDone<F>
where
    U: Send + 'static,
    F: Fn(VerifyContext, Done<Verdict<U>, BoxError>) + Send + Sync,
{
    async fn verify(&self, ctx: VerifyContext) -> Result<Verdict<U>, BoxError> {
        let (done, pending) = done::channel();
        (self.0)(ctx, done);
        pending.wait().await.map_err(BoxError::from)?
    }
}

impl<U> Done<Verdict<U>, BoxError> {
    pub fn success(self, user: U, info: Option<Value>) {
        self.ok(Verdict::Accept { user, info });
    }

    pub fn reject(self, info: Option<Value>) {
        self.ok(Verdict::Reject { info, status: None });
    }

    pub fn error(self, error: impl Into<BoxError>) {
        self.err(error.into());
    }

    /// `(err, user, info)` form: an error wins, then a user means success,
    /// otherwise the attempt is rejected with `info`.
    pub fn call(self, err: Option<BoxError>, user: Option<U>, info: Option<Value>) {
        match (err, user) {
            (Some(err), _) => self.err(err),
            (None, Some(user)) => self.success(user, info),
            (None, None) => self.reject(info),
        }
    }
}
