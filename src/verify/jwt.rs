use async_trait::async_trait;
use jsonwebtoken::{Algorithm, Validation};
use serde_json::Value;
use std::time::Duration;

use super::{DecodedToken, JwtVerifier, VerifyError, VerifyOptions, VerifyRequest};
use crate::secret::SecretOrKey;

/// Default verifier backed by the `jsonwebtoken` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWebTokenVerifier;

#[async_trait]
impl JwtVerifier for JsonWebTokenVerifier {
    async fn verify(&self, request: VerifyRequest) -> Result<DecodedToken, VerifyError> {
        verify_token(&request.token, &request.secret_or_key, &request.options)
    }
}

/// Verify signature and claims of `token`.
///
/// `jsonwebtoken::Validation` checks:
/// - signature and algorithm
/// - `exp` / `nbf` (unless ignored), with `clock_tolerance` as leeway
/// - `iss`, `aud`, `sub` when configured
///
/// `max_age` is checked here against `iat`.
pub fn verify_token(
    token: &str,
    secret_or_key: &SecretOrKey,
    options: &VerifyOptions,
) -> Result<DecodedToken, VerifyError> {
    let decoding_key = secret_or_key
        .decoding_key()
        .map_err(VerifyError::InvalidKey)?;
    let validation = build_validation(secret_or_key, options);

    let data = jsonwebtoken::decode::<Value>(token, &decoding_key, &validation)?;

    if let Some(max_age) = options.max_age {
        check_max_age(
            &data.claims,
            max_age,
            options.clock_tolerance,
            chrono::Utc::now().timestamp(),
        )?;
    }

    Ok(DecodedToken {
        signature: token.rsplit('.').next().map(str::to_string),
        header: Some(data.header),
        payload: data.claims,
    })
}

fn build_validation(secret_or_key: &SecretOrKey, options: &VerifyOptions) -> Validation {
    let algorithms = if options.algorithms.is_empty() {
        secret_or_key.default_algorithms()
    } else {
        options.algorithms.clone()
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = algorithms;
    validation.leeway = options.clock_tolerance;
    validation.validate_exp = !options.ignore_expiration;
    validation.validate_nbf = !options.ignore_not_before;
    // `exp` is only checked when present; configured iss / aud / sub must be present.
    validation.required_spec_claims.clear();

    if !options.issuer.is_empty() {
        validation.set_issuer(&options.issuer);
        validation.required_spec_claims.insert("iss".to_string());
    }
    if options.audience.is_empty() {
        validation.validate_aud = false;
    } else {
        validation.set_audience(&options.audience);
        validation.required_spec_claims.insert("aud".to_string());
    }
    if options.subject.is_some() {
        validation.required_spec_claims.insert("sub".to_string());
    }
    validation.sub = options.subject.clone();

    validation
}

fn check_max_age(
    claims: &Value,
    max_age: Duration,
    clock_tolerance: u64,
    now: i64,
) -> Result<(), VerifyError> {
    // NumericDate may carry a fraction
    let iat = claims
        .get("iat")
        .and_then(|iat| iat.as_i64().or_else(|| iat.as_f64().map(|secs| secs as i64)))
        .ok_or(VerifyError::MissingIssuedAt)?;

    let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    let tolerance = i64::try_from(clock_tolerance).unwrap_or(i64::MAX);

    if now.saturating_sub(iat) > max_age.saturating_add(tolerance) {
        return Err(VerifyError::MaxAgeExceeded);
    }
    Ok(())
}
