use serde_json::Value;

use jwt_strategy::secret::provider_fn;
use jwt_strategy::{
    AuthRequest, BoxError, BuildError, JwtStrategy, SecretOrKey, Strategy, Verdict, callback_sync, extract,
};

fn accept_payload() -> impl jwt_strategy::VerifyCallback<Value> {
    callback_sync(|ctx| Ok(Verdict::accept(ctx.decoded.payload)))
}

#[test]
fn strategy_is_named_jwt() {
    let strategy = JwtStrategy::builder()
        .extract_token(|_: &AuthRequest| -> Option<String> { None })
        .secret_or_key(SecretOrKey::secret("secret"))
        .verify(accept_payload())
        .build()
        .unwrap();

    assert_eq!(strategy.name(), "jwt");
}

#[test]
fn requires_a_verify_callback() {
    let err = JwtStrategy::<Value>::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key(SecretOrKey::secret("secret"))
        .build()
        .unwrap_err();

    assert_eq!(err, BuildError::MissingVerifyCallback);
    assert_eq!(err.to_string(), "JwtStrategy requires a verify callback");
}

#[test]
fn requires_a_secret_or_key_provider() {
    let err = JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .verify(accept_payload())
        .build()
        .unwrap_err();

    assert_eq!(err, BuildError::MissingSecretOrKey);
    assert_eq!(err.to_string(), "JwtStrategy requires a secret or key");
}

#[test]
fn empty_secret_counts_as_missing() {
    let err = JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key(SecretOrKey::secret(""))
        .verify(accept_payload())
        .build()
        .unwrap_err();

    assert_eq!(err, BuildError::MissingSecretOrKey);
}

#[test]
fn rejects_both_secret_and_provider() {
    let err = JwtStrategy::<Value>::builder()
        .secret_or_key(SecretOrKey::secret("secret"))
        .secret_or_key_provider(provider_fn(|_input| async {
            Ok::<_, BoxError>(Some(SecretOrKey::secret("secret")))
        }))
        .extract_token(extract::from_auth_header_as_bearer_token())
        .verify(accept_payload())
        .build()
        .unwrap_err();

    assert_eq!(err, BuildError::ConflictingKeySources);
}

#[test]
fn missing_verify_callback_is_reported_first() {
    let err = JwtStrategy::<Value>::builder().build().unwrap_err();

    assert_eq!(err, BuildError::MissingVerifyCallback);
    assert_eq!(err.to_string(), "JwtStrategy requires a verify callback");
}

#[test]
fn unparsable_public_key_is_rejected_at_build() {
    let err = JwtStrategy::builder()
        .extract_token(extract::from_auth_header_as_bearer_token())
        .secret_or_key(SecretOrKey::ed_pem("-----BEGIN PUBLIC KEY-----\nnot a key\n-----END PUBLIC KEY-----\n"))
        .verify(accept_payload())
        .build()
        .unwrap_err();

    assert!(matches!(err, BuildError::InvalidKey(_)));
}

#[test]
fn requires_a_token_extractor() {
    let err = JwtStrategy::builder()
        .secret_or_key(SecretOrKey::secret("secret"))
        .verify(accept_payload())
        .build()
        .unwrap_err();

    assert_eq!(err, BuildError::MissingExtractor);
}

#[test]
fn provider_alone_is_enough() {
    let strategy = JwtStrategy::builder()
        .secret_or_key_provider(provider_fn(|_input| async {
            Ok::<_, BoxError>(Some(SecretOrKey::secret("secret")))
        }))
        .extract_token(extract::from_auth_header_as_bearer_token())
        .verify(accept_payload())
        .build();

    assert!(strategy.is_ok());
}
