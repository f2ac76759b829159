/// Factory: build the JWT strategy from application `Config`.
use std::sync::Arc;

use jwt_strategy::{BuildError, JwtStrategy, TokenExtractor, VerifyOptions, callback_sync, extract};

use crate::api::v1::extractors::AuthCtx;
use crate::config::Config;
use crate::services::auth::principal::resolve_principal;

pub fn build_jwt_strategy(config: &Config) -> Result<Arc<JwtStrategy<AuthCtx>>, BuildError> {
    let mut options = VerifyOptions::new()
        .algorithms(config.jwt_algorithms.iter().copied())
        .issuer(config.auth_issuer.as_str())
        .clock_tolerance(config.access_token_leeway_seconds)
        .ignore_expiration(config.jwt_ignore_expiration);
    if let Some(audience) = &config.auth_audience {
        options = options.audience(audience.as_str());
    }
    if let Some(max_age) = config.jwt_max_age {
        options = options.max_age(max_age);
    }

    let mut extractors: Vec<Box<dyn TokenExtractor>> =
        vec![Box::new(extract::from_auth_header_as_bearer_token())];
    if let Some(param) = &config.jwt_query_param {
        extractors.push(Box::new(extract::from_url_query_parameter(param.as_str())));
    }

    let strategy = JwtStrategy::builder()
        .secret_or_key(config.secret_or_key.clone())
        .extract_token(extract::from_extractors(extractors))
        .verify_options(options)
        .verify(callback_sync(resolve_principal))
        .build()?;

    Ok(Arc::new(strategy))
}
