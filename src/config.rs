/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, JWT の鍵、iss/aud、leeway など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use jwt_strategy::SecretOrKey;
use jwt_strategy::verify::parse_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Exactly one of JWT_SECRET / ACCESS_JWT_PUBLIC_KEY_PEM
    pub secret_or_key: SecretOrKey,

    pub auth_issuer: String,
    pub auth_audience: Option<String>,
    pub jwt_algorithms: Vec<Algorithm>,
    pub access_token_leeway_seconds: u64,
    pub jwt_max_age: Option<Duration>,
    pub jwt_ignore_expiration: bool,

    // Fallback token location after `Authorization: Bearer`
    pub jwt_query_param: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let secret_or_key = match (
            non_empty("JWT_SECRET"),
            non_empty("ACCESS_JWT_PUBLIC_KEY_PEM"),
        ) {
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("JWT_SECRET")),
            (None, None) => return Err(ConfigError::Missing("JWT_SECRET")),
            (Some(secret), None) => SecretOrKey::secret(secret),
            (None, Some(pem)) => SecretOrKey::ed_pem(pem.replace("\\n", "\n")),
        };

        let auth_issuer = non_empty("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let auth_audience = non_empty("AUTH_AUDIENCE");

        let jwt_algorithms = lookup("JWT_ALGORITHMS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("JWT_ALGORITHMS")))
            .collect::<Result<Vec<_>, _>>()?;

        let access_token_leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let jwt_max_age = non_empty("JWT_MAX_AGE")
            .map(|v| parse_duration(&v).map_err(|_| ConfigError::Invalid("JWT_MAX_AGE")))
            .transpose()?;

        let jwt_ignore_expiration = match non_empty("JWT_IGNORE_EXPIRATION") {
            None => false,
            Some(v) => v
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::Invalid("JWT_IGNORE_EXPIRATION"))?,
        };

        let jwt_query_param = non_empty("JWT_QUERY_PARAM");

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            secret_or_key,
            auth_issuer,
            auth_audience,
            jwt_algorithms,
            access_token_leeway_seconds,
            jwt_max_age,
            jwt_ignore_expiration,
            jwt_query_param,
        })
    }
}
