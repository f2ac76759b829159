/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → JwtStrategy 生成 → Router 組み立て
 * - Middleware の適用 (request-id / trace / CORS)
 * - axum::serve() で起動
 */
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::{api, config::Config, error::AppError, services::auth, state::AppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let strategy = auth::build_jwt_strategy(&config).context("failed to build jwt strategy")?;
    let state = AppState::new(strategy);

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, env = ?config.app_env, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jwt_strategy=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_router(state: AppState, config: &Config) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(cors_layer(config)),
        )
}

async fn not_found() -> AppError {
    AppError::NotFound
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        // 本番で origin 未設定なら CORS を許可しない
        return if config.app_env.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
