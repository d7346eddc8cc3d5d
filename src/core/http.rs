//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::config::Config;
use crate::db::Database;
use crate::error::Error;
use crate::metrics::Metrics;
use crate::models::strategy::AnalysisKind;
use crate::services::dashboard;
use crate::services::exchange::{BinanceClient, ExchangeApi};
use crate::services::portfolio::PortfolioService;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub exchange: Arc<dyn ExchangeApi>,
    pub portfolio: Arc<PortfolioService>,
    pub database: Option<Arc<Database>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "coindash-api"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SymbolsQuery {
    symbols: Option<String>,
}

/// Split a comma-separated symbols parameter; missing or empty input
/// is rejected before anything reaches the network.
fn parse_symbols(param: Option<&str>) -> Result<Vec<String>, Error> {
    let targets: Vec<String> = param
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if targets.is_empty() {
        return Err(Error::input("Symbols parameter is required"));
    }
    Ok(targets)
}

/// Interest-set-filtered raw balances for the requested targets.
async fn get_portfolio(
    State(state): State<AppState>,
    Query(params): Query<SymbolsQuery>,
) -> Result<Json<Value>, Error> {
    let targets = parse_symbols(params.symbols.as_deref())?;
    let portfolio = state.portfolio.balances(&targets).await?;
    Ok(Json(json!({ "portfolio": portfolio })))
}

/// Latest quote prices for the requested base assets.
async fn get_prices(
    State(state): State<AppState>,
    Query(params): Query<SymbolsQuery>,
) -> Result<Json<Value>, Error> {
    let targets = parse_symbols(params.symbols.as_deref())?;
    let symbols: BTreeSet<String> = targets.into_iter().collect();
    let prices = state.exchange.fetch_prices(&symbols).await?;
    Ok(Json(json!({ "prices": prices })))
}

/// USD-valued, dust-filtered portfolio shaped for the pie chart.
async fn get_chart(
    State(state): State<AppState>,
    Query(params): Query<SymbolsQuery>,
) -> Result<Json<Value>, Error> {
    let targets = parse_symbols(params.symbols.as_deref())?;
    let valued = state.portfolio.valuations(&targets).await?;
    let slices = dashboard::chart_slices(&valued);
    Ok(Json(json!({ "chart": slices })))
}

/// All strategies with their decoded target lists.
async fn list_strategies(State(state): State<AppState>) -> Result<Json<Value>, Error> {
    let db = state.database.as_ref().ok_or(Error::StoreUnavailable)?;
    let strategies = db.get_strategies().await?;

    let rows: Vec<Value> = strategies
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "description": s.description,
                "short_description": s.short_description,
                "targets": s.parse_targets(),
                "created": s.created,
            })
        })
        .collect();
    Ok(Json(json!({ "strategies": rows })))
}

#[derive(Debug, Deserialize)]
struct AnalysisQuery {
    strategy: Option<String>,
    target: Option<String>,
    kind: Option<String>,
}

/// Latest analysis text for a (strategy, kind, target) triple.
async fn get_analysis(
    State(state): State<AppState>,
    Query(params): Query<AnalysisQuery>,
) -> Result<Response, Error> {
    let db = state.database.as_ref().ok_or(Error::StoreUnavailable)?;

    let strategy = params
        .strategy
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::input("Strategy parameter is required"))?;
    let target = params
        .target
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::input("Target parameter is required"))?;
    let kind = params
        .kind
        .as_deref()
        .and_then(AnalysisKind::parse)
        .ok_or_else(|| Error::input("Kind must be 'technical' or 'sentimental'"))?;

    match db.get_latest_analysis(strategy, kind, target).await? {
        Some(record) => Ok(Json(json!({ "analysis": record })).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No analysis found" })),
        )
            .into_response()),
    }
}

#[derive(Debug, Deserialize)]
struct DecisionsQuery {
    limit: Option<usize>,
}

/// Most recent trading decisions, newest first.
async fn list_decisions(
    State(state): State<AppState>,
    Query(params): Query<DecisionsQuery>,
) -> Result<Json<Value>, Error> {
    let db = state.database.as_ref().ok_or(Error::StoreUnavailable)?;
    let limit = params.limit.unwrap_or(10).min(100);
    let decisions = db.get_recent_decisions(limit).await?;
    Ok(Json(json!({ "decisions": decisions })))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/portfolio", get(get_portfolio))
        .route("/api/prices", get(get_prices))
        .route("/api/chart", get(get_chart))
        .route("/api/strategies", get(list_strategies))
        .route("/api/analysis", get(get_analysis))
        .route("/api/decisions", get(list_decisions))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    let exchange: Arc<dyn ExchangeApi> = Arc::new(BinanceClient::new(config.exchange.clone()));
    let portfolio = Arc::new(PortfolioService::new(exchange.clone()));

    // Strategy store is optional - exchange endpoints keep working
    // without it, dashboard endpoints answer 503.
    let database = match &config.database_url {
        Some(url) => match Database::connect(url).await {
            Ok(db) => {
                info!("strategy store connected");
                Some(Arc::new(db))
            }
            Err(e) => {
                warn!(error = %e, "failed to connect to strategy store - dashboard endpoints will be unavailable");
                None
            }
        },
        None => {
            warn!("DATABASE_URL not set - dashboard endpoints will be unavailable");
            None
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        exchange,
        portfolio,
        database,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
