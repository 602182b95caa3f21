use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickersense_core::analysis::SentimentAnalyzer;
use tickersense_core::domain::article::Article;
use tickersense_core::llm::openai_compat::ChatCompletionsClient;
use tickersense_core::news::gnews::GNewsClient;
use tickersense_core::news::NewsSource;
use tickersense_core::report::{
    analyze_stock, normalize_stock, AnalysisReport, DEFAULT_MAX_ARTICLES, POPULAR_STOCKS,
};

const MAX_ARTICLES_CAP: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tickersense_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let news = GNewsClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;
    let llm = ChatCompletionsClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;
    tracing::info!(provider = %settings.llm_provider()?, model = llm.model(), "llm configured");

    let state = AppState {
        news: Arc::new(news),
        analyzer: SentimentAnalyzer::new(Arc::new(llm)),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/stocks/popular", get(popular_stocks))
        .route("/market_context", get(market_context))
        .route("/analyze", get(analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    news: Arc<dyn NewsSource>,
    analyzer: SentimentAnalyzer,
}

#[derive(Debug, Deserialize)]
struct StockQuery {
    #[serde(default)]
    stock: Option<String>,
    max_articles: Option<usize>,
}

impl StockQuery {
    fn stock(&self) -> Result<String, ApiError> {
        let Some(raw) = self.stock.as_deref() else {
            return Err(ApiError::new(StatusCode::BAD_REQUEST, "stock is required"));
        };
        normalize_stock(raw)
            .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "stock must not be blank"))
    }

    fn max_articles(&self) -> usize {
        self.max_articles
            .unwrap_or(DEFAULT_MAX_ARTICLES)
            .clamp(1, MAX_ARTICLES_CAP)
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ApiErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

async fn popular_stocks() -> Json<Vec<&'static str>> {
    Json(POPULAR_STOCKS.to_vec())
}

#[derive(Debug, Serialize)]
struct MarketContext {
    stock: String,
    news: Vec<Article>,
    source: &'static str,
    timestamp: String,
}

async fn market_context(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<MarketContext>, ApiError> {
    let stock = query.stock()?;
    let news = state
        .news
        .fetch_latest(&stock, query.max_articles())
        .await;

    Ok(Json(MarketContext {
        stock,
        news,
        source: state.news.provider_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let stock = query.stock()?;
    let report = analyze_stock(
        state.news.as_ref(),
        &state.analyzer,
        &stock,
        query.max_articles(),
    )
    .await
    .ok_or_else(|| {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("could not fetch news articles for {stock}; try a different stock symbol"),
        )
    })?;

    Ok(Json(report))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &tickersense_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
