use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use layer_farm_dashboard::config::{load_config, Config, ConfigFormat};
use layer_farm_dashboard::export::{to_csv_bytes, CSV_FILE_NAME, CSV_MIME};
use layer_farm_dashboard::view::{render_dataset, resolve_seed, DashboardView};
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

#[derive(Clone)]
struct AppState {
    web_root: PathBuf,
    config: Config,
}

/// Replays a render: the page passes back the date and seed it was given.
#[derive(Debug, Default, Deserialize)]
struct RenderParams {
    date: Option<NaiveDate>,
    seed: Option<u64>,
}

impl RenderParams {
    fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Handler failure rendered as a 500 with the error text.
struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let web_root = PathBuf::from(env_or("WEB_UI_ROOT", "web-ui"));

    let config = match std::env::var_os("DASHBOARD_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            load_config(&path, ConfigFormat::Auto)
                .with_context(|| format!("load config {}", path.display()))?
        }
        None => Config::sample(),
    };

    let state = AppState {
        web_root: web_root.clone(),
        config,
    };

    let static_svc = ServeDir::new(web_root);

    let app = Router::new()
        .route("/", get(index))
        .route("/api/dashboard", get(dashboard))
        .route("/api/dataset", get(dataset))
        .route("/download.csv", get(download_csv))
        .fallback_service(static_svc)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(DefaultOnResponse::new().include_headers(false)),
        )
        .with_state(Arc::new(state));

    let bind: SocketAddr = env_or("WEB_UI_BIND", "0.0.0.0:8080")
        .parse()
        .context("invalid WEB_UI_BIND")?;

    tracing::info!(?bind, "dashboard server starting");

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

async fn index(State(state): State<Arc<AppState>>, uri: Uri) -> impl IntoResponse {
    let p = state.web_root.join("index.html");
    match tokio::fs::read_to_string(&p).await {
        Ok(s) => Html(s).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, format!("missing {}: {e}", uri)).into_response(),
    }
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RenderParams>,
) -> Result<Json<DashboardView>, AppError> {
    let seed = resolve_seed(&state.config, params.seed);
    Ok(Json(DashboardView::render_with_seed(&state.config, params.date(), seed)?))
}

async fn dataset(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RenderParams>,
) -> Result<Response, AppError> {
    let seed = resolve_seed(&state.config, params.seed);
    let ds = render_dataset(&state.config, params.date(), seed)?;
    Ok(Json(ds).into_response())
}

async fn download_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RenderParams>,
) -> Result<Response, AppError> {
    let seed = resolve_seed(&state.config, params.seed);
    let date = params.date();
    let ds = render_dataset(&state.config, date, seed)?;
    tracing::debug!(%date, seed, "csv download");
    let body = to_csv_bytes(&ds)?;
    let disposition = format!("attachment; filename=\"{CSV_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, format!("{CSV_MIME}; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
