use std::net::SocketAddr;
use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fakeloc::io::cache::CacheKey;
use fakeloc::io::hyperedge::load_hyperedge_csv;
use fakeloc::io::risk::load_risk;
use fakeloc::io::run_log::write_generation_log;
use fakeloc::io::trajectory::load_trajectory_npy;
use fakeloc::pipeline::{plausible_hyperedges, GenerationSummary};
use fakeloc::projection::HyperedgeSequences;
use fakeloc::GeneratorConfig;

#[derive(Clone)]
struct AppState {
    data_dir: PathBuf,
    log_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    trajectory_path: String,
    risk_path: Option<String>,
    hyperedge_path: String,
    cache_path: Option<String>,
    #[serde(default)]
    config: GeneratorConfig,
    #[serde(default)]
    include_sequences: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    return_code: i32,
    run_id: String,
    cache_path: String,
    log_path: String,
    summary: GenerationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequences: Option<SequencesBody>,
}

#[derive(Debug, Serialize)]
struct SequencesBody {
    real: Vec<std::collections::BTreeMap<usize, Vec<i64>>>,
    fake: Vec<std::collections::BTreeMap<usize, Vec<i64>>>,
}

impl From<HyperedgeSequences> for SequencesBody {
    fn from(s: HyperedgeSequences) -> Self {
        Self { real: s.real, fake: s.fake }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
    let log_dir = PathBuf::from(std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let state = AppState { data_dir, log_dir };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/generate", post(generate))
        .route("/runs/:run_id", get(run_log))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse().expect("invalid HOST/PORT");
    info!(%addr, "fakeloc-api listening");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind failed");
    axum::serve(listener, app).await.expect("server failed");
}

async fn healthz() -> impl IntoResponse {
    Json(json!({"ok": true}))
}

async fn generate(State(st): State<AppState>, Json(req): Json<GenerateRequest>) -> impl IntoResponse {
    // Loading and generation are blocking CPU work.
    let join = tokio::task::spawn_blocking(move || generate_sync(&st, req));

    match join.await {
        Ok(Ok(resp)) => (StatusCode::OK, Json(resp)).into_response(),
        Ok(Err((code, body))) => (code, Json(body)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"return_code": 2, "error": format!("join error: {e}")})),
        )
            .into_response(),
    }
}

fn bad_request(what: &str, e: anyhow::Error) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::BAD_REQUEST,
        json!({"return_code": 1, "error": format!("{what}: {e:#}")}),
    )
}

/// Join a client-supplied relative path onto `data_dir`. Absolute paths and
/// any `..` component are refused so reads and cache writes stay inside it.
fn resolve_in_data_dir(data_dir: &FsPath, requested: &str) -> anyhow::Result<String> {
    let rel = FsPath::new(requested);
    anyhow::ensure!(!requested.is_empty(), "empty path");
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => anyhow::bail!("path must be relative to the data directory: {}", requested),
        }
    }
    let joined = data_dir.join(rel);
    joined
        .to_str()
        .map(str::to_owned)
        .with_context(|| format!("path is not valid UTF-8: {}", joined.display()))
}

fn generate_sync(st: &AppState, req: GenerateRequest) -> Result<GenerateResponse, (StatusCode, serde_json::Value)> {
    let cfg = req.config;
    cfg.check().map_err(|e| bad_request("invalid generator config", e))?;
    if cfg.strategy.needs_risk() && req.risk_path.is_none() {
        return Err(bad_request(
            "missing risk_path",
            anyhow::anyhow!("the {} strategy needs a risk matrix", cfg.strategy.as_str()),
        ));
    }

    let trajectory_path = resolve_in_data_dir(&st.data_dir, &req.trajectory_path)
        .map_err(|e| bad_request("invalid trajectory_path", e))?;
    let risk_path = match &req.risk_path {
        Some(p) => Some(resolve_in_data_dir(&st.data_dir, p).map_err(|e| bad_request("invalid risk_path", e))?),
        None => None,
    };
    let hyperedge_path = resolve_in_data_dir(&st.data_dir, &req.hyperedge_path)
        .map_err(|e| bad_request("invalid hyperedge_path", e))?;
    // Same layout the offline tooling uses: <data_dir>/<strategy>/fake_traj_<seed>.npy
    let cache_path = match &req.cache_path {
        Some(p) => PathBuf::from(resolve_in_data_dir(&st.data_dir, p).map_err(|e| bad_request("invalid cache_path", e))?),
        None => st
            .data_dir
            .join(cfg.strategy.as_str())
            .join(format!("fake_traj_{}.npy", cfg.seed)),
    };

    let run_id = format!("{}-{}-{}", cfg.strategy.as_str(), cfg.seed, now_millis());

    let real = load_trajectory_npy(&trajectory_path)
        .map_err(|e| bad_request("failed to load trajectories", e))?;
    let risk = match &risk_path {
        Some(p) => Some(load_risk(p).map_err(|e| bad_request("failed to load risk matrix", e))?),
        None => None,
    };
    let table = load_hyperedge_csv(&hyperedge_path, cfg.segments)
        .map_err(|e| bad_request("failed to load hyperedge index", e))?;

    let key = CacheKey::new(cache_path.clone());

    let out = plausible_hyperedges(&real, risk.as_ref(), &table, &cfg, &key).map_err(|e| {
        error!(run_id = %run_id, error = %e, "generation failed");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"return_code": 1, "error": format!("generation failed: {e}")}),
        )
    })?;

    let log_path = write_generation_log(&st.log_dir, &run_id, &out.summary).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"return_code": 2, "error": format!("failed to write run log: {e:#}")}),
        )
    })?;

    Ok(GenerateResponse {
        return_code: 0,
        run_id,
        cache_path: cache_path.display().to_string(),
        log_path: log_path.display().to_string(),
        summary: out.summary,
        sequences: req.include_sequences.then(|| out.sequences.into()),
    })
}

async fn run_log(State(st): State<AppState>, Path(run_id): Path<String>) -> impl IntoResponse {
    if run_id.contains('/') || run_id.contains("..") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid run id"}))).into_response();
    }
    let path = st.log_dir.join(format!("fakeloc_{}.txt", run_id));
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, Json(json!({"error": "no run found"}))).into_response(),
    }
}

fn now_millis() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
