//! Query server for region lookups.
//!
//! Exposes identifier lookups, point-to-country coding and leveled
//! hierarchy lookups over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use regioncoder::config::Config;
use regioncoder::{CodingOptions, CountryCoder, Region, RegionCatalog};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Region lookup server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Region dataset overriding the embedded default (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    coder: CountryCoder,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Regioncoder Query Server");

    let dataset = args.dataset.or_else(|| config.dataset_path.clone());
    let catalog = RegionCatalog::load(dataset.as_deref()).context("Failed to load region dataset")?;

    info!(
        "Loaded {} regions ({} with geometry, {} identifiers)",
        catalog.len(),
        catalog.with_geometry(),
        catalog.identifier_count()
    );

    let state = Arc::new(AppState {
        coder: CountryCoder::new(Arc::new(catalog)),
    });

    let listen = args.listen.as_deref().unwrap_or(config.listen()).to_string();
    let app = router(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/region/{id}", get(region_handler))
        .route("/v1/country", get(country_handler))
        .route("/v1/name", get(name_handler))
        .route("/v1/name/{code}", get(name_by_code_handler))
        .route("/v1/lookup", get(lookup_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        regions: state.coder.catalog().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    regions: usize,
}

/// Region by any identifying string
async fn region_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Region>, StatusCode> {
    state
        .coder
        .region(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// ISO alpha-2 code for a point; empty when nothing contains it
async fn country_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Json<CodeResponse> {
    Json(CodeResponse {
        code: state.coder.iso1_a2_code(params.lat, params.lon),
    })
}

/// English country name for a point
async fn name_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointParams>,
) -> Json<NameResponse> {
    Json(NameResponse {
        name: state.coder.name_en(params.lat, params.lon),
    })
}

/// English name for a code, or the upper-cased code
async fn name_by_code_handler(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Json<NameResponse> {
    Json(NameResponse {
        name: state.coder.name_en_by_code(&code),
    })
}

/// Region at a level containing a point
async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LookupParams>,
) -> Result<Json<Region>, StatusCode> {
    let opts = CodingOptions {
        level: params.level,
        max_level: params.max_level,
        with_prop: params.with_prop,
    };

    state
        .coder
        .region_for_location(params.lat, params.lon, &opts)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Deserialize)]
struct PointParams {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct LookupParams {
    lat: f64,
    lon: f64,
    /// Target level (defaults to country)
    level: Option<String>,
    /// Coarsest acceptable level (defaults to world)
    max_level: Option<String>,
    /// Required non-empty property
    with_prop: Option<String>,
}

#[derive(Serialize)]
struct CodeResponse {
    code: String,
}

#[derive(Serialize)]
struct NameResponse {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "id": "US", "iso1A2": "US", "nameEn": "United States",
                        "level": "country", "groups": ["021", "UN"]
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-130, 20], [-60, 20], [-60, 50], [-130, 50], [-130, 20]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"id": "021", "m49": "021", "nameEn": "Northern America", "level": "subregion"},
                    "geometry": null
                },
                {
                    "type": "Feature",
                    "properties": {"id": "UN", "nameEn": "United Nations", "level": "unitedNations"},
                    "geometry": null
                }
            ]
        })
        .to_string();
        let catalog = RegionCatalog::from_geojson(&data).unwrap();
        router(Arc::new(AppState {
            coder: CountryCoder::new(Arc::new(catalog)),
        }))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["regions"], 3);
    }

    #[tokio::test]
    async fn test_country_code() {
        let (_, body) = get_json("/v1/country?lat=40&lon=-100").await;
        assert_eq!(body["code"], "US");
        let (_, body) = get_json("/v1/country?lat=0&lon=0").await;
        assert_eq!(body["code"], "");
    }

    #[tokio::test]
    async fn test_region_by_identifier() {
        let (status, body) = get_json("/v1/region/united-states").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "US");
        assert_eq!(body["nameEn"], "United States");

        let (status, _) = get_json("/v1/region/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_names() {
        let (_, body) = get_json("/v1/name?lat=40&lon=-100").await;
        assert_eq!(body["name"], "United States");
        let (_, body) = get_json("/v1/name/us").await;
        assert_eq!(body["name"], "United States");
        let (_, body) = get_json("/v1/name/zz").await;
        assert_eq!(body["name"], "ZZ");
    }

    #[tokio::test]
    async fn test_leveled_lookup() {
        let (status, body) = get_json("/v1/lookup?lat=40&lon=-100&level=subregion").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "021");

        let (status, body) =
            get_json("/v1/lookup?lat=40&lon=-100&level=subregion&with_prop=iso1A2").await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

        let (status, _) = get_json("/v1/lookup?lat=40&lon=-100&level=bogus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
