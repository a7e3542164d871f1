use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use heatmap_packer::Packer;
use heatmap_packer::config::PackerConfig;
use heatmap_packer::render::Shade;
use heatmap_packer::types::{Item, Mode, Packing};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize)]
struct PackRequest {
    items: Vec<Item>,
    #[serde(default)]
    expanded: bool,
}

#[derive(Serialize)]
struct PackResponse {
    mode: Mode,
    columns: usize,
    rows: usize,
    placements: Vec<TileResponse>,
    visible_count: usize,
    hidden_count: usize,
    dropped: Vec<String>,
}

#[derive(Serialize)]
struct TileResponse {
    id: String,
    name: String,
    row: usize,
    col: usize,
    size: u32,
    requested: u32,
    shade: Shade,
}

fn validate(items: &[Item]) -> Result<(), String> {
    if let Some(pos) = items.iter().position(|it| it.id.trim().is_empty()) {
        return Err(format!("item {pos} has an empty id"));
    }
    Ok(())
}

fn build_response(packing: Packing, items: &[Item]) -> PackResponse {
    let visible_count = packing.visible().len();
    let hidden_count = packing.hidden_count(items.len());
    let placements = packing
        .placements
        .into_iter()
        .map(|p| {
            let item = items.iter().find(|it| it.id == p.id);
            TileResponse {
                name: item.map_or_else(|| p.id.clone(), |it| it.label().to_string()),
                shade: item
                    .map(|it| Shade::from_change(it.change_24h))
                    .unwrap_or(Shade::Neutral),
                id: p.id,
                row: p.row,
                col: p.col,
                size: p.size,
                requested: p.requested,
            }
        })
        .collect();

    PackResponse {
        mode: packing.mode,
        columns: packing.columns,
        rows: packing.rows,
        placements,
        visible_count,
        hidden_count,
        dropped: packing.dropped,
    }
}

async fn pack(
    State(config): State<Arc<PackerConfig>>,
    Json(req): Json<PackRequest>,
) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        items = req.items.len(),
        expanded = req.expanded,
        "POST /pack"
    );

    validate(&req.items).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let mode = if req.expanded {
        Mode::Expanded
    } else {
        Mode::Compact
    };
    let packing = Packer::new(config.as_ref().clone(), mode).pack(&req.items);

    Ok(Json(build_response(packing, &req.items)))
}

fn app(config: PackerConfig) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .with_state(Arc::new(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let config = match std::env::var("PACKER_CONFIG") {
        Ok(path) => PackerConfig::load(&path).expect("failed to load PACKER_CONFIG"),
        Err(_) => PackerConfig::default(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app(config)).await.unwrap();
}
