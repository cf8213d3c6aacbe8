use crate::config::AppConfig;
use crate::types::{Boundary, Marker};
use crate::view::{self, FeatureStyle, MapSession, Tooltip, ViewSettings};
use anyhow::Result;
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo::Point;
use rstar::{RTree, RTreeObject, AABB};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

// Wrapper for RTree indexing
pub struct AreaIndex {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for AreaIndex {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Shared, read-only. Hover state lives in each client.
pub struct AppState {
    pub session: MapSession,
    pub tree: RTree<AreaIndex>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, session: MapSession) -> Self {
        let tree = build_index(session.boundaries());
        Self {
            session,
            tree,
            config,
        }
    }

    /// Boundary containing the pointer position, if any.
    pub fn hit_test(&self, lat: f64, lon: f64) -> Option<&Boundary> {
        let point = Point::new(lon, lat);
        let envelope = AABB::from_point([lon, lat]);
        let boundaries = self.session.boundaries();

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|candidate| boundaries.get(candidate.index))
            .find(|area| area.geometry.contains(&point))
    }
}

fn build_index(boundaries: &[Boundary]) -> RTree<AreaIndex> {
    let items: Vec<AreaIndex> = boundaries
        .iter()
        .enumerate()
        .filter_map(|(i, area)| {
            let rect = area.geometry.bounding_rect()?;
            Some(AreaIndex {
                index: i,
                aabb: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
            })
        })
        .collect();
    RTree::bulk_load(items)
}

#[derive(Deserialize)]
pub struct QueryParams {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
pub struct NameParams {
    name: String,
}

#[derive(Deserialize)]
pub struct StyleParams {
    name: String,
    active: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.server.asset_dir);

    Router::new()
        .route("/api/markers", get(markers_handler))
        .route("/api/taluka", get(taluka_handler))
        .route("/api/query", get(query_handler))
        .route("/api/style", get(style_handler))
        .route("/api/view", get(view_handler))
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, session: MapSession) -> Result<()> {
    info!(boundaries = session.boundaries().len(), "building spatial index");
    let port = config.server.port;
    let state = Arc::new(AppState::new(config, session));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn markers_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Marker>> {
    Json(state.session.markers().to_vec())
}

async fn taluka_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameParams>,
) -> Json<Tooltip> {
    Json(state.session.describe(&params.name))
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Json<Option<Tooltip>> {
    Json(
        state
            .hit_test(params.lat, params.lon)
            .map(|area| state.session.describe(&area.name)),
    )
}

async fn style_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StyleParams>,
) -> Json<FeatureStyle> {
    let resolver = state.session.resolver();
    let highlighted = params.active.as_deref().is_some_and(|active| {
        resolver.canonical_name(active) == resolver.canonical_name(&params.name)
    });
    Json(view::style_for(&state.config.style, highlighted))
}

async fn view_handler(State(state): State<Arc<AppState>>) -> Json<ViewSettings> {
    Json(state.session.settings())
}
