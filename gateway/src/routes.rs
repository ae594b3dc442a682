use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use system_health::{health_report, scan_file_storage, HealthReport, PieChart, ScanReport, Subsystem};
use uuid::Uuid;
use zelonia_sites::{build_map_view, MapPanel, MapView, SystemStatus};

use crate::controls::{ControlPanel, ControlUpdate};
use crate::{ui, AppState};

/// Header carrying the admin session token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub const LOGIN_FAILED: &str = "Invalid username or password";

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct SystemSummary {
    pub name: Subsystem,
    pub status: SystemStatus,
}

#[derive(Serialize)]
pub struct ScanResponse {
    pub report: ScanReport,
    pub chart: PieChart,
    pub message: &'static str,
}

fn token_from(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Uuid, (StatusCode, String)> {
    match token_from(headers) {
        Some(token) if state.sessions.is_admin(&token) => Ok(token),
        _ => Err((StatusCode::UNAUTHORIZED, "Admin login required".to_string())),
    }
}

fn parse_panel(panel: &str) -> Result<MapPanel, (StatusCode, String)> {
    panel
        .parse()
        .map_err(|e: zelonia_sites::SiteError| (StatusCode::NOT_FOUND, e.to_string()))
}

fn parse_subsystem(name: &str) -> Result<Subsystem, (StatusCode, String)> {
    name.parse()
        .map_err(|e: system_health::HealthError| (StatusCode::NOT_FOUND, e.to_string()))
}

pub async fn index() -> Html<&'static str> {
    Html(ui::INDEX_HTML)
}

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "zelonia-gateway",
        "admin_sessions": state.sessions.active(),
        "boundaries": state.boundaries.len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    match state.sessions.login(&req.username, &req.password) {
        Some(token) => {
            tracing::info!("Admin session opened for {}", req.username);
            Ok(Json(LoginResponse {
                token,
                message: "Logged in as Admin",
            }))
        }
        None => {
            tracing::warn!("Rejected login for {:?}", req.username);
            Err((StatusCode::UNAUTHORIZED, LOGIN_FAILED.to_string()))
        }
    }
}

/// 200 while the presented token is live, 401 otherwise
pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    require_admin(&state, &headers)?;
    Ok(Json(serde_json::json!({ "admin": true })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    match token_from(&headers) {
        Some(token) if state.sessions.logout(&token) => {
            tracing::info!("Admin session closed");
            StatusCode::NO_CONTENT
        }
        _ => StatusCode::UNAUTHORIZED,
    }
}

pub async fn get_controls(State(state): State<AppState>) -> Json<ControlPanel> {
    Json(state.controls.read().clone())
}

pub async fn update_controls(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<ControlUpdate>,
) -> ApiResult<ControlPanel> {
    require_admin(&state, &headers)?;

    if update.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Empty control update".to_string()));
    }

    tracing::debug!(
        "Control update: {} clusters, {} subsystems, attack server {:?}",
        update.clusters.len(),
        update.subsystems.len(),
        update.show_attack_server
    );

    let mut controls = state.controls.write();
    controls.apply(update);
    Ok(Json(controls.clone()))
}

pub async fn reset_controls(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ControlPanel> {
    require_admin(&state, &headers)?;

    let mut controls = state.controls.write();
    *controls = ControlPanel::default();
    tracing::info!("Control panel reset to defaults");
    Ok(Json(controls.clone()))
}

fn map_view(state: &AppState, panel: MapPanel) -> MapView {
    let controls = state.controls.read();
    build_map_view(
        panel,
        &controls.clusters,
        controls.show_attack_server,
        state.boundaries.as_ref().clone(),
    )
}

pub async fn get_map(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> ApiResult<MapView> {
    let panel = parse_panel(&panel)?;
    Ok(Json(map_view(&state, panel)))
}

pub async fn get_map_geojson(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> ApiResult<geojson::FeatureCollection> {
    let panel = parse_panel(&panel)?;
    Ok(Json(map_view(&state, panel).to_geojson()))
}

pub async fn list_systems(State(state): State<AppState>) -> Json<Vec<SystemSummary>> {
    let controls = state.controls.read();
    let systems = Subsystem::all()
        .into_iter()
        .map(|name| SystemSummary {
            name,
            status: controls.subsystem_status(name),
        })
        .collect();

    Json(systems)
}

pub async fn system_health(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<HealthReport> {
    let subsystem = parse_subsystem(&name)?;
    let status = state.controls.read().subsystem_status(subsystem);

    Ok(Json(health_report(subsystem, status, &mut rand::thread_rng())))
}

pub async fn scan_system(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ScanResponse> {
    let subsystem = parse_subsystem(&name)?;
    let status = state.controls.read().subsystem_status(subsystem);

    let report = scan_file_storage(subsystem, status, &mut rand::thread_rng());
    let chart = PieChart::from_scan(&report);
    tracing::info!("Scanned {} ({}): {} extensions", subsystem, status, report.shares.len());

    Ok(Json(ScanResponse {
        report,
        chart,
        message: "Scan complete!",
    }))
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/session", get(session_status).post(login).delete(logout))
        .route("/controls", get(get_controls).put(update_controls))
        .route("/controls/reset", post(reset_controls))
        .route("/map/:panel", get(get_map))
        .route("/map/:panel/geojson", get(get_map_geojson))
        .route("/systems", get(list_systems))
        .route("/systems/:name/health", get(system_health))
        .route("/systems/:name/scan", post(scan_system))
        .with_state(state)
}

/// Page, liveness probe and versioned API
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/api/v1", api_routes(state))
}
