use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/records",
            get(handlers::get_records).delete(handlers::clear),
        )
        .route("/api/records/toggle", post(handlers::toggle))
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/backup",
            get(handlers::export_backup).post(handlers::import_backup),
        )
        .route("/api/advice", post(handlers::advice))
        .with_state(state)
}
