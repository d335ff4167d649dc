use crate::advice::CoachAdvice;
use crate::backup;
use crate::date_key::DateKey;
use crate::errors::AppError;
use crate::models::{DerivedStats, ImportResponse, RecordsResponse, ToggleRequest, ToggleResponse};
use crate::state::AppState;
use crate::streak::build_stats;
use axum::{Json, extract::State, http::header, response::IntoResponse};
use tracing::info;

pub async fn get_records(State(state): State<AppState>) -> Json<RecordsResponse> {
    let store = state.store.lock().await;
    Json(RecordsResponse {
        dates: store.snapshot(),
    })
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let date = match payload.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => DateKey::parse(raw)?,
        _ => DateKey::today(),
    };

    let mut store = state.store.lock().await;
    let completed = store.toggle(date.clone()).await;

    Ok(Json(ToggleResponse { date, completed }))
}

pub async fn clear(State(state): State<AppState>) -> Json<DerivedStats> {
    let mut store = state.store.lock().await;
    store.clear().await;
    info!("cleared all workout records");
    Json(build_stats(&store))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<DerivedStats> {
    let store = state.store.lock().await;
    Json(build_stats(&store))
}

pub async fn export_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = {
        let store = state.store.lock().await;
        backup::export(&store).map_err(AppError::internal)?
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        backup::export_filename(&DateKey::today())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn import_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let dates = backup::import(&body)?;
    let imported = dates.len();

    let mut store = state.store.lock().await;
    store.replace_all(dates).await;
    info!(imported, "imported workout backup");

    Ok(Json(ImportResponse { imported }))
}

pub async fn advice(State(state): State<AppState>) -> Json<CoachAdvice> {
    // Snapshot first so the store is not locked across the provider call.
    let dates = state.store.lock().await.snapshot();
    Json(state.coach.request(dates).await)
}
