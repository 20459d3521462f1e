use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Html,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    core::SnapshotError,
    countries::{CountryRecord, DEFAULT_COUNTRY},
    snapshot::render_share_page,
    web::{
        error::{AppError, AppResult},
        state::AppState,
    },
    weeks::{DEFAULT_AGE, WeekBreakdown, compute, validate_inputs},
};

const NO_IMAGE_DATA: &str = "No image data provided";

#[derive(Debug, Deserialize)]
pub struct SaveImageRequest {
    #[serde(rename = "imageData", default)]
    pub image_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveImageResponse {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeksQuery {
    pub age: Option<f64>,
    pub life_expectancy: Option<f64>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeksResponse {
    #[serde(flatten)]
    pub weeks: WeekBreakdown,
    pub age: f64,
    pub life_expectancy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountriesQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub snapshots: usize,
}

pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        snapshots: state.store.len().await,
    })
}

pub async fn save_image(
    State(state): State<AppState>,
    payload: Result<Json<SaveImageRequest>, JsonRejection>,
) -> AppResult<Json<SaveImageResponse>> {
    let Json(request) = payload.map_err(image_rejection)?;
    let image_data = request
        .image_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::validation(NO_IMAGE_DATA))?;

    let id = state.store.put(image_data).await.map_err(save_failure)?;
    info!(id = %id, "image saved");

    Ok(Json(SaveImageResponse { id }))
}

/// Any unreadable body other than an oversized one is reported as missing
/// image data.
fn image_rejection(rejection: JsonRejection) -> AppError {
    match AppError::from(rejection) {
        AppError::PayloadTooLarge => AppError::PayloadTooLarge,
        _ => AppError::validation(NO_IMAGE_DATA),
    }
}

pub async fn show_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let entry = state.store.get(&id).await.map_err(serve_failure)?;
    Ok(Html(render_share_page(&entry.payload)))
}

pub async fn compute_weeks(
    State(state): State<AppState>,
    query: Result<Query<WeeksQuery>, QueryRejection>,
) -> AppResult<Json<WeeksResponse>> {
    let Query(query) = query?;
    let age = query.age.unwrap_or(DEFAULT_AGE);

    let (life_expectancy, country) = match (query.life_expectancy, query.country) {
        (Some(value), country) => (value, country),
        (None, Some(country)) => {
            let record = state
                .countries
                .lookup(&country)
                .ok_or_else(|| AppError::validation(format!("unknown country: {country}")))?;
            (record.life_expectancy, Some(record.country.clone()))
        }
        (None, None) => (
            state.countries.life_expectancy_or_default(DEFAULT_COUNTRY),
            Some(DEFAULT_COUNTRY.to_string()),
        ),
    };

    validate_inputs(age, life_expectancy)?;
    let weeks = compute(age, life_expectancy);

    Ok(Json(WeeksResponse {
        summary: weeks.summary(),
        weeks,
        age,
        life_expectancy,
        country,
    }))
}

pub async fn list_countries(
    State(state): State<AppState>,
    query: Result<Query<CountriesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<CountryRecord>>> {
    let Query(query) = query?;
    let records = state
        .countries
        .search(query.search.as_deref().unwrap_or_default())
        .cloned()
        .collect();
    Ok(Json(records))
}

fn save_failure(err: SnapshotError) -> AppError {
    match err {
        SnapshotError::Validation(_) => AppError::validation(NO_IMAGE_DATA),
        other => {
            error!(error = %other, "error saving image");
            AppError::internal("Failed to save image")
        }
    }
}

fn serve_failure(err: SnapshotError) -> AppError {
    match err {
        SnapshotError::NotFound(_) => AppError::not_found("Image not found"),
        other => {
            error!(error = %other, "error serving image");
            AppError::internal("Failed to serve image")
        }
    }
}
