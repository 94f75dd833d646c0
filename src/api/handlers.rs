use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{
        CatalogSummary, OptionsResponse, QueryDefaults, RecommendationQuery,
        RecommendationResponse,
    },
    services,
};

use super::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// The single-page UI
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Known cities and cuisines for the page controls
pub async fn get_options(State(state): State<AppState>) -> AppResult<Json<OptionsResponse>> {
    let catalog = state.catalog().await?;
    let models = state.models().await?;

    Ok(Json(OptionsResponse {
        cities: models.cities.clone(),
        cuisines: catalog.cuisines().to_vec(),
        defaults: QueryDefaults::with_rating_count(state.config().default_rating_count),
    }))
}

/// Sizes of the loaded dataset and model
pub async fn get_catalog(State(state): State<AppState>) -> AppResult<Json<CatalogSummary>> {
    let catalog = state.catalog().await?;
    let models = state.models().await?;

    Ok(Json(CatalogSummary {
        restaurants: catalog.restaurants().len(),
        exploded_rows: catalog.exploded().len(),
        cuisines: catalog.cuisines().len(),
        cities: models.cities.len(),
        clusters: models.model.n_clusters(),
        feature_count: models.schema.len(),
        schema_version: models.schema.version(),
        loaded_at: catalog.loaded_at(),
    }))
}

/// Runs one recommendation query
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(query): Json<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        city = %query.city,
        cuisine = %query.cuisine,
        top_n = query.top_n,
        "Processing recommendation request"
    );

    let catalog = state.catalog().await?;
    let models = state.models().await?;

    let response = services::recommend(
        &catalog,
        &models,
        &query,
        state.config().default_rating_count,
    )?;

    tracing::info!(
        request_id = %request_id,
        cluster = response.cluster,
        result_count = response.results.len(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
