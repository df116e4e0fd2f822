//! Route handlers

use crate::extract::ProductData;
use crate::pipeline::ProductQuery;
use crate::server::{ApiError, AppState};
use crate::store::{StoreError, StoredProduct};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

const MISSING_URL: &str = "Amazon URL is required";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchImageRequest {
    pub amazon_url: Option<String>,
    pub retries: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct FetchImageParams {
    pub url: Option<String>,
    pub retries: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub amazon_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchImageResponse {
    pub success: bool,
    pub data: ProductData,
}

#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub success: bool,
    pub product: StoredProduct,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<StoredProduct>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn fetch_image_post(
    State(state): State<AppState>,
    payload: Result<Json<FetchImageRequest>, JsonRejection>,
) -> Result<Json<FetchImageResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let url = require_url(request.amazon_url)?;
    let data = run_extraction(&state, url, request.retries).await?;

    Ok(Json(FetchImageResponse {
        success: true,
        data,
    }))
}

pub async fn fetch_image_get(
    State(state): State<AppState>,
    params: Result<Query<FetchImageParams>, QueryRejection>,
) -> Result<Json<FetchImageResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let url = require_url(params.url)?;
    let data = run_extraction(&state, url, params.retries).await?;

    Ok(Json(FetchImageResponse {
        success: true,
        data,
    }))
}

pub async fn list_products(State(state): State<AppState>) -> Json<ProductList> {
    Json(ProductList {
        products: state.store.list_all(),
    })
}

pub async fn add_product(
    State(state): State<AppState>,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let url = require_url(request.amazon_url)?;
    let data = run_extraction(&state, url, None).await?;
    let product = state.store.append(data);

    tracing::info!(id = %product.id, title = %product.title, "product added");
    Ok((
        StatusCode::CREATED,
        Json(AddProductResponse {
            success: true,
            product,
        }),
    ))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .remove_by_id(&id)
        .map_err(|e: StoreError| ApiError::not_found(e.to_string()))?;

    tracing::info!(id = %removed.id, "product removed");
    Ok(StatusCode::NO_CONTENT)
}

fn require_url(url: Option<String>) -> Result<String, ApiError> {
    match url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(ApiError::bad_request(MISSING_URL)),
    }
}

async fn run_extraction(
    state: &AppState,
    url: String,
    retries: Option<u32>,
) -> Result<ProductData, ApiError> {
    let attempts = retries.unwrap_or_else(|| state.scraper.default_attempts());
    let query = ProductQuery::new(url);

    state
        .scraper
        .run_with_deadline(&query, attempts, state.request_deadline)
        .await
        .map_err(ApiError::from)
}
