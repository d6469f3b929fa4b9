use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::Deserialize;
use tracing::{debug, info};

use shoefinder_common::{CatalogTable, Gender};

use crate::catalog::{CatalogQuery, CatalogRow};
use crate::error::ApiError;
use crate::AppState;

// --- Request bodies ---

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    text: Option<String>,
}

#[derive(Deserialize)]
pub struct TopSellingRequest {
    gender: Option<String>,
}

// --- Handlers ---

/// `POST /analyze`: free text → intent → filtered catalog rows.
///
/// A body that is missing or not JSON is treated the same as missing text.
pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Vec<CatalogRow>>, ApiError> {
    let text = match body {
        Ok(Json(AnalyzeRequest { text: Some(text) })) => text,
        Ok(_) => return Err(ApiError::MissingText),
        Err(rejection) => {
            debug!(error = %rejection, "Rejected /analyze body");
            return Err(ApiError::MissingText);
        }
    };

    let intent = state.analyzer.analyze(&text).await?;
    let table = intent.table().ok_or_else(|| {
        info!(
            gender = ?intent.gender,
            footwear_type = ?intent.footwear_type,
            "No catalog table for intent"
        );
        ApiError::UnresolvedTable
    })?;

    let has_type_column = state
        .catalog
        .has_type_column(table)
        .await
        .map_err(ApiError::Database)?;

    let query = CatalogQuery::filter(table, &intent, has_type_column);
    let rows = state
        .catalog
        .fetch(&query)
        .await
        .map_err(ApiError::Database)?;

    info!(%table, rows = rows.len(), "Analyze query served");
    Ok(Json(rows))
}

/// `POST /top-selling`: the five most-rated sport shoes for men or women.
pub async fn api_top_selling(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TopSellingRequest>, JsonRejection>,
) -> Result<Json<Vec<CatalogRow>>, ApiError> {
    let table = body
        .ok()
        .and_then(|Json(req)| req.gender)
        .and_then(|g| Gender::from_code(&g.trim().to_lowercase()))
        .and_then(CatalogTable::top_sellers)
        .ok_or(ApiError::InvalidGender)?;

    let rows = state
        .catalog
        .fetch(&CatalogQuery::top_selling(table))
        .await
        .map_err(ApiError::Database)?;

    Ok(Json(rows))
}

pub async fn health() -> &'static str {
    "ok"
}
