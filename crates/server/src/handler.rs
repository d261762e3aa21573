//! Request handlers for the heatmap HTTP API.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use heatmap::{Heatmap, HeatmapError, LoadReport, QueryFilter};
use heatmap_types::QueryResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub heatmap: Heatmap,
    pub dataset: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(heatmap: Heatmap, dataset: Option<PathBuf>) -> Self {
        Self {
            heatmap,
            dataset: dataset.map(Arc::new),
        }
    }
}

/// Query string of `GET /v1/ipv6`.
///
/// Bounds are kept as strings so that a missing or malformed value is
/// reported with the name of the offending parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub min_latitude: Option<String>,
    pub max_latitude: Option<String>,
    pub min_longitude: Option<String>,
    pub max_longitude: Option<String>,
}

impl ListParams {
    pub fn to_filter(&self) -> Result<QueryFilter, HeatmapError> {
        let bound = |v: &Option<String>| v.as_deref().unwrap_or_default().to_owned();
        Ok(QueryFilter::parse_bounds(
            &bound(&self.min_latitude),
            &bound(&self.max_latitude),
            &bound(&self.min_longitude),
            &bound(&self.max_longitude),
        )?)
    }
}

/// `GET /v1/ipv6`: aggregated points inside the requested box.
pub async fn list_ipv6(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let filter = params.to_filter()?;
    let result: QueryResult = state.heatmap.query(&filter)?;
    tracing::debug!(
        "list : {} points, maxCount {} for {:?}",
        result.len(),
        result.max_count,
        filter
    );

    let mut response = Json(result).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(response)
}

/// `POST /v1/admin/reload`: rebuild from the configured dataset and publish.
///
/// Runs without the request deadline; the response is sent once the new
/// snapshot is live or the load has failed.
pub async fn reload(State(state): State<AppState>) -> Result<Json<LoadReport>, ApiError> {
    let Some(path) = state.dataset.clone() else {
        return Err(ApiError::NoDataset);
    };

    let heatmap = state.heatmap.clone();
    let report = tokio::task::spawn_blocking(move || heatmap.load_path(path.as_path()))
        .await
        .map_err(|e| ApiError::Internal(format!("reload task failed: {}", e)))??;

    tracing::info!(
        "reload : published generation {} ({} points)",
        report.generation,
        report.distinct_points
    );
    Ok(Json(report))
}

/// Errors returned to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    Heatmap(HeatmapError),
    NoDataset,
    Timeout,
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Heatmap(err) => match err {
                HeatmapError::InvalidFilter { .. } | HeatmapError::InvertedFilter => {
                    StatusCode::BAD_REQUEST
                }
                HeatmapError::IndexUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                HeatmapError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                HeatmapError::Io(_) | HeatmapError::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::NoDataset => StatusCode::NOT_FOUND,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Heatmap(err) => write!(f, "{}", err),
            ApiError::NoDataset => write!(f, "no dataset configured for reload"),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<HeatmapError> for ApiError {
    fn from(err: HeatmapError) -> Self {
        ApiError::Heatmap(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed : {}", self);
        } else {
            tracing::debug!("request rejected : {}", self);
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap::FilterBound;

    fn params(min_lat: &str, max_lat: &str, min_lon: &str, max_lon: &str) -> ListParams {
        ListParams {
            min_latitude: Some(min_lat.into()),
            max_latitude: Some(max_lat.into()),
            min_longitude: Some(min_lon.into()),
            max_longitude: Some(max_lon.into()),
        }
    }

    #[test]
    fn test_params_to_filter() {
        let filter = params("0", "2", "37", "39.5").to_filter().unwrap();
        assert_eq!(filter, QueryFilter::new(0.0, 2.0, 37.0, 39.5));
    }

    #[test]
    fn test_missing_param_names_bound() {
        let mut p = params("0", "2", "37", "39");
        p.max_longitude = None;
        match p.to_filter() {
            Err(HeatmapError::InvalidFilter { bound, value }) => {
                assert_eq!(bound, FilterBound::MaxLongitude);
                assert!(value.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(HeatmapError::InvertedFilter).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(HeatmapError::IndexUnavailable).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::NoDataset.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
