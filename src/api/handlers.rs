//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ChartsResponse, ErrorResponse, SeriesQuery, SeriesRecord, StateResponse};

/// Returns configuration, GCR, daily summary and sample count.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let sim = &state.simulation;
    Json(StateResponse {
        config: sim.config.clone(),
        gcr: sim.gcr,
        summary: sim.summary.clone(),
        sample_count: sim.len(),
    })
}

/// Returns sample records, optionally filtered by timestep range.
///
/// `GET /series` → 200 + `Vec<SeriesRecord>` JSON
/// `GET /series?from=N&to=M` → filtered range (inclusive)
/// `GET /series?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<SeriesRecord> = state
        .simulation
        .samples
        .iter()
        .filter(|s| s.timestep >= from && s.timestep <= to)
        .map(SeriesRecord::from)
        .collect();

    Ok(Json(records))
}

/// Returns the power chart and the GHI-versus-crop chart.
///
/// `GET /charts` → 200 + `ChartsResponse` JSON
pub async fn get_charts(State(state): State<Arc<AppState>>) -> Json<ChartsResponse> {
    Json(ChartsResponse::from(&state.simulation))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::SiteConfig;
    use crate::sim::simulate;

    fn make_test_state() -> Arc<AppState> {
        let simulation = simulate(&SiteConfig::baseline()).unwrap();
        Arc::new(AppState { simulation })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn state_returns_200() {
        let (status, json) = get_json("/state").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("config").is_some());
        assert!(json.get("summary").is_some());
        assert_eq!(json["sample_count"], 1440);
        let gcr = json["gcr"].as_f64().unwrap_or_default();
        assert!((gcr - 0.3973).abs() < 1e-3);
        assert_eq!(json["config"]["site"]["date"], "2020-06-28");
    }

    #[tokio::test]
    async fn series_returns_all_steps() {
        let (status, json) = get_json("/series").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(1440));
    }

    #[tokio::test]
    async fn series_range_query() {
        let (status, json) = get_json("/series?from=600&to=605").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(6));
        assert_eq!(json[0]["timestep"], 600);
        assert_eq!(json[5]["timestep"], 605);
        assert!(json[0].get("power_dc_kw").is_some());
    }

    #[tokio::test]
    async fn series_invalid_range_returns_400() {
        let (status, json) = get_json("/series?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn charts_have_both_panels() {
        let (status, json) = get_json("/charts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["power"]["unit"], "kW");
        assert_eq!(json["power"]["points"].as_array().map(Vec::len), Some(1440));
        assert_eq!(json["irradiance"][0]["label"], "Above-panel GHI");
        assert_eq!(json["irradiance"][1]["label"], "Crop-level Irradiance");
    }
}
