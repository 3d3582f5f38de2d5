use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::tracer::{FlowQuery, FlowResult, TraceSummary};

const DEFAULT_CHAIN: &str = "ethereum";
const DEFAULT_RECENT_LIMIT: usize = 20;

/// Body of `POST /api/trace/flow`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    /// Any JSON number; clamped into the supported hop range.
    #[serde(default)]
    pub max_hops: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FlowResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: FlowResult,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn trace_flow(
    State(state): State<AppState>,
    payload: Result<Json<FlowRequest>, JsonRejection>,
) -> Result<Json<FlowResponse>, ApiError> {
    let Json(request) = payload?;
    let inner = state.inner.load_full();
    let config = &inner.config;

    let query = FlowQuery::new(
        request.from.as_deref().unwrap_or_default(),
        request.to.as_deref().unwrap_or_default(),
        request.chain.as_deref().unwrap_or(DEFAULT_CHAIN),
        request
            .max_hops
            .map(requested_hops)
            .unwrap_or(i64::from(config.tracer.default_max_hops)),
    )?;

    if config.security.strict_validation
        && !(query.from().is_well_formed() && query.to().is_well_formed())
    {
        return Err(ApiError::BadRequest(
            "Addresses must be 0x-prefixed 20-byte hex".to_string(),
        ));
    }

    tracing::info!(
        from = %query.from(),
        to = %query.to(),
        chain = query.chain_name(),
        chain_id = %query.chain().chain_id(),
        max_hops = query.max_hops(),
        "Tracing flow"
    );

    let start = Instant::now();
    match inner.tracer.trace(&query).await {
        Ok(result) => {
            let outcome = if result.found { "found" } else { "not_found" };
            metrics::record_trace(outcome, result.paths.len(), start);
            tracing::info!(
                paths = result.paths.len(),
                total_amount = result.total_amount,
                execution_time_ms = result.execution_time_ms,
                "Flow trace complete"
            );

            state.history.record(TraceSummary::from_result(&result));
            Ok(Json(FlowResponse {
                success: true,
                result,
            }))
        }
        Err(e) => {
            metrics::record_trace("error", 0, start);
            tracing::error!(error = %e, "Flow trace failed");
            Err(e.into())
        }
    }
}

/// Whole hop count from a JSON number. Fractions round down and values
/// outside `i64` saturate, so the query clamp always applies.
fn requested_hops(raw: f64) -> i64 {
    raw.floor() as i64
}

pub async fn recent_traces(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Json<Vec<TraceSummary>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(state.history.capacity());
    Json(state.history.recent(limit))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_hops_saturates_and_floors() {
        assert_eq!(requested_hops(2.5), 2);
        assert_eq!(requested_hops(3.0), 3);
        assert_eq!(requested_hops(-0.5), -1);
        assert_eq!(requested_hops(1e30), i64::MAX);
        assert_eq!(requested_hops(-1e30), i64::MIN);
    }

    #[test]
    fn test_flow_request_accepts_any_number() {
        let request: FlowRequest =
            serde_json::from_str(r#"{"from":"a","to":"b","maxHops":99999999999999999999}"#).unwrap();
        assert_eq!(request.max_hops.map(requested_hops), Some(i64::MAX));

        let request: FlowRequest = serde_json::from_str(r#"{"from":"a","to":"b","maxHops":4}"#).unwrap();
        assert_eq!(request.max_hops, Some(4.0));
    }
}
