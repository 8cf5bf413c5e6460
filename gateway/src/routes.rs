//! HTTP routes
//!
//! Thin transport over the decision engine: handlers fetch provider
//! records, hand them to the engine, and relay the `Decision` wire shape
//! verbatim. No decision logic lives here.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use common::{Decision, SignalError};
use decision_engine::{
    build_checklist, scan_universe, ScanConstraints, ScanRow, StructuralCertaintyEngine,
    SwingScanReport, TradeChecklist,
};
use futures::future::join_all;
use market_data::MarketStructureProvider;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shared gateway state: one engine, one provider.
pub struct AppState {
    pub engine: StructuralCertaintyEngine,
    pub provider: Arc<dyn MarketStructureProvider>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/structural-certainty/daily", get(daily))
        .route("/api/structural-certainty/batch", post(batch))
        .route("/api/structural-certainty/scan", post(scan))
        .with_state(state)
}

/// Evaluation envelope: the decision wire contract plus transport-level
/// symbol and date stamps.
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub symbol: String,
    pub date: String,
    #[serde(flatten)]
    pub decision: Decision,
    pub checklist: TradeChecklist,
}

#[derive(Debug, Deserialize)]
pub struct DailyParams {
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub symbols: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub count: usize,
    pub results: Vec<BatchEntry>,
}

/// One per requested symbol, in request order. A failed symbol reports
/// its error without failing the batch.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Evaluated(EvaluationResponse),
    Failed { symbol: String, error: String },
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub scan_date: Option<String>,
    pub data: Option<Vec<ScanRow>>,
    pub constraints: Option<ScanConstraints>,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub scan_date: String,
    #[serde(flatten)]
    pub report: SwingScanReport,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/structural-certainty/daily?symbol=SPY
async fn daily(State(state): State<Arc<AppState>>, Query(params): Query<DailyParams>) -> Response {
    let symbol = match params.symbol.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => return bad_request("symbol required"),
    };

    match evaluate_symbol(&state, &symbol).await {
        Ok(evaluation) => (StatusCode::OK, Json(evaluation)).into_response(),
        Err(err) => signal_error_response(&symbol, &err),
    }
}

/// POST /api/structural-certainty/batch  { "symbols": ["SPY", "QQQ"] }
async fn batch(State(state): State<Arc<AppState>>, Json(request): Json<BatchRequest>) -> Response {
    let symbols = match request.symbols {
        Some(symbols) if !symbols.is_empty() => symbols,
        _ => return bad_request("missing or empty symbols list"),
    };

    let results = batch_results(&state, &symbols).await;
    (
        StatusCode::OK,
        Json(BatchResponse {
            count: results.len(),
            results,
        }),
    )
        .into_response()
}

/// POST /api/structural-certainty/scan
async fn scan(Json(request): Json<ScanRequest>) -> Response {
    let rows = match request.data {
        Some(rows) if !rows.is_empty() => rows,
        _ => return bad_request("no data rows provided"),
    };

    let constraints = request.constraints.unwrap_or_default();
    let report = scan_universe(&rows, &constraints);

    (
        StatusCode::OK,
        Json(ScanResponse {
            scan_date: request.scan_date.unwrap_or_else(today),
            report,
        }),
    )
        .into_response()
}

/// Fetch all provider records for a symbol concurrently and evaluate.
async fn evaluate_symbol(
    state: &AppState,
    symbol: &str,
) -> Result<EvaluationResponse, SignalError> {
    let (chain, volume, short) = tokio::join!(
        state.provider.chain_structure(symbol),
        state.provider.volume_pressure(symbol),
        state.provider.short_pressure(symbol),
    );

    let chain = chain?;
    let volume = volume?;
    // Short pressure is optional; a failed optional feed downgrades to
    // the OI path rather than failing the evaluation.
    let short = match short {
        Ok(record) => record,
        Err(err) => {
            warn!(symbol, error = %err, "short pressure feed failed, continuing without it");
            None
        }
    };

    let decision = state.engine.evaluate_raw(&chain, &volume, short.as_ref())?;
    let checklist = build_checklist(&decision);

    Ok(EvaluationResponse {
        symbol: symbol.to_uppercase(),
        date: today(),
        decision,
        checklist,
    })
}

/// Evaluate symbols concurrently, reassembling results in request order.
async fn batch_results(state: &AppState, symbols: &[String]) -> Vec<BatchEntry> {
    let evaluations = join_all(
        symbols
            .iter()
            .map(|symbol| async move { evaluate_symbol(state, symbol).await }),
    )
    .await;

    symbols
        .iter()
        .zip(evaluations)
        .map(|(symbol, result)| match result {
            Ok(evaluation) => BatchEntry::Evaluated(evaluation),
            Err(err) => BatchEntry::Failed {
                symbol: symbol.to_uppercase(),
                error: err.to_string(),
            },
        })
        .collect()
}

fn today() -> String {
    Utc::now().date_naive().to_string()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn signal_error_response(symbol: &str, err: &SignalError) -> Response {
    warn!(symbol, error = %err, "evaluation failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "symbol": symbol, "error": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Direction, ExecutionMode};
    use market_data::FixtureProvider;
    use serde_json::json;

    fn fixture_state() -> AppState {
        let provider = FixtureProvider::new()
            .with_chain(
                "SPY",
                json!({
                    "totalCallOI": 120_000,
                    "totalPutOI": 40_000,
                    "callOIDelta": 500,
                    "dealerGamma": 10.0
                }),
            )
            .with_volume(
                "SPY",
                json!({ "todayVolume": 2_000_000, "avg20Volume": 1_000_000 }),
            )
            .with_chain("QQQ", json!({ "calls_total": 50_000, "puts_total": 50_000 }))
            .with_volume("QQQ", json!({ "todayVolume": 0, "avg20Volume": 0 }));

        AppState {
            engine: StructuralCertaintyEngine::new(),
            provider: Arc::new(provider),
        }
    }

    #[tokio::test]
    async fn test_evaluate_symbol_authorized() {
        let state = fixture_state();
        let evaluation = evaluate_symbol(&state, "SPY").await.unwrap();
        assert_eq!(evaluation.symbol, "SPY");
        assert_eq!(evaluation.decision.bias.direction, Direction::LongOnly);
        assert_eq!(evaluation.decision.bias.confidence, 0.80);
        assert_eq!(evaluation.checklist.allowed_trades.len(), 3);
    }

    #[tokio::test]
    async fn test_evaluate_symbol_blocked_is_success() {
        let state = fixture_state();
        let evaluation = evaluate_symbol(&state, "QQQ").await.unwrap();
        assert_eq!(evaluation.decision.bias.direction, Direction::Neutral);
        assert_eq!(evaluation.decision.execution_mode, ExecutionMode::NoTrade);
        assert!(evaluation.checklist.allowed_trades.is_empty());
    }

    #[tokio::test]
    async fn test_batch_preserves_request_order_and_tolerates_failures() {
        let state = fixture_state();
        let symbols = vec!["QQQ".to_string(), "MISSING".to_string(), "SPY".to_string()];
        let results = batch_results(&state, &symbols).await;

        assert_eq!(results.len(), 3);
        match &results[0] {
            BatchEntry::Evaluated(e) => assert_eq!(e.symbol, "QQQ"),
            other => panic!("expected evaluation, got {other:?}"),
        }
        match &results[1] {
            BatchEntry::Failed { symbol, error } => {
                assert_eq!(symbol, "MISSING");
                assert!(error.contains("missing required signal"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        match &results[2] {
            BatchEntry::Evaluated(e) => assert_eq!(e.symbol, "SPY"),
            other => panic!("expected evaluation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_daily_envelope_wire_shape() {
        let state = fixture_state();
        let evaluation = evaluate_symbol(&state, "SPY").await.unwrap();
        let wire = serde_json::to_value(&evaluation).unwrap();

        // Decision fields are flattened into the envelope verbatim.
        assert_eq!(wire["regime"], "DIRECTIONAL");
        assert_eq!(wire["bias"]["direction"], "LONG_ONLY");
        assert_eq!(wire["executionMode"], "DAY");
        assert_eq!(wire["checklist"]["direction_gate"], "LONG_ONLY");
        assert!(wire["date"].is_string());
    }
}
