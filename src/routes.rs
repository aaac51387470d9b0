use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::agents::{advise, classify, explain, suggest_booking};
use crate::error::ApiError;
use crate::scorer::Scorer;
use crate::store::TelemetryStore;
use crate::types::{DashboardSnapshot, PredictionResult, TelemetryReading};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn Scorer>,
    pub store: Arc<TelemetryStore>,
    pub log_predictions: bool,
}

impl AppState {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer,
            store: Arc::new(TelemetryStore::new()),
            log_predictions: false,
        }
    }

    pub fn with_prediction_logging(mut self, enabled: bool) -> Self {
        self.log_predictions = enabled;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/dashboard", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ---------- Handlers ----------

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<TelemetryReading>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(reading) = payload.map_err(|e| {
        warn!("rejected telemetry: {}", e.body_text());
        ApiError::from(e)
    })?;

    let prob = state.scorer.score(&reading).map_err(|e| {
        error!("scoring failed: {}", e);
        ApiError::from(e)
    })?;
    let status = classify(prob);
    let voice_message = advise(status).to_string();
    let service_booking = suggest_booking(status);
    let rca_insight = explain(status).to_string();

    if state.log_predictions {
        info!(
            "predict temperature={:.2} vibration={:.3} coolant={:.2} battery={:.2} p={:.4} status={}",
            reading.temperature, reading.vibration, reading.coolant, reading.battery, prob, status
        );
    }

    state.store.record(reading, service_booking.clone());

    Ok(Json(PredictionResult {
        risk_score: round2(prob),
        status,
        voice_message,
        service_booking,
        rca_insight,
    }))
}

async fn dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.store.snapshot())
}
