/// End-to-end tests against a model trained on the synthetic generator.
///
/// Run with: cargo test --test trained_model_tests -- --nocapture
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use risk_predictor::{
    error::ModelError,
    model::{self, ModelMeta, RiskModel, TrainConfig},
    router, synthetic,
    types::{PredictionResult, Status, TelemetryReading},
    AppState, Scorer,
};

const SCENARIO_NORMAL: TelemetryReading = TelemetryReading {
    temperature: 85.0,
    vibration: 0.2,
    coolant: 60.0,
    battery: 12.4,
};

const SCENARIO_HOT: TelemetryReading = TelemetryReading {
    temperature: 110.0,
    vibration: 0.5,
    coolant: 30.0,
    battery: 11.0,
};

fn trained() -> RiskModel {
    let data = synthetic::generate(synthetic::DEFAULT_SAMPLES, 42).unwrap();
    let (mdl, report) = model::train(&data, &TrainConfig::default()).unwrap();
    println!(
        "✓ trained: samples={} positives={} loss={:.4} acc={:.3}",
        report.samples, report.positives, report.final_loss, report.accuracy
    );
    assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);
    mdl
}

#[test]
fn test_scenarios_direct() {
    let mdl = trained();
    let p_normal = mdl.score(&SCENARIO_NORMAL).unwrap();
    let p_hot = mdl.score(&SCENARIO_HOT).unwrap();
    println!("  p(normal)={:.4} p(hot)={:.4}", p_normal, p_hot);

    assert!((0.0..=1.0).contains(&p_normal));
    assert!((0.0..=1.0).contains(&p_hot));
    assert!(p_normal <= 0.6);
    assert!(p_hot > 0.6);
}

#[test]
fn test_save_load_round_trip_scores_match() {
    let mdl = trained();
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("nested/risk_model.ot");
    let meta_path = dir.path().join("nested/risk_model.meta.json");
    mdl.save(&model_path, &meta_path).unwrap();

    let loaded = RiskModel::load(&model_path, &meta_path).unwrap();
    assert_eq!(loaded.meta().feat_list, mdl.meta().feat_list);
    assert_eq!(loaded.meta().hidden, mdl.meta().hidden);
    assert_eq!(loaded.meta().samples, synthetic::DEFAULT_SAMPLES);
    let center = loaded.center().features();
    for (c, m) in center.iter().zip(&loaded.meta().mean) {
        assert_eq!(c, m);
    }
    assert!(loaded.score(&loaded.center()).is_ok());
    for r in [SCENARIO_NORMAL, SCENARIO_HOT] {
        assert!((loaded.score(&r).unwrap() - mdl.score(&r).unwrap()).abs() < 1e-6);
    }
}

#[test]
fn test_load_rejects_reordered_features() {
    let mdl = trained();
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("m.ot");
    let meta_path = dir.path().join("m.json");
    mdl.save(&model_path, &meta_path).unwrap();

    let mut meta: ModelMeta =
        serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
    meta.feat_list.reverse();
    std::fs::write(&meta_path, serde_json::to_string(&meta).unwrap()).unwrap();

    let err = RiskModel::load(&model_path, &meta_path);
    assert!(matches!(err, Err(ModelError::FeatureMismatch { .. })));
}

#[test]
fn test_load_rejects_corrupt_weights() {
    let mdl = trained();
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("m.ot");
    let meta_path = dir.path().join("m.json");
    mdl.save(&model_path, &meta_path).unwrap();
    std::fs::write(&model_path, b"not a weight file").unwrap();

    assert!(RiskModel::load(&model_path, &meta_path).is_err());
}

#[tokio::test]
async fn test_end_to_end_scenarios() {
    let app = router(AppState::new(Arc::new(trained())));

    let mut results = Vec::new();
    for r in [SCENARIO_NORMAL, SCENARIO_HOT] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&r).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        results.push(serde_json::from_slice::<PredictionResult>(&bytes).unwrap());
    }

    let normal = &results[0];
    assert_eq!(normal.status, Status::Normal);
    assert!(normal.service_booking.is_none());
    assert_eq!(normal.voice_message, "Vehicle health normal.");

    let hot = &results[1];
    assert_eq!(hot.status, Status::HighRisk);
    assert!(hot.service_booking.is_some());
    assert_eq!(
        hot.rca_insight,
        "Repeated overheating pattern detected across similar vehicles"
    );

    let resp = app
        .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        v,
        json!({
            "total_records": 2,
            "total_bookings": 1,
            "latest_booking": {"slot": "Tomorrow 4 PM", "center": "Nearest Authorized Service"}
        })
    );
}

fn extreme_readings() -> Vec<TelemetryReading> {
    let mut out = Vec::new();
    for v in [1e40, 1e300, -1e300, f64::MAX, -f64::MAX, f64::MIN_POSITIVE, 0.0] {
        out.push(TelemetryReading { temperature: v, ..SCENARIO_NORMAL });
        out.push(TelemetryReading { vibration: v, ..SCENARIO_NORMAL });
        out.push(TelemetryReading { coolant: v, ..SCENARIO_NORMAL });
        out.push(TelemetryReading { battery: v, ..SCENARIO_NORMAL });
        out.push(TelemetryReading {
            temperature: v,
            vibration: v,
            coolant: v,
            battery: v,
        });
    }
    out.push(TelemetryReading { temperature: 1e300, coolant: -1e300, ..SCENARIO_NORMAL });

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let scale = 10f64.powi(rng.gen_range(0..300));
        out.push(TelemetryReading {
            temperature: rng.gen_range(-1.0..1.0) * scale,
            vibration: rng.gen_range(-1.0..1.0) * scale,
            coolant: rng.gen_range(-1.0..1.0) * scale,
            battery: rng.gen_range(-1.0..1.0) * scale,
        });
    }
    out
}

#[test]
fn test_extreme_readings_score_in_unit_interval() {
    let mdl = trained();
    for r in extreme_readings() {
        let p = mdl.score(&r).unwrap();
        assert!(p.is_finite() && (0.0..=1.0).contains(&p), "{:?} scored {}", r, p);
    }
    println!("✓ extreme readings stay in [0, 1]");
}

#[tokio::test]
async fn test_risk_score_is_bounded_number_over_http() {
    let app = router(AppState::new(Arc::new(trained())));
    for r in extreme_readings() {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&r).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{:?}", r);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let v: Value = serde_json::from_slice(&bytes).unwrap();

        let score = v["risk_score"]
            .as_f64()
            .unwrap_or_else(|| panic!("risk_score not a number for {:?}: {}", r, v));
        assert!((0.0..=1.0).contains(&score), "{:?} -> {}", r, score);
        let scaled = score * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "{} has > 2 decimals", score);
        assert!(v["status"] == "HIGH_RISK" || v["status"] == "NORMAL");
    }
}
