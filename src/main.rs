use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use risk_predictor::{config::Config, model::RiskModel, router, AppState, Scorer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::from_env().context("invalid configuration")?;

    // No degraded mode: a missing or broken artifact stops the process here
    let mdl = RiskModel::load(&cfg.model_path, &cfg.meta_path).with_context(|| {
        format!(
            "failed to load model {} / {}",
            cfg.model_path.display(),
            cfg.meta_path.display()
        )
    })?;
    let p = mdl.score(&mdl.center()).context("warmup forward failed")?;
    tracing::info!("warmup forward ok (p={:.3} at training means)", p);
    tracing::info!(
        "loaded model; feat_list[{}]: {:?} trained on {} samples",
        mdl.meta().feat_list.len(),
        &mdl.meta().feat_list,
        mdl.meta().samples
    );

    let state = AppState::new(Arc::new(mdl)).with_prediction_logging(cfg.log_predictions);
    let app = router(state);

    let addr = cfg.bind_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
