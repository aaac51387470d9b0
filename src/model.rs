use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tch::{nn, nn::OptimizerConfig, Device, Kind, Reduction, Tensor};
use tracing::{debug, info};

use crate::error::ModelError;
use crate::scorer::Scorer;
use crate::synthetic::LabeledReading;
use crate::types::{TelemetryReading, FEATURE_ORDER};

const IN_DIM: i64 = FEATURE_ORDER.len() as i64;

/// Standardized inputs are clipped to this many deviations so every f32
/// the network sees is finite.
pub const Z_LIMIT: f64 = 1e6;

/// Sidecar JSON written next to the weight file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub feat_list: Vec<String>,
    pub in_dim: Option<usize>,
    pub hidden: i64,
    /// Per-feature standardization, in `feat_list` order.
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    #[serde(default)]
    pub samples: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub epochs: usize,
    #[serde(default)]
    pub train_accuracy: f64,
}

impl ModelMeta {
    fn validate(&self) -> Result<(), ModelError> {
        if self.feat_list.iter().map(String::as_str).ne(FEATURE_ORDER) {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
                got: self.feat_list.clone(),
            });
        }
        let in_dim = self.in_dim.unwrap_or(self.feat_list.len());
        if in_dim != FEATURE_ORDER.len() {
            return Err(ModelError::Meta(format!(
                "in_dim {} does not match {} features",
                in_dim,
                FEATURE_ORDER.len()
            )));
        }
        if self.hidden <= 0 {
            return Err(ModelError::Meta(format!("hidden width {}", self.hidden)));
        }
        if self.mean.len() != FEATURE_ORDER.len() || self.std.len() != FEATURE_ORDER.len() {
            return Err(ModelError::Meta("mean/std length mismatch".to_string()));
        }
        if self.std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ModelError::Meta("std must be finite and positive".to_string()));
        }
        Ok(())
    }
}

// 4 -> hidden (ReLU) -> 1 logit
#[derive(Debug)]
struct RiskNet {
    hidden: nn::Linear,
    out: nn::Linear,
}

impl RiskNet {
    fn new(p: &nn::Path, hidden: i64) -> Self {
        Self {
            hidden: nn::linear(p / "hidden", IN_DIM, hidden, Default::default()),
            out: nn::linear(p / "out", hidden, 1, Default::default()),
        }
    }

    fn logits(&self, xs: &Tensor) -> Tensor {
        xs.apply(&self.hidden).relu().apply(&self.out)
    }
}

fn standardize(r: &TelemetryReading, mean: &[f64], std: &[f64]) -> [f32; 4] {
    let f = r.features();
    let mut x = [0f32; 4];
    for i in 0..4 {
        let z = (f[i] - mean[i]) / std[i];
        // NaN passes through clamp untouched
        x[i] = z.clamp(-Z_LIMIT, Z_LIMIT) as f32;
    }
    x
}

fn feature_stats(data: &[LabeledReading]) -> (Vec<f64>, Vec<f64>) {
    let n = data.len() as f64;
    let mut mean = vec![0.0; 4];
    for row in data {
        for (m, v) in mean.iter_mut().zip(row.reading.features()) {
            *m += v / n;
        }
    }
    let mut std = vec![0.0; 4];
    for row in data {
        for ((s, m), v) in std.iter_mut().zip(&mean).zip(row.reading.features()) {
            *s += (v - m) * (v - m) / n;
        }
    }
    for s in std.iter_mut() {
        *s = s.sqrt();
        // constant column
        if !s.is_finite() || *s < 1e-12 {
            *s = 1.0;
        }
    }
    (mean, std)
}

/// Risk classifier backed by a small libtorch network.
///
/// Immutable after construction; `score` only runs forward passes under
/// `no_grad`, so one instance can serve every request concurrently.
pub struct RiskModel {
    vs: nn::VarStore,
    net: RiskNet,
    meta: ModelMeta,
}

impl RiskModel {
    /// Load weights and meta written by [`RiskModel::save`].
    pub fn load(model_path: impl AsRef<Path>, meta_path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let model_path = model_path.as_ref();
        let meta_path = meta_path.as_ref();
        for p in [model_path, meta_path] {
            if !p.is_file() {
                return Err(ModelError::MissingArtifact(p.display().to_string()));
            }
        }

        let meta_txt = fs::read_to_string(meta_path)?;
        let meta: ModelMeta = serde_json::from_str(&meta_txt)?;
        meta.validate()?;

        let mut vs = nn::VarStore::new(Device::Cpu);
        let net = RiskNet::new(&vs.root(), meta.hidden);
        vs.load(model_path)?;

        debug!("loaded risk model weights from {} (hidden={})", model_path.display(), meta.hidden);
        Ok(Self { vs, net, meta })
    }

    pub fn save(&self, model_path: impl AsRef<Path>, meta_path: impl AsRef<Path>) -> Result<(), ModelError> {
        let model_path = model_path.as_ref();
        let meta_path = meta_path.as_ref();
        for p in [model_path, meta_path] {
            if let Some(dir) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
        }
        self.vs.save(model_path)?;
        fs::write(meta_path, serde_json::to_string_pretty(&self.meta)?)?;
        Ok(())
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Reading at the training means; used as the startup warmup input.
    pub fn center(&self) -> TelemetryReading {
        let m = |i: usize| self.meta.mean.get(i).copied().unwrap_or(0.0);
        TelemetryReading {
            temperature: m(0),
            vibration: m(1),
            coolant: m(2),
            battery: m(3),
        }
    }
}

impl Scorer for RiskModel {
    fn score(&self, reading: &TelemetryReading) -> Result<f64, ModelError> {
        let x = standardize(reading, &self.meta.mean, &self.meta.std);
        let input = Tensor::from_slice(&x).f_reshape([1, IN_DIM])?;
        let prob = tch::no_grad(|| self.net.logits(&input).f_sigmoid())?;
        let p = prob.f_double_value(&[0, 0])?;
        if !p.is_finite() {
            return Err(ModelError::NonFinite(p));
        }
        Ok(p)
    }
}

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub hidden: i64,
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            hidden: 16,
            epochs: 400,
            learning_rate: 1e-2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainReport {
    pub samples: usize,
    pub positives: usize,
    pub final_loss: f64,
    pub accuracy: f64,
}

/// Full-batch Adam on binary cross-entropy over standardized features.
pub fn train(data: &[LabeledReading], cfg: &TrainConfig) -> Result<(RiskModel, TrainReport), ModelError> {
    if data.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    if cfg.hidden <= 0 {
        return Err(ModelError::Meta(format!("hidden width {}", cfg.hidden)));
    }

    let (mean, std) = feature_stats(data);
    let n = data.len() as i64;
    let flat: Vec<f32> = data
        .iter()
        .flat_map(|row| standardize(&row.reading, &mean, &std))
        .collect();
    let labels: Vec<f32> = data.iter().map(|row| if row.risk { 1.0 } else { 0.0 }).collect();
    let positives = data.iter().filter(|row| row.risk).count();

    let xs = Tensor::from_slice(&flat).reshape([n, IN_DIM]);
    let ys = Tensor::from_slice(&labels).reshape([n, 1]);

    tch::manual_seed(cfg.seed as i64);
    let vs = nn::VarStore::new(Device::Cpu);
    let net = RiskNet::new(&vs.root(), cfg.hidden);
    let mut opt = nn::Adam::default().build(&vs, cfg.learning_rate)?;

    info!(
        "training risk model on {} samples ({} positive), hidden={} epochs={}",
        data.len(),
        positives,
        cfg.hidden,
        cfg.epochs
    );
    let mut final_loss = f64::NAN;
    for epoch in 1..=cfg.epochs {
        let loss = net
            .logits(&xs)
            .binary_cross_entropy_with_logits::<Tensor>(&ys, None, None, Reduction::Mean);
        opt.backward_step(&loss);
        final_loss = loss.double_value(&[]);
        if epoch % 100 == 0 {
            debug!("epoch {} loss={:.4}", epoch, final_loss);
        }
    }

    let accuracy = tch::no_grad(|| {
        let pred = net.logits(&xs).gt(0.0);
        pred.eq_tensor(&ys.gt(0.5))
            .to_kind(Kind::Float)
            .mean(Kind::Float)
    })
    .double_value(&[]);

    let meta = ModelMeta {
        feat_list: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
        in_dim: Some(FEATURE_ORDER.len()),
        hidden: cfg.hidden,
        mean,
        std,
        samples: data.len(),
        seed: cfg.seed,
        epochs: cfg.epochs,
        train_accuracy: accuracy,
    };
    let report = TrainReport {
        samples: data.len(),
        positives,
        final_loss,
        accuracy,
    };
    Ok((RiskModel { vs, net, meta }, report))
}
