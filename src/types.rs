use serde::{Deserialize, Serialize};

/// Authoritative input order for the classifier.
pub const FEATURE_ORDER: [&str; 4] = ["temperature", "vibration", "coolant", "battery"];

/// One telemetry sample. All four fields are required JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub temperature: f64,
    pub vibration: f64,
    pub coolant: f64,
    pub battery: f64,
}

impl TelemetryReading {
    /// Feature vector in `FEATURE_ORDER`.
    pub fn features(&self) -> [f64; 4] {
        [self.temperature, self.vibration, self.coolant, self.battery]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    HighRisk,
    Normal,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::HighRisk => "HIGH_RISK",
            Status::Normal => "NORMAL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingOffer {
    pub slot: String,
    pub center: String,
}

// Response of POST /predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_score: f64,
    pub status: Status,
    pub voice_message: String,
    pub service_booking: Option<BookingOffer>,
    pub rca_insight: String,
}

// Response of GET /dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub total_records: usize,
    pub total_bookings: usize,
    pub latest_booking: Option<BookingOffer>,
}
