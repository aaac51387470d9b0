//! Rule-based agents chained on the classifier output.
//!
//! Every function here is pure: the same input always yields the same output.

use crate::types::{BookingOffer, Status};

/// Probabilities strictly above this are high risk.
pub const RISK_THRESHOLD: f64 = 0.6;

pub const ALLOWED_ACTIONS: [&str; 4] = ["PREDICT", "CALL", "BOOK", "ANALYZE"];

pub const BOOKING_SLOT: &str = "Tomorrow 4 PM";
pub const BOOKING_CENTER: &str = "Nearest Authorized Service";

pub fn classify(probability: f64) -> Status {
    if probability > RISK_THRESHOLD {
        Status::HighRisk
    } else {
        Status::Normal
    }
}

/// Voice message read back to the driver.
pub fn advise(status: Status) -> &'static str {
    match status {
        Status::HighRisk => "Vehicle shows early failure signs. Service recommended.",
        Status::Normal => "Vehicle health normal.",
    }
}

pub fn suggest_booking(status: Status) -> Option<BookingOffer> {
    match status {
        Status::HighRisk => Some(BookingOffer {
            slot: BOOKING_SLOT.to_string(),
            center: BOOKING_CENTER.to_string(),
        }),
        Status::Normal => None,
    }
}

/// Root-cause text for the fleet dashboard.
pub fn explain(status: Status) -> &'static str {
    match status {
        Status::HighRisk => "Repeated overheating pattern detected across similar vehicles",
        Status::Normal => "No anomaly pattern detected",
    }
}

/// Exact, case-sensitive membership in `ALLOWED_ACTIONS`.
pub fn is_allowed(action: &str) -> bool {
    ALLOWED_ACTIONS.contains(&action)
}
