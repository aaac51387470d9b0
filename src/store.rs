use parking_lot::Mutex;

use crate::types::{BookingOffer, DashboardSnapshot, TelemetryReading};

#[derive(Default)]
struct Logs {
    telemetry: Vec<TelemetryReading>,
    bookings: Vec<BookingOffer>,
}

/// In-memory telemetry and booking logs for the lifetime of the process.
///
/// Both logs sit behind one lock so a reading and its booking are appended
/// together, and `|telemetry| >= |bookings|` holds for every snapshot.
/// Nothing is evicted.
#[derive(Default)]
pub struct TelemetryStore {
    logs: Mutex<Logs>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, reading: TelemetryReading, booking: Option<BookingOffer>) {
        let mut logs = self.logs.lock();
        logs.telemetry.push(reading);
        if let Some(b) = booking {
            logs.bookings.push(b);
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let logs = self.logs.lock();
        DashboardSnapshot {
            total_records: logs.telemetry.len(),
            total_bookings: logs.bookings.len(),
            latest_booking: logs.bookings.last().cloned(),
        }
    }
}
