use crate::models::AlertEvent;

/// Receives alerts as they fire. Called inline by the monitor, at most once
/// per favorite per cycle.
pub trait AlertSink: Send + Sync {
    fn emit(&self, event: &AlertEvent);
}

/// Writes each alert as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn emit(&self, event: &AlertEvent) {
        tracing::warn!(
            target: "hotelwatch::alert",
            user_id = %event.user_id,
            hotel_id = %event.hotel_id,
            hotel_name = %event.hotel_name,
            current_price = event.current_price,
            target_price = event.target_price,
            triggered_at = %event.triggered_at.to_rfc3339(),
            "ALERT: current price {:.2} is at or below target {:.2}",
            event.current_price,
            event.target_price,
        );
    }
}
