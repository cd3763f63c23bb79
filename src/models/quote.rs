use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

/// Stay dates used for a min-rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayWindow {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayWindow {
    /// Check-in `lookahead_days` after `now`, staying `nights` nights.
    ///
    /// `None` when either date falls outside the calendar range.
    pub fn starting(now: DateTime<Utc>, lookahead_days: u64, nights: u64) -> Option<Self> {
        let today = now.date_naive();
        let check_in = today.checked_add_days(Days::new(lookahead_days))?;
        let check_out = check_in.checked_add_days(Days::new(nights.max(1)))?;
        Some(Self { check_in, check_out })
    }

    pub fn check_in_str(&self) -> String {
        self.check_in.format("%Y-%m-%d").to_string()
    }

    pub fn check_out_str(&self) -> String {
        self.check_out.format("%Y-%m-%d").to_string()
    }
}

/// Result of one price check for one hotel.
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub hotel_id: String,
    pub hotel_name: String,
    // None => upstream had no usable offer
    pub min_price: Option<f64>,
    pub currency: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn window_is_derived_from_now() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 0).unwrap();
        let w = StayWindow::starting(now, 30, 1).unwrap();

        assert_eq!(w.check_in_str(), "2024-02-14");
        assert_eq!(w.check_out_str(), "2024-02-15");
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 12, 10, 0, 0, 0).unwrap();
        let w = StayWindow::starting(now, 30, 3).unwrap();

        assert_eq!(w.check_in, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        assert_eq!(w.check_out, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    }

    #[test]
    fn window_past_the_calendar_is_none() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert!(StayWindow::starting(now, u64::MAX, 1).is_none());
        assert!(StayWindow::starting(now, 1, u64::MAX).is_none());
    }
}
