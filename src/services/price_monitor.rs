use std::{panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::FutureExt;

use crate::{
    config::MonitorSettings,
    error::{FavoriteSkip, NameResolutionError, PriceLookupError, ScanError},
    models::{AlertEvent, Favorite, PriceQuote, StayWindow},
    services::{alert_sink::AlertSink, favorite_service::FavoriteRepository},
};

/// Name used in alerts when the hotel details lookup fails.
pub const UNKNOWN_HOTEL_NAME: &str = "not identified hotel";

/// Minimum-rate lookup for one hotel over a stay window.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// `Ok(None)` means the upstream answered but had no usable offer.
    async fn min_price(&self, hotel_id: &str, window: &StayWindow) -> Result<Option<f64>, PriceLookupError>;
}

/// Display-name lookup for a hotel.
#[async_trait]
pub trait HotelInfo: Send + Sync {
    async fn lookup_name(&self, hotel_id: &str) -> Result<String, NameResolutionError>;
}

/// True when the current price is a real price at or below the target.
pub fn should_alert(min_price: Option<f64>, target_price: f64) -> bool {
    matches!(min_price, Some(p) if p > 0.0 && p <= target_price)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub scanned: usize,
    pub alerts: usize,
    pub no_data: usize,
    pub failed: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Alerted,
    AboveTarget,
}

/// Runs scan cycles: every favorite is priced and compared against its target.
#[derive(Clone)]
pub struct PriceMonitor {
    favorites: Arc<dyn FavoriteRepository>,
    prices: Arc<dyn PriceSource>,
    hotels: Arc<dyn HotelInfo>,
    sink: Arc<dyn AlertSink>,

    lookahead_days: u64,
    stay_nights: u64,
    currency: String,
}

impl PriceMonitor {
    /// `currency` is the one the upstream is asked to quote in; it is only
    /// carried through to the quotes and log lines.
    pub fn new(
        favorites: Arc<dyn FavoriteRepository>,
        prices: Arc<dyn PriceSource>,
        hotels: Arc<dyn HotelInfo>,
        sink: Arc<dyn AlertSink>,
        settings: &MonitorSettings,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            favorites,
            prices,
            hotels,
            sink,
            lookahead_days: settings.lookahead_days,
            stay_nights: settings.stay_nights,
            currency: currency.into(),
        }
    }

    pub fn with_window(mut self, lookahead_days: u64, stay_nights: u64) -> Self {
        self.lookahead_days = lookahead_days;
        self.stay_nights = stay_nights;
        self
    }

    pub fn window_at(&self, now: DateTime<Utc>) -> Result<StayWindow, ScanError> {
        StayWindow::starting(now, self.lookahead_days, self.stay_nights).ok_or(
            ScanError::WindowOutOfRange {
                lookahead_days: self.lookahead_days,
                stay_nights: self.stay_nights,
            },
        )
    }

    pub async fn run_scan_cycle(&self) -> Result<CycleReport, ScanError> {
        self.run_scan_cycle_at(Utc::now()).await
    }

    /// One pass over every favorite, with the stay window derived from `now`.
    ///
    /// Only an unusable window or a failure to fetch the favorites aborts the
    /// cycle. Anything that goes wrong for a single favorite is logged and the
    /// scan moves on.
    pub async fn run_scan_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, ScanError> {
        let window = self.window_at(now)?;
        let favorites = self.favorites.list_all().await?;

        let mut report = CycleReport {
            scanned: favorites.len(),
            ..CycleReport::default()
        };

        for fav in &favorites {
            tracing::debug!(
                hotel_id = %fav.hotel_id,
                user_id = %fav.user_id,
                target_price = fav.target_price,
                "checking price"
            );

            let checked = AssertUnwindSafe(self.check_favorite(fav, &window, now))
                .catch_unwind()
                .await;

            match checked {
                Ok(Ok(Outcome::Alerted)) => report.alerts += 1,
                Ok(Ok(Outcome::AboveTarget)) => {}
                Ok(Err(skip @ FavoriteSkip::NoPriceData { .. })) => {
                    tracing::info!("{skip}");
                    report.no_data += 1;
                }
                Ok(Err(skip @ FavoriteSkip::Lookup { .. })) => {
                    tracing::warn!("{skip}");
                    report.failed += 1;
                }
                Err(_) => {
                    tracing::error!(hotel_id = %fav.hotel_id, "price check panicked");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn check_favorite(
        &self,
        fav: &Favorite,
        window: &StayWindow,
        now: DateTime<Utc>,
    ) -> Result<Outcome, FavoriteSkip> {
        let hotel_name = match self.hotels.lookup_name(&fav.hotel_id).await {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(hotel_id = %fav.hotel_id, "hotel name unavailable: {e}");
                UNKNOWN_HOTEL_NAME.to_string()
            }
        };

        let min_price = self
            .prices
            .min_price(&fav.hotel_id, window)
            .await
            .map_err(|source| FavoriteSkip::Lookup {
                hotel_id: fav.hotel_id.clone(),
                source,
            })?;

        let quote = PriceQuote {
            hotel_id: fav.hotel_id.clone(),
            hotel_name,
            min_price: min_price.filter(|p| *p > 0.0),
            currency: self.currency.clone(),
            check_in: window.check_in,
            check_out: window.check_out,
        };

        let Some(current_price) = quote.min_price else {
            return Err(FavoriteSkip::NoPriceData {
                hotel_id: fav.hotel_id.clone(),
            });
        };

        tracing::info!(
            hotel_id = %quote.hotel_id,
            hotel_name = %quote.hotel_name,
            currency = %quote.currency,
            "found price {current_price:.2}"
        );

        if !should_alert(quote.min_price, fav.target_price) {
            return Ok(Outcome::AboveTarget);
        }

        self.sink.emit(&AlertEvent {
            user_id: fav.user_id,
            hotel_id: quote.hotel_id,
            hotel_name: quote.hotel_name,
            current_price,
            target_price: fav.target_price,
            triggered_at: now,
        });

        Ok(Outcome::Alerted)
    }
}
