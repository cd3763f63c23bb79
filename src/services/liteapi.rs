use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    config::LiteApiSettings,
    error::{NameResolutionError, PriceLookupError},
    models::StayWindow,
    services::price_monitor::{HotelInfo, PriceSource},
};

/// Client for the LiteAPI rate and static-data endpoints.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct LiteApiClient {
    http: Client,
    settings: LiteApiSettings,
}

impl LiteApiClient {
    pub fn new(settings: LiteApiSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    /// Same client, forwarding a caller-supplied key instead of the configured one.
    pub fn with_api_key(&self, api_key: &str) -> Self {
        let mut settings = self.settings.clone();
        settings.api_key = api_key.to_string();
        Self {
            http: self.http.clone(),
            settings,
        }
    }

    pub fn settings(&self) -> &LiteApiSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("accept", "application/json")
            .header("X-API-Key", &self.settings.api_key)
            .timeout(self.settings.timeout)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, PriceLookupError> {
        let res = self
            .authorized(req)
            .send()
            .await
            .map_err(PriceLookupError::Connection)?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PriceLookupError::Status { status, body });
        }

        let body = res.text().await.map_err(PriceLookupError::Connection)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Lowest nightly rate across all offers for one hotel, or `None` when
    /// the upstream returned no usable offer.
    pub async fn min_rate(
        &self,
        hotel_id: &str,
        window: &StayWindow,
    ) -> Result<Option<f64>, PriceLookupError> {
        let body = MinRateRequest {
            hotel_ids: vec![hotel_id.to_string()],
            checkin: window.check_in_str(),
            checkout: window.check_out_str(),
            occupancies: vec![Occupancy {
                adults: self.settings.adults,
                children: Vec::new(),
            }],
            currency: self.settings.currency.clone(),
            guest_nationality: self.settings.guest_nationality.clone(),
            timeout: self.settings.timeout.as_secs(),
        };

        let resp: MinRatesResponse = self
            .send_json(self.http.post(self.url("/hotels/min-rates")).json(&body))
            .await?;

        Ok(min_offer_price(&resp.data.unwrap_or_default()))
    }

    pub async fn hotel_name(&self, hotel_id: &str) -> Result<String, NameResolutionError> {
        let resp: HotelDetailsResponse = self
            .send_json(
                self.http
                    .get(self.url("/data/hotel"))
                    .query(&[("hotelId", hotel_id)]),
            )
            .await?;

        resp.data
            .and_then(|d| d.name)
            .filter(|n| !n.trim().is_empty())
            .ok_or(NameResolutionError::MissingName)
    }

    pub async fn search_hotels(&self, q: &HotelSearch) -> Result<Vec<HotelSummary>, PriceLookupError> {
        let offset = q.offset.to_string();
        let limit = q.limit.to_string();

        let resp: HotelsResponse = self
            .send_json(self.http.get(self.url("/data/hotels")).query(&[
                ("countryCode", q.country_code.as_str()),
                ("cityName", q.city_name.as_str()),
                ("offset", offset.as_str()),
                ("limit", limit.as_str()),
            ]))
            .await?;

        let hotels = resp
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|h| HotelSummary {
                hotel_id: h.id.unwrap_or_default(),
                name: h.name.unwrap_or_default(),
                address: h.address.unwrap_or_default(),
                city: h.city.unwrap_or_default(),
                country: h.country.unwrap_or_default(),
                country_code: q.country_code.clone(),
                stars: h.stars.unwrap_or_default(),
                latitude: h.latitude,
                longitude: h.longitude,
            })
            .collect();

        Ok(hotels)
    }
}

#[async_trait]
impl PriceSource for LiteApiClient {
    async fn min_price(&self, hotel_id: &str, window: &StayWindow) -> Result<Option<f64>, PriceLookupError> {
        self.min_rate(hotel_id, window).await
    }
}

#[async_trait]
impl HotelInfo for LiteApiClient {
    async fn lookup_name(&self, hotel_id: &str) -> Result<String, NameResolutionError> {
        self.hotel_name(hotel_id).await
    }
}

/// Smallest positive price among the offers.
///
/// Offers without a numeric price are ignored. A price of 0 counts as
/// "no price", the same as a missing one.
pub fn min_offer_price(offers: &[MinRateOffer]) -> Option<f64> {
    offers
        .iter()
        .filter_map(MinRateOffer::price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .fold(None, |min, p| match min {
            Some(m) if m <= p => Some(m),
            _ => Some(p),
        })
}

// ---------------- Wire types ----------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinRateRequest {
    pub hotel_ids: Vec<String>,
    pub checkin: String,
    pub checkout: String,
    pub occupancies: Vec<Occupancy>,
    pub currency: String,
    pub guest_nationality: String,
    pub timeout: u64,
}

#[derive(Debug, Serialize)]
pub struct Occupancy {
    pub adults: u32,
    pub children: Vec<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MinRatesResponse {
    #[serde(default)]
    pub data: Option<Vec<MinRateOffer>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MinRateOffer {
    #[serde(rename = "hotelId", default)]
    pub hotel_id: Option<String>,

    // kept loose so a string or null price drops the offer instead of the whole response
    #[serde(default)]
    pub price: Option<Value>,
}

impl MinRateOffer {
    pub fn price(&self) -> Option<f64> {
        self.price.as_ref().and_then(Value::as_f64)
    }
}

#[derive(Debug, Deserialize)]
struct HotelDetailsResponse {
    #[serde(default)]
    data: Option<HotelDetails>,
}

#[derive(Debug, Deserialize)]
struct HotelDetails {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HotelSearch {
    pub country_code: String,
    pub city_name: String,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
struct HotelsResponse {
    #[serde(default)]
    data: Option<Vec<HotelRecord>>,
}

#[derive(Debug, Deserialize)]
struct HotelRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    stars: Option<f64>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotelSummary {
    pub hotel_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub stars: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}
