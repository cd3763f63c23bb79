use std::{env, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_LITE_API_URL: &str = "https://api.liteapi.travel/v3.0";

/// Upper bound for the look-ahead and stay length, in days.
pub const MAX_WINDOW_DAYS: u64 = 3650;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub bcrypt_cost: u32,

    pub liteapi: LiteApiSettings,
    pub monitor: MonitorSettings,
}

/// Upstream API connection plus the fixed request policy (occupancy, currency, nationality).
#[derive(Debug, Clone)]
pub struct LiteApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub currency: String,
    pub guest_nationality: String,
    pub adults: u32,
    pub timeout: Duration,
}

impl Default for LiteApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LITE_API_URL.to_string(),
            api_key: String::new(),
            currency: "USD".to_string(),
            guest_nationality: "US".to_string(),
            adults: 1,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub enabled: bool,
    pub interval: Duration,
    pub lookahead_days: u64,
    pub stay_nights: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
            lookahead_days: 30,
            stay_nights: 1,
        }
    }
}

pub fn load() -> Result<Settings, ConfigError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    load_from(|key| env::var(key).ok())
}

/// Builds settings from an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let api_key = lookup("LITE_API_KEY")
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::Missing("LITE_API_KEY"))?;

    let liteapi = LiteApiSettings {
        base_url: var("LITE_API_URL", DEFAULT_LITE_API_URL)
            .trim_end_matches('/')
            .to_string(),
        api_key,
        currency: var("PRICE_CURRENCY", "USD"),
        guest_nationality: var("GUEST_NATIONALITY", "US"),
        adults: positive(&lookup, "PRICE_ADULTS", 1)?,
        timeout: Duration::from_secs(positive(&lookup, "PRICE_TIMEOUT_SECS", 30)?),
    };

    let monitor = MonitorSettings {
        enabled: parse_or(&lookup, "MONITOR_ENABLED", true)?,
        interval: Duration::from_secs(positive(&lookup, "MONITOR_INTERVAL_SECS", 60)?),
        lookahead_days: days(&lookup, "MONITOR_LOOKAHEAD_DAYS", 30)?,
        stay_nights: days(&lookup, "MONITOR_STAY_NIGHTS", 1)?,
    };

    Ok(Settings {
        mongodb_uri: var("MONGODB_URI", "mongodb://localhost:27017"),
        mongodb_db: var("MONGODB_DB", "hotelwatch"),
        host: var("HOST", "127.0.0.1"),
        port: parse_or(&lookup, "PORT", 4000)?,
        bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        liteapi,
        monitor,
    })
}

fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, var, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            var,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn days<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = positive(lookup, var, default)?;
    if value > MAX_WINDOW_DAYS {
        return Err(ConfigError::Invalid {
            var,
            reason: format!("must be at most {MAX_WINDOW_DAYS}"),
        });
    }
    Ok(value)
}
