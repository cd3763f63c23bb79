#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use hotelwatch::{
    AppState,
    config::{self, Settings},
    error::{NameResolutionError, PriceLookupError, RepositoryError},
    models::{AlertEvent, Favorite, StayWindow, User},
    services::{
        alert_sink::AlertSink,
        favorite_service::FavoriteRepository,
        liteapi::LiteApiClient,
        price_monitor::{HotelInfo, PriceSource},
        user_service::UserRepository,
    },
};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

// ---------------- Repositories ----------------

#[derive(Default)]
pub struct MemoryFavorites {
    pub items: Mutex<Vec<Favorite>>,
    pub fail_list: bool,
    pub list_calls: AtomicUsize,
}

impl MemoryFavorites {
    pub fn with(items: Vec<Favorite>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }

    pub fn push(&self, favorite: Favorite) {
        self.items.lock().unwrap().push(favorite);
    }
}

#[async_trait]
impl FavoriteRepository for MemoryFavorites {
    async fn list_all(&self) -> Result<Vec<Favorite>, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(RepositoryError::Database("connection refused".into()));
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn exists(&self, user_id: ObjectId, hotel_id: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.user_id == user_id && f.hotel_id == hotel_id))
    }

    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError> {
        self.push(favorite.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub items: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn add(&self, name: &str, email: &str) -> ObjectId {
        let id = ObjectId::new();
        self.items.lock().unwrap().push(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            created_at: Utc::now().timestamp(),
        });
        id
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut items = self.items.lock().unwrap();
        if items.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate("email"));
        }
        items.push(user.clone());
        Ok(())
    }

    async fn list(&self, offset: u64, limit: i64) -> Result<(Vec<User>, u64), RepositoryError> {
        let items = self.items.lock().unwrap();
        let mut sorted = items.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let page = sorted
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, items.len() as u64))
    }

    async fn exists(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        Ok(self.items.lock().unwrap().iter().any(|u| u.id == id))
    }
}

pub fn favorite(hotel_id: &str, target_price: f64) -> Favorite {
    Favorite {
        id: ObjectId::new(),
        user_id: ObjectId::new(),
        hotel_id: hotel_id.to_string(),
        target_price,
        created_at: Utc::now().timestamp(),
    }
}

// ---------------- Upstream fakes ----------------

pub enum Quote {
    Price(Option<f64>),
    Unavailable,
    Malformed,
    Panic,
}

#[derive(Default)]
pub struct ScriptedPrices {
    pub quotes: HashMap<String, Quote>,
    pub calls: Mutex<Vec<(String, StayWindow)>>,
}

impl ScriptedPrices {
    pub fn quote(mut self, hotel_id: &str, quote: Quote) -> Self {
        self.quotes.insert(hotel_id.to_string(), quote);
        self
    }

    pub fn called(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(h, _)| h.clone()).collect()
    }
}

#[async_trait]
impl PriceSource for ScriptedPrices {
    async fn min_price(&self, hotel_id: &str, window: &StayWindow) -> Result<Option<f64>, PriceLookupError> {
        self.calls.lock().unwrap().push((hotel_id.to_string(), *window));

        match self.quotes.get(hotel_id) {
            Some(Quote::Price(p)) => Ok(*p),
            Some(Quote::Malformed) => Err(serde_json::from_str::<Value>("{").unwrap_err().into()),
            Some(Quote::Panic) => panic!("price source blew up for {hotel_id}"),
            Some(Quote::Unavailable) | None => Err(PriceLookupError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "upstream down".into(),
            }),
        }
    }
}

#[derive(Default)]
pub struct ScriptedNames {
    pub names: HashMap<String, String>,
}

impl ScriptedNames {
    pub fn name(mut self, hotel_id: &str, name: &str) -> Self {
        self.names.insert(hotel_id.to_string(), name.to_string());
        self
    }
}

#[async_trait]
impl HotelInfo for ScriptedNames {
    async fn lookup_name(&self, hotel_id: &str) -> Result<String, NameResolutionError> {
        self.names
            .get(hotel_id)
            .cloned()
            .ok_or(NameResolutionError::MissingName)
    }
}

#[derive(Default)]
pub struct CollectingSink {
    pub events: Mutex<Vec<AlertEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AlertSink for CollectingSink {
    fn emit(&self, event: &AlertEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ---------------- HTTP helpers ----------------

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A local address nothing is listening on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_settings(base_url: &str) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("LITE_API_KEY", "monitor-key".to_string()),
        ("LITE_API_URL", base_url.to_string()),
        ("PRICE_TIMEOUT_SECS", "2".to_string()),
        ("BCRYPT_COST", "4".to_string()),
    ]);
    config::load_from(|key| vars.get(key).cloned()).unwrap()
}

pub fn test_state(base_url: &str, users: Arc<MemoryUsers>, favorites: Arc<MemoryFavorites>) -> AppState {
    let settings = test_settings(base_url);
    let liteapi = LiteApiClient::new(settings.liteapi.clone());

    AppState {
        settings,
        users,
        favorites,
        liteapi,
    }
}

pub async fn response_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------- Logs ----------------

/// Plain-text log lines collected from a scoped subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Install with `tracing::subscriber::set_default`. Under the default
    /// single-threaded test runtime, spawned tasks log through it too.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish()
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}
