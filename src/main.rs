use std::{net::SocketAddr, sync::Arc};

use hotelwatch::{
    AppState, config, routes,
    services::{
        alert_sink::LogAlertSink,
        db_init,
        favorite_service::{FavoriteRepository, MongoFavoriteRepository},
        liteapi::LiteApiClient,
        price_monitor::PriceMonitor,
        scheduler::Scheduler,
        user_service::{MongoUserRepository, UserRepository},
    },
};
use mongodb::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match config::load() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db).await {
        tracing::warn!("could not ensure indexes: {e}");
    }

    let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(db.clone()));
    let favorites: Arc<dyn FavoriteRepository> = Arc::new(MongoFavoriteRepository::new(db));
    let liteapi = LiteApiClient::new(settings.liteapi.clone());

    let monitor = PriceMonitor::new(
        favorites.clone(),
        Arc::new(liteapi.clone()),
        Arc::new(liteapi.clone()),
        Arc::new(LogAlertSink),
        &settings.monitor,
        settings.liteapi.currency.clone(),
    );

    let mut scheduler = Scheduler::new(monitor, settings.monitor.interval);
    if settings.monitor.enabled {
        scheduler.start();
    } else {
        tracing::info!("price monitor disabled");
    }

    let state = AppState {
        settings: settings.clone(),
        users,
        favorites,
        liteapi,
    };

    let addr = SocketAddr::from((
        settings
            .host
            .parse::<std::net::IpAddr>()
            .expect("HOST must be an IP address"),
        settings.port,
    ));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!("listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {e}");
    }

    scheduler.stop().await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
