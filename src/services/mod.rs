pub mod liteapi;
pub mod db_init;

pub mod alert_sink;
pub mod price_monitor;
pub mod scheduler;

pub mod favorite_service;
pub mod user_service;
