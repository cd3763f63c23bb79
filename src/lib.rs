//! Library entrypoint for hotelwatch.
//!
//! Integration tests under `tests/` import the app state, routers, and the
//! monitor from here.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;

#[path = "middleware/api_key.rs"]
pub mod api_key;

pub mod services;

pub mod controllers;
pub mod routes;

use services::{
    favorite_service::FavoriteRepository, liteapi::LiteApiClient, user_service::UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub users: Arc<dyn UserRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub liteapi: LiteApiClient,
}
