use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub user_id: ObjectId,
    pub hotel_id: String,
    pub hotel_name: String,
    pub current_price: f64,
    pub target_price: f64,
    pub triggered_at: DateTime<Utc>,
}
