use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::user::rfc3339;

/// A hotel a user tracks, with the price at or below which they want an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub hotel_id: String,

    // > 0, checked when the favorite is created
    pub target_price: f64,

    pub created_at: i64,
}

impl Favorite {
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_hex(),
            "user_id": self.user_id.to_hex(),
            "hotel_id": self.hotel_id,
            "target_price": self.target_price,
            "created_at": rfc3339(self.created_at),
        })
    }
}
