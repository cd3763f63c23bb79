use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,
    pub email: String,
    pub password_hash: String,

    pub created_at: i64,
}

impl User {
    /// Public representation; never carries the password hash.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_hex(),
            "name": self.name,
            "email": self.email,
            "created_at": rfc3339(self.created_at),
        })
    }
}

pub(crate) fn rfc3339(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}
