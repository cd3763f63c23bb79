use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};

use crate::{AppState, error::RepositoryError, models::Favorite};

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Every tracked favorite, newest first.
    async fn list_all(&self) -> Result<Vec<Favorite>, RepositoryError>;

    async fn exists(&self, user_id: ObjectId, hotel_id: &str) -> Result<bool, RepositoryError>;

    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError>;
}

#[derive(Clone)]
pub struct MongoFavoriteRepository {
    db: Database,
}

impl MongoFavoriteRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for MongoFavoriteRepository {
    async fn list_all(&self) -> Result<Vec<Favorite>, RepositoryError> {
        let favorites = self.db.collection::<Favorite>("favorites");
        let find_opts = FindOptions::builder().sort(doc! { "created_at": -1 }).build();

        let mut cursor = favorites.find(doc! {}, find_opts).await?;

        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }

    async fn exists(&self, user_id: ObjectId, hotel_id: &str) -> Result<bool, RepositoryError> {
        let n = self
            .db
            .collection::<Favorite>("favorites")
            .count_documents(doc! { "user_id": user_id, "hotel_id": hotel_id }, None)
            .await?;
        Ok(n > 0)
    }

    async fn insert(&self, favorite: &Favorite) -> Result<(), RepositoryError> {
        match self
            .db
            .collection::<Favorite>("favorites")
            .insert_one(favorite, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("E11000") => Err(RepositoryError::Duplicate("favorite")),
            Err(e) => Err(e.into()),
        }
    }
}

/// Adds a hotel to a user's favorites.
///
/// The user must exist and must not already track the hotel.
pub async fn create_favorite(
    state: &AppState,
    user_id: ObjectId,
    hotel_id: &str,
    target_price: f64,
) -> Result<Favorite, RepositoryError> {
    if !state.users.exists(user_id).await? {
        return Err(RepositoryError::NotFound("user"));
    }

    if state.favorites.exists(user_id, hotel_id).await? {
        return Err(RepositoryError::Duplicate("favorite"));
    }

    let favorite = Favorite {
        id: ObjectId::new(),
        user_id,
        hotel_id: hotel_id.to_string(),
        target_price,
        created_at: Utc::now().timestamp(),
    };

    state.favorites.insert(&favorite).await?;

    tracing::info!(
        user_id = %user_id,
        hotel_id = %favorite.hotel_id,
        target_price,
        "favorite created"
    );

    Ok(favorite)
}
