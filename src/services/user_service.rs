use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};

use crate::{AppState, error::RepositoryError, models::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// One page of users, newest first, plus the total count.
    async fn list(&self, offset: u64, limit: i64) -> Result<(Vec<User>, u64), RepositoryError>;

    async fn exists(&self, id: ObjectId) -> Result<bool, RepositoryError>;
}

#[derive(Clone)]
pub struct MongoUserRepository {
    db: Database,
}

impl MongoUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let users = self.db.collection::<User>("users");

        if let Err(e) = users.insert_one(user, None).await {
            let msg = e.to_string();
            if msg.contains("E11000") {
                return Err(RepositoryError::Duplicate("email"));
            }
            return Err(RepositoryError::Database(msg));
        }

        Ok(())
    }

    async fn list(&self, offset: u64, limit: i64) -> Result<(Vec<User>, u64), RepositoryError> {
        let users = self.db.collection::<User>("users");
        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(offset)
            .limit(limit)
            .build();

        let mut cursor = users.find(doc! {}, find_opts).await?;

        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        let total = users.count_documents(doc! {}, None).await?;

        Ok((items, total))
    }

    async fn exists(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        let n = self
            .db
            .collection::<User>("users")
            .count_documents(doc! { "_id": id }, None)
            .await?;
        Ok(n > 0)
    }
}

pub async fn register_user(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, RepositoryError> {
    let password_hash = bcrypt::hash(password, state.settings.bcrypt_cost)
        .map_err(|e| RepositoryError::Database(format!("failed to hash password: {e}")))?;

    let user = User {
        id: ObjectId::new(),
        name: name.to_string(),
        email: email.to_lowercase(),
        password_hash,
        created_at: Utc::now().timestamp(),
    };

    state.users.insert(&user).await?;

    tracing::info!(user_id = %user.id, "user created");

    Ok(user)
}

pub async fn list_users(state: &AppState, offset: u32, limit: u32) -> Result<(Vec<User>, u64), RepositoryError> {
    state.users.list(u64::from(offset), i64::from(limit)).await
}
