use mongodb::{
    Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // users: unique email
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // favorites: a user tracks a hotel at most once
    {
        let col = db.collection::<mongodb::bson::Document>("favorites");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "hotel_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // favorites: monitor scan order
    {
        let col = db.collection::<mongodb::bson::Document>("favorites");
        let model = IndexModel::builder().keys(doc! { "created_at": -1 }).build();

        col.create_index(model, None).await?;
    }

    Ok(())
}
