use sqlx::PgPool;
use uuid::Uuid;

use crate::controllers::creator::{map_creator_summary, SUMMARY_COLUMNS};
use crate::core::error::Error;
use crate::types::response::CreatorSummary;

#[derive(Clone, Debug)]
pub(crate) struct WishlistController {
    pool: PgPool,
}

impl WishlistController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn add(&self, user_id: Uuid, creator_id: Uuid) -> Result<(), Error> {
        match sqlx::query(
            "INSERT INTO brand_wishlists (user_id, creator_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, creator_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(creator_id)
        .execute(&self.pool)
        .await
        {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(Error::NotFound("Creator not found"))
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn remove(&self, user_id: Uuid, creator_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM brand_wishlists WHERE user_id = $1 AND creator_id = $2")
            .bind(user_id)
            .bind(creator_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn list(&self, user_id: Uuid) -> Result<Vec<CreatorSummary>, Error> {
        let creators = sqlx::query(&format!(
            "SELECT {}
            FROM brand_wishlists w
            JOIN creators c ON c.id = w.creator_id
            LEFT JOIN rate_cards r ON c.id = r.creator_id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC",
            SUMMARY_COLUMNS
        ))
        .bind(user_id)
        .map(map_creator_summary)
        .fetch_all(&self.pool)
        .await?;

        Ok(creators)
    }
}
