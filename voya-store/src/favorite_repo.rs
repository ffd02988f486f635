use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use voya_core::favorites::{Favorite, NewFavorite};
use voya_core::repository::FavoriteRepository;
use voya_core::{CoreError, CoreResult};

pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_err(e: sqlx::Error) -> CoreError {
    CoreError::StorageError(e.to_string())
}

fn row_to_favorite(row: &PgRow) -> Result<Favorite, sqlx::Error> {
    Ok(Favorite {
        id: row.try_get::<Uuid, _>("id")?,
        user_id: row.try_get::<String, _>("user_id")?,
        destination: row.try_get::<Option<String>, _>("destination")?,
        start_date: row.try_get::<Option<NaiveDate>, _>("start_date")?,
        end_date: row.try_get::<Option<NaiveDate>, _>("end_date")?,
        itinerary: row.try_get::<Value, _>("itinerary")?,
        flights: row.try_get::<Option<Value>, _>("flights")?,
        hotels: row.try_get::<Option<Value>, _>("hotels")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn create(&self, favorite: &NewFavorite) -> CoreResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO favorites (id, user_id, destination, start_date, end_date, itinerary, flights, hotels)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&favorite.user_id)
        .bind(&favorite.destination)
        .bind(favorite.start_date)
        .bind(favorite.end_date)
        .bind(&favorite.itinerary)
        .bind(&favorite.flights)
        .bind(&favorite.hotels)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(id)
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Favorite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, destination, start_date, end_date, itinerary, flights, hotels, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| row_to_favorite(row).map_err(storage_err))
            .collect()
    }
}
