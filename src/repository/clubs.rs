//! Read access to clubs, courts, opening hours and tariff rules

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Club, Court, OperatingHours, TariffRule},
};

#[derive(Clone)]
pub struct ClubsRepository {
    pool: Pool<Postgres>,
}

impl ClubsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get court by ID
    pub async fn get_court(&self, id: i32) -> AppResult<Court> {
        sqlx::query_as::<_, Court>(
            "SELECT id, club_id, name, day_price, night_price, state FROM courts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Court {} not found", id)))
    }

    /// Get club by ID
    pub async fn get_club(&self, id: i32) -> AppResult<Club> {
        sqlx::query_as::<_, Club>(
            "SELECT id, name, add_on_price, night_start, night_end, created_at FROM clubs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Club {} not found", id)))
    }

    /// Opening hours of a club for an ISO weekday
    pub async fn hours_for(&self, club_id: i32, weekday: i16) -> AppResult<Option<OperatingHours>> {
        let row = sqlx::query_as::<_, OperatingHours>(
            r#"
            SELECT club_id, weekday, open_time, close_time, active
            FROM club_hours
            WHERE club_id = $1 AND weekday = $2
            "#,
        )
        .bind(club_id)
        .bind(weekday)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Tariff rules of a club for an ISO weekday, most specific first
    pub async fn tariff_rules(&self, club_id: i32, weekday: i16) -> AppResult<Vec<TariffRule>> {
        let rows = sqlx::query_as::<_, TariffRule>(
            r#"
            SELECT id, club_id, weekday, from_time, to_time, price_per_hour
            FROM tariff_rules
            WHERE club_id = $1 AND weekday = $2
            ORDER BY from_time DESC, id ASC
            "#,
        )
        .bind(club_id)
        .bind(weekday)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
