//! Users repository (profile lookups only)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::UserProfile,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the contact fields of a user
    pub async fn get_profile(&self, id: i32) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, firstname, lastname, phone FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}
