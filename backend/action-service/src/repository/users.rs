use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreResult, UserRepository};
use crate::domain::{ProfileChanges, User};

/// Repository for User profile operations
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, bio, gender, website, image, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_exists(&self, user_id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE id = $1
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_profile(&self, user_id: Uuid, changes: &ProfileChanges) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                username = COALESCE($3, username),
                bio = COALESCE($4, bio),
                gender = COALESCE($5, gender),
                website = COALESCE($6, website),
                image = COALESCE($7, image),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(&changes.name)
        .bind(&changes.username)
        .bind(&changes.bio)
        .bind(&changes.gender)
        .bind(&changes.website)
        .bind(&changes.image)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
