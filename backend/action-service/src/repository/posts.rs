use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PostRepository, StoreResult};
use crate::domain::{NewPost, Post, PostChanges};

/// Repository for Post operations
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn get_post(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, caption, location, file_url, user_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn post_exists(&self, post_id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM posts
                WHERE id = $1
            )
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_post(&self, post: &NewPost) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, file_url, caption, location)
            VALUES ($1, $2, $3, $4)
            RETURNING id, caption, location, file_url, user_id, created_at, updated_at
            "#,
        )
        .bind(post.user_id)
        .bind(&post.file_url)
        .bind(&post.caption)
        .bind(&post.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_owned_post(
        &self,
        post_id: Uuid,
        owner_id: Uuid,
        changes: &PostChanges,
    ) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET file_url = $3, caption = $4, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, caption, location, file_url, user_id, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(&changes.file_url)
        .bind(&changes.caption)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_owned_post(&self, post_id: Uuid, owner_id: Uuid) -> StoreResult<bool> {
        // comments, likes and saved_posts go with it (ON DELETE CASCADE)
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
