use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RelationRepository, StoreError, StoreResult};
use crate::domain::{Relation, ToggleWrite};

/// Table and key columns (actor, target) backing each relation
fn table_of(relation: Relation) -> (&'static str, &'static str, &'static str) {
    match relation {
        Relation::Like => ("likes", "user_id", "post_id"),
        Relation::Bookmark => ("saved_posts", "user_id", "post_id"),
        Relation::Follow => ("follows", "follower_id", "following_id"),
    }
}

/// Repository for the presence-only join tables (likes, saved_posts, follows)
#[derive(Clone)]
pub struct PgRelationRepository {
    pool: PgPool,
}

impl PgRelationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationRepository for PgRelationRepository {
    /// Delete-if-present else insert-if-absent, as one statement.
    ///
    /// Both CTEs run against the same snapshot. If a concurrent transaction
    /// inserts the same key first, the unique index makes our insert a no-op and
    /// the statement reports `AlreadyPresent` instead of failing.
    async fn toggle(
        &self,
        relation: Relation,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> StoreResult<ToggleWrite> {
        let (table, actor_col, target_col) = table_of(relation);
        let query = format!(
            r#"
            WITH removed AS (
                DELETE FROM {table}
                WHERE {actor_col} = $1 AND {target_col} = $2
                RETURNING 1
            ),
            inserted AS (
                INSERT INTO {table} ({actor_col}, {target_col})
                SELECT $1, $2
                WHERE NOT EXISTS (SELECT 1 FROM removed)
                ON CONFLICT ({actor_col}, {target_col}) DO NOTHING
                RETURNING 1
            )
            SELECT EXISTS(SELECT 1 FROM removed), EXISTS(SELECT 1 FROM inserted)
            "#
        );

        let row: Result<(bool, bool), StoreError> = sqlx::query_as(&query)
            .bind(actor_id)
            .bind(target_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from);

        let write = match row {
            Ok((true, _)) => ToggleWrite::Deleted,
            Ok((false, true)) => ToggleWrite::Inserted,
            Ok((false, false)) => ToggleWrite::AlreadyPresent,
            // Key already present; treat as the insert having happened.
            Err(StoreError::UniqueViolation(_)) => ToggleWrite::AlreadyPresent,
            Err(err) => return Err(err),
        };

        Ok(write)
    }

    async fn exists(
        &self,
        relation: Relation,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> StoreResult<bool> {
        let (table, actor_col, target_col) = table_of(relation);
        let query = format!(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM {table}
                WHERE {actor_col} = $1 AND {target_col} = $2
            )
            "#
        );

        let exists: bool = sqlx::query_scalar(&query)
            .bind(actor_id)
            .bind(target_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
