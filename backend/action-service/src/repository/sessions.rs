use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{SessionStore, StoreResult};
use crate::domain::{Session, SessionUser};

#[derive(sqlx::FromRow)]
struct SessionRow {
    expires: DateTime<Utc>,
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    image: Option<String>,
}

/// Reads sessions written by the identity provider's database adapter
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_session(&self, session_token: &str) -> StoreResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.expires, u.id AS user_id, u.name, u.email, u.image
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1 AND s.expires > NOW()
            "#,
        )
        .bind(session_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Session {
            user: Some(SessionUser {
                id: Some(row.user_id),
                name: row.name,
                email: row.email,
                image: row.image,
            }),
            expires: row.expires,
        }))
    }
}
