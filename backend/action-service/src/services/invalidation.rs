//! View invalidation.
//!
//! After a successful mutation the action asks for the affected listing path
//! to be invalidated so renderers recompute it on next access. The Redis
//! implementation broadcasts an [`InvalidationMessage`] on a pub/sub channel;
//! rendering nodes subscribed to it drop their cached copy of the path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum InvalidationError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Message published for each invalidated path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidationMessage {
    pub message_id: String,
    pub path: String,
    pub timestamp: DateTime<Utc>,
    pub source_service: String,
}

impl InvalidationMessage {
    pub fn path(path: &str, source_service: &str) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            path: path.to_string(),
            timestamp: Utc::now(),
            source_service: source_service.to_string(),
        }
    }
}

#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError>;
}

/// Publishes invalidations on a Redis channel
#[derive(Clone)]
pub struct RedisViewInvalidator {
    client: ConnectionManager,
    channel: String,
    service_name: String,
}

impl RedisViewInvalidator {
    /// Default Redis channel for view invalidation
    pub const DEFAULT_CHANNEL: &'static str = "views:invalidate";

    pub async fn new(
        redis_url: &str,
        service_name: String,
        channel: String,
    ) -> Result<Self, InvalidationError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            client: connection,
            channel,
            service_name,
        })
    }
}

#[async_trait]
impl ViewInvalidator for RedisViewInvalidator {
    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        let msg = InvalidationMessage::path(path, &self.service_name);
        let payload = serde_json::to_string(&msg)?;

        let mut conn = self.client.clone();
        let subscribers: usize = conn.publish(&self.channel, payload).await?;

        debug!(
            message_id = %msg.message_id,
            path = %msg.path,
            channel = %self.channel,
            subscribers,
            "View invalidation published"
        );
        Ok(())
    }
}

/// Keeps invalidated paths in memory, in request order
#[derive(Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .expect("recorded paths lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ViewInvalidator for RecordingInvalidator {
    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        self.paths
            .lock()
            .expect("recorded paths lock poisoned")
            .push(path.to_string());
        Ok(())
    }
}
