#![allow(dead_code)]

use action_service::domain::{Session, User};
use action_service::repository::{MemoryStore, Repositories};
use action_service::services::{ActionService, RecordingInvalidator};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Action service over an in-memory store with recorded invalidations
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub invalidator: Arc<RecordingInvalidator>,
    pub service: ActionService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let invalidator = Arc::new(RecordingInvalidator::new());
        let service = ActionService::new(Repositories::shared(store.clone()), invalidator.clone());
        Self {
            store,
            invalidator,
            service,
        }
    }

    /// Seed a user and return it with a live session
    pub async fn signed_in(&self, username: &str) -> (User, Session) {
        let user = self.store.seed_user(username).await;
        let session = session_for(user.id);
        (user, session)
    }
}

pub fn session_for(user_id: Uuid) -> Session {
    Session::for_user(user_id, Utc::now() + Duration::hours(1))
}
