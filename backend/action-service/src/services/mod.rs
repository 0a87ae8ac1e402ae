/// Action layer: validated, identity-checked mutations over the social graph
///
/// Every action follows the same order: resolve the caller from the session,
/// validate the raw input, apply the (ownership-scoped or toggle) write, then
/// request view invalidation before returning.
pub mod comments;
pub mod guard;
pub mod invalidation;
pub mod messages;
pub mod posts;
pub mod profile;
pub mod toggle;
pub mod upload;

pub use guard::resolve_caller_id;
pub use invalidation::{
    InvalidationError, RecordingInvalidator, RedisViewInvalidator, ViewInvalidator,
};
pub use upload::{FileStore, MemoryFileStore, S3FileStore, UploadReceipt, UploadService};

use std::sync::Arc;

use crate::domain::Toggled;
use crate::error::ActionError;
use crate::repository::Repositories;
use crate::validation::{self, Schema};

/// What a successful action hands back to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Status text to render inline
    Message(String),
    /// A toggle result together with its status text
    Toggled { state: Toggled, message: String },
    /// Send the caller to another page
    Redirect(String),
}

impl ActionOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            ActionOutcome::Message(message) | ActionOutcome::Toggled { message, .. } => {
                Some(message)
            }
            ActionOutcome::Redirect(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct ActionService {
    repos: Repositories,
    invalidator: Arc<dyn ViewInvalidator>,
}

impl ActionService {
    pub fn new(repos: Repositories, invalidator: Arc<dyn ViewInvalidator>) -> Self {
        Self { repos, invalidator }
    }

    /// Validate a raw form, attaching the action's summary message on failure
    fn parse<S: Schema>(&self, raw: S, invalid_message: &str) -> Result<S::Output, ActionError> {
        validation::validate(raw).map_err(|errors| ActionError::validation(errors, invalid_message))
    }

    /// Request invalidation of a rendered view. Failures are logged, not returned:
    /// the mutation has already committed.
    async fn invalidate(&self, path: &str) {
        if let Err(err) = self.invalidator.invalidate(path).await {
            tracing::warn!(%path, "view invalidation failed: {}", err);
        }
    }
}
