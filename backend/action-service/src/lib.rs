/// Action Service Library
///
/// Authenticated, validated mutations over a photo-sharing social graph:
/// post and comment CRUD, like/bookmark/follow toggles, profile updates and
/// image uploads, each followed by invalidation of the affected views.
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::Config;
pub use error::{ActionError, ActionResult};
pub use services::{ActionOutcome, ActionService, UploadService};
