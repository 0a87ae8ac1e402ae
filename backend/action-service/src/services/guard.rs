/// Authorization guard: caller identity from the session, failing closed
use uuid::Uuid;

use crate::domain::Session;
use crate::error::{ActionError, ActionResult};

/// Resolve the caller's user id, or `Unauthenticated` when there is no
/// session or the session carries no user id.
pub fn resolve_caller_id(session: Option<&Session>) -> ActionResult<Uuid> {
    session
        .and_then(|s| s.user.as_ref())
        .and_then(|u| u.id)
        .ok_or(ActionError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionUser;
    use chrono::{Duration, Utc};

    #[test]
    fn resolves_user_id() {
        let user_id = Uuid::new_v4();
        let session = Session::for_user(user_id, Utc::now() + Duration::hours(1));
        assert_eq!(resolve_caller_id(Some(&session)).unwrap(), user_id);
    }

    #[test]
    fn missing_session_is_unauthenticated() {
        assert!(matches!(
            resolve_caller_id(None),
            Err(ActionError::Unauthenticated)
        ));
    }

    #[test]
    fn session_without_identity_is_unauthenticated() {
        let no_user = Session {
            user: None,
            expires: Utc::now(),
        };
        assert!(matches!(
            resolve_caller_id(Some(&no_user)),
            Err(ActionError::Unauthenticated)
        ));

        let no_id = Session {
            user: Some(SessionUser {
                id: None,
                name: Some("ghost".into()),
                email: None,
                image: None,
            }),
            expires: Utc::now(),
        };
        assert!(matches!(
            resolve_caller_id(Some(&no_id)),
            Err(ActionError::Unauthenticated)
        ));
    }
}
