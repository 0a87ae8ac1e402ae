use super::messages::*;
use super::{resolve_caller_id, ActionOutcome, ActionService};
use crate::domain::Session;
use crate::error::{ActionError, ActionResult};
use crate::validation::UpdateProfileForm;

impl ActionService {
    /// Update the caller's own profile. Fields not provided keep their value.
    pub async fn update_profile(
        &self,
        session: Option<&Session>,
        raw: UpdateProfileForm,
    ) -> ActionResult<ActionOutcome> {
        let caller_id = resolve_caller_id(session)?;
        let changes = self.parse(raw, UPDATE_PROFILE_INVALID)?;

        let updated = self
            .repos
            .users
            .update_profile(caller_id, &changes)
            .await
            .map_err(|e| ActionError::persistence(UPDATE_PROFILE_FAILED, e))?;

        // No existence check up front; a vanished row is a failed write.
        if !updated {
            return Err(ActionError::persistence(
                UPDATE_PROFILE_FAILED,
                format!("no user row for {}", caller_id),
            ));
        }

        tracing::info!(user_id = %caller_id, "profile updated");

        self.invalidate(DASHBOARD_PATH).await;
        Ok(ActionOutcome::Message(PROFILE_UPDATED.to_string()))
    }
}
