use tracing::{error, info, warn};
use wizard_flow::Result;

use super::{SITUATION, StepEnv};
use crate::models::{SituationDescriptions, session_keys};
use crate::rules::validate_situation_descriptions;
use crate::store::ApplicationStore;

/// Holds `is_submitting` true until dropped, even if the submission future is.
struct Submitting<'a>(&'a ApplicationStore);

impl<'a> Submitting<'a> {
    fn start(store: &'a ApplicationStore) -> Result<Self> {
        store.set_submitting(true)?;
        Ok(Self(store))
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.0.set_submitting(false) {
            error!(error = %e, "Failed to clear submitting flag");
        }
    }
}

/// Validate the narratives, commit them, then submit the whole application.
pub async fn validate(env: &StepEnv, draft: &SituationDescriptions) -> Result<bool> {
    if !env.check(SITUATION, validate_situation_descriptions(draft))? {
        return Ok(false);
    }
    env.store.update_situation_descriptions(draft.clone())?;
    submit(env).await
}

/// Persist the committed application.
///
/// On success the store is reset and the new application id is kept in the
/// session. A storage failure leaves every committed answer in place.
/// `is_submitting` is false again whichever way this ends, including when
/// the future is dropped mid-save.
pub async fn submit(env: &StepEnv) -> Result<bool> {
    if env.store.is_submitting() {
        warn!("Submission already in progress, ignoring");
        env.failure("toast.submitInProgress", &[]);
        return Ok(false);
    }

    let saved = {
        let _submitting = Submitting::start(&env.store)?;
        let data = env.store.application_data();
        env.storage.save(&data).await
    };

    match saved {
        Ok(application_id) => {
            env.store.reset_application();
            env.session
                .set(session_keys::LAST_APPLICATION_ID, &application_id)?;
            info!(application_id = %application_id, "Application submitted");
            env.success("toast.submitSuccess", &[("id", application_id.as_str())]);
            Ok(true)
        }
        Err(e) => {
            error!(error = ?e, "Application submission failed");
            env.failure("toast.submitFailed", &[]);
            Ok(false)
        }
    }
}
