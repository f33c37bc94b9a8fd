//! Validators that gate leaving each wizard step.
//!
//! A validator checks the step's draft, records field errors in the session,
//! and on success commits the slice to the [`ApplicationStore`]. The situation
//! step also submits the finished application.

pub mod family_financial;
pub mod personal_information;
pub mod situation;

use std::sync::Arc;
use tracing::debug;
use wizard_flow::{Context, Result};

use crate::i18n::Translator;
use crate::models::session_keys;
use crate::notify::{Notification, NotificationLevel, Notifier};
use crate::persistence::ApplicationStorage;
use crate::rules::FieldErrors;
use crate::store::ApplicationStore;

pub const PERSONAL_INFORMATION: &str = "personal-information";
pub const FAMILY_FINANCIAL: &str = "family-financial";
pub const SITUATION: &str = "situation";

/// (step id, route, title key) in wizard order.
pub const STEPS: [(&str, &str, &str); 3] = [
    (PERSONAL_INFORMATION, "/personal-information", "steps.personal"),
    (FAMILY_FINANCIAL, "/family-financial", "steps.family"),
    (SITUATION, "/situation", "steps.situation"),
];

pub const CONFIRMATION_ROUTE: &str = "/confirmation";

/// Collaborators shared by every step validator. Clones share state.
#[derive(Clone)]
pub struct StepEnv {
    pub store: ApplicationStore,
    pub storage: ApplicationStorage,
    pub translator: Translator,
    pub notifier: Arc<dyn Notifier>,
    /// Per-session drafts, field errors and the last application id.
    pub session: Context,
}

impl StepEnv {
    pub fn new(
        store: ApplicationStore,
        storage: ApplicationStorage,
        translator: Translator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            storage,
            translator,
            notifier,
            session: Context::new(),
        }
    }

    /// Record `errors` for `step_id`; tell the user when there are any.
    ///
    /// Returns whether the step is free of errors.
    pub(crate) fn check(&self, step_id: &str, errors: FieldErrors) -> Result<bool> {
        let key = errors_key(step_id);
        if errors.is_empty() {
            self.session.remove(&key);
            return Ok(true);
        }

        debug!(step_id, fields = ?errors.keys().collect::<Vec<_>>(), "Step has invalid fields");
        self.session.set(key, errors)?;
        self.failure("toast.validationFailed", &[]);
        Ok(false)
    }

    pub(crate) fn step_saved(&self, title_key: &str) {
        let step = self.translator.t(title_key, &[]);
        self.success("toast.stepSaved", &[("step", step.as_str())]);
    }

    pub(crate) fn success(&self, key: &str, params: &[(&str, &str)]) {
        self.send(NotificationLevel::Success, "toast.success", key, params);
    }

    pub(crate) fn failure(&self, key: &str, params: &[(&str, &str)]) {
        self.send(NotificationLevel::Failure, "toast.error", key, params);
    }

    fn send(&self, level: NotificationLevel, title_key: &str, key: &str, params: &[(&str, &str)]) {
        self.notifier.notify(Notification {
            level,
            title: self.translator.t(title_key, &[]),
            message: self.translator.t(key, params),
        });
    }
}

pub fn errors_key(step_id: &str) -> String {
    format!("{}{step_id}", session_keys::ERRORS_PREFIX)
}

pub fn draft_key(step_id: &str) -> String {
    format!("{}{step_id}", session_keys::DRAFT_PREFIX)
}

/// Errors recorded by the last failed validation of `step_id`.
pub fn field_errors(session: &Context, step_id: &str) -> FieldErrors {
    session.get_or_default(&errors_key(step_id))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::language::Language;
    use crate::notify::RecordingNotifier;
    use wizard_flow::{InMemoryStore, KeyValueStore};

    pub fn env_with(store: Arc<dyn KeyValueStore>) -> (StepEnv, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let env = StepEnv::new(
            ApplicationStore::new(),
            ApplicationStorage::new(store),
            Translator::new(Language::En),
            Arc::new(notifier.clone()),
        );
        (env, notifier)
    }

    pub fn env() -> (StepEnv, RecordingNotifier) {
        env_with(Arc::new(InMemoryStore::new()))
    }
}
