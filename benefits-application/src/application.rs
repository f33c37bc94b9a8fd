use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};
use uuid::Uuid;
use wizard_flow::{
    NavigationOutcome, Result, StepDescriptor, StepRegistration, Wizard, WizardBuilder,
};

use crate::i18n::Translator;
use crate::models::{
    ContextualFormData, FamilyFinancialInfo, FieldKind, PersonalInformation, SituationDescriptions,
    session_keys,
};
use crate::rules::FieldErrors;
use crate::steps::{
    self, CONFIRMATION_ROUTE, FAMILY_FINANCIAL, PERSONAL_INFORMATION, SITUATION, STEPS, StepEnv,
};
use crate::store::ApplicationStore;
use crate::suggest::{SuggestionRequest, SuggestionReview, SuggestionService};

/// One user's pass through the three-step application.
///
/// Each step edits a draft kept in the session context. Only the active step
/// has a validator mounted on the gate, and it is re-mounted on every draft
/// edit so it always checks what the user last typed.
pub struct ApplicationWizard {
    wizard: Wizard,
    env: StepEnv,
    suggestions: SuggestionService,
    mounted: Option<StepRegistration>,
}

impl ApplicationWizard {
    pub fn new(env: StepEnv, suggestions: SuggestionService) -> Self {
        let wizard = STEPS
            .iter()
            .fold(
                WizardBuilder::new(Uuid::new_v4().to_string()),
                |builder, (id, route, title_key)| builder.add_step(*id, *route, *title_key),
            )
            .completion_route(CONFIRMATION_ROUTE)
            .build();
        info!(wizard_id = %wizard.id, mock = suggestions.is_mock(), "Starting application wizard");

        let mut this = Self {
            wizard,
            env,
            suggestions,
            mounted: None,
        };
        this.mount_current();
        this
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn store(&self) -> &ApplicationStore {
        &self.env.store
    }

    pub fn translator(&self) -> &Translator {
        &self.env.translator
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.wizard.current_step()
    }

    pub fn progress(&self) -> u8 {
        self.wizard.progress()
    }

    pub fn is_complete(&self) -> bool {
        self.wizard.is_complete()
    }

    /// Step whose validator currently sits on the gate.
    pub fn mounted_step(&self) -> Option<&str> {
        self.mounted.as_ref().map(|registration| registration.step_id())
    }

    pub fn last_application_id(&self) -> Option<String> {
        self.env.session.get(session_keys::LAST_APPLICATION_ID)
    }

    pub fn field_errors(&self, step_id: &str) -> FieldErrors {
        steps::field_errors(&self.env.session, step_id)
    }

    pub fn personal_draft(&self) -> PersonalInformation {
        self.draft(PERSONAL_INFORMATION, || self.env.store.personal_information())
    }

    pub fn family_draft(&self) -> FamilyFinancialInfo {
        self.draft(FAMILY_FINANCIAL, || self.env.store.family_financial_info())
    }

    pub fn situation_draft(&self) -> SituationDescriptions {
        self.draft(SITUATION, || self.env.store.situation_descriptions())
    }

    pub fn edit_personal(&mut self, edit: impl FnOnce(&mut PersonalInformation)) -> Result<()> {
        let mut draft = self.personal_draft();
        edit(&mut draft);
        self.save_draft(PERSONAL_INFORMATION, &draft)
    }

    pub fn edit_family(&mut self, edit: impl FnOnce(&mut FamilyFinancialInfo)) -> Result<()> {
        let mut draft = self.family_draft();
        edit(&mut draft);
        self.save_draft(FAMILY_FINANCIAL, &draft)
    }

    pub fn edit_situation(&mut self, edit: impl FnOnce(&mut SituationDescriptions)) -> Result<()> {
        let mut draft = self.situation_draft();
        edit(&mut draft);
        self.save_draft(SITUATION, &draft)
    }

    /// Validate the active step and move on if it passes.
    ///
    /// Passing the last step submits the application; on success the drafts
    /// are dropped and the wizard sits on the confirmation route.
    pub async fn next(&mut self) -> Result<NavigationOutcome> {
        let outcome = self.wizard.next().await?;
        match &outcome {
            NavigationOutcome::Advanced { .. } => {
                self.env
                    .store
                    .set_current_step(self.wizard.current_step_number())?;
                self.mount_current();
            }
            NavigationOutcome::Submitted { .. } => {
                self.mounted = None;
                self.env.session.remove_prefixed(session_keys::DRAFT_PREFIX);
                self.env.session.remove_prefixed(session_keys::ERRORS_PREFIX);
            }
            NavigationOutcome::Blocked { .. } => {}
        }
        Ok(outcome)
    }

    /// Step back without validation. Returns the newly active step.
    pub fn back(&mut self) -> Result<Option<StepDescriptor>> {
        let Some(step) = self.wizard.back().cloned() else {
            return Ok(None);
        };
        self.env
            .store
            .set_current_step(self.wizard.current_step_number())?;
        self.mount_current();
        Ok(Some(step))
    }

    /// Start a fresh application from the first step.
    pub fn restart(&mut self) -> Result<()> {
        self.wizard.restart();
        self.env.store.set_current_step(1)?;
        self.mount_current();
        Ok(())
    }

    /// Context for a suggestion on `field_kind`, from what is known so far.
    pub fn suggestion_request(&self, field_kind: FieldKind) -> SuggestionRequest {
        let family = self.env.store.family_financial_info();
        let current_text = self.situation_draft().field(field_kind).trim().to_string();

        SuggestionRequest {
            field_kind,
            language: self.env.translator.language(),
            context: Some(ContextualFormData {
                family_financial_info: (family != FamilyFinancialInfo::default()).then_some(family),
                location: self.personal_draft().location(),
                current_text: (!current_text.is_empty()).then_some(current_text),
            }),
        }
    }

    /// Request a suggestion for `field_kind`. Never fails.
    pub async fn suggest(&self, field_kind: FieldKind) -> SuggestionReview {
        let request = self.suggestion_request(field_kind);
        let result = self.suggestions.generate_suggestion(&request).await;
        SuggestionReview::from_result(field_kind, result, &self.env.translator)
    }

    /// Write accepted suggestion text into the situation draft.
    pub fn apply_suggestion(&mut self, field_kind: FieldKind, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.edit_situation(|draft| draft.set_field(field_kind, text))
    }

    fn draft<T: DeserializeOwned>(&self, step_id: &str, committed: impl FnOnce() -> T) -> T {
        self.env
            .session
            .get(&steps::draft_key(step_id))
            .unwrap_or_else(committed)
    }

    fn save_draft<T: Serialize>(&mut self, step_id: &str, draft: &T) -> Result<()> {
        self.env.session.set(steps::draft_key(step_id), draft)?;
        if self.current_step().is_some_and(|step| step.id == step_id) {
            self.mount_current();
        }
        Ok(())
    }

    /// Register the active step's validator over a snapshot of its draft.
    fn mount_current(&mut self) {
        let Some(step_id) = self.current_step().map(|step| step.id.clone()) else {
            self.mounted = None;
            return;
        };
        debug!(step_id = %step_id, "Mounting step validator");

        let gate = self.wizard.gate().clone();
        let env = self.env.clone();
        let registration = match step_id.as_str() {
            PERSONAL_INFORMATION => {
                let draft = self.personal_draft();
                gate.register_scoped(step_id.clone(), move || {
                    let (env, draft) = (env.clone(), draft.clone());
                    async move { steps::personal_information::validate(&env, &draft).await }
                })
            }
            FAMILY_FINANCIAL => {
                let draft = self.family_draft();
                gate.register_scoped(step_id.clone(), move || {
                    let (env, draft) = (env.clone(), draft.clone());
                    async move { steps::family_financial::validate(&env, &draft).await }
                })
            }
            _ => {
                let draft = self.situation_draft();
                gate.register_scoped(step_id.clone(), move || {
                    let (env, draft) = (env.clone(), draft.clone());
                    async move { steps::situation::validate(&env, &draft).await }
                })
            }
        };
        self.mounted = Some(registration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestionConfig;
    use crate::steps::test_support;

    fn wizard() -> ApplicationWizard {
        let (env, _) = test_support::env();
        ApplicationWizard::new(env, SuggestionService::new(SuggestionConfig::default(), None))
    }

    #[test]
    fn only_the_active_step_is_mounted() {
        let app = wizard();
        assert_eq!(app.mounted_step(), Some(PERSONAL_INFORMATION));
        assert_eq!(
            app.wizard().gate().registered_steps(),
            vec![PERSONAL_INFORMATION.to_string()]
        );
    }

    #[tokio::test]
    async fn validator_sees_latest_draft() {
        let mut app = wizard();
        assert!(matches!(
            app.next().await.unwrap(),
            NavigationOutcome::Blocked { .. }
        ));
        assert!(app.field_errors(PERSONAL_INFORMATION).contains_key("name"));

        app.edit_personal(|draft| draft.name = "Omar".into()).unwrap();
        app.next().await.unwrap();
        assert!(!app.field_errors(PERSONAL_INFORMATION).contains_key("name"));
        assert_eq!(app.current_step().unwrap().id, PERSONAL_INFORMATION);
    }

    #[tokio::test]
    async fn restart_returns_to_the_first_step() {
        let mut app = wizard();
        app.edit_personal(|draft| {
            draft.name = "Layla Hassan".into();
            draft.national_id = "784199012345678".into();
            draft.date_of_birth = "1990-04-12".into();
            draft.gender = "female".into();
            draft.address = "Building 7, Khalifa Street".into();
            draft.city = "Abu Dhabi".into();
            draft.state = "Abu Dhabi".into();
            draft.country = "UAE".into();
            draft.phone = "+971 50 123 4567".into();
            draft.email = "layla@example.com".into();
        })
        .unwrap();
        assert!(matches!(
            app.next().await.unwrap(),
            NavigationOutcome::Advanced { .. }
        ));
        assert_eq!(app.mounted_step(), Some(FAMILY_FINANCIAL));

        app.restart().unwrap();
        assert_eq!(app.current_step().unwrap().id, PERSONAL_INFORMATION);
        assert_eq!(app.mounted_step(), Some(PERSONAL_INFORMATION));
        assert_eq!(app.store().snapshot().current_step, 1);
    }

    #[test]
    fn suggestion_request_carries_known_context() {
        let mut app = wizard();
        app.edit_personal(|draft| {
            draft.city = "Al Ain".into();
            draft.country = "UAE".into();
        })
        .unwrap();
        app.store()
            .update_family_financial_info(FamilyFinancialInfo {
                employment_status: "unemployed".into(),
                ..Default::default()
            })
            .unwrap();
        app.edit_situation(|draft| draft.reason_for_applying = "  rent arrears ".into())
            .unwrap();

        let request = app.suggestion_request(FieldKind::ReasonForApplying);
        let context = request.context.unwrap();
        assert_eq!(context.location.as_deref(), Some("Al Ain, UAE"));
        assert!(context.is_unemployed());
        assert_eq!(context.current_text.as_deref(), Some("rent arrears"));

        let request = app.suggestion_request(FieldKind::EmploymentCircumstances);
        assert_eq!(request.context.unwrap().current_text, None);
    }

    #[tokio::test(start_paused = true)]
    async fn accepted_suggestion_lands_in_the_draft() {
        let mut app = wizard();
        let review = app.suggest(FieldKind::CurrentFinancialSituation).await;
        let text = review.accept().unwrap();

        app.apply_suggestion(FieldKind::CurrentFinancialSituation, text.clone())
            .unwrap();
        assert_eq!(app.situation_draft().current_financial_situation, text);
    }
}
