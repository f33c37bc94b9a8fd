use tracing::debug;
use wizard_flow::{Context, Result};

use crate::models::{
    ApplicationData, ApplicationState, FamilyFinancialInfo, PersonalInformation,
    SituationDescriptions, session_keys,
};

/// Holds the committed application state for one wizard session.
///
/// All mutation goes through the named actions below. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ApplicationStore {
    context: Context,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_personal_information(&self, info: PersonalInformation) -> Result<()> {
        self.context.set(session_keys::PERSONAL_INFORMATION, info)
    }

    pub fn update_family_financial_info(&self, info: FamilyFinancialInfo) -> Result<()> {
        self.context.set(session_keys::FAMILY_FINANCIAL_INFO, info)
    }

    pub fn update_situation_descriptions(&self, info: SituationDescriptions) -> Result<()> {
        self.context.set(session_keys::SITUATION_DESCRIPTIONS, info)
    }

    pub fn set_current_step(&self, step: usize) -> Result<()> {
        self.context.set(session_keys::CURRENT_STEP, step.max(1))
    }

    pub fn set_submitting(&self, submitting: bool) -> Result<()> {
        self.context.set(session_keys::IS_SUBMITTING, submitting)
    }

    /// Back to the empty initial shape.
    pub fn reset_application(&self) {
        debug!("Resetting application state");
        self.context.clear();
    }

    pub fn is_submitting(&self) -> bool {
        self.context.get_or_default(session_keys::IS_SUBMITTING)
    }

    pub fn personal_information(&self) -> PersonalInformation {
        self.context.get_or_default(session_keys::PERSONAL_INFORMATION)
    }

    pub fn family_financial_info(&self) -> FamilyFinancialInfo {
        self.context.get_or_default(session_keys::FAMILY_FINANCIAL_INFO)
    }

    pub fn situation_descriptions(&self) -> SituationDescriptions {
        self.context.get_or_default(session_keys::SITUATION_DESCRIPTIONS)
    }

    pub fn application_data(&self) -> ApplicationData {
        ApplicationData {
            personal_information: self.personal_information(),
            family_financial_info: self.family_financial_info(),
            situation_descriptions: self.situation_descriptions(),
        }
    }

    pub fn snapshot(&self) -> ApplicationState {
        ApplicationState {
            personal_information: self.personal_information(),
            family_financial_info: self.family_financial_info(),
            situation_descriptions: self.situation_descriptions(),
            current_step: self.context.get(session_keys::CURRENT_STEP).unwrap_or(1),
            is_submitting: self.is_submitting(),
        }
    }
}
