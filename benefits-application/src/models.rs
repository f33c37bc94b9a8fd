use serde::{Deserialize, Serialize};

/// Step 1 form slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInformation {
    pub name: String,
    pub national_id: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub gender: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

impl PersonalInformation {
    /// "city, state, country" with blank parts skipped.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Step 2 form slice. Values are kept as entered, like the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyFinancialInfo {
    pub marital_status: String,
    pub dependents: String,
    pub employment_status: String,
    pub monthly_income: String,
    pub housing_status: String,
}

/// Step 3 form slice: the three narrative answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationDescriptions {
    pub current_financial_situation: String,
    pub employment_circumstances: String,
    pub reason_for_applying: String,
}

/// The narrative fields an AI suggestion can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    CurrentFinancialSituation,
    EmploymentCircumstances,
    ReasonForApplying,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [
        FieldKind::CurrentFinancialSituation,
        FieldKind::EmploymentCircumstances,
        FieldKind::ReasonForApplying,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::CurrentFinancialSituation => "currentFinancialSituation",
            FieldKind::EmploymentCircumstances => "employmentCircumstances",
            FieldKind::ReasonForApplying => "reasonForApplying",
        }
    }
}

impl SituationDescriptions {
    pub fn field(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::CurrentFinancialSituation => &self.current_financial_situation,
            FieldKind::EmploymentCircumstances => &self.employment_circumstances,
            FieldKind::ReasonForApplying => &self.reason_for_applying,
        }
    }

    pub fn set_field(&mut self, kind: FieldKind, text: impl Into<String>) {
        let slot = match kind {
            FieldKind::CurrentFinancialSituation => &mut self.current_financial_situation,
            FieldKind::EmploymentCircumstances => &mut self.employment_circumstances,
            FieldKind::ReasonForApplying => &mut self.reason_for_applying,
        };
        *slot = text.into();
    }
}

/// The three slices that make up a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationData {
    pub personal_information: PersonalInformation,
    pub family_financial_info: FamilyFinancialInfo,
    pub situation_descriptions: SituationDescriptions,
}

/// Whole-wizard state owned by the application store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub personal_information: PersonalInformation,
    pub family_financial_info: FamilyFinancialInfo,
    pub situation_descriptions: SituationDescriptions,
    /// 1-based.
    pub current_step: usize,
    pub is_submitting: bool,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            personal_information: PersonalInformation::default(),
            family_financial_info: FamilyFinancialInfo::default(),
            situation_descriptions: SituationDescriptions::default(),
            current_step: 1,
            is_submitting: false,
        }
    }
}

/// Snapshot of already-entered form values used to personalise a suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualFormData {
    pub family_financial_info: Option<FamilyFinancialInfo>,
    pub location: Option<String>,
    /// Text already typed into the target field.
    pub current_text: Option<String>,
}

impl ContextualFormData {
    pub fn is_unemployed(&self) -> bool {
        self.family_financial_info
            .as_ref()
            .is_some_and(|info| info.employment_status.trim().eq_ignore_ascii_case("unemployed"))
    }

    /// Dependents count when it parses to a positive integer.
    pub fn dependents(&self) -> Option<u32> {
        self.family_financial_info
            .as_ref()
            .and_then(|info| info.dependents.trim().parse::<u32>().ok())
            .filter(|count| *count > 0)
    }
}

/// Keys used in the session and store contexts.
pub mod session_keys {
    pub const PERSONAL_INFORMATION: &str = "personal_information";
    pub const FAMILY_FINANCIAL_INFO: &str = "family_financial_info";
    pub const SITUATION_DESCRIPTIONS: &str = "situation_descriptions";
    pub const CURRENT_STEP: &str = "current_step";
    pub const IS_SUBMITTING: &str = "is_submitting";

    pub const DRAFT_PREFIX: &str = "draft.";
    pub const ERRORS_PREFIX: &str = "errors.";
    pub const LAST_APPLICATION_ID: &str = "last_application_id";
}
