use wizard_flow::Result;

use super::{PERSONAL_INFORMATION, StepEnv};
use crate::models::PersonalInformation;
use crate::rules::validate_personal_information;

pub async fn validate(env: &StepEnv, draft: &PersonalInformation) -> Result<bool> {
    if !env.check(PERSONAL_INFORMATION, validate_personal_information(draft))? {
        return Ok(false);
    }
    env.store.update_personal_information(draft.clone())?;
    env.step_saved("steps.personal");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;
    use crate::steps::{field_errors, test_support};

    fn draft() -> PersonalInformation {
        PersonalInformation {
            name: "Fatima Al Mansoori".into(),
            national_id: "784199012345678".into(),
            date_of_birth: "1990-05-20".into(),
            gender: "female".into(),
            address: "Building 7, Al Nahda".into(),
            city: "Dubai".into(),
            state: "Dubai".into(),
            country: "UAE".into(),
            phone: "+971501234567".into(),
            email: "fatima@example.com".into(),
        }
    }

    #[tokio::test]
    async fn invalid_draft_is_not_committed() {
        let (env, notifier) = test_support::env();
        let mut bad = draft();
        bad.email = "not-an-email".into();

        assert!(!validate(&env, &bad).await.unwrap());
        assert_eq!(env.store.personal_information(), PersonalInformation::default());

        let errors = field_errors(&env.session, PERSONAL_INFORMATION);
        assert_eq!(errors["email"].key, "validation.email");
        assert_eq!(notifier.last().unwrap().level, NotificationLevel::Failure);
    }

    #[tokio::test]
    async fn valid_draft_is_committed_and_errors_cleared() {
        let (env, notifier) = test_support::env();
        let mut bad = draft();
        bad.phone.clear();
        assert!(!validate(&env, &bad).await.unwrap());

        assert!(validate(&env, &draft()).await.unwrap());
        assert_eq!(env.store.personal_information(), draft());
        assert!(field_errors(&env.session, PERSONAL_INFORMATION).is_empty());

        let last = notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Success);
        assert_eq!(last.message, "Personal Information saved");
    }
}
