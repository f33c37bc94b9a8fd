//! Field-level rules for the three form slices.
//!
//! Every predicate is pure. The `validate_*` functions map a slice to the
//! failing fields, each paired with the localisation key of its message.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::{FamilyFinancialInfo, PersonalInformation, SituationDescriptions};

pub const MARITAL_STATUSES: &[&str] = &["single", "married", "divorced", "widowed"];
pub const EMPLOYMENT_STATUSES: &[&str] =
    &["employed", "unemployed", "self-employed", "retired", "student"];
pub const HOUSING_STATUSES: &[&str] = &["owned", "rented", "living-with-family", "homeless"];
pub const GENDERS: &[&str] = &["male", "female"];

/// Minimum length of each narrative answer, in characters.
pub const MIN_NARRATIVE_LENGTH: usize = 50;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// A failing field and the message to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    pub params: Vec<(String, String)>,
}

impl FieldError {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            params: Vec::new(),
        }
    }

    fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }
}

/// Field name (camelCase, as in the stored JSON) to its error.
pub type FieldErrors = BTreeMap<String, FieldError>;

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// 7 to 15 digits, optional leading `+`, spaces and dashes ignored.
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.strip_prefix('+').unwrap_or(value);
    let mut count = 0;
    for c in digits.chars() {
        match c {
            '0'..='9' => count += 1,
            ' ' | '-' => {}
            _ => return false,
        }
    }
    (7..=15).contains(&count)
}

pub fn is_valid_national_id(value: &str) -> bool {
    let value = value.trim();
    (10..=15).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

/// An ISO date strictly before `today` and not before 1900.
pub fn is_valid_date_of_birth(value: &str, today: NaiveDate) -> bool {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => date < today && date >= NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(date),
        Err(_) => false,
    }
}

pub fn is_non_negative_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= 0.0)
}

pub fn is_non_negative_integer(value: &str) -> bool {
    value.trim().parse::<u32>().is_ok()
}

pub fn is_one_of(value: &str, options: &[&str]) -> bool {
    options.contains(&value.trim())
}

pub fn meets_min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

fn check(errors: &mut FieldErrors, field: &str, value: &str, rule: impl FnOnce(&str) -> Option<FieldError>) {
    if !is_present(value) {
        errors.insert(field.to_string(), FieldError::new("validation.required"));
    } else if let Some(error) = rule(value) {
        errors.insert(field.to_string(), error);
    }
}

fn option_rule(options: &'static [&'static str]) -> impl FnOnce(&str) -> Option<FieldError> {
    move |value| {
        (!is_one_of(value, options))
            .then(|| FieldError::new("validation.option").with_param("options", options.join(", ")))
    }
}

pub fn validate_personal_information(info: &PersonalInformation) -> FieldErrors {
    validate_personal_information_on(info, Utc::now().date_naive())
}

pub fn validate_personal_information_on(info: &PersonalInformation, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check(&mut errors, "name", &info.name, |_| None);
    check(&mut errors, "nationalId", &info.national_id, |v| {
        (!is_valid_national_id(v)).then(|| FieldError::new("validation.nationalId"))
    });
    check(&mut errors, "dateOfBirth", &info.date_of_birth, |v| {
        (!is_valid_date_of_birth(v, today)).then(|| FieldError::new("validation.dateOfBirth"))
    });
    check(&mut errors, "gender", &info.gender, option_rule(GENDERS));
    check(&mut errors, "address", &info.address, |_| None);
    check(&mut errors, "city", &info.city, |_| None);
    check(&mut errors, "state", &info.state, |_| None);
    check(&mut errors, "country", &info.country, |_| None);
    check(&mut errors, "phone", &info.phone, |v| {
        (!is_valid_phone(v)).then(|| FieldError::new("validation.phone"))
    });
    check(&mut errors, "email", &info.email, |v| {
        (!is_valid_email(v)).then(|| FieldError::new("validation.email"))
    });
    errors
}

pub fn validate_family_financial_info(info: &FamilyFinancialInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check(&mut errors, "maritalStatus", &info.marital_status, option_rule(MARITAL_STATUSES));
    check(&mut errors, "dependents", &info.dependents, |v| {
        (!is_non_negative_integer(v)).then(|| FieldError::new("validation.integer"))
    });
    check(
        &mut errors,
        "employmentStatus",
        &info.employment_status,
        option_rule(EMPLOYMENT_STATUSES),
    );
    check(&mut errors, "monthlyIncome", &info.monthly_income, |v| {
        (!is_non_negative_number(v)).then(|| FieldError::new("validation.number"))
    });
    check(&mut errors, "housingStatus", &info.housing_status, option_rule(HOUSING_STATUSES));
    errors
}

pub fn validate_situation_descriptions(info: &SituationDescriptions) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let narrative = |v: &str| {
        (!meets_min_length(v, MIN_NARRATIVE_LENGTH)).then(|| {
            FieldError::new("validation.minLength").with_param("min", MIN_NARRATIVE_LENGTH.to_string())
        })
    };
    check(
        &mut errors,
        "currentFinancialSituation",
        &info.current_financial_situation,
        narrative,
    );
    check(
        &mut errors,
        "employmentCircumstances",
        &info.employment_circumstances,
        narrative,
    );
    check(&mut errors, "reasonForApplying", &info.reason_for_applying, narrative);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid_personal() -> PersonalInformation {
        PersonalInformation {
            name: "Ahmed Khalid".into(),
            national_id: "784198712345678".into(),
            date_of_birth: "1987-03-14".into(),
            gender: "male".into(),
            address: "Villa 12, Street 4".into(),
            city: "Abu Dhabi".into(),
            state: "Abu Dhabi".into(),
            country: "UAE".into(),
            phone: "+971 50-123-4567".into(),
            email: "ahmed@example.com".into(),
        }
    }

    #[test]
    fn predicates() {
        assert!(is_valid_email("a.b@c.io"));
        assert!(!is_valid_email("a@b"));
        assert!(is_valid_phone("+971 50 123 4567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("050-CALL-NOW"));
        assert!(is_valid_national_id("1234567890"));
        assert!(!is_valid_national_id("12345-67890"));
        assert!(is_valid_date_of_birth("2000-01-01", today()));
        assert!(!is_valid_date_of_birth("2030-01-01", today()));
        assert!(!is_valid_date_of_birth("1899-12-31", today()));
        assert!(!is_valid_date_of_birth("01/02/2000", today()));
        assert!(is_non_negative_number("0"));
        assert!(is_non_negative_number("1500.50"));
        assert!(!is_non_negative_number("-1"));
        assert!(!is_non_negative_number("NaN"));
        assert!(is_non_negative_integer("2"));
        assert!(!is_non_negative_integer("2.5"));
    }

    #[test]
    fn valid_personal_information_has_no_errors() {
        assert!(validate_personal_information_on(&valid_personal(), today()).is_empty());
    }

    #[test]
    fn empty_slices_report_required() {
        let errors = validate_personal_information_on(&PersonalInformation::default(), today());
        assert_eq!(errors.len(), 10);
        assert!(errors.values().all(|e| e.key == "validation.required"));

        let errors = validate_family_financial_info(&FamilyFinancialInfo::default());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn family_options_are_checked() {
        let info = FamilyFinancialInfo {
            marital_status: "engaged".into(),
            dependents: "2".into(),
            employment_status: "unemployed".into(),
            monthly_income: "0".into(),
            housing_status: "rented".into(),
        };
        let errors = validate_family_financial_info(&info);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["maritalStatus"].key, "validation.option");
    }

    #[test]
    fn short_narratives_are_rejected() {
        let info = SituationDescriptions {
            current_financial_situation: "Too short".into(),
            employment_circumstances: "x".repeat(MIN_NARRATIVE_LENGTH),
            reason_for_applying: String::new(),
        };
        let errors = validate_situation_descriptions(&info);
        assert_eq!(errors["currentFinancialSituation"].key, "validation.minLength");
        assert_eq!(errors["reasonForApplying"].key, "validation.required");
        assert!(!errors.contains_key("employmentCircumstances"));
    }
}
