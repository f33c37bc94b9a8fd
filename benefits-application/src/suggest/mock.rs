use crate::language::Language;
use crate::models::{ContextualFormData, FieldKind};

fn canned(field_kind: FieldKind, language: Language) -> &'static str {
    match (language, field_kind) {
        (Language::En, FieldKind::CurrentFinancialSituation) => {
            "I am currently facing serious financial difficulties. My income is not enough to cover \
             essential expenses such as rent, utilities and groceries, and I have been relying on \
             savings and help from relatives to get through each month."
        }
        (Language::En, FieldKind::EmploymentCircumstances) => {
            "My work situation has changed recently and my household income has dropped as a result. \
             I am actively applying for jobs that match my skills and looking into training that \
             would improve my chances of finding stable employment."
        }
        (Language::En, FieldKind::ReasonForApplying) => {
            "I am applying for financial assistance so that I can meet my family's basic needs during \
             this difficult period. This support would give us the stability we need while I work \
             towards becoming financially independent again."
        }
        (Language::Ar, FieldKind::CurrentFinancialSituation) => {
            "أواجه حاليًا صعوبات مالية كبيرة. دخلي لا يكفي لتغطية النفقات الأساسية مثل الإيجار \
             والفواتير والمواد الغذائية، وأعتمد على المدخرات ومساعدة الأقارب لتدبير أموري كل شهر."
        }
        (Language::Ar, FieldKind::EmploymentCircumstances) => {
            "تغير وضعي الوظيفي مؤخرًا وانخفض دخل أسرتي نتيجة لذلك. أتقدم بنشاط للوظائف التي تناسب \
             مهاراتي وأبحث عن تدريب يحسن فرصي في الحصول على عمل مستقر."
        }
        (Language::Ar, FieldKind::ReasonForApplying) => {
            "أتقدم بطلب المساعدة المالية لتلبية الاحتياجات الأساسية لأسرتي خلال هذه الفترة الصعبة. \
             سيمنحنا هذا الدعم الاستقرار الذي نحتاجه بينما أعمل على استعادة استقلالي المالي."
        }
    }
}

fn unemployment_sentence(language: Language) -> &'static str {
    match language {
        Language::En => "I am currently unemployed and have no regular source of income.",
        Language::Ar => "أنا حاليًا عاطل عن العمل وليس لدي مصدر دخل منتظم.",
    }
}

fn dependents_sentence(language: Language, dependents: u32) -> String {
    match language {
        Language::En => {
            let noun = if dependents == 1 { "dependent" } else { "dependents" };
            format!(
                "I am also responsible for supporting {dependents} {noun}, which adds to my household expenses."
            )
        }
        Language::Ar => {
            format!("كما أنني مسؤول عن إعالة {dependents} من المعالين، مما يزيد من نفقات أسرتي.")
        }
    }
}

/// Canned suggestion used when no remote credential is configured.
///
/// Known unemployment and a positive dependents count each add one sentence.
pub fn mock_suggestion(
    field_kind: FieldKind,
    language: Language,
    context: Option<&ContextualFormData>,
) -> String {
    let mut text = canned(field_kind, language).to_string();
    if let Some(context) = context {
        if context.is_unemployed() {
            text.push(' ');
            text.push_str(unemployment_sentence(language));
        }
        if let Some(dependents) = context.dependents() {
            text.push(' ');
            text.push_str(&dependents_sentence(language, dependents));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FamilyFinancialInfo;

    #[test]
    fn every_field_and_language_has_text() {
        for language in [Language::En, Language::Ar] {
            for kind in FieldKind::ALL {
                assert!(!mock_suggestion(kind, language, None).trim().is_empty());
            }
        }
    }

    #[test]
    fn unemployed_with_dependents() {
        let context = ContextualFormData {
            family_financial_info: Some(FamilyFinancialInfo {
                employment_status: "unemployed".into(),
                dependents: "2".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = mock_suggestion(FieldKind::EmploymentCircumstances, Language::En, Some(&context));
        assert!(text.contains("unemployed"));
        assert!(text.ends_with("supporting 2 dependents, which adds to my household expenses."));
    }

    #[test]
    fn single_dependent_is_singular() {
        let context = ContextualFormData {
            family_financial_info: Some(FamilyFinancialInfo {
                dependents: "1".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = mock_suggestion(FieldKind::ReasonForApplying, Language::En, Some(&context));
        assert!(text.contains("1 dependent,"));
        assert!(!text.contains("unemployed"));
    }
}
