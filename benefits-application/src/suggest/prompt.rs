use crate::language::Language;
use crate::models::{ContextualFormData, FieldKind};

/// Instruction pair sent to the text-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub prompt: String,
    pub system_message: String,
}

fn base_template(field_kind: FieldKind, language: Language) -> &'static str {
    match (language, field_kind) {
        (Language::En, FieldKind::CurrentFinancialSituation) => {
            "Help me describe my current financial situation for a government financial assistance application. \
             Write 2-3 clear, honest sentences in the first person explaining my financial hardship, \
             including my income challenges and the essential expenses I struggle to cover."
        }
        (Language::En, FieldKind::EmploymentCircumstances) => {
            "Help me describe my employment circumstances for a government financial assistance application. \
             Write 2-3 clear sentences in the first person about my current work status, any recent job loss \
             or reduced hours, and what I am doing to find stable employment."
        }
        (Language::En, FieldKind::ReasonForApplying) => {
            "Help me explain why I am applying for government financial assistance. \
             Write 2-3 clear sentences in the first person describing the support I need \
             and how it will help me and my family regain stability."
        }
        (Language::Ar, FieldKind::CurrentFinancialSituation) => {
            "ساعدني في وصف وضعي المالي الحالي لطلب مساعدة مالية حكومية. \
             اكتب جملتين أو ثلاث جمل واضحة وصادقة بصيغة المتكلم تشرح الصعوبات المالية التي أواجهها، \
             بما في ذلك تحديات الدخل والنفقات الأساسية التي أجد صعوبة في تغطيتها."
        }
        (Language::Ar, FieldKind::EmploymentCircumstances) => {
            "ساعدني في وصف ظروف عملي لطلب مساعدة مالية حكومية. \
             اكتب جملتين أو ثلاث جمل واضحة بصيغة المتكلم عن وضعي الوظيفي الحالي، وأي فقدان حديث للعمل \
             أو تقليل لساعات العمل، وما أقوم به للحصول على عمل مستقر."
        }
        (Language::Ar, FieldKind::ReasonForApplying) => {
            "ساعدني في توضيح سبب تقديمي لطلب المساعدة المالية الحكومية. \
             اكتب جملتين أو ثلاث جمل واضحة بصيغة المتكلم تصف الدعم الذي أحتاجه \
             وكيف سيساعدني أنا وعائلتي على استعادة الاستقرار."
        }
    }
}

fn system_message(language: Language) -> &'static str {
    match language {
        Language::En => {
            "You are a helpful assistant that helps people write clear, honest and respectful answers \
             for government social support applications. Respond in English, in the first person, \
             in 2-3 concise sentences. Stay factual, avoid exaggeration, and never invent personal \
             details that were not provided."
        }
        Language::Ar => {
            "أنت مساعد يساعد الأشخاص على كتابة إجابات واضحة وصادقة ومحترمة لطلبات الدعم الاجتماعي الحكومية. \
             أجب باللغة العربية بصيغة المتكلم في جملتين أو ثلاث جمل موجزة. التزم بالحقائق وتجنب المبالغة \
             ولا تختلق أي تفاصيل شخصية لم يتم تقديمها."
        }
    }
}

struct ContextLabels {
    heading: &'static str,
    existing_text: &'static str,
    marital_status: &'static str,
    dependents: &'static str,
    employment_status: &'static str,
    monthly_income: &'static str,
    housing_status: &'static str,
    location: &'static str,
    currency: &'static str,
}

fn labels(language: Language) -> ContextLabels {
    match language {
        Language::En => ContextLabels {
            heading: "Additional context about my situation:",
            existing_text: "What I have written so far",
            marital_status: "Marital status",
            dependents: "Number of dependents",
            employment_status: "Employment status",
            monthly_income: "Monthly income",
            housing_status: "Housing status",
            location: "Location",
            currency: "AED",
        },
        Language::Ar => ContextLabels {
            heading: "معلومات إضافية عن وضعي:",
            existing_text: "ما كتبته حتى الآن",
            marital_status: "الحالة الاجتماعية",
            dependents: "عدد المعالين",
            employment_status: "الحالة الوظيفية",
            monthly_income: "الدخل الشهري",
            housing_status: "حالة السكن",
            location: "الموقع",
            currency: "درهم",
        },
    }
}

/// Translate a stored option value into the prompt language. Unknown values pass through.
fn translate_value(value: &str, language: Language) -> String {
    let translated = match (language, value) {
        (Language::En, "single") => "Single",
        (Language::En, "married") => "Married",
        (Language::En, "divorced") => "Divorced",
        (Language::En, "widowed") => "Widowed",
        (Language::En, "employed") => "Employed",
        (Language::En, "unemployed") => "Unemployed",
        (Language::En, "self-employed") => "Self-employed",
        (Language::En, "retired") => "Retired",
        (Language::En, "student") => "Student",
        (Language::En, "owned") => "Own home",
        (Language::En, "rented") => "Renting",
        (Language::En, "living-with-family") => "Living with family",
        (Language::En, "homeless") => "Without stable housing",
        (Language::Ar, "single") => "أعزب",
        (Language::Ar, "married") => "متزوج",
        (Language::Ar, "divorced") => "مطلق",
        (Language::Ar, "widowed") => "أرمل",
        (Language::Ar, "employed") => "موظف",
        (Language::Ar, "unemployed") => "عاطل عن العمل",
        (Language::Ar, "self-employed") => "أعمل لحسابي الخاص",
        (Language::Ar, "retired") => "متقاعد",
        (Language::Ar, "student") => "طالب",
        (Language::Ar, "owned") => "مسكن مملوك",
        (Language::Ar, "rented") => "مسكن مستأجر",
        (Language::Ar, "living-with-family") => "أسكن مع العائلة",
        (Language::Ar, "homeless") => "بدون سكن مستقر",
        (_, other) => other,
    };
    translated.to_string()
}

fn context_lines(context: &ContextualFormData, language: Language) -> Vec<String> {
    let labels = labels(language);
    let mut lines = Vec::new();
    let mut push = |label: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            lines.push(format!("- {label}: {}", value.trim()));
        }
    };

    push(labels.existing_text, context.current_text.clone());
    if let Some(info) = &context.family_financial_info {
        let option = |value: &str| Some(translate_value(value.trim(), language));
        push(labels.marital_status, option(&info.marital_status));
        push(labels.dependents, Some(info.dependents.clone()));
        push(labels.employment_status, option(&info.employment_status));
        let income = info.monthly_income.trim();
        push(
            labels.monthly_income,
            (!income.is_empty()).then(|| format!("{income} {}", labels.currency)),
        );
        push(labels.housing_status, option(&info.housing_status));
    }
    push(labels.location, context.location.clone());
    lines
}

/// Build the user prompt and system message for a suggestion request.
///
/// When contextual data is present a localised block listing the known
/// values is appended. Absent values are left out entirely.
pub fn build_prompt(
    field_kind: FieldKind,
    language: Language,
    context: Option<&ContextualFormData>,
) -> BuiltPrompt {
    let mut prompt = base_template(field_kind, language).to_string();

    if let Some(context) = context {
        let lines = context_lines(context, language);
        if !lines.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(labels(language).heading);
            prompt.push('\n');
            prompt.push_str(&lines.join("\n"));
        }
    }

    BuiltPrompt {
        prompt,
        system_message: system_message(language).to_string(),
    }
}
