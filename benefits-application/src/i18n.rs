use std::sync::{Arc, RwLock};

use crate::language::Language;

const EN: &[(&str, &str)] = &[
    ("app.title", "Financial Assistance Application"),
    ("steps.personal", "Personal Information"),
    ("steps.family", "Family & Financial Information"),
    ("steps.situation", "Situation Descriptions"),
    ("steps.progress", "Step {{current}} of {{total}} ({{percent}}% complete)"),
    ("fields.name", "Full name"),
    ("fields.nationalId", "National ID"),
    ("fields.dateOfBirth", "Date of birth (YYYY-MM-DD)"),
    ("fields.gender", "Gender"),
    ("fields.address", "Address"),
    ("fields.city", "City"),
    ("fields.state", "State / Emirate"),
    ("fields.country", "Country"),
    ("fields.phone", "Phone number"),
    ("fields.email", "Email"),
    ("fields.maritalStatus", "Marital status"),
    ("fields.dependents", "Number of dependents"),
    ("fields.employmentStatus", "Employment status"),
    ("fields.monthlyIncome", "Monthly income"),
    ("fields.housingStatus", "Housing status"),
    ("fields.currentFinancialSituation", "Current financial situation"),
    ("fields.employmentCircumstances", "Employment circumstances"),
    ("fields.reasonForApplying", "Reason for applying"),
    ("validation.required", "This field is required"),
    ("validation.email", "Please enter a valid email address"),
    ("validation.phone", "Please enter a valid phone number"),
    ("validation.nationalId", "National ID must be 10 to 15 digits"),
    ("validation.dateOfBirth", "Please enter a valid date of birth in the past"),
    ("validation.number", "Please enter a valid non-negative amount"),
    ("validation.integer", "Please enter a whole number of 0 or more"),
    ("validation.option", "Please choose one of: {{options}}"),
    ("validation.minLength", "Please write at least {{min}} characters"),
    ("toast.stepSaved", "{{step}} saved"),
    ("toast.validationFailed", "Please fix the highlighted fields"),
    ("toast.submitSuccess", "Application submitted. Your reference number is {{id}}"),
    ("toast.submitFailed", "We could not submit your application. Your answers have been kept, please try again."),
    ("toast.submitInProgress", "Your application is already being submitted"),
    ("toast.success", "Success"),
    ("toast.error", "Error"),
    ("suggest.help", "Type /suggest to get an AI-drafted answer"),
    ("suggest.generating", "Generating a suggestion..."),
    ("suggest.review", "Suggested text:"),
    ("suggest.actions", "[a]ccept, [e]dit or [d]iscard?"),
    ("suggest.failed", "Suggestion unavailable"),
    ("confirmation.title", "Application received"),
    ("confirmation.none", "No application has been submitted yet"),
    ("confirmation.cleared", "Stored application removed"),
    ("nav.prompt", "[n]ext, [b]ack or [q]uit?"),
];

const AR: &[(&str, &str)] = &[
    ("app.title", "طلب المساعدة المالية"),
    ("steps.personal", "المعلومات الشخصية"),
    ("steps.family", "المعلومات العائلية والمالية"),
    ("steps.situation", "وصف الحالة"),
    ("steps.progress", "الخطوة {{current}} من {{total}} (اكتمل {{percent}}٪)"),
    ("fields.name", "الاسم الكامل"),
    ("fields.nationalId", "رقم الهوية الوطنية"),
    ("fields.dateOfBirth", "تاريخ الميلاد (YYYY-MM-DD)"),
    ("fields.gender", "الجنس"),
    ("fields.address", "العنوان"),
    ("fields.city", "المدينة"),
    ("fields.state", "الولاية / الإمارة"),
    ("fields.country", "الدولة"),
    ("fields.phone", "رقم الهاتف"),
    ("fields.email", "البريد الإلكتروني"),
    ("fields.maritalStatus", "الحالة الاجتماعية"),
    ("fields.dependents", "عدد المعالين"),
    ("fields.employmentStatus", "الحالة الوظيفية"),
    ("fields.monthlyIncome", "الدخل الشهري"),
    ("fields.housingStatus", "حالة السكن"),
    ("fields.currentFinancialSituation", "الوضع المالي الحالي"),
    ("fields.employmentCircumstances", "ظروف العمل"),
    ("fields.reasonForApplying", "سبب التقديم"),
    ("validation.required", "هذا الحقل مطلوب"),
    ("validation.email", "يرجى إدخال بريد إلكتروني صحيح"),
    ("validation.phone", "يرجى إدخال رقم هاتف صحيح"),
    ("validation.nationalId", "يجب أن يتكون رقم الهوية من 10 إلى 15 رقمًا"),
    ("validation.dateOfBirth", "يرجى إدخال تاريخ ميلاد صحيح في الماضي"),
    ("validation.number", "يرجى إدخال مبلغ صحيح غير سالب"),
    ("validation.integer", "يرجى إدخال عدد صحيح يساوي 0 أو أكثر"),
    ("validation.option", "يرجى اختيار أحد الخيارات: {{options}}"),
    ("validation.minLength", "يرجى كتابة {{min}} حرفًا على الأقل"),
    ("toast.stepSaved", "تم حفظ {{step}}"),
    ("toast.validationFailed", "يرجى تصحيح الحقول المحددة"),
    ("toast.submitSuccess", "تم تقديم الطلب. رقمك المرجعي هو {{id}}"),
    ("toast.submitFailed", "تعذر تقديم طلبك. تم الاحتفاظ بإجاباتك، يرجى المحاولة مرة أخرى."),
    ("toast.submitInProgress", "طلبك قيد التقديم بالفعل"),
    ("toast.success", "تم بنجاح"),
    ("toast.error", "خطأ"),
    ("suggest.help", "اكتب /suggest للحصول على إجابة مقترحة بالذكاء الاصطناعي"),
    ("suggest.generating", "جارٍ إنشاء اقتراح..."),
    ("suggest.review", "النص المقترح:"),
    ("suggest.actions", "[a] قبول، [e] تعديل أو [d] تجاهل؟"),
    ("suggest.failed", "الاقتراح غير متاح"),
    ("confirmation.title", "تم استلام الطلب"),
    ("confirmation.none", "لم يتم تقديم أي طلب بعد"),
    ("confirmation.cleared", "تم حذف الطلب المحفوظ"),
    ("nav.prompt", "[n] التالي، [b] السابق أو [q] خروج؟"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => EN,
        Language::Ar => AR,
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Translation lookup plus the current-language signal.
///
/// Clones share the language, so switching it through one handle is visible
/// to every step validator holding another.
#[derive(Clone, Debug, Default)]
pub struct Translator {
    language: Arc<RwLock<Language>>,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self {
            language: Arc::new(RwLock::new(language)),
        }
    }

    pub fn language(&self) -> Language {
        *self.language.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_language(&self, language: Language) {
        *self.language.write().unwrap_or_else(|e| e.into_inner()) = language;
    }

    /// Translate `key`, substituting `{{name}}` placeholders from `params`.
    ///
    /// Missing Arabic entries fall back to English; unknown keys come back verbatim.
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = lookup(self.language(), key)
            .or_else(|| lookup(Language::En, key))
            .unwrap_or(key);
        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{{{name}}}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_params() {
        let t = Translator::new(Language::En);
        assert_eq!(
            t.t("validation.minLength", &[("min", "50")]),
            "Please write at least 50 characters"
        );
    }

    #[test]
    fn language_switch_is_shared_between_clones() {
        let t = Translator::new(Language::En);
        let other = t.clone();
        other.set_language(Language::Ar);
        assert_eq!(t.language(), Language::Ar);
        assert_eq!(t.t("validation.required", &[]), "هذا الحقل مطلوب");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let t = Translator::new(Language::Ar);
        assert_eq!(t.t("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn tables_have_the_same_keys() {
        for (key, _) in EN {
            assert!(lookup(Language::Ar, key).is_some(), "missing ar key {key}");
        }
        assert_eq!(EN.len(), AR.len());
    }
}
