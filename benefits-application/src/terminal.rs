//! Line-oriented front end for [`ApplicationWizard`].

use std::io::{BufRead, Write};
use wizard_flow::{NavigationOutcome, Result, WizardError};

use crate::application::ApplicationWizard;
use crate::i18n::Translator;
use crate::models::{FamilyFinancialInfo, FieldKind, PersonalInformation};
use crate::rules::{EMPLOYMENT_STATUSES, GENDERS, HOUSING_STATUSES, MARITAL_STATUSES};
use crate::steps::{FAMILY_FINANCIAL, PERSONAL_INFORMATION, SITUATION};
use crate::suggest::SuggestionReview;

const SUGGEST_COMMAND: &str = "/suggest";
const RTL_MARK: char = '\u{200F}';

const PERSONAL_FIELDS: &[&str] = &[
    "name",
    "nationalId",
    "dateOfBirth",
    "gender",
    "address",
    "city",
    "state",
    "country",
    "phone",
    "email",
];

const FAMILY_FIELDS: &[&str] = &[
    "maritalStatus",
    "dependents",
    "employmentStatus",
    "monthlyIncome",
    "housingStatus",
];

fn personal_slot<'a>(info: &'a mut PersonalInformation, field: &str) -> Option<&'a mut String> {
    Some(match field {
        "name" => &mut info.name,
        "nationalId" => &mut info.national_id,
        "dateOfBirth" => &mut info.date_of_birth,
        "gender" => &mut info.gender,
        "address" => &mut info.address,
        "city" => &mut info.city,
        "state" => &mut info.state,
        "country" => &mut info.country,
        "phone" => &mut info.phone,
        "email" => &mut info.email,
        _ => return None,
    })
}

fn family_slot<'a>(info: &'a mut FamilyFinancialInfo, field: &str) -> Option<&'a mut String> {
    Some(match field {
        "maritalStatus" => &mut info.marital_status,
        "dependents" => &mut info.dependents,
        "employmentStatus" => &mut info.employment_status,
        "monthlyIncome" => &mut info.monthly_income,
        "housingStatus" => &mut info.housing_status,
        _ => return None,
    })
}

fn options_for(field: &str) -> Option<&'static [&'static str]> {
    match field {
        "gender" => Some(GENDERS),
        "maritalStatus" => Some(MARITAL_STATUSES),
        "employmentStatus" => Some(EMPLOYMENT_STATUSES),
        "housingStatus" => Some(HOUSING_STATUSES),
        _ => None,
    }
}

enum Navigation {
    Next,
    Back,
    Quit,
}

/// Reads answers from `input` and writes prompts to `output`.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, translator: &Translator, text: &str) -> Result<()> {
        if translator.language().is_rtl() {
            writeln!(self.output, "{RTL_MARK}{text}")?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    /// One trimmed line, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Drive `app` until the application is submitted or the user quits.
///
/// Returns the new application id after a successful submission.
pub async fn run_apply<R: BufRead, W: Write>(
    app: &mut ApplicationWizard,
    term: &mut Terminal<R, W>,
) -> Result<Option<String>> {
    let translator = app.translator().clone();
    term.say(&translator, &translator.t("app.title", &[]))?;

    while let Some(step) = app.current_step().cloned() {
        let total = app.wizard().steps().len().to_string();
        let current = app.wizard().current_step_number().to_string();
        let percent = app.progress().to_string();
        term.say(&translator, "")?;
        term.say(
            &translator,
            &format!(
                "== {} ({}) ==",
                translator.t(&step.title_key, &[]),
                translator.t(
                    "steps.progress",
                    &[
                        ("current", current.as_str()),
                        ("total", total.as_str()),
                        ("percent", percent.as_str()),
                    ]
                )
            ),
        )?;

        let filled = match step.id.as_str() {
            PERSONAL_INFORMATION => fill_personal(app, term)?,
            FAMILY_FINANCIAL => fill_family(app, term)?,
            _ => fill_situation(app, term).await?,
        };
        if !filled {
            return Ok(None);
        }

        match ask_navigation(term, &translator)? {
            Navigation::Quit => return Ok(None),
            Navigation::Back => {
                app.back()?;
            }
            Navigation::Next => match app.next().await {
                Ok(NavigationOutcome::Submitted { .. }) => {
                    let id = app.last_application_id();
                    term.say(&translator, &translator.t("confirmation.title", &[]))?;
                    if let Some(id) = &id {
                        term.say(&translator, id)?;
                    }
                    return Ok(id);
                }
                Ok(_) => {}
                Err(WizardError::ValidationInFlight(_)) => {
                    term.say(&translator, &translator.t("toast.submitInProgress", &[]))?;
                }
                Err(e) => return Err(e),
            },
        }
    }
    Ok(app.last_application_id())
}

fn ask_navigation<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    translator: &Translator,
) -> Result<Navigation> {
    loop {
        let Some(answer) = term.read_line(&format!("{} ", translator.t("nav.prompt", &[])))? else {
            return Ok(Navigation::Quit);
        };
        match answer.to_lowercase().as_str() {
            "" | "n" | "next" => return Ok(Navigation::Next),
            "b" | "back" => return Ok(Navigation::Back),
            "q" | "quit" => return Ok(Navigation::Quit),
            _ => continue,
        }
    }
}

/// Prompt for one field. `Ok(None)` means end of input.
fn ask_field<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    app: &ApplicationWizard,
    step_id: &str,
    field: &str,
    current: &str,
) -> Result<Option<String>> {
    let translator = app.translator();
    if let Some(error) = app.field_errors(step_id).get(field) {
        let params: Vec<(&str, &str)> = error
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        term.say(translator, &format!("  ! {}", translator.t(&error.key, &params)))?;
    }

    let mut label = translator.t(&format!("fields.{field}"), &[]);
    if let Some(options) = options_for(field) {
        label.push_str(&format!(" ({})", options.join("/")));
    }
    if !current.is_empty() {
        label.push_str(&format!(" [{current}]"));
    }
    label.push_str(": ");

    Ok(term
        .read_line(&label)?
        .map(|answer| if answer.is_empty() { current.to_string() } else { answer }))
}

fn fill_personal<R: BufRead, W: Write>(
    app: &mut ApplicationWizard,
    term: &mut Terminal<R, W>,
) -> Result<bool> {
    for field in PERSONAL_FIELDS {
        let mut draft = app.personal_draft();
        let current = personal_slot(&mut draft, field).map(|v| v.clone()).unwrap_or_default();
        let Some(answer) = ask_field(term, app, PERSONAL_INFORMATION, field, &current)? else {
            return Ok(false);
        };
        app.edit_personal(|draft| {
            if let Some(slot) = personal_slot(draft, field) {
                *slot = answer;
            }
        })?;
    }
    Ok(true)
}

fn fill_family<R: BufRead, W: Write>(
    app: &mut ApplicationWizard,
    term: &mut Terminal<R, W>,
) -> Result<bool> {
    for field in FAMILY_FIELDS {
        let mut draft = app.family_draft();
        let current = family_slot(&mut draft, field).map(|v| v.clone()).unwrap_or_default();
        let Some(answer) = ask_field(term, app, FAMILY_FINANCIAL, field, &current)? else {
            return Ok(false);
        };
        app.edit_family(|draft| {
            if let Some(slot) = family_slot(draft, field) {
                *slot = answer;
            }
        })?;
    }
    Ok(true)
}

async fn fill_situation<R: BufRead, W: Write>(
    app: &mut ApplicationWizard,
    term: &mut Terminal<R, W>,
) -> Result<bool> {
    let translator = app.translator().clone();
    term.say(&translator, &translator.t("suggest.help", &[]))?;

    for kind in FieldKind::ALL {
        loop {
            let current = app.situation_draft().field(kind).to_string();
            let Some(answer) = ask_field(term, app, SITUATION, kind.as_str(), &current)? else {
                return Ok(false);
            };

            if answer != SUGGEST_COMMAND {
                app.edit_situation(|draft| draft.set_field(kind, answer))?;
                break;
            }

            term.say(&translator, &translator.t("suggest.generating", &[]))?;
            let review = app.suggest(kind).await;
            term.say(&translator, &review.render(&translator))?;
            if !review.is_ready() {
                continue;
            }
            match review_choice(term, review)? {
                Some(text) => {
                    app.apply_suggestion(kind, text)?;
                    break;
                }
                None => continue,
            }
        }
    }
    Ok(true)
}

/// Accept, edit or discard a ready suggestion. Returns the text to keep.
fn review_choice<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    review: SuggestionReview,
) -> Result<Option<String>> {
    loop {
        let Some(answer) = term.read_line("> ")? else {
            review.discard();
            return Ok(None);
        };
        match answer.to_lowercase().as_str() {
            "a" | "accept" => return Ok(review.accept()),
            "e" | "edit" => {
                let edited = term.read_line("> ")?.unwrap_or_default();
                if edited.is_empty() {
                    return Ok(review.accept());
                }
                return Ok(review.edit(edited));
            }
            "d" | "discard" => {
                review.discard();
                return Ok(None);
            }
            _ => continue,
        }
    }
}
