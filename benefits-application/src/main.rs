use anyhow::{Context as _, Result};
use benefits_application::{
    AppConfig, ApplicationStorage, ApplicationStore, ApplicationWizard, ConsoleNotifier,
    ContextualFormData, FieldKind, Language, StepEnv, SuggestionRequest, SuggestionReview,
    SuggestionService, Translator, models::FamilyFinancialInfo, terminal::Terminal,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wizard_flow::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "benefits-wizard",
    about = "Apply for financial assistance with AI-assisted answers",
    version
)]
struct Cli {
    /// Interface language: en or ar (overrides WIZARD_LANGUAGE)
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Directory holding the stored application (overrides WIZARD_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in and submit a new application
    Apply,
    /// Print the stored application
    Show,
    /// Remove the stored application
    Clear,
    /// Draft one narrative answer and print it
    Suggest {
        #[arg(long, value_enum)]
        field: FieldArg,

        /// Employment status to mention, e.g. unemployed
        #[arg(long)]
        employment_status: Option<String>,

        #[arg(long)]
        dependents: Option<u32>,

        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FieldArg {
    FinancialSituation,
    Employment,
    Reason,
}

impl From<FieldArg> for FieldKind {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::FinancialSituation => FieldKind::CurrentFinancialSituation,
            FieldArg::Employment => FieldKind::EmploymentCircumstances,
            FieldArg::Reason => FieldKind::ReasonForApplying,
        }
    }
}

/// Initialize tracing on stderr based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "benefits_application=info,wizard_flow=info".into());

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(code) = &cli.language {
        config.language = Language::parse(code);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    info!(
        language = %config.language,
        data_dir = %config.data_dir.display(),
        mock = !config.suggestion.has_credential(),
        "Configuration loaded"
    );

    let translator = Translator::new(config.language);
    let storage = ApplicationStorage::new(Arc::new(FileStore::new(config.data_dir.clone())));
    let suggestions = SuggestionService::from_config(config.suggestion.clone());

    match cli.command {
        Command::Apply => {
            let env = StepEnv::new(
                ApplicationStore::new(),
                storage,
                translator,
                Arc::new(ConsoleNotifier),
            );
            let mut app = ApplicationWizard::new(env, suggestions);
            let stdin = std::io::stdin();
            let mut term = Terminal::new(stdin.lock(), std::io::stdout());
            let submitted = benefits_application::terminal::run_apply(&mut app, &mut term)
                .await
                .context("Wizard session failed")?;
            info!(application_id = ?submitted, "Wizard session ended");
        }
        Command::Show => match storage.load().await {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("{}", translator.t("confirmation.none", &[])),
        },
        Command::Clear => {
            storage.clear().await;
            println!("{}", translator.t("confirmation.cleared", &[]));
        }
        Command::Suggest {
            field,
            employment_status,
            dependents,
            location,
        } => {
            let family = FamilyFinancialInfo {
                employment_status: employment_status.unwrap_or_default(),
                dependents: dependents.map(|n| n.to_string()).unwrap_or_default(),
                ..Default::default()
            };
            let request = SuggestionRequest {
                field_kind: field.into(),
                language: config.language,
                context: Some(ContextualFormData {
                    family_financial_info: Some(family),
                    location,
                    current_text: None,
                }),
            };

            eprintln!("{}", translator.t("suggest.generating", &[]));
            let result = suggestions.generate_suggestion(&request).await;
            match SuggestionReview::from_result(request.field_kind, result, &translator) {
                SuggestionReview::Ready { text, .. } => println!("{text}"),
                failed => anyhow::bail!(failed.render(&translator)),
            }
        }
    }

    Ok(())
}
