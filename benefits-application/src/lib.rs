pub mod application;
pub mod config;
pub mod i18n;
pub mod language;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod rules;
pub mod steps;
pub mod store;
pub mod suggest;
pub mod terminal;

pub use application::ApplicationWizard;
pub use config::{AppConfig, ConfigError, SuggestionConfig};
pub use i18n::Translator;
pub use language::Language;
pub use models::{ApplicationData, ApplicationState, ContextualFormData, FieldKind};
pub use notify::{ConsoleNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};
pub use persistence::{ApplicationStorage, StorageError, StoredApplication};
pub use steps::StepEnv;
pub use store::ApplicationStore;
pub use suggest::{SuggestionRequest, SuggestionResult, SuggestionReview, SuggestionService};
