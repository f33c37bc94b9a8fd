pub mod context;
pub mod error;
pub mod gate;
pub mod storage;
pub mod wizard;

// Re-export commonly used types
pub use context::Context;
pub use error::{Result, WizardError};
pub use gate::{StepRegistration, StepValidator, ValidationFuture, ValidationGate};
pub use storage::{FileStore, InMemoryStore, KeyValueStore};
pub use wizard::{NavigationOutcome, StepDescriptor, Wizard, WizardBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_validator_reads_shared_context() {
        let context = Context::new();
        let wizard = WizardBuilder::new("test_wizard")
            .add_step("details", "/details", "steps.details")
            .add_step("review", "/review", "steps.review")
            .build();

        let draft = context.clone();
        wizard.gate().register("details", move || {
            let draft = draft.clone();
            async move {
                let name: String = draft.get_or_default("name");
                if name.is_empty() {
                    return Ok(false);
                }
                draft.set("committed_name", name)?;
                Ok(true)
            }
        });

        let outcome = wizard.next().await.unwrap();
        assert!(matches!(outcome, NavigationOutcome::Blocked { .. }));

        context.set("name", "Mariam").unwrap();
        let outcome = wizard.next().await.unwrap();
        assert!(matches!(outcome, NavigationOutcome::Advanced { .. }));

        let committed: String = context.get("committed_name").unwrap();
        assert_eq!(committed, "Mariam");
    }

    #[tokio::test]
    async fn test_storage() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        store.write("key", "value".to_string()).await.unwrap();
        let retrieved = store.read("key").await.unwrap();
        assert_eq!(retrieved.as_deref(), Some("value"));

        store.remove("key").await.unwrap();
        assert!(store.read("key").await.unwrap().is_none());
    }
}
