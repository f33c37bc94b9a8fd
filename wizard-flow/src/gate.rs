use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::Result;

/// Future returned by a step validator.
pub type ValidationFuture = Pin<Box<dyn Future<Output = Result<bool>> + Send>>;

/// Zero-argument asynchronous validator registered for a step.
pub type StepValidator = Arc<dyn Fn() -> ValidationFuture + Send + Sync>;

struct Registration {
    generation: u64,
    validator: StepValidator,
}

/// Registry mapping a step id to the validator that gates leaving that step.
///
/// One gate is created per wizard session. Clones share the same registry.
#[derive(Clone, Default)]
pub struct ValidationGate {
    validators: Arc<DashMap<String, Registration>>,
    generation: Arc<AtomicU64>,
}

impl ValidationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the validator for `step_id`, replacing any earlier one.
    pub fn register<F, Fut>(&self, step_id: impl Into<String>, validate: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        self.insert(step_id.into(), validate);
    }

    /// Register the validator for `step_id` for as long as the returned guard lives.
    ///
    /// Dropping the guard unregisters the step unless a newer registration has
    /// replaced it in the meantime.
    pub fn register_scoped<F, Fut>(&self, step_id: impl Into<String>, validate: F) -> StepRegistration
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        let step_id = step_id.into();
        let generation = self.insert(step_id.clone(), validate);
        StepRegistration {
            gate: self.clone(),
            step_id,
            generation,
        }
    }

    fn insert<F, Fut>(&self, step_id: String, validate: F) -> u64
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let validator: StepValidator = Arc::new(move || Box::pin(validate()) as ValidationFuture);
        debug!(step_id = %step_id, generation, "Registering step validator");
        self.validators.insert(
            step_id,
            Registration {
                generation,
                validator,
            },
        );
        generation
    }

    /// Remove the validator for `step_id`. Unknown ids are ignored.
    pub fn unregister(&self, step_id: &str) {
        if self.validators.remove(step_id).is_some() {
            debug!(step_id = %step_id, "Unregistered step validator");
        }
    }

    pub fn is_registered(&self, step_id: &str) -> bool {
        self.validators.contains_key(step_id)
    }

    pub fn registered_steps(&self) -> Vec<String> {
        let mut steps: Vec<String> = self
            .validators
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        steps.sort();
        steps
    }

    /// Run the validator registered for `step_id`.
    ///
    /// A step without a validator is valid. Errors raised by the validator are
    /// returned to the caller as-is.
    pub async fn validate_step(&self, step_id: &str) -> Result<bool> {
        // Clone the validator out so no map guard is held across the await.
        let validator = self
            .validators
            .get(step_id)
            .map(|entry| entry.validator.clone());

        match validator {
            Some(validate) => validate().await,
            None => {
                debug!(step_id = %step_id, "No validator registered, step is valid");
                Ok(true)
            }
        }
    }
}

/// Guard returned by [`ValidationGate::register_scoped`].
pub struct StepRegistration {
    gate: ValidationGate,
    step_id: String,
    generation: u64,
}

impl StepRegistration {
    pub fn step_id(&self) -> &str {
        &self.step_id
    }
}

impl Drop for StepRegistration {
    fn drop(&mut self) {
        let generation = self.generation;
        let removed = self
            .gate
            .validators
            .remove_if(&self.step_id, |_, registration| {
                registration.generation == generation
            });
        if removed.is_some() {
            debug!(step_id = %self.step_id, "Step unmounted, validator removed");
        }
    }
}
