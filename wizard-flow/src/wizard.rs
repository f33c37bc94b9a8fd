use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::info;

use crate::{
    error::{Result, WizardError},
    gate::ValidationGate,
};

/// A single page of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub id: String,
    pub route: String,
    /// Localisation key of the step title.
    pub title_key: String,
}

/// What happened when the user asked to move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The active step passed validation and the next step is now active.
    Advanced { from: String, to: String },
    /// The active step failed validation; nothing changed.
    Blocked { step_id: String },
    /// The last step passed validation; the wizard moved to its completion route.
    Submitted { step_id: String },
}

/// Ordered list of steps plus the cursor over them.
///
/// Leaving a step forwards is gated on [`ValidationGate::validate_step`] for the
/// active step id. Moving backwards is never gated.
pub struct Wizard {
    pub id: String,
    steps: Vec<StepDescriptor>,
    completion_route: String,
    gate: ValidationGate,
    // steps.len() marks the completion view
    cursor: AtomicUsize,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Wizard {
    pub fn gate(&self) -> &ValidationGate {
        &self.gate
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// The active step, or `None` once the wizard reached its completion route.
    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.steps.get(self.cursor.load(Ordering::SeqCst))
    }

    pub fn current_route(&self) -> &str {
        self.current_step()
            .map(|step| step.route.as_str())
            .unwrap_or(&self.completion_route)
    }

    /// 1-based number of the active step; `len + 1` on the completion route.
    pub fn current_step_number(&self) -> usize {
        self.cursor.load(Ordering::SeqCst) + 1
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.load(Ordering::SeqCst) >= self.steps.len()
    }

    pub fn is_validating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Percentage of steps already left behind.
    pub fn progress(&self) -> u8 {
        if self.steps.is_empty() {
            return 100;
        }
        let done = self.cursor.load(Ordering::SeqCst).min(self.steps.len());
        ((done * 100) / self.steps.len()) as u8
    }

    /// Map a route to its 1-based step number and step id.
    pub fn step_for_route(&self, route: &str) -> Option<(usize, &str)> {
        self.steps
            .iter()
            .position(|step| step.route == route)
            .map(|index| (index + 1, self.steps[index].id.as_str()))
    }

    /// Jump to a route without validation.
    pub fn go_to(&self, route: &str) -> Result<()> {
        let index = if route == self.completion_route {
            self.steps.len()
        } else {
            self.step_for_route(route)
                .map(|(number, _)| number - 1)
                .ok_or_else(|| WizardError::RouteNotFound(route.to_string()))?
        };
        self.cursor.store(index, Ordering::SeqCst);
        Ok(())
    }

    /// Validate the active step and move forward if it passes.
    ///
    /// A second call while a validation is still pending is rejected with
    /// [`WizardError::ValidationInFlight`].
    pub async fn next(&self) -> Result<NavigationOutcome> {
        let index = self.cursor.load(Ordering::SeqCst);
        let step = self
            .steps
            .get(index)
            .ok_or_else(|| WizardError::StepNotFound(self.completion_route.clone()))?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(WizardError::ValidationInFlight(step.id.clone()));
        }
        let _in_flight = InFlight(&self.in_flight);

        let valid = self.gate.validate_step(&step.id).await?;
        if !valid {
            info!(wizard_id = %self.id, step_id = %step.id, "Step validation failed, staying put");
            return Ok(NavigationOutcome::Blocked {
                step_id: step.id.clone(),
            });
        }

        self.cursor.store(index + 1, Ordering::SeqCst);
        match self.steps.get(index + 1) {
            Some(next) => {
                info!(
                    wizard_id = %self.id,
                    from = %step.id,
                    to = %next.id,
                    "Advanced to next step"
                );
                Ok(NavigationOutcome::Advanced {
                    from: step.id.clone(),
                    to: next.id.clone(),
                })
            }
            None => {
                info!(wizard_id = %self.id, step_id = %step.id, "Final step validated, wizard complete");
                Ok(NavigationOutcome::Submitted {
                    step_id: step.id.clone(),
                })
            }
        }
    }

    /// Step back one page. Returns the newly active step, or `None` on the first step.
    pub fn back(&self) -> Option<&StepDescriptor> {
        let index = self.cursor.load(Ordering::SeqCst);
        if index == 0 || index > self.steps.len() {
            return None;
        }
        self.cursor.store(index - 1, Ordering::SeqCst);
        self.steps.get(index - 1)
    }

    /// Return to the first step.
    pub fn restart(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}

/// Builder for creating wizards
pub struct WizardBuilder {
    id: String,
    steps: Vec<StepDescriptor>,
    completion_route: String,
    gate: Option<ValidationGate>,
}

impl WizardBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
            completion_route: "/confirmation".to_string(),
            gate: None,
        }
    }

    pub fn add_step(
        mut self,
        id: impl Into<String>,
        route: impl Into<String>,
        title_key: impl Into<String>,
    ) -> Self {
        self.steps.push(StepDescriptor {
            id: id.into(),
            route: route.into(),
            title_key: title_key.into(),
        });
        self
    }

    pub fn completion_route(mut self, route: impl Into<String>) -> Self {
        self.completion_route = route.into();
        self
    }

    /// Share an existing gate instead of creating a fresh one.
    pub fn with_gate(mut self, gate: ValidationGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn build(self) -> Wizard {
        Wizard {
            id: self.id,
            steps: self.steps,
            completion_route: self.completion_route,
            gate: self.gate.unwrap_or_default(),
            cursor: AtomicUsize::new(0),
            in_flight: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn three_steps() -> Wizard {
        WizardBuilder::new("test")
            .add_step("one", "/apply/one", "steps.one")
            .add_step("two", "/apply/two", "steps.two")
            .add_step("three", "/apply/three", "steps.three")
            .completion_route("/done")
            .build()
    }

    #[tokio::test]
    async fn unvalidated_steps_advance_to_completion() {
        let wizard = three_steps();
        assert_eq!(wizard.progress(), 0);

        assert_eq!(
            wizard.next().await.unwrap(),
            NavigationOutcome::Advanced {
                from: "one".into(),
                to: "two".into()
            }
        );
        wizard.next().await.unwrap();
        assert_eq!(
            wizard.next().await.unwrap(),
            NavigationOutcome::Submitted {
                step_id: "three".into()
            }
        );
        assert!(wizard.is_complete());
        assert_eq!(wizard.current_route(), "/done");
        assert_eq!(wizard.progress(), 100);
        assert!(wizard.next().await.is_err());
    }

    #[tokio::test]
    async fn failed_validation_blocks_without_moving() {
        let wizard = three_steps();
        wizard.gate().register("one", || async { Ok(false) });

        let outcome = wizard.next().await.unwrap();
        assert_eq!(
            outcome,
            NavigationOutcome::Blocked {
                step_id: "one".into()
            }
        );
        assert_eq!(wizard.current_step_number(), 1);
        assert!(!wizard.is_validating());
    }

    #[tokio::test]
    async fn back_and_route_mapping() {
        let wizard = three_steps();
        assert!(wizard.back().is_none());

        wizard.go_to("/apply/three").unwrap();
        assert_eq!(wizard.current_step_number(), 3);
        assert_eq!(wizard.back().map(|s| s.id.as_str()), Some("two"));
        assert_eq!(wizard.step_for_route("/apply/two"), Some((2, "two")));
        assert!(wizard.step_for_route("/nowhere").is_none());
        assert!(matches!(
            wizard.go_to("/nowhere"),
            Err(WizardError::RouteNotFound(_))
        ));
    }

    #[tokio::test]
    async fn second_next_while_pending_is_rejected() {
        let wizard = Arc::new(three_steps());
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());

        let (release_in, started_in) = (release.clone(), started.clone());
        wizard.gate().register("one", move || {
            let release = release_in.clone();
            let started = started_in.clone();
            async move {
                started.notify_one();
                release.notified().await;
                Ok(true)
            }
        });

        let pending = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.next().await })
        };
        started.notified().await;

        assert!(wizard.is_validating());
        assert!(matches!(
            wizard.next().await,
            Err(WizardError::ValidationInFlight(id)) if id == "one"
        ));

        release.notify_one();
        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, NavigationOutcome::Advanced { .. }));
        assert!(!wizard.is_validating());
    }

    #[tokio::test]
    async fn validator_error_clears_in_flight_flag() {
        let wizard = three_steps();
        wizard.gate().register("one", || async {
            Err(WizardError::ValidationFailed("boom".into()))
        });

        assert!(wizard.next().await.is_err());
        assert!(!wizard.is_validating());
        assert_eq!(wizard.current_step_number(), 1);
    }
}
