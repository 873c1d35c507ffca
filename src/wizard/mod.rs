//! The seven-step onboarding wizard.

pub mod controller;
pub mod progress;
pub mod resolver;
pub mod validator;

pub use controller::{Control, OnboardingWizard, SaveOutcome, StepError, UnmountHandle, WizardView};
pub use progress::{StepNavigator, WizardStep};
pub use resolver::{DraftResolver, Resolution, ResolverState};
