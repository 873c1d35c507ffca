//! Local edit state for each wizard tab.
//!
//! Forms are seeded from the last confirmed property record and hold the
//! owner's unsaved edits. They never touch the shared store; the wizard
//! controller reads their payload when the owner saves.

pub mod amenities;
pub mod basic_info;
pub mod finance;
pub mod location;
pub mod media;
pub mod policies;
pub mod rooms;

pub use amenities::{AmenitiesEditor, AmenityRow};
pub use basic_info::{BasicInfoForm, EmailVerification};
pub use finance::FinanceForm;
pub use location::LocationForm;
pub use media::MediaForm;
pub use policies::PoliciesForm;
pub use rooms::RoomListForm;

use crate::error::ValidationErrors;
use crate::models::Property;
use crate::wizard::progress::WizardStep;

/// Common shape of a tab's form
pub trait SectionForm {
    /// What the backend receives on save
    type Payload;

    /// Tab this form belongs to
    fn step(&self) -> WizardStep;

    /// Seed the form from a confirmed record
    fn load(property: &Property) -> Self
    where
        Self: Sized;

    fn payload(&self) -> Self::Payload;

    /// Blocking errors for "Save & Continue"
    fn validate(&self) -> ValidationErrors;

    /// Whether the form differs from what `property` holds
    fn is_dirty(&self, property: &Property) -> bool;
}
