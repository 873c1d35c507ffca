pub mod amenity;
pub mod room;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use amenity::{
    AmenityCatalog, AmenityCategory, AmenityDefinition, AmenityEntry, AmenityShape, Amenities,
    SelectMode,
};
pub use room::{BedConfig, PriceTier, Room};

use crate::wizard::progress::WizardStep;

/// Lifecycle status of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Rejected,
    PendingChanges,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::PendingChanges => "pending_changes",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Owners submit drafts (`draft -> pending`) and edit live listings
    /// (`published -> pending_changes`). Admin review settles pending work
    /// (`pending | pending_changes -> published | rejected`). A rejected
    /// listing goes back to draft so the owner can fix it.
    pub fn can_transition_to(&self, next: PropertyStatus) -> bool {
        use PropertyStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Published)
                | (Pending, Rejected)
                | (Published, PendingChanges)
                | (PendingChanges, Published)
                | (PendingChanges, Rejected)
                | (Rejected, Draft)
        )
    }

    /// Admin moves through `propertyStatus`: anything the lifecycle allows,
    /// plus taking a listing down (`-> rejected`), sending work back to the
    /// owner (`-> draft`) and reopening a rejected listing for review.
    /// A listing that was never submitted is left to its owner.
    pub fn admin_can_set(&self, next: PropertyStatus) -> bool {
        use PropertyStatus::*;
        if *self == next {
            return false;
        }
        self.can_transition_to(next)
            || match (self, next) {
                (Draft, _) => false,
                (_, Rejected | Draft) => true,
                (Rejected, Pending) => true,
                _ => false,
            }
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of lodging being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Dharamshala,
    Ashram,
    GuestHouse,
    Hotel,
    Homestay,
    Lodge,
    #[serde(other)]
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        Self::Dharamshala,
        Self::Ashram,
        Self::GuestHouse,
        Self::Hotel,
        Self::Homestay,
        Self::Lodge,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dharamshala => "Dharamshala",
            Self::Ashram => "Ashram",
            Self::GuestHouse => "Guest House",
            Self::Hotel => "Hotel",
            Self::Homestay => "Homestay",
            Self::Lodge => "Lodge",
            Self::Other => "Other",
        }
    }
}

/// Step 1: identity and contact details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub property_type: Option<PropertyType>,
    pub place_name: String,
    pub built_year: String,
    pub booking_since_year: String,
    pub rental_form: String,
    pub email: String,
    pub phone: String,
    pub landline: String,
    pub email_verified: bool,
}

impl BasicInfo {
    /// Contact email as shown to guests. Unverified addresses stay hidden.
    pub fn public_email(&self) -> Option<&str> {
        if self.email_verified && !self.email.is_empty() {
            Some(&self.email)
        } else {
            None
        }
    }
}

/// Step 2: postal address and map pin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub country: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A single listing photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub is_cover: bool,
}

/// Step 5: listing media
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    pub photos: Vec<Photo>,
}

/// Step 6: stay rules shown to guests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Policies {
    pub check_in_time: String,
    pub check_out_time: String,
    pub cancellation_policy: String,
    pub house_rules: Vec<String>,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
}

/// Step 7: payout account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Finance {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub pan_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
}

/// Server-persisted completion flags, one per wizard step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormProgress {
    pub step1_completed: bool,
    pub step2_completed: bool,
    pub step3_completed: bool,
    pub step4_completed: bool,
    pub step5_completed: bool,
    pub step6_completed: bool,
    pub step7_completed: bool,
}

impl FormProgress {
    pub fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::BasicInfo => self.step1_completed,
            WizardStep::Location => self.step2_completed,
            WizardStep::Amenities => self.step3_completed,
            WizardStep::Rooms => self.step4_completed,
            WizardStep::Media => self.step5_completed,
            WizardStep::Policies => self.step6_completed,
            WizardStep::Finance => self.step7_completed,
        }
    }

    pub fn first_incomplete(&self) -> Option<WizardStep> {
        WizardStep::ALL.into_iter().find(|s| !self.is_complete(*s))
    }

    pub fn completed_count(&self) -> usize {
        WizardStep::ALL
            .into_iter()
            .filter(|s| self.is_complete(*s))
            .count()
    }
}

/// Core property data model, as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default, alias = "owner", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub policies: Policies,
    #[serde(default)]
    pub finance: Finance,
    #[serde(default)]
    pub form_progress: FormProgress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// An empty draft carrying only its id
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: PropertyStatus::Draft,
            owner_id: None,
            basic_info: BasicInfo::default(),
            location: Location::default(),
            amenities: Amenities::default(),
            rooms: Vec::new(),
            media: Media::default(),
            policies: Policies::default(),
            finance: Finance::default(),
            form_progress: FormProgress::default(),
            updated_at: None,
        }
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            id: self.id.clone(),
            place_name: self.basic_info.place_name.clone(),
            completed_steps: self.form_progress.completed_count(),
            updated_at: self.updated_at,
        }
    }
}

/// One row of the draft picker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftSummary {
    pub id: String,
    pub place_name: String,
    pub completed_steps: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DraftSummary {
    pub fn display_name(&self) -> &str {
        if self.place_name.is_empty() {
            "Untitled draft"
        } else {
            &self.place_name
        }
    }
}
