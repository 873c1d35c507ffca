use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Amenity groups as keyed on the wire
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AmenityCategory {
    Mandatory,
    BasicFacilities,
    GeneralServices,
    CommonArea,
    FoodBeverages,
    HealthWellness,
    MediaTechnology,
    PaymentServices,
    Security,
    Safety,
}

impl AmenityCategory {
    pub const ALL: [AmenityCategory; 10] = [
        Self::Mandatory,
        Self::BasicFacilities,
        Self::GeneralServices,
        Self::CommonArea,
        Self::FoodBeverages,
        Self::HealthWellness,
        Self::MediaTechnology,
        Self::PaymentServices,
        Self::Security,
        Self::Safety,
    ];

    /// Wire key, also used as the prefix of per-item validation errors
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mandatory => "mandatory",
            Self::BasicFacilities => "basicFacilities",
            Self::GeneralServices => "generalServices",
            Self::CommonArea => "commonArea",
            Self::FoodBeverages => "foodBeverages",
            Self::HealthWellness => "healthWellness",
            Self::MediaTechnology => "mediaTechnology",
            Self::PaymentServices => "paymentServices",
            Self::Security => "security",
            Self::Safety => "safety",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandatory => "Mandatory",
            Self::BasicFacilities => "Basic Facilities",
            Self::GeneralServices => "General Services",
            Self::CommonArea => "Common Area",
            Self::FoodBeverages => "Food & Beverages",
            Self::HealthWellness => "Health & Wellness",
            Self::MediaTechnology => "Media & Technology",
            Self::PaymentServices => "Payment Services",
            Self::Security => "Security",
            Self::Safety => "Safety",
        }
    }
}

/// Owner's answer for one amenity.
///
/// `available` is `None` until the owner picks yes or no.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AmenityEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    pub option: Vec<String>,
    pub sub_options: Vec<String>,
}

/// Category -> amenity key -> answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Amenities(pub BTreeMap<AmenityCategory, BTreeMap<String, AmenityEntry>>);

impl Amenities {
    pub fn get(&self, category: AmenityCategory, key: &str) -> Option<&AmenityEntry> {
        self.0.get(&category).and_then(|items| items.get(key))
    }

    /// Entry for `key`, inserting an unanswered one if absent
    pub fn entry_mut(&mut self, category: AmenityCategory, key: &str) -> &mut AmenityEntry {
        self.0
            .entry(category)
            .or_default()
            .entry(key.to_string())
            .or_default()
    }

    pub fn category(&self, category: AmenityCategory) -> Option<&BTreeMap<String, AmenityEntry>> {
        self.0.get(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|items| items.is_empty())
    }
}

/// Whether an option list accepts one or many picks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectMode {
    Single,
    Multi,
}

/// Display shape of an amenity question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmenityShape {
    /// Yes/no only
    Plain,
    /// Yes/no plus one option list
    Options { options: Vec<String>, mode: SelectMode },
    /// Yes/no, an optional option list, and a sub-option list.
    ///
    /// Sub-options are offered once at least one option is picked, or
    /// straight away when `options` is empty.
    TwoLevel {
        options: Vec<String>,
        mode: SelectMode,
        sub_options: Vec<String>,
    },
}

impl AmenityShape {
    pub fn options(&self) -> &[String] {
        match self {
            Self::Plain => &[],
            Self::Options { options, .. } | Self::TwoLevel { options, .. } => options,
        }
    }

    pub fn sub_options(&self) -> &[String] {
        match self {
            Self::TwoLevel { sub_options, .. } => sub_options,
            _ => &[],
        }
    }

    pub fn mode(&self) -> SelectMode {
        match self {
            Self::Plain => SelectMode::Multi,
            Self::Options { mode, .. } | Self::TwoLevel { mode, .. } => *mode,
        }
    }
}

/// One question of the amenities matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityDefinition {
    pub key: String,
    pub name: String,
    pub shape: AmenityShape,
}

impl AmenityDefinition {
    pub fn plain(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            shape: AmenityShape::Plain,
        }
    }

    pub fn with_options(key: &str, name: &str, mode: SelectMode, options: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            shape: AmenityShape::Options {
                options: to_owned(options),
                mode,
            },
        }
    }

    pub fn two_level(
        key: &str,
        name: &str,
        mode: SelectMode,
        options: &[&str],
        sub_options: &[&str],
    ) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            shape: AmenityShape::TwoLevel {
                options: to_owned(options),
                mode,
                sub_options: to_owned(sub_options),
            },
        }
    }

    /// Option picker is visible for this answer
    pub fn reveals_options(&self, entry: &AmenityEntry) -> bool {
        entry.available == Some(true) && !self.shape.options().is_empty()
    }

    /// Sub-option picker is visible for this answer
    pub fn reveals_sub_options(&self, entry: &AmenityEntry) -> bool {
        entry.available == Some(true)
            && !self.shape.sub_options().is_empty()
            && (self.shape.options().is_empty() || !entry.option.is_empty())
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The amenity questions asked per category
#[derive(Debug, Clone, Default)]
pub struct AmenityCatalog {
    categories: BTreeMap<AmenityCategory, Vec<AmenityDefinition>>,
}

impl AmenityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: AmenityCategory, definition: AmenityDefinition) -> Self {
        self.categories.entry(category).or_default().push(definition);
        self
    }

    pub fn definitions(&self, category: AmenityCategory) -> &[AmenityDefinition] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, category: AmenityCategory, key: &str) -> Option<&AmenityDefinition> {
        self.definitions(category).iter().find(|d| d.key == key)
    }

    /// Questions offered to every pilgrim-lodging listing
    pub fn standard() -> Self {
        use AmenityCategory::*;
        use SelectMode::*;

        Self::new()
            .with(Mandatory, AmenityDefinition::with_options("airConditioning", "Air Conditioning", Multi, &["Room controlled", "Centralized"]))
            .with(Mandatory, AmenityDefinition::with_options("wifi", "Wi-Fi", Single, &["Free", "Paid"]))
            .with(Mandatory, AmenityDefinition::two_level("parking", "Parking", Single, &["Free", "Paid"], &["On site", "Nearby", "Valet"]))
            .with(Mandatory, AmenityDefinition::plain("powerBackup", "Power Backup"))
            .with(Mandatory, AmenityDefinition::two_level("housekeeping", "Housekeeping", Single, &[], &["Daily", "On request"]))
            .with(Mandatory, AmenityDefinition::plain("drinkingWater", "Drinking Water"))
            .with(BasicFacilities, AmenityDefinition::plain("elevator", "Elevator"))
            .with(BasicFacilities, AmenityDefinition::with_options("laundry", "Laundry", Single, &["Free", "Paid"]))
            .with(BasicFacilities, AmenityDefinition::plain("hotWater", "Hot Water"))
            .with(GeneralServices, AmenityDefinition::plain("luggageStorage", "Luggage Storage"))
            .with(GeneralServices, AmenityDefinition::two_level("transfers", "Transfers", Multi, &["Railway station", "Bus stand", "Airport"], &["Free", "Paid"]))
            .with(GeneralServices, AmenityDefinition::plain("wheelchair", "Wheelchair Access"))
            .with(CommonArea, AmenityDefinition::plain("prayerHall", "Prayer Hall"))
            .with(CommonArea, AmenityDefinition::plain("garden", "Garden"))
            .with(FoodBeverages, AmenityDefinition::two_level("dining", "Dining", Multi, &["Bhojanalaya", "Canteen", "Room service"], &["Satvik", "Jain", "Pure vegetarian"]))
            .with(FoodBeverages, AmenityDefinition::plain("kitchenAccess", "Kitchen Access"))
            .with(HealthWellness, AmenityDefinition::plain("yogaSessions", "Yoga Sessions"))
            .with(HealthWellness, AmenityDefinition::plain("firstAid", "First-aid Room"))
            .with(MediaTechnology, AmenityDefinition::plain("television", "Television"))
            .with(PaymentServices, AmenityDefinition::with_options("payments", "Accepted Payments", Multi, &["Cash", "UPI", "Card"]))
            .with(Security, AmenityDefinition::plain("cctv", "CCTV"))
            .with(Security, AmenityDefinition::plain("securityGuard", "Security Guard"))
            .with(Safety, AmenityDefinition::plain("fireExtinguishers", "Fire Extinguishers"))
            .with(Safety, AmenityDefinition::plain("smokeDetectors", "Smoke Detectors"))
    }
}
