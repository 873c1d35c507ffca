//! Amenities matrix editor.
//!
//! Every mutation returns the complete amenities mapping; the wizard keeps
//! the latest one and sends it whole on save.

use crate::api::AmenitiesPayload;
use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{
    AmenityCatalog, AmenityCategory, AmenityDefinition, AmenityEntry, Amenities, Property,
    SelectMode,
};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::{unanswered_mandatory, validate_amenities, validate_amenities_strict};

/// Render state for one amenity question
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityRow<'a> {
    pub definition: &'a AmenityDefinition,
    pub entry: AmenityEntry,
    pub show_options: bool,
    pub show_sub_options: bool,
    /// Unanswered mandatory item, highlighted in the strict flow
    pub flagged: bool,
}

#[derive(Debug, Clone)]
pub struct AmenitiesEditor {
    catalog: AmenityCatalog,
    value: Amenities,
    strict: bool,
}

impl AmenitiesEditor {
    pub fn new(catalog: AmenityCatalog, value: Amenities) -> Self {
        Self {
            catalog,
            value,
            strict: false,
        }
    }

    /// Require every mandatory amenity to be answered before saving
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn catalog(&self) -> &AmenityCatalog {
        &self.catalog
    }

    pub fn value(&self) -> &Amenities {
        &self.value
    }

    /// Answer yes or no. "No" discards any picked options and sub-options.
    pub fn set_available(&mut self, category: AmenityCategory, key: &str, available: bool) -> Result<Amenities> {
        self.definition(category, key)?;
        let entry = self.value.entry_mut(category, key);
        entry.available = Some(available);
        if !available {
            entry.option.clear();
            entry.sub_options.clear();
        }
        Ok(self.value.clone())
    }

    /// Back to unanswered
    pub fn clear_answer(&mut self, category: AmenityCategory, key: &str) -> Result<Amenities> {
        self.definition(category, key)?;
        *self.value.entry_mut(category, key) = AmenityEntry::default();
        Ok(self.value.clone())
    }

    /// Replace the picked options. Picks must come from the declared option set.
    pub fn select_options(&mut self, category: AmenityCategory, key: &str, picks: &[&str]) -> Result<Amenities> {
        let definition = self.definition(category, key)?.clone();
        let entry = self.value.entry_mut(category, key);
        if !definition.reveals_options(entry) {
            return Err(OnboardError::InvalidState(format!(
                "{} has no options to choose right now",
                definition.name
            )));
        }
        let picks = constrain(
            &definition.name,
            picks,
            definition.shape.options(),
            definition.shape.mode(),
        )?;
        entry.option = picks;
        if !definition.reveals_sub_options(entry) {
            entry.sub_options.clear();
        }
        Ok(self.value.clone())
    }

    /// Replace the picked sub-options. Always multi-select.
    pub fn select_sub_options(
        &mut self,
        category: AmenityCategory,
        key: &str,
        picks: &[&str],
    ) -> Result<Amenities> {
        let definition = self.definition(category, key)?.clone();
        let entry = self.value.entry_mut(category, key);
        if !definition.reveals_sub_options(entry) {
            return Err(OnboardError::InvalidState(format!(
                "{} has no sub-options to choose right now",
                definition.name
            )));
        }
        entry.sub_options = constrain(
            &definition.name,
            picks,
            definition.shape.sub_options(),
            SelectMode::Multi,
        )?;
        Ok(self.value.clone())
    }

    /// Rows for one category in catalog order
    pub fn rows(&self, category: AmenityCategory) -> Vec<AmenityRow<'_>> {
        let flagged_keys = if self.strict && category == AmenityCategory::Mandatory {
            unanswered_mandatory(&self.value, &self.catalog)
        } else {
            Vec::new()
        };

        self.catalog
            .definitions(category)
            .iter()
            .map(|definition| {
                let entry = self
                    .value
                    .get(category, &definition.key)
                    .cloned()
                    .unwrap_or_default();
                AmenityRow {
                    show_options: definition.reveals_options(&entry),
                    show_sub_options: definition.reveals_sub_options(&entry),
                    flagged: flagged_keys.contains(&definition.key),
                    definition,
                    entry,
                }
            })
            .collect()
    }

    fn definition(&self, category: AmenityCategory, key: &str) -> Result<&AmenityDefinition> {
        self.catalog.find(category, key).ok_or_else(|| {
            OnboardError::InvalidState(format!(
                "Unknown amenity '{key}' in {}",
                category.label()
            ))
        })
    }
}

impl SectionForm for AmenitiesEditor {
    type Payload = AmenitiesPayload;

    fn step(&self) -> WizardStep {
        WizardStep::Amenities
    }

    fn load(property: &Property) -> Self {
        Self::new(AmenityCatalog::standard(), property.amenities.clone())
    }

    fn payload(&self) -> AmenitiesPayload {
        AmenitiesPayload {
            amenities: self.value.clone(),
        }
    }

    fn validate(&self) -> ValidationErrors {
        if self.strict {
            validate_amenities_strict(&self.value, &self.catalog)
        } else {
            validate_amenities(&self.value)
        }
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.value != property.amenities
    }
}

/// Deduplicate `picks`, keep declared order, refuse anything undeclared
fn constrain(name: &str, picks: &[&str], allowed: &[String], mode: SelectMode) -> Result<Vec<String>> {
    if let Some(bad) = picks.iter().find(|p| !allowed.iter().any(|a| a.as_str() == **p)) {
        let mut errors = ValidationErrors::new();
        errors.add(name, format!("'{bad}' is not an option for {name}"));
        return Err(OnboardError::Validation(errors));
    }
    let chosen: Vec<String> = allowed
        .iter()
        .filter(|a| picks.contains(&a.as_str()))
        .cloned()
        .collect();
    if mode == SelectMode::Single && chosen.len() > 1 {
        let mut errors = ValidationErrors::new();
        errors.add(name, format!("Pick only one option for {name}"));
        return Err(OnboardError::Validation(errors));
    }
    Ok(chosen)
}
