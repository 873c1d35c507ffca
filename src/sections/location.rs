use crate::error::ValidationErrors;
use crate::models::{Location, Property};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::validate_location;

/// Step 2 form: postal address and an optional map pin
#[derive(Debug, Clone, Default)]
pub struct LocationForm {
    pub country: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pin: Option<(f64, f64)>,
}

impl LocationForm {
    /// Drop a pin at the given coordinates
    pub fn set_pin(&mut self, latitude: f64, longitude: f64) {
        self.pin = Some((latitude, longitude));
    }

    pub fn clear_pin(&mut self) {
        self.pin = None;
    }

    pub fn pin(&self) -> Option<(f64, f64)> {
        self.pin
    }

    /// One-line address for the map overlay
    pub fn display_address(&self) -> String {
        [&self.street, &self.city, &self.state, &self.postal_code, &self.country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl SectionForm for LocationForm {
    type Payload = Location;

    fn step(&self) -> WizardStep {
        WizardStep::Location
    }

    fn load(property: &Property) -> Self {
        let loc = &property.location;
        Self {
            country: loc.country.clone(),
            street: loc.street.clone(),
            city: loc.city.clone(),
            state: loc.state.clone(),
            postal_code: loc.postal_code.clone(),
            pin: loc.latitude.zip(loc.longitude),
        }
    }

    fn payload(&self) -> Location {
        Location {
            country: self.country.trim().to_string(),
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            latitude: self.pin.map(|(lat, _)| lat),
            longitude: self.pin.map(|(_, lng)| lng),
        }
    }

    fn validate(&self) -> ValidationErrors {
        validate_location(&self.payload())
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.payload() != property.location
    }
}
