//! Per-step client-side validation.
//!
//! Each function takes one step's local form data and returns the
//! field-keyed messages that block "Save & Continue". An empty result means
//! the step may be sent to the backend.

use chrono::{Datelike, NaiveTime, Utc};

use crate::api::BasicInfoPayload;
use crate::error::ValidationErrors;
use crate::models::{
    AmenityCatalog, AmenityCategory, Amenities, Finance, Location, Media, Policies, Property, Room,
};
use crate::wizard::progress::WizardStep;

/// Earliest year accepted for `builtYear`
pub const MIN_BUILT_YEAR: i32 = 1800;

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn validate_basic_info(info: &BasicInfoPayload) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if info.property_type.is_none() {
        errors.add("propertyType", "Property type is required");
    }
    errors.require("placeName", &info.place_name, "Place name is required");
    errors.require("builtYear", &info.built_year, "Built year is required");
    errors.require(
        "bookingSinceYear",
        &info.booking_since_year,
        "Booking since year is required",
    );
    errors.require("rentalForm", &info.rental_form, "Rental form is required");

    let built = parse_year(&info.built_year);
    let since = parse_year(&info.booking_since_year);
    let this_year = current_year();
    if !info.built_year.trim().is_empty() {
        match built {
            Some(year) if (MIN_BUILT_YEAR..=this_year).contains(&year) => {}
            _ => errors.add("builtYear", "Built year is not a valid year"),
        }
    }
    if !info.booking_since_year.trim().is_empty() {
        match (since, built) {
            (None, _) => errors.add("bookingSinceYear", "Booking since year is not a valid year"),
            (Some(s), _) if s > this_year => {
                errors.add("bookingSinceYear", "Booking since year cannot be in the future")
            }
            (Some(s), Some(b)) if s < b => errors.add(
                "bookingSinceYear",
                "Booking since year cannot be before the built year",
            ),
            _ => {}
        }
    }

    if !info.email.trim().is_empty() && !looks_like_email(&info.email) {
        errors.add("email", "Enter a valid email address");
    }
    if !info.phone.trim().is_empty() && !is_mobile_number(&info.phone) {
        errors.add("phone", "Enter a 10 digit mobile number");
    }

    errors
}

pub fn validate_location(location: &Location) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("country", &location.country, "Country is required");
    errors.require("street", &location.street, "Street is required");
    errors.require("city", &location.city, "City is required");
    errors.require("state", &location.state, "State is required");
    errors.require("postalCode", &location.postal_code, "Postal code is required");

    match (location.latitude, location.longitude) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                errors.add("coordinates", "Map pin is out of range");
            }
        }
        (None, None) => {}
        _ => errors.add("coordinates", "Map pin needs both latitude and longitude"),
    }

    errors
}

/// Base amenities flow: nothing blocks
pub fn validate_amenities(_amenities: &Amenities) -> ValidationErrors {
    ValidationErrors::new()
}

/// Strict amenities rule: every mandatory question needs a yes or no.
///
/// Each unanswered item is flagged as `mandatory.<key>`, alongside a
/// summary message under `amenities`.
pub fn validate_amenities_strict(amenities: &Amenities, catalog: &AmenityCatalog) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    for key in unanswered_mandatory(amenities, catalog) {
        let name = catalog
            .find(AmenityCategory::Mandatory, &key)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| key.clone());
        errors.add(
            format!("{}.{}", AmenityCategory::Mandatory.key(), key),
            format!("Select yes or no for {name}"),
        );
    }

    if !errors.is_empty() {
        errors.add("amenities", "Answer every mandatory amenity before submitting");
    }
    errors
}

/// Keys of mandatory amenities whose `available` is still unset.
///
/// Covers catalog questions the owner never touched as well as entries
/// stored without an answer.
pub fn unanswered_mandatory(amenities: &Amenities, catalog: &AmenityCatalog) -> Vec<String> {
    let mut keys: Vec<String> = catalog
        .definitions(AmenityCategory::Mandatory)
        .iter()
        .filter(|d| {
            amenities
                .get(AmenityCategory::Mandatory, &d.key)
                .map_or(true, |e| e.available.is_none())
        })
        .map(|d| d.key.clone())
        .collect();

    if let Some(stored) = amenities.category(AmenityCategory::Mandatory) {
        for (key, entry) in stored {
            if entry.available.is_none() && !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

/// A single room before `addRooms` / `updateRoom`
pub fn validate_room(room: &Room) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require("roomType", &room.room_type, "Room type is required");
    if room.room_count == 0 {
        errors.add("roomCount", "At least one room of this type is required");
    }
    if room.beds.is_empty() || room.bed_count() == 0 {
        errors.add("beds", "Add at least one bed");
    }
    if room.beds.iter().any(|b| b.bed_type.trim().is_empty()) {
        errors.add("beds", "Every bed needs a type");
    }
    if room.max_adults == 0 {
        errors.add("maxAdults", "A room must sleep at least one adult");
    }
    if room.pricing.is_empty() {
        errors.add("pricing", "Add at least one price");
    } else if room
        .pricing
        .iter()
        .any(|t| !t.price.is_finite() || t.price < 0.0)
    {
        errors.add("pricing", "Prices cannot be negative");
    }
    errors
}

/// Rooms step: at least one room on the property
pub fn validate_rooms(rooms: &[Room]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if rooms.is_empty() {
        errors.add("rooms", "Add at least one room");
    }
    errors
}

/// Media has no blocking rule; only structural consistency
pub fn validate_media(media: &Media) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if media.photos.iter().any(|p| p.url.trim().is_empty()) {
        errors.add("photos", "Every photo needs a URL");
    }
    if media.photos.iter().filter(|p| p.is_cover).count() > 1 {
        errors.add("photos", "Only one photo can be the cover");
    }
    errors
}

pub fn validate_policies(policies: &Policies) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_time(&mut errors, "checkInTime", &policies.check_in_time, "Check-in time");
    check_time(&mut errors, "checkOutTime", &policies.check_out_time, "Check-out time");
    errors.require(
        "cancellationPolicy",
        &policies.cancellation_policy,
        "Cancellation policy is required",
    );
    errors
}

pub fn validate_finance(finance: &Finance) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.require(
        "accountHolderName",
        &finance.account_holder_name,
        "Account holder name is required",
    );

    let account = finance.account_number.trim();
    if account.is_empty() {
        errors.add("accountNumber", "Account number is required");
    } else if !(9..=18).contains(&account.len()) || !account.chars().all(|c| c.is_ascii_digit()) {
        errors.add("accountNumber", "Account number must be 9 to 18 digits");
    }

    let ifsc = finance.ifsc_code.trim();
    if ifsc.is_empty() {
        errors.add("ifscCode", "IFSC code is required");
    } else if !is_ifsc(ifsc) {
        errors.add("ifscCode", "IFSC code looks invalid");
    }

    let pan = finance.pan_number.trim();
    if pan.is_empty() {
        errors.add("panNumber", "PAN is required");
    } else if !is_pan(pan) {
        errors.add("panNumber", "PAN looks invalid");
    }

    errors
}

/// Gate for `submitForReview`: every step done, rooms present and every
/// mandatory amenity answered.
pub fn validate_final_submit(property: &Property, catalog: &AmenityCatalog) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in WizardStep::ALL {
        if !property.form_progress.is_complete(step) {
            errors.add(
                format!("step.{}", step.index() + 1),
                format!("{} is not complete", step.label()),
            );
        }
    }
    errors.merge(validate_rooms(&property.rooms));
    errors.merge(validate_amenities_strict(&property.amenities, catalog));
    errors
}

pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.len() != 4 {
        return None;
    }
    raw.parse().ok()
}

fn check_time(errors: &mut ValidationErrors, field: &str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if NaiveTime::parse_from_str(value.trim(), "%H:%M").is_err() {
        errors.add(field, format!("{label} must look like 14:00"));
    }
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn is_mobile_number(phone: &str) -> bool {
    let digits: String = phone
        .trim()
        .trim_start_matches("+91")
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Four letters, a zero, six alphanumerics
fn is_ifsc(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_uppercase)
        && bytes[4] == b'0'
        && bytes[5..].iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Five letters, four digits, one letter
fn is_pan(pan: &str) -> bool {
    let bytes = pan.as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}
