use crate::api::BasicInfoPayload;
use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{Property, PropertyType};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::{current_year, parse_year, validate_basic_info, MIN_BUILT_YEAR};

/// Rental arrangements offered in the form
pub const RENTAL_FORMS: [&str; 3] = ["entire_property", "private_rooms", "dormitory_beds"];

/// Where the contact email stands in the OTP flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailVerification {
    Unverified,
    OtpSent { email: String },
    Verified { email: String },
}

/// Step 1 form: property identity, history and contact
#[derive(Debug, Clone)]
pub struct BasicInfoForm {
    pub property_type: Option<PropertyType>,
    pub place_name: String,
    built_year: String,
    booking_since_year: String,
    pub rental_form: String,
    email: String,
    pub phone: String,
    pub landline: String,
    verification: EmailVerification,
    this_year: i32,
}

impl Default for BasicInfoForm {
    fn default() -> Self {
        Self::for_year(current_year())
    }
}

impl BasicInfoForm {
    /// Empty form with year pickers ending at `this_year`
    pub fn for_year(this_year: i32) -> Self {
        Self {
            property_type: None,
            place_name: String::new(),
            built_year: String::new(),
            booking_since_year: String::new(),
            rental_form: String::new(),
            email: String::new(),
            phone: String::new(),
            landline: String::new(),
            verification: EmailVerification::Unverified,
            this_year,
        }
    }

    pub fn built_year(&self) -> &str {
        &self.built_year
    }

    pub fn booking_since_year(&self) -> &str {
        &self.booking_since_year
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn verification(&self) -> &EmailVerification {
        &self.verification
    }

    pub fn is_email_verified(&self) -> bool {
        matches!(&self.verification, EmailVerification::Verified { email } if *email == self.email)
    }

    /// Newest first, back to [`MIN_BUILT_YEAR`]
    pub fn built_year_options(&self) -> Vec<String> {
        year_range(MIN_BUILT_YEAR, self.this_year)
    }

    /// Years from the built year (or the earliest allowed year) up to now
    pub fn booking_since_options(&self) -> Vec<String> {
        let floor = parse_year(&self.built_year).unwrap_or(MIN_BUILT_YEAR);
        year_range(floor, self.this_year)
    }

    /// Pick a built year. A booking-since year earlier than it is cleared.
    pub fn set_built_year(&mut self, year: &str) -> Result<()> {
        if !self.built_year_options().iter().any(|y| y == year) {
            return Err(not_offered("builtYear", year));
        }
        self.built_year = year.to_string();
        if let (Some(built), Some(since)) = (parse_year(year), parse_year(&self.booking_since_year)) {
            if since < built {
                self.booking_since_year.clear();
            }
        }
        Ok(())
    }

    /// Pick a booking-since year; only years offered by the picker are accepted
    pub fn set_booking_since_year(&mut self, year: &str) -> Result<()> {
        if !self.booking_since_options().iter().any(|y| y == year) {
            return Err(not_offered("bookingSinceYear", year));
        }
        self.booking_since_year = year.to_string();
        Ok(())
    }

    pub fn set_rental_form(&mut self, form: &str) -> Result<()> {
        if !RENTAL_FORMS.contains(&form) {
            return Err(not_offered("rentalForm", form));
        }
        self.rental_form = form.to_string();
        Ok(())
    }

    /// Editing the email away from the verified address drops verification
    pub fn set_email(&mut self, email: &str) {
        let email = email.trim().to_string();
        let keeps_state = match &self.verification {
            EmailVerification::Unverified => true,
            EmailVerification::OtpSent { email: sent } | EmailVerification::Verified { email: sent } => {
                *sent == email
            }
        };
        if !keeps_state {
            self.verification = EmailVerification::Unverified;
        }
        self.email = email;
    }

    /// Record that the backend accepted an OTP request for the current email
    pub fn mark_otp_sent(&mut self) {
        self.verification = EmailVerification::OtpSent {
            email: self.email.clone(),
        };
    }

    /// Take the verification outcome from a confirmed record
    pub fn sync_verification(&mut self, property: &Property) {
        let info = &property.basic_info;
        if info.email_verified && info.email == self.email {
            self.verification = EmailVerification::Verified {
                email: info.email.clone(),
            };
        }
    }
}

impl SectionForm for BasicInfoForm {
    type Payload = BasicInfoPayload;

    fn step(&self) -> WizardStep {
        WizardStep::BasicInfo
    }

    fn load(property: &Property) -> Self {
        let info = &property.basic_info;
        let mut form = Self::default();
        form.property_type = info.property_type;
        form.place_name = info.place_name.clone();
        form.built_year = info.built_year.clone();
        form.booking_since_year = info.booking_since_year.clone();
        form.rental_form = info.rental_form.clone();
        form.email = info.email.clone();
        form.phone = info.phone.clone();
        form.landline = info.landline.clone();
        form.verification = if info.email_verified && !info.email.is_empty() {
            EmailVerification::Verified {
                email: info.email.clone(),
            }
        } else {
            EmailVerification::Unverified
        };
        form
    }

    fn payload(&self) -> BasicInfoPayload {
        BasicInfoPayload {
            property_type: self.property_type,
            place_name: self.place_name.trim().to_string(),
            built_year: self.built_year.clone(),
            booking_since_year: self.booking_since_year.clone(),
            rental_form: self.rental_form.clone(),
            email: self.email.clone(),
            phone: self.phone.trim().to_string(),
            landline: self.landline.trim().to_string(),
        }
    }

    fn validate(&self) -> ValidationErrors {
        validate_basic_info(&self.payload())
    }

    fn is_dirty(&self, property: &Property) -> bool {
        self.payload() != BasicInfoPayload::from(&property.basic_info)
    }
}

fn year_range(from: i32, to: i32) -> Vec<String> {
    (from..=to).rev().map(|y| y.to_string()).collect()
}

fn not_offered(field: &str, value: &str) -> OnboardError {
    let mut errors = ValidationErrors::new();
    errors.add(field, format!("'{value}' is not one of the available options"));
    OnboardError::Validation(errors)
}
