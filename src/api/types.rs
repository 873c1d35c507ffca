use serde::{Deserialize, Serialize};

use crate::models::{Amenities, BasicInfo, PropertyStatus, PropertyType, Room};

/// Body of the basic-info update.
///
/// `emailVerified` is owned by the OTP flow and never sent from here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfoPayload {
    pub property_type: Option<PropertyType>,
    pub place_name: String,
    pub built_year: String,
    pub booking_since_year: String,
    pub rental_form: String,
    pub email: String,
    pub phone: String,
    pub landline: String,
}

impl From<&BasicInfo> for BasicInfoPayload {
    fn from(info: &BasicInfo) -> Self {
        Self {
            property_type: info.property_type,
            place_name: info.place_name.clone(),
            built_year: info.built_year.clone(),
            booking_since_year: info.booking_since_year.clone(),
            rental_form: info.rental_form.clone(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            landline: info.landline.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AmenitiesPayload {
    pub amenities: Amenities,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomsPayload<'a> {
    pub rooms: &'a [Room],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailOtpRequest<'a> {
    pub property_id: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest<'a> {
    pub property_id: &'a str,
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: PropertyStatus,
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}
