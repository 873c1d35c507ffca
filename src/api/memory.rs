//! In-process stand-in for the property backend.
//!
//! Applies the same section rules the server does, flips `formProgress`
//! flags on accepted writes and records which operations were called.
//! Used for offline runs and as the fake backend in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::traits::PropertyApi;
use crate::api::types::{AmenitiesPayload, BasicInfoPayload};
use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{
    AmenityCatalog, Finance, Location, Media, Policies, Property, PropertyStatus, Room,
};
use crate::wizard::validator::{
    validate_basic_info, validate_final_submit, validate_finance, validate_location,
    validate_policies, validate_room,
};

const DEFAULT_OTP: &str = "123456";

#[derive(Debug, Default)]
struct MemoryState {
    properties: BTreeMap<String, Property>,
    next_id: u64,
    next_room_id: u64,
    otps: BTreeMap<(String, String), String>,
    calls: Vec<&'static str>,
    fail_next: Option<(u16, String)>,
}

/// Backend kept in memory for one process
#[derive(Debug)]
pub struct InMemoryPropertyApi {
    owner_id: String,
    otp: String,
    latency: Duration,
    catalog: AmenityCatalog,
    state: Mutex<MemoryState>,
}

impl Default for InMemoryPropertyApi {
    fn default() -> Self {
        Self::new("owner-1")
    }
}

impl InMemoryPropertyApi {
    pub fn new(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            otp: DEFAULT_OTP.to_string(),
            latency: Duration::ZERO,
            catalog: AmenityCatalog::standard(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Code accepted by `verify_email_otp`
    pub fn with_otp(mut self, otp: &str) -> Self {
        self.otp = otp.to_string();
        self
    }

    /// Delay every call, to imitate a round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Store a property as-is
    pub async fn seed(&self, property: Property) {
        let mut state = self.state.lock().await;
        state.properties.insert(property.id.clone(), property);
    }

    pub async fn get(&self, id: &str) -> Option<Property> {
        self.state.lock().await.properties.get(id).cloned()
    }

    /// Number of times `operation` was called, e.g. `"initialize"`
    pub async fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.len()
    }

    /// Make the next call fail with an API error
    pub async fn fail_next(&self, status: u16, message: &str) {
        self.state.lock().await.fail_next = Some((status, message.to_string()));
    }

    /// OTP last issued for this property and email
    pub async fn issued_otp(&self, id: &str, email: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .otps
            .get(&(id.to_string(), email.to_string()))
            .cloned()
    }

    async fn enter(&self, operation: &'static str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut state = self.state.lock().await;
        state.calls.push(operation);
        debug!(operation, "In-memory backend call");
        match state.fail_next.take() {
            Some((status, message)) => Err(OnboardError::Api { status, message }),
            None => Ok(()),
        }
    }

    /// Apply `change` to a stored property and return the new record
    async fn write<F>(&self, operation: &'static str, id: &str, change: F) -> Result<Property>
    where
        F: FnOnce(&mut Property) -> Result<()> + Send,
    {
        self.enter(operation).await?;
        let mut state = self.state.lock().await;
        let property = state
            .properties
            .get_mut(id)
            .ok_or_else(|| OnboardError::NotFound(id.to_string()))?;

        let mut updated = property.clone();
        change(&mut updated)?;
        if updated.status == PropertyStatus::Published {
            updated.status = PropertyStatus::PendingChanges;
        }
        updated.updated_at = Some(Utc::now());
        *property = updated.clone();
        Ok(updated)
    }
}

/// The server answers with the first failing rule only
fn rejected(errors: ValidationErrors) -> Result<()> {
    let first = errors.iter().next().map(|(_, message)| message.to_string());
    match first {
        Some(message) => Err(OnboardError::Api {
            status: 422,
            message,
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl PropertyApi for InMemoryPropertyApi {
    async fn initialize(&self) -> Result<Property> {
        self.enter("initialize").await?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let mut property = Property::draft(format!("draft-{}", state.next_id));
        property.owner_id = Some(self.owner_id.clone());
        property.updated_at = Some(Utc::now());
        state.properties.insert(property.id.clone(), property.clone());
        info!(property_id = %property.id, "Created in-memory draft");
        Ok(property)
    }

    async fn fetch_property(&self, id: &str) -> Result<Property> {
        self.enter("fetch_property").await?;
        self.state
            .lock()
            .await
            .properties
            .get(id)
            .cloned()
            .ok_or_else(|| OnboardError::NotFound(id.to_string()))
    }

    async fn draft_properties(&self) -> Result<Vec<Property>> {
        self.enter("draft_properties").await?;
        Ok(self
            .state
            .lock()
            .await
            .properties
            .values()
            .filter(|p| p.status == PropertyStatus::Draft)
            .filter(|p| p.owner_id.as_deref() == Some(self.owner_id.as_str()))
            .cloned()
            .collect())
    }

    async fn update_basic_info(&self, id: &str, data: &BasicInfoPayload) -> Result<Property> {
        let data = data.clone();
        self.write("update_basic_info", id, move |p| {
            rejected(validate_basic_info(&data))?;
            let info = &mut p.basic_info;
            let keep_verified = info.email_verified && info.email == data.email;
            info.property_type = data.property_type;
            info.place_name = data.place_name;
            info.built_year = data.built_year;
            info.booking_since_year = data.booking_since_year;
            info.rental_form = data.rental_form;
            info.email = data.email;
            info.phone = data.phone;
            info.landline = data.landline;
            info.email_verified = keep_verified;
            p.form_progress.step1_completed = true;
            Ok(())
        })
        .await
    }

    async fn update_location(&self, id: &str, data: &Location) -> Result<Property> {
        let data = data.clone();
        self.write("update_location", id, move |p| {
            rejected(validate_location(&data))?;
            p.location = data;
            p.form_progress.step2_completed = true;
            Ok(())
        })
        .await
    }

    async fn update_amenities(&self, id: &str, data: &AmenitiesPayload) -> Result<Property> {
        let data = data.clone();
        self.write("update_amenities", id, move |p| {
            p.amenities = data.amenities;
            p.form_progress.step3_completed = true;
            Ok(())
        })
        .await
    }

    async fn add_rooms(&self, id: &str, rooms: &[Room]) -> Result<Property> {
        let rooms = rooms.to_vec();
        let first_room_id = {
            let mut state = self.state.lock().await;
            let first = state.next_room_id + 1;
            state.next_room_id += rooms.len() as u64;
            first
        };
        self.write("add_rooms", id, move |p| {
            if rooms.is_empty() {
                return Err(OnboardError::Api {
                    status: 422,
                    message: "Add at least one room".to_string(),
                });
            }
            for room in &rooms {
                rejected(validate_room(room))?;
            }
            for (offset, mut room) in rooms.into_iter().enumerate() {
                room.id = Some(format!("room-{}", first_room_id + offset as u64));
                p.rooms.push(room);
            }
            p.form_progress.step4_completed = true;
            Ok(())
        })
        .await
    }

    async fn update_room(&self, id: &str, room_id: &str, room: &Room) -> Result<Property> {
        let room = room.clone();
        let room_id = room_id.to_string();
        self.write("update_room", id, move |p| {
            rejected(validate_room(&room))?;
            let slot = p
                .rooms
                .iter_mut()
                .find(|r| r.id.as_deref() == Some(room_id.as_str()))
                .ok_or_else(|| OnboardError::Api {
                    status: 404,
                    message: format!("Room {room_id} not found"),
                })?;
            *slot = Room {
                id: Some(room_id.clone()),
                ..room
            };
            Ok(())
        })
        .await
    }

    async fn update_media(&self, id: &str, media: &Media) -> Result<Property> {
        let media = media.clone();
        self.write("update_media", id, move |p| {
            p.media = media;
            p.form_progress.step5_completed = true;
            Ok(())
        })
        .await
    }

    async fn update_policies(&self, id: &str, policies: &Policies) -> Result<Property> {
        let policies = policies.clone();
        self.write("update_policies", id, move |p| {
            rejected(validate_policies(&policies))?;
            p.policies = policies;
            p.form_progress.step6_completed = true;
            Ok(())
        })
        .await
    }

    async fn update_finance(&self, id: &str, finance: &Finance) -> Result<Property> {
        let finance = finance.clone();
        self.write("update_finance", id, move |p| {
            rejected(validate_finance(&finance))?;
            p.finance = finance;
            p.form_progress.step7_completed = true;
            Ok(())
        })
        .await
    }

    async fn send_email_otp(&self, id: &str, email: &str) -> Result<()> {
        self.enter("send_email_otp").await?;
        let mut state = self.state.lock().await;
        if !state.properties.contains_key(id) {
            return Err(OnboardError::NotFound(id.to_string()));
        }
        state
            .otps
            .insert((id.to_string(), email.to_string()), self.otp.clone());
        Ok(())
    }

    async fn verify_email_otp(&self, id: &str, email: &str, otp: &str) -> Result<Property> {
        let issued = self.issued_otp(id, email).await;
        let email = email.to_string();
        let matches = issued.as_deref() == Some(otp);
        self.write("verify_email_otp", id, move |p| {
            if !matches {
                return Err(OnboardError::Api {
                    status: 400,
                    message: "Invalid or expired OTP".to_string(),
                });
            }
            p.basic_info.email = email;
            p.basic_info.email_verified = true;
            Ok(())
        })
        .await
    }

    async fn submit_for_review(&self, id: &str) -> Result<Property> {
        self.enter("submit_for_review").await?;
        let mut state = self.state.lock().await;
        let property = state
            .properties
            .get_mut(id)
            .ok_or_else(|| OnboardError::NotFound(id.to_string()))?;
        if !property.status.can_transition_to(PropertyStatus::Pending) {
            return Err(OnboardError::Api {
                status: 409,
                message: format!("A {} property cannot be submitted", property.status),
            });
        }
        let errors = validate_final_submit(property, &self.catalog);
        if let Some((_, message)) = errors.iter().next() {
            return Err(OnboardError::Api {
                status: 422,
                message: message.to_string(),
            });
        }
        property.status = PropertyStatus::Pending;
        property.updated_at = Some(Utc::now());
        Ok(property.clone())
    }

    async fn delete_property(&self, id: &str) -> Result<()> {
        self.enter("delete_property").await?;
        self.state
            .lock()
            .await
            .properties
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| OnboardError::NotFound(id.to_string()))
    }

    async fn update_status(&self, id: &str, status: PropertyStatus) -> Result<Property> {
        self.enter("update_status").await?;
        let mut state = self.state.lock().await;
        let property = state
            .properties
            .get_mut(id)
            .ok_or_else(|| OnboardError::NotFound(id.to_string()))?;
        if !property.status.admin_can_set(status) {
            return Err(OnboardError::Api {
                status: 422,
                message: format!("Cannot move a {} property to {}", property.status, status),
            });
        }
        property.status = status;
        property.updated_at = Some(Utc::now());
        Ok(property.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepted_write_marks_step_complete() {
        let api = InMemoryPropertyApi::default();
        let draft = api.initialize().await.unwrap();
        let location = Location {
            country: "India".into(),
            street: "Ghat Road".into(),
            city: "Varanasi".into(),
            state: "Uttar Pradesh".into(),
            postal_code: "221001".into(),
            latitude: None,
            longitude: None,
        };
        let updated = api.update_location(&draft.id, &location).await.unwrap();
        assert!(updated.form_progress.step2_completed);
        assert!(!updated.form_progress.step1_completed);
    }

    #[tokio::test]
    async fn rejected_write_leaves_record_untouched() {
        let api = InMemoryPropertyApi::default();
        let draft = api.initialize().await.unwrap();
        let err = api
            .update_location(&draft.id, &Location::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardError::Api { status: 422, .. }));
        assert_eq!(api.get(&draft.id).await.unwrap(), draft);
    }

    #[tokio::test]
    async fn editing_published_listing_needs_review_again() {
        let api = InMemoryPropertyApi::default();
        let mut property = Property::draft("live-1");
        property.status = PropertyStatus::Published;
        api.seed(property).await;
        let updated = api
            .update_media("live-1", &Media::default())
            .await
            .unwrap();
        assert_eq!(updated.status, PropertyStatus::PendingChanges);
    }

    #[tokio::test]
    async fn fail_next_applies_once() {
        let api = InMemoryPropertyApi::default();
        api.fail_next(500, "database unavailable").await;
        assert!(api.initialize().await.is_err());
        assert!(api.initialize().await.is_ok());
        assert_eq!(api.calls("initialize").await, 2);
    }

    #[tokio::test]
    async fn otp_must_match() {
        let api = InMemoryPropertyApi::default().with_otp("909090");
        let draft = api.initialize().await.unwrap();
        api.send_email_otp(&draft.id, "seva@ashram.org").await.unwrap();
        assert!(api
            .verify_email_otp(&draft.id, "seva@ashram.org", "111111")
            .await
            .is_err());
        let verified = api
            .verify_email_otp(&draft.id, "seva@ashram.org", "909090")
            .await
            .unwrap();
        assert!(verified.basic_info.email_verified);
    }
}
