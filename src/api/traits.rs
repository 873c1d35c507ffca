use crate::error::Result;
use crate::models::{Location, Media, Policies, Finance, Property, PropertyStatus, Room};
use async_trait::async_trait;

use super::types::{AmenitiesPayload, BasicInfoPayload};

/// Backend operations consumed by the onboarding flow.
///
/// Every write returns the full property as the server now sees it.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// Create a fresh draft owned by the caller
    async fn initialize(&self) -> Result<Property>;

    async fn fetch_property(&self, id: &str) -> Result<Property>;

    /// The caller's incomplete drafts
    async fn draft_properties(&self) -> Result<Vec<Property>>;

    async fn update_basic_info(&self, id: &str, data: &BasicInfoPayload) -> Result<Property>;

    async fn update_location(&self, id: &str, data: &Location) -> Result<Property>;

    async fn update_amenities(&self, id: &str, data: &AmenitiesPayload) -> Result<Property>;

    async fn add_rooms(&self, id: &str, rooms: &[Room]) -> Result<Property>;

    async fn update_room(&self, id: &str, room_id: &str, room: &Room) -> Result<Property>;

    async fn update_media(&self, id: &str, media: &Media) -> Result<Property>;

    async fn update_policies(&self, id: &str, policies: &Policies) -> Result<Property>;

    async fn update_finance(&self, id: &str, finance: &Finance) -> Result<Property>;

    async fn send_email_otp(&self, id: &str, email: &str) -> Result<()>;

    async fn verify_email_otp(&self, id: &str, email: &str, otp: &str) -> Result<Property>;

    /// Owner hands the draft over for admin review
    async fn submit_for_review(&self, id: &str) -> Result<Property>;

    async fn delete_property(&self, id: &str) -> Result<()>;

    /// Admin-only status change
    async fn update_status(&self, id: &str, status: PropertyStatus) -> Result<Property>;

    /// Name used in logs
    fn backend_name(&self) -> &'static str;
}
