//! Status changes and deletion outside the wizard.
//!
//! Owners withdraw their own unpublished listings; admins move listings
//! through review and may remove anything.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::PropertyApi;
use crate::error::{OnboardError, Result};
use crate::models::{Property, PropertyStatus};

/// Who is acting on the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Owner,
    Admin,
}

impl Actor {
    pub fn can_delete(self, status: PropertyStatus) -> bool {
        match self {
            Actor::Admin => true,
            Actor::Owner => status != PropertyStatus::Published,
        }
    }
}

pub struct ReviewDesk<A: PropertyApi + ?Sized> {
    api: Arc<A>,
    actor: Actor,
}

impl<A: PropertyApi + ?Sized> ReviewDesk<A> {
    pub fn new(api: Arc<A>, actor: Actor) -> Self {
        Self { api, actor }
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// Move a listing to `status`. Changes an admin may not make never reach the backend.
    pub async fn set_status(&self, id: &str, status: PropertyStatus) -> Result<Property> {
        if self.actor != Actor::Admin {
            return Err(OnboardError::InvalidState(
                "Only an admin can change a listing's status".to_string(),
            ));
        }
        let property = self.api.fetch_property(id).await?;
        if !property.status.admin_can_set(status) {
            warn!(property_id = id, from = %property.status, to = %status, "Refusing status change");
            return Err(OnboardError::InvalidState(format!(
                "A {} listing cannot become {}",
                property.status, status
            )));
        }
        let updated = self.api.update_status(id, status).await?;
        info!(property_id = id, status = %updated.status, "Status updated");
        Ok(updated)
    }

    pub async fn approve(&self, id: &str) -> Result<Property> {
        self.set_status(id, PropertyStatus::Published).await
    }

    pub async fn reject(&self, id: &str) -> Result<Property> {
        self.set_status(id, PropertyStatus::Rejected).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let property = self.api.fetch_property(id).await?;
        if !self.actor.can_delete(property.status) {
            return Err(OnboardError::InvalidState(
                "Published listings can only be removed by an admin".to_string(),
            ));
        }
        self.api.delete_property(id).await?;
        info!(property_id = id, actor = ?self.actor, "Property deleted");
        Ok(())
    }
}
