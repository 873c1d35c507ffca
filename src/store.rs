//! Client-side cache of the property being onboarded.
//!
//! The store holds the last record the backend confirmed. Section forms
//! never write here; only a successful remote call may replace the record,
//! and only while the wizard that issued the call is still mounted.

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::models::Property;

#[derive(Debug, Default)]
pub struct PropertyStore {
    current: RwLock<Option<Property>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the authoritative record
    pub async fn current(&self) -> Option<Property> {
        self.current.read().await.clone()
    }

    pub async fn current_id(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|p| p.id.clone())
    }

    /// Replace the record with a server response.
    ///
    /// Returns `false` and leaves the store untouched when `token` has been
    /// cancelled, i.e. the response arrived after the wizard unmounted.
    pub async fn commit(&self, token: &CancellationToken, property: Property) -> bool {
        let mut guard = self.current.write().await;
        if token.is_cancelled() {
            debug!(property_id = %property.id, "Dropping stale response after unmount");
            return false;
        }
        *guard = Some(property);
        true
    }

    pub async fn clear(&self) {
        *self.current.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Property;

    #[tokio::test]
    async fn commit_replaces_whole_record() {
        let store = PropertyStore::new();
        let token = CancellationToken::new();

        let mut first = Property::draft("p1");
        first.basic_info.place_name = "Gita Bhawan".into();
        assert!(store.commit(&token, first).await);

        let second = Property::draft("p1");
        assert!(store.commit(&token, second.clone()).await);
        assert_eq!(store.current().await, Some(second));
    }

    #[tokio::test]
    async fn cancelled_token_drops_commit() {
        let store = PropertyStore::new();
        let token = CancellationToken::new();
        token.cancel();
        assert!(!store.commit(&token, Property::draft("p1")).await);
        assert_eq!(store.current().await, None);
    }
}
