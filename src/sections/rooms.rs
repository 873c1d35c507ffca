use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{BedConfig, PriceTier, Property, Room};
use crate::sections::SectionForm;
use crate::wizard::progress::WizardStep;
use crate::wizard::validator::{validate_room, validate_rooms};

/// Step 4 form: the saved room list plus one room being edited
#[derive(Debug, Clone, Default)]
pub struct RoomListForm {
    saved: Vec<Room>,
    draft: Room,
    editing: Option<String>,
}

impl RoomListForm {
    /// Rooms as last confirmed by the backend
    pub fn saved(&self) -> &[Room] {
        &self.saved
    }

    pub fn draft(&self) -> &Room {
        &self.draft
    }

    /// Id of the saved room being edited, `None` while composing a new one
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Start composing a new room
    pub fn start_new(&mut self) {
        self.draft = Room {
            room_count: 1,
            max_adults: 1,
            ..Default::default()
        };
        self.editing = None;
    }

    /// Copy a saved room into the draft for editing
    pub fn start_edit(&mut self, room_id: &str) -> Result<()> {
        let room = self
            .saved
            .iter()
            .find(|r| r.id.as_deref() == Some(room_id))
            .ok_or_else(|| OnboardError::InvalidState(format!("Room {room_id} is not on this property")))?;
        self.draft = room.clone();
        self.editing = Some(room_id.to_string());
        Ok(())
    }

    pub fn set_room_type(&mut self, room_type: &str) {
        self.draft.room_type = room_type.trim().to_string();
    }

    pub fn set_room_count(&mut self, count: u32) {
        self.draft.room_count = count;
    }

    pub fn set_occupancy(&mut self, max_adults: u32, max_children: u32) {
        self.draft.max_adults = max_adults;
        self.draft.max_children = max_children;
    }

    /// Add beds; adding a bed type already present raises its count
    pub fn add_beds(&mut self, bed_type: &str, count: u32) {
        let bed_type = bed_type.trim();
        match self.draft.beds.iter_mut().find(|b| b.bed_type == bed_type) {
            Some(existing) => existing.count = existing.count.saturating_add(count),
            None => self.draft.beds.push(BedConfig {
                bed_type: bed_type.to_string(),
                count,
            }),
        }
    }

    pub fn remove_bed(&mut self, index: usize) -> Option<BedConfig> {
        (index < self.draft.beds.len()).then(|| self.draft.beds.remove(index))
    }

    /// Set a price tier, replacing one with the same label
    pub fn set_price(&mut self, label: &str, price: f64) {
        let label = label.trim();
        match self.draft.pricing.iter_mut().find(|t| t.label == label) {
            Some(tier) => tier.price = price,
            None => self.draft.pricing.push(PriceTier {
                label: label.to_string(),
                price,
            }),
        }
    }

    pub fn remove_price(&mut self, label: &str) {
        self.draft.pricing.retain(|t| t.label != label);
    }

    /// Errors for the room being edited
    pub fn validate_draft(&self) -> ValidationErrors {
        validate_room(&self.draft)
    }

    /// The draft as sent to `addRooms` / `updateRoom`
    pub fn draft_payload(&self) -> Room {
        let mut room = self.draft.clone();
        room.id = self.editing.clone();
        room
    }

    /// Reload the list after a confirmed save and reset the draft
    pub fn apply_saved(&mut self, property: &Property) {
        self.saved = property.rooms.clone();
        self.start_new();
    }
}

impl SectionForm for RoomListForm {
    type Payload = Vec<Room>;

    fn step(&self) -> WizardStep {
        WizardStep::Rooms
    }

    fn load(property: &Property) -> Self {
        let mut form = Self::default();
        form.apply_saved(property);
        form
    }

    fn payload(&self) -> Vec<Room> {
        self.saved.clone()
    }

    /// The step itself only needs one saved room
    fn validate(&self) -> ValidationErrors {
        validate_rooms(&self.saved)
    }

    fn is_dirty(&self, property: &Property) -> bool {
        match &self.editing {
            Some(id) => property
                .rooms
                .iter()
                .find(|r| r.id.as_deref() == Some(id.as_str()))
                .map_or(true, |r| *r != self.draft),
            None => self.draft != RoomListForm::default_draft(),
        }
    }
}

impl RoomListForm {
    fn default_draft() -> Room {
        let mut form = Self::default();
        form.start_new();
        form.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_with_room() -> Property {
        let mut property = Property::draft("p1");
        property.rooms.push(Room {
            id: Some("r1".into()),
            room_type: "Dormitory".into(),
            room_count: 2,
            beds: vec![BedConfig { bed_type: "bunk".into(), count: 6 }],
            max_adults: 12,
            max_children: 0,
            pricing: vec![PriceTier { label: "Base".into(), price: 250.0 }],
        });
        property
    }

    #[test]
    fn new_room_draft_validates_once_filled() {
        let mut form = RoomListForm::load(&Property::draft("p1"));
        assert!(form.validate().contains("rooms"));
        assert!(!form.validate_draft().is_empty());

        form.set_room_type("Family Suite");
        form.add_beds("double", 1);
        form.add_beds("single", 1);
        form.add_beds("double", 1);
        form.set_occupancy(4, 2);
        form.set_price("Base", 2200.0);
        form.set_price("Base", 2000.0);
        assert!(form.validate_draft().is_empty());

        let room = form.draft_payload();
        assert_eq!(room.id, None);
        assert_eq!(room.beds.len(), 2);
        assert_eq!(room.bed_count(), 3);
        assert_eq!(room.pricing, vec![PriceTier { label: "Base".into(), price: 2000.0 }]);
    }

    #[test]
    fn editing_keeps_room_id() {
        let property = property_with_room();
        let mut form = RoomListForm::load(&property);
        assert!(form.validate().is_empty());
        form.start_edit("r1").unwrap();
        assert!(!form.is_dirty(&property));
        form.set_price("Festival", 400.0);
        assert!(form.is_dirty(&property));
        assert_eq!(form.draft_payload().id.as_deref(), Some("r1"));
    }

    #[test]
    fn editing_unknown_room_fails() {
        let mut form = RoomListForm::load(&property_with_room());
        assert!(form.start_edit("r404").is_err());
    }

    #[test]
    fn remove_bed_out_of_range_is_none() {
        let mut form = RoomListForm::default();
        assert_eq!(form.remove_bed(0), None);
        form.add_beds("single", 2);
        assert_eq!(form.remove_bed(0).map(|b| b.count), Some(2));
    }

    #[test]
    fn repeated_beds_saturate_instead_of_overflowing() {
        let mut form = RoomListForm::default();
        form.add_beds("bunk", u32::MAX - 1);
        form.add_beds("bunk", 5);
        assert_eq!(form.draft().beds.len(), 1);
        assert_eq!(form.draft().beds[0].count, u32::MAX);
    }
}
