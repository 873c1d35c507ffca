#![allow(dead_code)]

use std::sync::Arc;

use dharamshala_onboard::api::InMemoryPropertyApi;
use dharamshala_onboard::models::{AmenityCatalog, AmenityCategory, Amenities, PropertyType};
use dharamshala_onboard::sections::{
    AmenitiesEditor, BasicInfoForm, FinanceForm, LocationForm, MediaForm, PoliciesForm,
    RoomListForm,
};
use dharamshala_onboard::session::{KeyValueStorage, SessionStorage};
use dharamshala_onboard::store::PropertyStore;
use dharamshala_onboard::wizard::OnboardingWizard;

pub const OWNER: &str = "owner-1";

pub struct Harness {
    pub api: Arc<InMemoryPropertyApi>,
    pub store: Arc<PropertyStore>,
    pub session: Arc<SessionStorage>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_api(InMemoryPropertyApi::new(OWNER))
    }

    pub fn with_api(api: InMemoryPropertyApi) -> Self {
        Self {
            api: Arc::new(api),
            store: Arc::new(PropertyStore::new()),
            session: Arc::new(SessionStorage::new()),
        }
    }

    /// A fresh wizard mount sharing this harness' backend and storage
    pub fn wizard(&self) -> OnboardingWizard<InMemoryPropertyApi> {
        let session: Arc<dyn KeyValueStorage> = self.session.clone();
        OnboardingWizard::new(Arc::clone(&self.api), Arc::clone(&self.store), session)
    }
}

pub fn basic_info_form() -> BasicInfoForm {
    let mut form = BasicInfoForm::default();
    form.property_type = Some(PropertyType::Dharamshala);
    form.place_name = "Gita Bhawan".into();
    form.set_built_year("1990").unwrap();
    form.set_booking_since_year("2005").unwrap();
    form.set_rental_form("private_rooms").unwrap();
    form.set_email("desk@gitabhawan.org");
    form.phone = "9876543210".into();
    form
}

pub fn location_form() -> LocationForm {
    let mut form = LocationForm::default();
    form.country = "India".into();
    form.street = "Swarg Ashram Road".into();
    form.city = "Rishikesh".into();
    form.state = "Uttarakhand".into();
    form.postal_code = "249304".into();
    form.set_pin(30.1236, 78.3214);
    form
}

/// Editor with every mandatory question answered
pub fn answered_amenities() -> AmenitiesEditor {
    let catalog = AmenityCatalog::standard();
    let keys: Vec<String> = catalog
        .definitions(AmenityCategory::Mandatory)
        .iter()
        .map(|d| d.key.clone())
        .collect();
    let mut editor = AmenitiesEditor::new(catalog, Amenities::default()).strict();
    for key in keys {
        editor.set_available(AmenityCategory::Mandatory, &key, true).unwrap();
    }
    editor
}

pub fn room_form() -> RoomListForm {
    let mut form = RoomListForm::default();
    form.start_new();
    form.set_room_type("Family room");
    form.set_room_count(4);
    form.set_occupancy(3, 2);
    form.add_beds("double", 1);
    form.add_beds("single", 1);
    form.set_price("weekday", 900.0);
    form
}

pub fn media_form() -> MediaForm {
    let mut form = MediaForm::default();
    form.add_photo("https://img.example.org/front.jpg", Some("Entrance")).unwrap();
    form.add_photo("https://img.example.org/hall.jpg", None).unwrap();
    form
}

pub fn policies_form() -> PoliciesForm {
    let mut form = PoliciesForm::default();
    form.check_in_time = "12:00".into();
    form.check_out_time = "10:00".into();
    form.cancellation_policy = "Free cancellation up to 24 hours before arrival".into();
    form.add_rule("No alcohol on the premises");
    form
}

pub fn finance_form() -> FinanceForm {
    FinanceForm {
        account_holder_name: "Gita Bhawan Trust".into(),
        account_number: "123456789012".into(),
        ifsc_code: "SBIN0001234".into(),
        pan_number: "AAATG1234K".into(),
        gst_number: String::new(),
    }
}
