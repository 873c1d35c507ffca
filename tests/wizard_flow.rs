mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use common::{
    answered_amenities, basic_info_form, finance_form, location_form, media_form, policies_form,
    room_form, Harness, OWNER,
};
use dharamshala_onboard::api::InMemoryPropertyApi;
use dharamshala_onboard::models::{
    AmenityCatalog, AmenityCategory, Amenities, AmenityEntry, Property, PropertyStatus,
};
use dharamshala_onboard::sections::{AmenitiesEditor, BasicInfoForm, LocationForm, SectionForm};
use dharamshala_onboard::session::request_new_draft;
use dharamshala_onboard::wizard::{
    Control, Resolution, SaveOutcome, StepError, WizardStep, WizardView,
};
use dharamshala_onboard::OnboardError;

fn owned_draft(id: &str) -> Property {
    let mut property = Property::draft(id);
    property.owner_id = Some(OWNER.to_string());
    property
}

#[tokio::test]
async fn mount_without_drafts_initializes_once() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();

    let first = wizard.mount(None).await.unwrap();
    assert_matches!(first, Resolution::Created { redirect_to: None, .. });
    for _ in 0..3 {
        wizard.mount(None).await.unwrap();
    }

    assert_eq!(harness.api.calls("initialize").await, 1);
    assert_eq!(harness.api.calls("draft_properties").await, 1);
    assert_eq!(wizard.view(), WizardView::Editing(WizardStep::BasicInfo));
}

#[tokio::test]
async fn new_sentinel_creates_draft_and_redirects() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();

    let resolution = wizard.mount(Some("new")).await.unwrap();
    let Resolution::Created { property, redirect_to } = resolution else {
        panic!("expected a created draft");
    };
    assert_eq!(
        redirect_to.as_deref(),
        Some(format!("/dashboard/properties/onboard/{}", property.id).as_str())
    );
    assert_eq!(harness.api.calls("draft_properties").await, 0);
}

#[tokio::test]
async fn existing_drafts_are_offered_before_creating() {
    let harness = Harness::new();
    let mut draft = owned_draft("d-1");
    draft.basic_info.place_name = "Parmarth Niketan".into();
    draft.form_progress.step1_completed = true;
    harness.api.seed(draft).await;

    let mut wizard = harness.wizard();
    let resolution = wizard.mount(None).await.unwrap();
    let Resolution::ChooseDraft(drafts) = resolution else {
        panic!("expected the draft picker");
    };
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].display_name(), "Parmarth Niketan");
    assert_eq!(harness.api.calls("initialize").await, 0);
    assert!(harness.store.current().await.is_none());

    wizard.resume_draft("d-1").await.unwrap();
    assert_eq!(harness.store.current_id().await.as_deref(), Some("d-1"));
    assert_eq!(wizard.active_step(), Some(WizardStep::Location));
}

#[tokio::test]
async fn picker_can_start_over() {
    let harness = Harness::new();
    harness.api.seed(owned_draft("d-1")).await;

    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();
    let resolution = wizard.start_new_draft().await.unwrap();

    assert_matches!(resolution, Resolution::Created { .. });
    assert_eq!(harness.api.calls("initialize").await, 1);
    assert!(wizard.start_new_draft().await.is_err());
}

#[tokio::test]
async fn create_new_flag_skips_picker_once() {
    let harness = Harness::new();
    harness.api.seed(owned_draft("d-1")).await;
    request_new_draft(harness.session.as_ref()).unwrap();

    let mut wizard = harness.wizard();
    let resolution = wizard.mount(None).await.unwrap();
    assert_matches!(resolution, Resolution::Created { .. });
    assert_eq!(harness.api.calls("draft_properties").await, 0);

    let mut next_visit = harness.wizard();
    let resolution = next_visit.mount(None).await.unwrap();
    assert_matches!(resolution, Resolution::ChooseDraft(_));
}

#[tokio::test]
async fn remount_keeps_saved_record_and_tab() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();

    wizard.save_basic_info(&basic_info_form()).await.unwrap();
    let saved = harness.store.current().await.unwrap();
    assert!(saved.form_progress.step1_completed);
    assert_eq!(wizard.active_step(), Some(WizardStep::Location));

    for _ in 0..2 {
        wizard.mount(None).await.unwrap();
        assert_eq!(harness.store.current().await, Some(saved.clone()));
        assert_eq!(wizard.active_step(), Some(WizardStep::Location));
    }
    assert_eq!(harness.api.calls("initialize").await, 1);
}

#[tokio::test]
async fn opens_on_first_incomplete_step() {
    let harness = Harness::new();
    let mut property = owned_draft("p-1");
    property.form_progress.step1_completed = true;
    harness.api.seed(property).await;

    let mut wizard = harness.wizard();
    wizard.mount(Some("p-1")).await.unwrap();

    assert_eq!(wizard.active_step(), Some(WizardStep::Location));
    assert!(wizard.is_step_enabled(WizardStep::BasicInfo).await);
    assert!(wizard.is_step_enabled(WizardStep::Location).await);
    assert!(!wizard.is_step_enabled(WizardStep::Amenities).await);
    assert!(wizard.select_step(WizardStep::Rooms).await.is_err());
    assert_eq!(wizard.active_step(), Some(WizardStep::Location));
}

#[tokio::test]
async fn missing_property_shows_not_found() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();

    let err = wizard.mount(Some("nope")).await.unwrap_err();
    assert_matches!(err, OnboardError::NotFound(_));
    assert_eq!(wizard.view(), WizardView::NotFound);

    assert!(wizard.mount(Some("nope")).await.is_err());
    assert_eq!(wizard.view(), WizardView::NotFound);
    assert_eq!(harness.api.calls("fetch_property").await, 1);
}

#[tokio::test]
async fn empty_place_name_blocks_save() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();

    let mut form = basic_info_form();
    form.place_name.clear();
    let err = wizard.save_basic_info(&form).await.unwrap_err();

    assert_matches!(err, OnboardError::Validation(ref fields) if fields.contains("placeName"));
    assert_matches!(
        wizard.error(Control::SaveStep(WizardStep::BasicInfo)),
        Some(StepError::Fields(fields)) if fields.contains("placeName")
    );
    assert_eq!(harness.api.calls("update_basic_info").await, 0);
    assert_eq!(wizard.active_step(), Some(WizardStep::BasicInfo));
}

#[tokio::test]
async fn unanswered_mandatory_amenity_blocks_submit() {
    let harness = Harness::new();
    let mut property = owned_draft("p-1");
    for step in WizardStep::ALL {
        match step {
            WizardStep::BasicInfo => property.form_progress.step1_completed = true,
            WizardStep::Location => property.form_progress.step2_completed = true,
            WizardStep::Amenities => property.form_progress.step3_completed = true,
            WizardStep::Rooms => property.form_progress.step4_completed = true,
            WizardStep::Media => property.form_progress.step5_completed = true,
            WizardStep::Policies => property.form_progress.step6_completed = true,
            WizardStep::Finance => property.form_progress.step7_completed = true,
        }
    }
    let mut room = room_form().draft_payload();
    room.id = Some("room-1".into());
    property.rooms = vec![room];
    let mut answered = answered_amenities().value().clone();
    answered.entry_mut(AmenityCategory::Mandatory, "wifi").available = None;
    property.amenities = answered;
    harness.api.seed(property).await;

    let mut wizard = harness.wizard();
    wizard.mount(Some("p-1")).await.unwrap();
    let err = wizard.submit_for_review().await.unwrap_err();

    assert_matches!(err, OnboardError::Validation(ref fields) if fields.contains("mandatory.wifi"));
    assert_eq!(harness.api.calls("submit_for_review").await, 0);
}

#[test]
fn answering_no_clears_chosen_options() {
    let mut value = Amenities::default();
    *value.entry_mut(AmenityCategory::Mandatory, "parking") = AmenityEntry {
        available: Some(true),
        option: vec!["Paid".into()],
        sub_options: vec!["Valet".into()],
    };
    let mut editor = AmenitiesEditor::new(AmenityCatalog::standard(), value);

    let updated = editor
        .set_available(AmenityCategory::Mandatory, "parking", false)
        .unwrap();
    let entry = updated.get(AmenityCategory::Mandatory, "parking").unwrap();
    assert_eq!(entry.available, Some(false));
    assert!(entry.option.is_empty());
    assert!(entry.sub_options.is_empty());
}

#[tokio::test]
async fn save_replaces_record_with_server_response() {
    let harness = Harness::new();
    let mut property = owned_draft("p-1");
    property.form_progress.step1_completed = true;
    harness.api.seed(property).await;

    let mut wizard = harness.wizard();
    wizard.mount(Some("p-1")).await.unwrap();

    // Another session renamed the place after this wizard loaded it.
    let mut remote = harness.api.get("p-1").await.unwrap();
    remote.basic_info.place_name = "Renamed elsewhere".into();
    harness.api.seed(remote).await;

    let mut form = LocationForm::load(&harness.store.current().await.unwrap());
    let filled = location_form();
    form.country = filled.country;
    form.street = filled.street;
    form.city = filled.city;
    form.state = filled.state;
    form.postal_code = filled.postal_code;
    let outcome = wizard.save_location(&form).await.unwrap();

    assert_eq!(outcome, SaveOutcome::Advanced(WizardStep::Amenities));
    let local = harness.store.current().await.unwrap();
    assert_eq!(Some(local.clone()), harness.api.get("p-1").await);
    assert_eq!(local.basic_info.place_name, "Renamed elsewhere");
    assert!(local.form_progress.step2_completed);
}

#[test]
fn booking_since_options_start_at_built_year() {
    let mut form = BasicInfoForm::for_year(2024);
    form.set_built_year("1990").unwrap();

    let options = form.booking_since_options();
    assert_eq!(options.first().map(String::as_str), Some("2024"));
    assert_eq!(options.last().map(String::as_str), Some("1990"));
    assert!(!options.iter().any(|y| y == "1985"));

    let err = form.set_booking_since_year("1985").unwrap_err();
    assert_matches!(err, OnboardError::Validation(ref fields) if fields.contains("bookingSinceYear"));
    assert_eq!(form.booking_since_year(), "");
}

#[tokio::test]
async fn server_rejection_keeps_tab_and_shows_message() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();

    harness.api.fail_next(422, "Place name already registered").await;
    let err = wizard.save_basic_info(&basic_info_form()).await.unwrap_err();

    assert_matches!(err, OnboardError::Api { status: 422, .. });
    assert_eq!(wizard.active_step(), Some(WizardStep::BasicInfo));
    assert_eq!(
        wizard.error(Control::SaveStep(WizardStep::BasicInfo)),
        Some(&StepError::Message("Place name already registered".to_string()))
    );
    assert!(!harness.store.current().await.unwrap().form_progress.step1_completed);

    wizard.save_basic_info(&basic_info_form()).await.unwrap();
    assert!(wizard.error(Control::SaveStep(WizardStep::BasicInfo)).is_none());
}

#[tokio::test]
async fn response_after_unmount_is_dropped() {
    let harness = Harness::with_api(
        InMemoryPropertyApi::new(OWNER).with_latency(Duration::from_millis(50)),
    );
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();
    let handle = wizard.unmount_handle();

    let save = tokio::spawn(async move {
        let result = wizard.save_basic_info(&basic_info_form()).await;
        (wizard, result)
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.unmount().await;

    let (_wizard, result) = save.await.unwrap();
    assert_matches!(result, Err(OnboardError::Cancelled));
    assert!(harness.store.current().await.is_none());
}

#[tokio::test]
async fn email_otp_marks_contact_verified() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();
    let mut form = basic_info_form();

    wizard.send_email_otp(&mut form).await.unwrap();
    let err = wizard.verify_email_otp(&mut form, "000000").await.unwrap_err();
    assert_matches!(err, OnboardError::Api { status: 400, .. });
    assert!(!form.is_email_verified());

    let property = wizard.verify_email_otp(&mut form, "123456").await.unwrap();
    assert!(property.basic_info.email_verified);
    assert!(form.is_email_verified());
    assert_eq!(property.basic_info.public_email(), Some("desk@gitabhawan.org"));
}

#[tokio::test]
async fn full_onboarding_ends_pending_review() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(Some("new")).await.unwrap();

    assert_eq!(
        wizard.save_basic_info(&basic_info_form()).await.unwrap(),
        SaveOutcome::Advanced(WizardStep::Location)
    );
    wizard.save_location(&location_form()).await.unwrap();
    assert_eq!(
        wizard.save_amenities(&answered_amenities()).await.unwrap(),
        SaveOutcome::Advanced(WizardStep::Rooms)
    );

    assert_matches!(wizard.finish_rooms().await, Err(OnboardError::Validation(_)));
    let mut rooms = room_form();
    let property = wizard.save_room(&mut rooms).await.unwrap();
    assert_eq!(property.rooms.len(), 1);
    assert_eq!(rooms.saved().len(), 1);
    assert_eq!(wizard.active_step(), Some(WizardStep::Rooms));
    assert_eq!(
        wizard.finish_rooms().await.unwrap(),
        SaveOutcome::Advanced(WizardStep::Media)
    );

    wizard.save_media(&media_form()).await.unwrap();
    wizard.save_policies(&policies_form()).await.unwrap();
    let outcome = wizard.save_finance(&finance_form()).await.unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::Finished {
            redirect_to: "/dashboard/properties".to_string()
        }
    );

    let submitted = wizard.submit_for_review().await.unwrap();
    assert_eq!(submitted.status, PropertyStatus::Pending);
    assert_eq!(harness.store.current().await.unwrap().status, PropertyStatus::Pending);
    let cover = submitted.media.photos.iter().find(|p| p.is_cover).unwrap();
    assert_eq!(cover.url, "https://img.example.org/front.jpg");
}

#[tokio::test]
async fn editing_a_saved_room_updates_in_place() {
    let harness = Harness::new();
    let mut wizard = harness.wizard();
    wizard.mount(None).await.unwrap();

    let mut rooms = room_form();
    let property = wizard.save_room(&mut rooms).await.unwrap();
    let room_id = property.rooms[0].id.clone().unwrap();

    rooms.start_edit(&room_id).unwrap();
    rooms.set_price("weekday", 1100.0);
    let property = wizard.save_room(&mut rooms).await.unwrap();

    assert_eq!(property.rooms.len(), 1);
    assert_eq!(property.rooms[0].pricing[0].price, 1100.0);
    assert_eq!(harness.api.calls("update_room").await, 1);
}
