//! Onboarding wizard controller.
//!
//! Owns one mount of the wizard: draft resolution, the active tab, and the
//! per-step save calls. Section forms hold unsaved edits; this controller
//! validates them, sends them, and replaces the shared record with whatever
//! the backend returns.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::api::PropertyApi;
use crate::error::{OnboardError, Result, ValidationErrors};
use crate::models::{AmenityCatalog, DraftSummary, Property};
use crate::sections::{
    AmenitiesEditor, BasicInfoForm, FinanceForm, LocationForm, MediaForm, PoliciesForm,
    RoomListForm, SectionForm,
};
use crate::session::KeyValueStorage;
use crate::store::PropertyStore;
use crate::wizard::progress::{StepNavigator, WizardStep};
use crate::wizard::resolver::{DraftResolver, Resolution, ResolverState};
use crate::wizard::validator::{validate_final_submit, validate_rooms};

/// Where the wizard sends the owner once every step is done
pub const PROPERTY_LIST_ROUTE: &str = "/dashboard/properties";

/// A control that can be busy while its request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    SaveStep(WizardStep),
    SaveRoom,
    SendOtp,
    VerifyOtp,
    Submit,
}

/// Error rendered next to a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    Fields(ValidationErrors),
    Message(String),
}

/// What the wizard should render
#[derive(Debug, Clone, PartialEq)]
pub enum WizardView {
    Loading,
    ChoosingDraft(Vec<DraftSummary>),
    Editing(WizardStep),
    NotFound,
    Failed(String),
}

/// Result of "Save & Continue"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Now showing this step
    Advanced(WizardStep),
    /// Every step is complete; leave the wizard
    Finished { redirect_to: String },
}

/// Tears down a mount from outside the controller
#[derive(Debug, Clone)]
pub struct UnmountHandle {
    cancel: CancellationToken,
    store: Arc<PropertyStore>,
}

impl UnmountHandle {
    /// Responses still in flight are dropped and the shared draft is cleared
    pub async fn unmount(&self) {
        self.cancel.cancel();
        self.store.clear().await;
    }
}

pub struct OnboardingWizard<A: PropertyApi + ?Sized> {
    api: Arc<A>,
    store: Arc<PropertyStore>,
    session: Arc<dyn KeyValueStorage>,
    catalog: AmenityCatalog,
    resolver: DraftResolver,
    navigator: Option<StepNavigator>,
    busy: Option<Control>,
    errors: BTreeMap<Control, StepError>,
    not_found: bool,
    cancel: CancellationToken,
}

impl<A: PropertyApi + ?Sized> OnboardingWizard<A> {
    pub fn new(api: Arc<A>, store: Arc<PropertyStore>, session: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            api,
            store,
            session,
            catalog: AmenityCatalog::standard(),
            resolver: DraftResolver::new(),
            navigator: None,
            busy: None,
            errors: BTreeMap::new(),
            not_found: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Use a different amenity catalog for the mandatory-amenity rule
    pub fn with_catalog(mut self, catalog: AmenityCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &AmenityCatalog {
        &self.catalog
    }

    pub fn unmount_handle(&self) -> UnmountHandle {
        UnmountHandle {
            cancel: self.cancel.clone(),
            store: Arc::clone(&self.store),
        }
    }

    pub async fn unmount(&self) {
        info!("Onboarding wizard unmounted");
        self.unmount_handle().unmount().await;
    }

    /// Resolve the draft for this mount.
    ///
    /// Repeated calls replay the first outcome without touching the backend,
    /// the store or the active tab.
    pub async fn mount(&mut self, route_id: Option<&str>) -> Result<Resolution> {
        let replay = !matches!(self.resolver.state(), ResolverState::Unresolved);
        let outcome = self
            .resolver
            .resolve(route_id, self.api.as_ref(), self.session.as_ref())
            .await;
        if replay {
            return outcome;
        }
        self.apply_resolution(outcome).await
    }

    /// Open a draft from the picker
    pub async fn resume_draft(&mut self, id: &str) -> Result<Resolution> {
        let outcome = self.resolver.resume_draft(id, self.api.as_ref()).await;
        self.apply_resolution(outcome).await
    }

    /// Skip the picker and create a fresh draft
    pub async fn start_new_draft(&mut self) -> Result<Resolution> {
        let outcome = self.resolver.start_new(self.api.as_ref()).await;
        self.apply_resolution(outcome).await
    }

    async fn apply_resolution(&mut self, outcome: Result<Resolution>) -> Result<Resolution> {
        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(e) => {
                self.not_found = matches!(e, OnboardError::NotFound(_));
                return Err(e);
            }
        };
        if let Some(property) = resolution.property() {
            self.navigator = Some(StepNavigator::new(&property.form_progress));
            if !self.store.commit(&self.cancel, property.clone()).await {
                return Err(OnboardError::Cancelled);
            }
            info!(
                property_id = %property.id,
                step = %self.active_step().unwrap_or(WizardStep::FIRST),
                "Wizard ready"
            );
        }
        Ok(resolution)
    }

    pub async fn current_property(&self) -> Option<Property> {
        self.store.current().await
    }

    pub fn view(&self) -> WizardView {
        match self.resolver.state() {
            ResolverState::Unresolved | ResolverState::Resolving => WizardView::Loading,
            ResolverState::Failed(message) => {
                if self.not_found {
                    WizardView::NotFound
                } else {
                    WizardView::Failed(message.clone())
                }
            }
            ResolverState::Resolved(Resolution::ChooseDraft(drafts)) => {
                WizardView::ChoosingDraft(drafts.clone())
            }
            ResolverState::Resolved(_) => match self.active_step() {
                Some(step) => WizardView::Editing(step),
                None => WizardView::Loading,
            },
        }
    }

    pub fn active_step(&self) -> Option<WizardStep> {
        self.navigator.map(|n| n.active())
    }

    /// Control whose request is currently in flight
    pub fn busy(&self) -> Option<Control> {
        self.busy
    }

    pub fn error(&self, control: Control) -> Option<&StepError> {
        self.errors.get(&control)
    }

    pub async fn is_step_enabled(&self, step: WizardStep) -> bool {
        match (self.navigator, self.store.current().await) {
            (Some(nav), Some(property)) => nav.is_enabled(step, &property.form_progress),
            _ => false,
        }
    }

    /// Click a tab
    pub async fn select_step(&mut self, step: WizardStep) -> Result<()> {
        let property = self.require_property().await?;
        let navigator = self
            .navigator
            .as_mut()
            .ok_or_else(|| OnboardError::InvalidState("Wizard is not mounted".to_string()))?;
        navigator.select(step, &property.form_progress)
    }

    pub async fn save_basic_info(&mut self, form: &BasicInfoForm) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::BasicInfo), form.validate())?;
        let payload = form.payload();
        self.sync(Control::SaveStep(WizardStep::BasicInfo), |api, id| async move {
            api.update_basic_info(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::BasicInfo).await
    }

    pub async fn save_location(&mut self, form: &LocationForm) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::Location), form.validate())?;
        let payload = form.payload();
        self.sync(Control::SaveStep(WizardStep::Location), |api, id| async move {
            api.update_location(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::Location).await
    }

    pub async fn save_amenities(&mut self, editor: &AmenitiesEditor) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::Amenities), editor.validate())?;
        let payload = editor.payload();
        self.sync(Control::SaveStep(WizardStep::Amenities), |api, id| async move {
            api.update_amenities(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::Amenities).await
    }

    /// Save the room being edited: `addRooms` for a new room, `updateRoom`
    /// for an existing one. Stays on the Rooms tab.
    pub async fn save_room(&mut self, form: &mut RoomListForm) -> Result<Property> {
        self.check_fields(Control::SaveRoom, form.validate_draft())?;
        let room = form.draft_payload();
        let property = match form.editing().map(str::to_string) {
            Some(room_id) => {
                self.sync(Control::SaveRoom, |api, id| async move {
                    api.update_room(&id, &room_id, &room).await
                })
                .await?
            }
            None => {
                self.sync(Control::SaveRoom, |api, id| async move {
                    api.add_rooms(&id, std::slice::from_ref(&room)).await
                })
                .await?
            }
        };
        form.apply_saved(&property);
        Ok(property)
    }

    /// "Save & Continue" on Rooms: rooms are already stored one by one
    pub async fn finish_rooms(&mut self) -> Result<SaveOutcome> {
        let property = self.require_property().await?;
        self.check_fields(
            Control::SaveStep(WizardStep::Rooms),
            validate_rooms(&property.rooms),
        )?;
        if !property.form_progress.is_complete(WizardStep::Rooms) {
            return Err(self.fail(
                Control::SaveStep(WizardStep::Rooms),
                OnboardError::InvalidState("Rooms have not been confirmed by the server yet".to_string()),
            ));
        }
        self.advance(WizardStep::Rooms).await
    }

    pub async fn save_media(&mut self, form: &MediaForm) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::Media), form.validate())?;
        let payload = form.payload();
        self.sync(Control::SaveStep(WizardStep::Media), |api, id| async move {
            api.update_media(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::Media).await
    }

    pub async fn save_policies(&mut self, form: &PoliciesForm) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::Policies), form.validate())?;
        let payload = form.payload();
        self.sync(Control::SaveStep(WizardStep::Policies), |api, id| async move {
            api.update_policies(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::Policies).await
    }

    pub async fn save_finance(&mut self, form: &FinanceForm) -> Result<SaveOutcome> {
        self.check_fields(Control::SaveStep(WizardStep::Finance), form.validate())?;
        let payload = form.payload();
        self.sync(Control::SaveStep(WizardStep::Finance), |api, id| async move {
            api.update_finance(&id, &payload).await
        })
        .await?;
        self.advance(WizardStep::Finance).await
    }

    /// Ask the backend to mail an OTP to the form's email
    pub async fn send_email_otp(&mut self, form: &mut BasicInfoForm) -> Result<()> {
        let email = form.email().to_string();
        let mut errors = ValidationErrors::new();
        errors.require("email", &email, "Enter an email to verify");
        self.check_fields(Control::SendOtp, errors)?;

        let id = self.require_property().await?.id;
        self.busy = Some(Control::SendOtp);
        self.errors.remove(&Control::SendOtp);
        let result = self.api.send_email_otp(&id, &email).await;
        self.busy = None;
        match result {
            Ok(()) => {
                info!(property_id = %id, "Email OTP sent");
                form.mark_otp_sent();
                Ok(())
            }
            Err(e) => Err(self.fail(Control::SendOtp, e)),
        }
    }

    /// Confirm the OTP; the returned record carries `emailVerified`
    pub async fn verify_email_otp(&mut self, form: &mut BasicInfoForm, otp: &str) -> Result<Property> {
        let mut errors = ValidationErrors::new();
        errors.require("otp", otp, "Enter the code from your email");
        self.check_fields(Control::VerifyOtp, errors)?;

        let email = form.email().to_string();
        let otp = otp.trim().to_string();
        let property = self
            .sync(Control::VerifyOtp, |api, id| async move {
                api.verify_email_otp(&id, &email, &otp).await
            })
            .await?;
        form.sync_verification(&property);
        Ok(property)
    }

    /// Hand the draft over for admin review
    pub async fn submit_for_review(&mut self) -> Result<Property> {
        let property = self.require_property().await?;
        self.check_fields(Control::Submit, validate_final_submit(&property, &self.catalog))?;
        self.sync(Control::Submit, |api, id| async move {
            api.submit_for_review(&id).await
        })
        .await
    }

    /// Move past `saved` after a confirmed save
    async fn advance(&mut self, saved: WizardStep) -> Result<SaveOutcome> {
        let property = self.require_property().await?;
        let navigator = self
            .navigator
            .as_mut()
            .ok_or_else(|| OnboardError::InvalidState("Wizard is not mounted".to_string()))?;

        if navigator.active() != saved {
            navigator.select(saved, &property.form_progress)?;
        }
        if let Some(next) = navigator.advance() {
            return Ok(SaveOutcome::Advanced(next));
        }
        match property.form_progress.first_incomplete() {
            None => {
                info!(property_id = %property.id, "All onboarding steps complete");
                Ok(SaveOutcome::Finished {
                    redirect_to: PROPERTY_LIST_ROUTE.to_string(),
                })
            }
            Some(step) => {
                navigator.select(step, &property.form_progress)?;
                Ok(SaveOutcome::Advanced(step))
            }
        }
    }

    /// Run one remote write and commit its response.
    ///
    /// Nothing is committed if the call fails or the wizard unmounted in the
    /// meantime; the error is kept for `control`.
    async fn sync<F, Fut>(&mut self, control: Control, call: F) -> Result<Property>
    where
        F: FnOnce(Arc<A>, String) -> Fut,
        Fut: Future<Output = Result<Property>>,
    {
        let id = self.require_property().await?.id;
        self.busy = Some(control);
        self.errors.remove(&control);
        let result = call(Arc::clone(&self.api), id.clone()).await;
        self.busy = None;

        match result {
            Ok(property) => {
                if !self.store.commit(&self.cancel, property.clone()).await {
                    return Err(OnboardError::Cancelled);
                }
                info!(property_id = %id, ?control, "Saved");
                Ok(property)
            }
            Err(e) => Err(self.fail(control, e)),
        }
    }

    fn check_fields(&mut self, control: Control, errors: ValidationErrors) -> Result<()> {
        if errors.is_empty() {
            self.errors.remove(&control);
            return Ok(());
        }
        warn!(?control, fields = %errors, "Validation blocked save");
        self.errors.insert(control, StepError::Fields(errors.clone()));
        Err(OnboardError::Validation(errors))
    }

    /// Record the inline message for `control` and hand the error back
    fn fail(&mut self, control: Control, e: OnboardError) -> OnboardError {
        if self.cancel.is_cancelled() {
            return OnboardError::Cancelled;
        }
        match &e {
            OnboardError::Transport(_) | OnboardError::Io(_) | OnboardError::Serde(_) => {
                error!(?control, error = %e, "Unexpected failure");
            }
            _ => warn!(?control, error = %e, "Request rejected"),
        }
        self.errors.insert(control, StepError::Message(e.user_message()));
        e
    }

    async fn require_property(&self) -> Result<Property> {
        if self.cancel.is_cancelled() {
            return Err(OnboardError::Cancelled);
        }
        self.store
            .current()
            .await
            .ok_or_else(|| OnboardError::InvalidState("No property is loaded".to_string()))
    }
}
