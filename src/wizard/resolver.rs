//! Decides which property the wizard opens on mount.

use tracing::{debug, info, warn};

use crate::api::PropertyApi;
use crate::error::{OnboardError, Result};
use crate::models::{DraftSummary, Property};
use crate::session::{KeyValueStorage, CREATE_NEW_KEY};

/// Route id that asks for a brand new draft
pub const NEW_DRAFT_SENTINEL: &str = "new";

/// Wizard route; the new draft's id is appended on redirect
pub const ONBOARD_ROUTE: &str = "/dashboard/properties/onboard";

/// What the wizard should show after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An existing property, opened by id or picked from the draft list
    Loaded(Property),
    /// A draft created for this visit. `redirect_to` is set when the
    /// route carried the `"new"` sentinel and must be replaced.
    Created {
        property: Property,
        redirect_to: Option<String>,
    },
    /// Earlier drafts exist; the owner picks one or starts over
    ChooseDraft(Vec<DraftSummary>),
}

impl Resolution {
    pub fn property(&self) -> Option<&Property> {
        match self {
            Self::Loaded(property) | Self::Created { property, .. } => Some(property),
            Self::ChooseDraft(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolverState {
    Unresolved,
    Resolving,
    Resolved(Resolution),
    Failed(String),
}

/// One-shot draft resolution for a single wizard mount.
///
/// `resolve` performs remote calls only on the `Unresolved -> Resolving`
/// transition; later calls replay the stored outcome.
#[derive(Debug)]
pub struct DraftResolver {
    state: ResolverState,
}

impl Default for DraftResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftResolver {
    pub fn new() -> Self {
        Self {
            state: ResolverState::Unresolved,
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub async fn resolve<A>(
        &mut self,
        route_id: Option<&str>,
        api: &A,
        session: &dyn KeyValueStorage,
    ) -> Result<Resolution>
    where
        A: PropertyApi + ?Sized,
    {
        match &self.state {
            ResolverState::Unresolved => {}
            ResolverState::Resolving => {
                return Err(OnboardError::InvalidState(
                    "Draft resolution is already in progress".to_string(),
                ))
            }
            ResolverState::Resolved(resolution) => {
                debug!("Draft already resolved for this mount");
                return Ok(resolution.clone());
            }
            ResolverState::Failed(message) => {
                return Err(OnboardError::InvalidState(message.clone()))
            }
        }

        self.state = ResolverState::Resolving;
        let outcome = Self::run(route_id, api, session).await;
        self.settle(outcome)
    }

    /// Open one of the drafts offered by the picker
    pub async fn resume_draft<A>(&mut self, id: &str, api: &A) -> Result<Resolution>
    where
        A: PropertyApi + ?Sized,
    {
        self.expect_picker()?;
        self.state = ResolverState::Resolving;
        let outcome = api.fetch_property(id).await.map(Resolution::Loaded);
        self.settle(outcome)
    }

    /// Ignore the offered drafts and start a new one
    pub async fn start_new<A>(&mut self, api: &A) -> Result<Resolution>
    where
        A: PropertyApi + ?Sized,
    {
        self.expect_picker()?;
        self.state = ResolverState::Resolving;
        let outcome = Self::create(api, false).await;
        self.settle(outcome)
    }

    async fn run<A>(route_id: Option<&str>, api: &A, session: &dyn KeyValueStorage) -> Result<Resolution>
    where
        A: PropertyApi + ?Sized,
    {
        match route_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(NEW_DRAFT_SENTINEL) => Self::create(api, true).await,
            Some(id) => {
                info!(property_id = id, "Opening property from route");
                api.fetch_property(id).await.map(Resolution::Loaded)
            }
            None => {
                if session.take(CREATE_NEW_KEY)?.is_some() {
                    info!("Create-new requested for this session, skipping draft picker");
                    return Self::create(api, false).await;
                }
                let drafts = api.draft_properties().await?;
                if drafts.is_empty() {
                    Self::create(api, false).await
                } else {
                    info!(drafts = drafts.len(), "Offering existing drafts");
                    Ok(Resolution::ChooseDraft(
                        drafts.iter().map(Property::summary).collect(),
                    ))
                }
            }
        }
    }

    async fn create<A>(api: &A, redirect: bool) -> Result<Resolution>
    where
        A: PropertyApi + ?Sized,
    {
        let property = api.initialize().await?;
        info!(property_id = %property.id, "Initialized new draft");
        let redirect_to = redirect.then(|| format!("{}/{}", ONBOARD_ROUTE, property.id));
        Ok(Resolution::Created {
            property,
            redirect_to,
        })
    }

    fn expect_picker(&self) -> Result<()> {
        match &self.state {
            ResolverState::Resolved(Resolution::ChooseDraft(_)) => Ok(()),
            _ => Err(OnboardError::InvalidState(
                "No draft selection is pending".to_string(),
            )),
        }
    }

    fn settle(&mut self, outcome: Result<Resolution>) -> Result<Resolution> {
        match outcome {
            Ok(resolution) => {
                self.state = ResolverState::Resolved(resolution.clone());
                Ok(resolution)
            }
            Err(e) => {
                warn!(error = %e, "Draft resolution failed");
                self.state = ResolverState::Failed(e.user_message());
                Err(e)
            }
        }
    }
}
