use std::sync::Arc;

use anyhow::Context;
use dharamshala_onboard::api::{HttpPropertyApi, InMemoryPropertyApi, PropertyApi};
use dharamshala_onboard::config::ClientConfig;
use dharamshala_onboard::session::{KeyValueStorage, LocalStorage, SelectedProperty, SessionStorage};
use dharamshala_onboard::store::PropertyStore;
use dharamshala_onboard::wizard::{OnboardingWizard, Resolution, WizardStep};
use dharamshala_onboard::OnboardError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: dharamshala-onboard [--offline] [PROPERTY_ID|new]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut offline = false;
    let mut route_id = None;
    for arg in std::env::args().skip(1) {
        if arg == "--offline" {
            offline = true;
        } else if arg == "-h" || arg == "--help" {
            println!("{USAGE}");
            return Ok(());
        } else if route_id.is_none() {
            route_id = Some(arg);
        } else {
            anyhow::bail!(USAGE);
        }
    }

    let config = ClientConfig::from_env().context("Invalid onboarding configuration")?;
    let local = LocalStorage::open(&config.state_dir)
        .with_context(|| format!("Failed to open local storage in {}", config.state_dir.display()))?;

    if let Some(selected) = SelectedProperty::hydrate(&local) {
        info!(property_id = %selected.id, "Dashboard scoped to {}", selected.place_name);
    }

    if offline {
        warn!("Running against the in-memory backend; nothing is persisted remotely");
        let api = Arc::new(InMemoryPropertyApi::new("offline-owner"));
        run(api, route_id.as_deref(), &local).await
    } else {
        let api = Arc::new(HttpPropertyApi::new(&config).context("Failed to build HTTP client")?);
        info!(api_url = %config.api_url, "Using remote backend");
        run(api, route_id.as_deref(), &local).await
    }
}

async fn run<A>(api: Arc<A>, route_id: Option<&str>, local: &dyn KeyValueStorage) -> anyhow::Result<()>
where
    A: PropertyApi + ?Sized,
{
    let store = Arc::new(PropertyStore::new());
    let mut wizard = OnboardingWizard::new(api, Arc::clone(&store), Arc::new(SessionStorage::new()));

    let resolution = match wizard.mount(route_id).await {
        Ok(resolution) => resolution,
        Err(OnboardError::NotFound(id)) => {
            if SelectedProperty::hydrate(local).is_some_and(|selected| selected.id == id) {
                warn!(property_id = %id, "Selected property no longer exists, forgetting it");
                SelectedProperty::clear(local).context("Failed to clear selected property")?;
            }
            anyhow::bail!("Property {id} was not found");
        }
        Err(e) => return Err(e).context("Failed to resolve onboarding draft"),
    };

    match &resolution {
        Resolution::ChooseDraft(drafts) => {
            println!("{} draft(s) in progress:", drafts.len());
            for (i, draft) in drafts.iter().enumerate() {
                println!(
                    "{}. {} [{}] ({}/{} steps)",
                    i + 1,
                    draft.display_name(),
                    draft.id,
                    draft.completed_steps,
                    WizardStep::ALL.len()
                );
            }
            println!("Run again with a draft id, or with `new` to start over.");
        }
        Resolution::Loaded(_) | Resolution::Created { .. } => {
            if let Resolution::Created {
                redirect_to: Some(route),
                ..
            } = &resolution
            {
                println!("Created a new draft, continue at {route}");
            }
            let property = store
                .current()
                .await
                .context("Resolved property was not stored")?;
            SelectedProperty {
                id: property.id.clone(),
                place_name: property.basic_info.place_name.clone(),
            }
            .save(local)
            .context("Failed to remember selected property")?;

            println!("{} ({}, {})", property.summary().display_name(), property.id, property.status);
            for step in WizardStep::ALL {
                let mark = if property.form_progress.is_complete(step) { "x" } else { " " };
                let enabled = wizard.is_step_enabled(step).await;
                println!(
                    "  [{mark}] {}. {}{}",
                    step.index() + 1,
                    step.label(),
                    if enabled { "" } else { " (locked)" }
                );
            }
            if let Some(step) = wizard.active_step() {
                println!("Resume at: {step}");
            }
        }
    }

    wizard.unmount().await;
    Ok(())
}
