//! Property onboarding client for dharamshala and guest-house owners.
//!
//! A seven-step wizard that resolves which draft to edit, keeps the
//! backend's copy of the property authoritative, and gates tab navigation
//! on server-reported progress.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod review;
pub mod sections;
pub mod session;
pub mod store;
pub mod wizard;

pub use error::{OnboardError, Result, ValidationErrors};
