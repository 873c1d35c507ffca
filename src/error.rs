use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field name -> human readable message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record `message` under `field` when `value` is blank
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.add(field, message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OnboardError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Errors raised by the onboarding client
#[derive(Debug, thiserror::Error)]
pub enum OnboardError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("property {0} not found")]
    NotFound(String),

    /// The backend refused a write because the record changed underneath it.
    #[error("property {id} was modified elsewhere: {message}")]
    Conflict { id: String, message: String },

    /// Client-side checks failed; nothing was sent.
    #[error("please fix the highlighted fields: {0}")]
    Validation(ValidationErrors),

    /// The operation is not allowed in the current state.
    #[error("{0}")]
    InvalidState(String),

    /// The wizard was unmounted before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl OnboardError {
    /// Text shown inline next to the control that triggered the call.
    ///
    /// Server and transport failures render the same way; only the text differs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::Io(_) | Self::Serde(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Api { message, .. } => message.clone(),
            Self::Conflict { .. } => {
                "This property was changed in another session. Reload to continue.".to_string()
            }
            Self::NotFound(_) => "Property not found.".to_string(),
            Self::Validation(errors) => {
                format!("Please fix the highlighted fields ({}).", errors.len())
            }
            Self::InvalidState(message) | Self::Config(message) => message.clone(),
            Self::Cancelled => String::new(),
        }
    }

    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;
