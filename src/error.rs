use thiserror::Error;

use crate::datatype::Value;

/// Boxed error returned by type hooks, passed through unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum DatashapeError {
    #[error("Unknown fields for {type_name}: {}", .keys.join(", "))]
    UnknownFields { type_name: String, keys: Vec<String> },
    #[error("Cast error for field `{field}` with value {value} (tried {}): {}", .casters.join(", "), .reasons.join("; "))]
    Cast { field: String, casters: Vec<String>, value: Value, reasons: Vec<String> },
    #[error("Invalid caster configuration in {caster}: {message}")]
    InvalidCasterConfiguration { caster: String, message: String },
    #[error("Validation failed for {type_name}: {}", describe_failures(.failures))]
    Validation { type_name: String, failures: Vec<FieldFailure> },
    #[error(transparent)]
    Hook(BoxError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatashapeError>;

impl DatashapeError {
    /// Rejection raised by a single caster. Dispatch fills in the field name
    /// and the full list of attempted casters.
    pub fn rejected(caster: impl Into<String>, value: Value, reason: impl Into<String>) -> Self {
        Self::Cast {
            field: String::new(),
            casters: vec![caster.into()],
            value,
            reasons: vec![reason.into()],
        }
    }
    pub fn misconfigured(caster: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCasterConfiguration { caster: caster.into(), message: message.into() }
    }
    /// Field names that failed validation, in declaration order.
    pub fn failed_fields(&self) -> Vec<&str> {
        match self {
            Self::Validation { failures, .. } => failures.iter().map(|f| f.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

fn describe_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// Helper conversions
impl From<config::ConfigError> for DatashapeError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
