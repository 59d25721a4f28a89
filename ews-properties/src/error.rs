//! Error types for protocol entities and timezone reconciliation.

use ews_model::ModelError;
use thiserror::Error;

/// Result type for entity and timezone operations.
pub type PropertiesResult<T> = Result<T, PropertiesError>;

#[derive(Debug, Error)]
pub enum PropertiesError {
    /// Validation or marshalling failed in the entity engine.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The XML reader or writer failed.
    #[error(transparent)]
    Xml(#[from] ews_types::Error),

    /// A transition's time of day is outside `[0, 24h)`.
    #[error("transition offset {offset} must be between 0 and 24 hours")]
    InvalidTransitionOffset { offset: String },

    #[error("no server timezone matches bias {bias}")]
    NoMatchingTimezone { bias: i64 },

    #[error("no standard period found for {year} in {periods} periods")]
    NoStandardPeriod { year: i32, periods: usize },

    #[error("no transition is in effect for {year}")]
    NoValidTransition { year: i32 },

    #[error("transition points to unknown period ({year}, {kind:?})")]
    UnknownPeriod { year: i32, kind: String },

    #[error("invalid transitions group {id}: {reason}")]
    InvalidTransitionGroup { id: i64, reason: String },

    #[error("malformed timezone definition: {0}")]
    MalformedTimezoneDefinition(String),
}
