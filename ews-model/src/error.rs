use thiserror::Error;

/// Errors raised by the schema container and entity engine.
///
/// Every variant names the field (or type) involved so that a rejected request
/// can be traced back to the value that caused it.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("field {name:?} is already defined in this schema")]
    DuplicateField { name: String },

    #[error("unknown field name {name:?}")]
    UnknownFieldName { name: String },

    #[error("field {field:?} is not supported at {version}")]
    UnsupportedFieldVersion { field: String, version: String },

    #[error("{type_name} got unexpected attributes: {names:?}")]
    UnexpectedAttribute { type_name: &'static str, names: Vec<String> },

    #[error("{type_name} has no attribute {name:?}")]
    InvalidAttribute { type_name: &'static str, name: String },

    #[error("field {field:?} is required")]
    MissingRequiredField { field: String },

    #[error("invalid choice {value:?} for field {field:?}, expected one of {choices:?}")]
    InvalidChoice {
        field: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("choice {value:?} for field {field:?} is not available at {version}")]
    InvalidChoiceForVersion {
        field: String,
        value: String,
        version: String,
    },

    #[error("value {value} for field {field:?} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("value for field {field:?} is {len} characters, the limit is {max}")]
    ValueTooLong { field: String, len: usize, max: usize },

    #[error("field {field:?} expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for field {field:?}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("cannot read field {field:?} from the wire: {reason}")]
    MalformedWire { field: String, reason: String },

    #[error(transparent)]
    Xml(#[from] ews_types::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
