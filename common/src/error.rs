use thiserror::Error;

/// Signal error taxonomy.
///
/// Low confidence and neutral regimes are valid outcomes, never errors;
/// these variants cover only inputs the engine cannot classify from.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// Minimum viable inputs are absent (no OI snapshot, no volume, or
    /// an unavailable provider). Never retried inside the engine.
    #[error("missing required signal: {0}")]
    MissingRequiredSignal(String),

    /// A required field is present but has the wrong type or shape.
    /// Required fields are never silently coerced.
    #[error("invalid signal shape: field `{field}` is {found}, expected a number")]
    InvalidSignalShape { field: String, found: String },
}

impl SignalError {
    pub fn missing(what: impl Into<String>) -> Self {
        SignalError::MissingRequiredSignal(what.into())
    }

    pub fn bad_shape(field: impl Into<String>, found: impl Into<String>) -> Self {
        SignalError::InvalidSignalShape {
            field: field.into(),
            found: found.into(),
        }
    }
}
