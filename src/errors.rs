use std::fmt;

/// Errors surfaced by a registry lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum GcisError {
    /// Network or HTTP failure, non-JSON body, or a malformed response shape.
    TransportError(String),
    /// The business number matches none of the three categories.
    CategoryNotFound(String),
    /// A query expected to return at least one record returned none,
    /// or no current record could be selected.
    EmptyResult(String),
    /// A required field is absent from a record.
    MissingField(String),
    /// A field is present but its value cannot be used.
    InvalidField(String),
    /// The environment holds an unusable setting; no request was sent.
    Config(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<GcisError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for GcisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcisError::TransportError(msg) => write!(f, "GCIS transport error: {}", msg),
            GcisError::CategoryNotFound(uni) => {
                write!(f, "No company, branch or business registered under {}", uni)
            }
            GcisError::EmptyResult(msg) => write!(f, "Empty result: {}", msg),
            GcisError::MissingField(field) => write!(f, "Missing field: {}", field),
            GcisError::InvalidField(msg) => write!(f, "Invalid field: {}", msg),
            GcisError::Config(msg) => write!(f, "Invalid GCIS configuration: {}", msg),
            GcisError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for GcisError {}

impl GcisError {
    /// Returns the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &GcisError {
        match self {
            GcisError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when the lookup ended because the number is not registered at all.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), GcisError::CategoryNotFound(_))
    }
}

impl From<reqwest::Error> for GcisError {
    fn from(err: reqwest::Error) -> Self {
        GcisError::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for GcisError {
    fn from(err: serde_json::Error) -> Self {
        GcisError::TransportError(format!("malformed JSON: {}", err))
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `GcisError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, GcisError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, GcisError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, GcisError> {
    fn context(self, context: impl Into<String>) -> Result<T, GcisError> {
        self.map_err(|e| GcisError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, GcisError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| GcisError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_nested_context() {
        let err: Result<(), GcisError> = Err(GcisError::CategoryNotFound("12345678".into()));
        let wrapped = err
            .context("resolving parent company")
            .with_context(|| "branch 87654321".to_string())
            .unwrap_err();

        assert!(wrapped.is_not_found());
        assert_eq!(
            wrapped.root(),
            &GcisError::CategoryNotFound("12345678".into())
        );
        assert_eq!(
            wrapped.to_string(),
            "branch 87654321: resolving parent company: No company, branch or business registered under 12345678"
        );
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!GcisError::EmptyResult("branch".into()).is_not_found());
        assert!(!GcisError::TransportError("timeout".into()).is_not_found());
    }

    #[test]
    fn test_config_error_is_not_transport() {
        let err = GcisError::Config("GCIS_TIMEOUT_SECS must be positive".into());
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("Invalid GCIS configuration:"));
        assert!(!err.to_string().contains("transport"));
    }
}
