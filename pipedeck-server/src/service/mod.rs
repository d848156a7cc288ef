//! Service Module
//!
//! Business logic layer for the server.
//! Services validate requests and drive the hierarchy stores.

pub mod field;
pub mod pipeline;
pub mod stage;

// Re-export for convenience
pub use field as field_service;
pub use pipeline as pipeline_service;
pub use stage as stage_service;

use pipedeck_store::BackendError;

/// Service error type
#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    ValidationError(String),
    Backend(BackendError),
}

impl From<BackendError> for ServiceError {
    fn from(err: BackendError) -> Self {
        ServiceError::Backend(err)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::ValidationError(msg) => write!(f, "{}", msg),
            ServiceError::Backend(err) => write!(f, "{}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Longest display name accepted at any level
pub const MAX_NAME_LEN: usize = 255;

// =============================================================================
// Validation
// =============================================================================

/// Checks a display name and returns it trimmed
///
/// `what` names the entity in error messages ("Pipeline", "Stage", "Field").
fn validate_name<'a>(what: &str, name: &'a str) -> Result<&'a str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "{} name cannot be empty",
            what
        )));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::ValidationError(format!(
            "{} name is too long (max {} characters)",
            what, MAX_NAME_LEN
        )));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_name() {
        let result = validate_name("Pipeline", "   ");
        assert!(matches!(
            result,
            Err(ServiceError::ValidationError(msg)) if msg == "Pipeline name cannot be empty"
        ));
    }

    #[test]
    fn test_validate_long_name() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        let result = validate_name("Stage", &name);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));

        let name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_name("Stage", &name).is_ok());
    }

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate_name("Field", "  Source \n").unwrap(), "Source");
    }
}
