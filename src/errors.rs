//! Mapping of backend failures onto GraphQL errors
//!
//! Failures keep their message and gain a machine-readable
//! `extensions.code`. Nothing here turns a failure into a null result.

use async_graphql::{Error, ErrorExtensions};

use crate::ServiceError;

/// Error codes exposed under `extensions.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    ValidationFailed,
    BackendUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
        }
    }
}

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::NotFound { .. } => ErrorCode::NotFound,
            ServiceError::Validation(_) => ErrorCode::ValidationFailed,
            ServiceError::BackendUnavailable(_) => ErrorCode::BackendUnavailable,
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code().as_str());
            if let ServiceError::NotFound { entity, id } = self {
                e.set("entity", entity.as_str());
                e.set("id", *id);
            }
        })
    }
}

/// Convert for use with `?` inside field resolvers
pub fn to_graphql(err: ServiceError) -> Error {
    err.extend()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn code_of(err: &Error) -> Option<Value> {
        err.extensions.as_ref().and_then(|ext| ext.get("code").cloned())
    }

    #[test]
    fn test_not_found_carries_entity_and_id() {
        let err = to_graphql(ServiceError::not_found("Address", 987));

        assert_eq!(err.message, "No Address exists with the primary key 987");
        assert_eq!(code_of(&err), Some(Value::from("NOT_FOUND")));
        let ext = err.extensions.as_ref().unwrap();
        assert_eq!(ext.get("entity"), Some(&Value::from("Address")));
        assert_eq!(ext.get("id"), Some(&Value::from(987)));
    }

    #[test]
    fn test_validation_keeps_message() {
        let err = to_graphql(ServiceError::validation("street1 is required"));

        assert_eq!(err.message, "Validation failed: street1 is required");
        assert_eq!(code_of(&err), Some(Value::from("VALIDATION_FAILED")));
    }

    #[test]
    fn test_backend_unavailable() {
        let err = to_graphql(ServiceError::unavailable("pool exhausted"));
        assert_eq!(code_of(&err), Some(Value::from("BACKEND_UNAVAILABLE")));
    }
}
