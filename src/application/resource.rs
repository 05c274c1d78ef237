// src/application/resource.rs
//
// The three-state envelope every screen state uses for asynchronous
// results: loading, success, or an error message string.

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    /// Collapse a service result into the envelope
    pub fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Resource::Success(value),
            Err(e) => Resource::Error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Resource::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_from_result() {
        let ok: Resource<i32> = Resource::from_result(Ok(5));
        assert_eq!(ok, Resource::Success(5));

        let err: Resource<i32> = Resource::from_result(Err(AppError::NotFound));
        assert!(err.is_error());
        assert_eq!(err.error_message(), Some("Resource not found"));
    }

    #[test]
    fn test_map_preserves_state() {
        let loading: Resource<i32> = Resource::Loading;
        assert!(loading.map(|v| v * 2).is_loading());

        let success = Resource::Success(2).map(|v| v * 2);
        assert_eq!(success.data(), Some(&4));
    }
}
