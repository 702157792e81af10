use crate::repository::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use notes_types::{ErrorBody, FieldErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("note {0} already exists")]
    Conflict(i64),
    #[error("note {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A concurrent create won the race between our existence check and insert
            RepositoryError::Duplicate(id) => ApiError::Conflict(id),
            RepositoryError::Missing(id) => ApiError::NotFound(id),
            other => ApiError::Repository(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(fields) => {
                log::debug!("[NOTES] Rejected payload: {:?}", fields);
                ErrorBody::with_fields("validation failed", fields)
            }
            ApiError::Repository(e) => {
                log::error!("[NOTES] Repository failure: {}", e);
                ErrorBody::new("internal server error")
            }
            other => ErrorBody::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict(1).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(RepositoryError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_from_repository_becomes_conflict() {
        let err = ApiError::from(RepositoryError::Duplicate(12));
        assert!(matches!(err, ApiError::Conflict(12)));
        let err = ApiError::from(RepositoryError::Missing(12));
        assert!(matches!(err, ApiError::NotFound(12)));
    }
}
