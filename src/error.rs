use axum::http::StatusCode;
use thiserror::Error;

/// Domain failures surfaced to the transport layer. Analyzer failures are
/// absorbed inside `analysis::normalize` and never appear here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Entry not found")]
    EntryNotFound,
    #[error("Invalid meal type: {0}")]
    InvalidMealType(String),
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProfileNotFound | ApiError::EntryNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidMealType(_)
            | ApiError::InvalidDateFormat(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(e: ApiError) -> Self {
        let status = e.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %e, "internal error");
        }
        (status, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(ApiError::ProfileNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::EntryNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidMealType("brunch".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidDateFormat("yesterday".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejection_carries_message() {
        let (status, msg): (StatusCode, String) = ApiError::ProfileNotFound.into();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(msg, "Profile not found");
    }
}
