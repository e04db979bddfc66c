use crate::store::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};

pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Message returned when the snapshot is empty or does not contain the user
pub const NOT_FOUND_MESSAGE: &str = "No user interactions found or user not in database.";

#[derive(Debug, thiserror::Error)]
pub enum RecommenderError {
    #[error("No user interactions found or user not in database.")]
    UserOrDataNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for RecommenderError {
    fn status_code(&self) -> StatusCode {
        match self {
            RecommenderError::UserOrDataNotFound => StatusCode::BAD_REQUEST,
            RecommenderError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_matches_display() {
        assert_eq!(
            RecommenderError::UserOrDataNotFound.to_string(),
            NOT_FOUND_MESSAGE
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RecommenderError::UserOrDataNotFound.status_code(),
            StatusCode::BAD_REQUEST
        );
        let store_err = RecommenderError::from(StoreError::Status {
            status: 401,
            body: "Permission denied".to_string(),
        });
        assert_eq!(store_err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
