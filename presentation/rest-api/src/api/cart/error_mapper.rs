use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::cart::errors::CartError;
use business::domain::cart::sync::SyncError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for CartError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name) = match &self {
            CartError::InvalidQuantity
            | CartError::InvalidProduct
            | CartError::InsufficientStock => (StatusCode::BAD_REQUEST, "ValidationError"),
            CartError::NotFound => (StatusCode::NOT_FOUND, "NotFound"),
            CartError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CacheError"),
        };

        (status, ErrorResponse::new(name, self.to_string()))
    }
}

impl IntoErrorResponse for SyncError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("SyncUnavailable", self.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::errors::RepositoryError;

    #[test]
    fn should_map_validation_to_bad_request() {
        let (status, json) = CartError::InvalidQuantity.into_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json.0.name, "ValidationError");
        assert_eq!(json.0.message, "cart.invalid_quantity");
    }

    #[test]
    fn should_map_missing_line_to_not_found() {
        let (status, _) = CartError::NotFound.into_error_response();

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_cache_fault_to_internal_error() {
        let (status, json) = CartError::Cache(RepositoryError::Corrupted).into_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.0.message, "cart.cache: repository.corrupted");
    }
}
