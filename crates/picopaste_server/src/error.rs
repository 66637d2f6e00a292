//! HTTP error mapping for paste handlers.

use crate::AppError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Response header carrying the remaining write budget.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Response header carrying the configured write budget.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";

/// Handler error wrapping [`AppError`] with an HTTP mapping.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::EmptyContent => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::StorageMessage(_)
            | AppError::IdentifierTaken(_) => {
                tracing::error!("Store fault: {}", self.0);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
            }
        };

        let mut response = (status, self.0.to_string()).into_response();
        if let AppError::RateLimited { retry_after } = self.0 {
            // Round up so clients never retry before the window has reset.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from_static("0"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_mapping_matrix() {
        let cases = [
            (AppError::EmptyContent, StatusCode::BAD_REQUEST),
            (
                AppError::PayloadTooLarge { limit: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::StorageMessage("disk on fire".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = HttpError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn rate_limited_sets_retry_after_rounded_up() {
        let response = HttpError(AppError::RateLimited {
            retry_after: Duration::from_millis(12_100),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from_static("13"))
        );
        assert_eq!(
            response.headers().get(RATE_LIMIT_REMAINING_HEADER),
            Some(&HeaderValue::from_static("0"))
        );
    }
}
