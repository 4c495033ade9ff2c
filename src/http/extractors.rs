//! Restaurant identification extractor.
//!
//! Extracts the `AuthRestaurantId` header. Presence of a non-empty value is
//! all that is checked; the value is not verified against anything.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::ApiError;

/// Header a caller must send to use the ask endpoint.
pub const RESTAURANT_ID_HEADER: &str = "AuthRestaurantId";

/// The caller's restaurant identifier. Extracting this rejects requests
/// without the header before the body is read.
#[derive(Debug, Clone)]
pub struct RestaurantId(pub String);

impl<S> FromRequestParts<S> for RestaurantId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(RESTAURANT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        if value.is_empty() {
            return Err(ApiError::unauthorized(format!(
                "Missing {RESTAURANT_ID_HEADER} header"
            )));
        }

        Ok(RestaurantId(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<RestaurantId, ApiError> {
        let (mut parts, _) = request.into_parts();
        RestaurantId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_present() {
        let request = Request::builder()
            .header(RESTAURANT_ID_HEADER, "rest-42")
            .body(())
            .unwrap();

        let id = extract(request).await.unwrap();
        assert_eq!(id.0, "rest-42");
    }

    #[tokio::test]
    async fn test_header_missing() {
        let request = Request::builder().body(()).unwrap();

        let error = extract(request).await.unwrap_err();
        assert_eq!(error.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_header_empty() {
        let request = Request::builder()
            .header(RESTAURANT_ID_HEADER, "   ")
            .body(())
            .unwrap();

        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn test_header_case_insensitive() {
        let request = Request::builder()
            .header("authrestaurantid", "rest-42")
            .body(())
            .unwrap();

        assert!(extract(request).await.is_ok());
    }
}
