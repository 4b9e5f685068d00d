//! Merchant authentication extractor.
//!
//! Every merchant-scoped route requires the opaque merchant identifier in
//! the `x-user-id` header (issued by the upstream auth provider). The
//! extractor threads it into handlers as a typed value instead of an
//! ambient header lookup.

use axum::{extract::FromRequestParts, http::request::Parts};

use raincheck_core::MerchantId;

use crate::error::AppError;

/// The HTTP header carrying the merchant identifier.
pub const MERCHANT_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a merchant identifier on the request.
///
/// Responds 401 when the header is missing or empty.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     RequireMerchant(merchant): RequireMerchant,
/// ) -> impl IntoResponse {
///     format!("Hello, {merchant}!")
/// }
/// ```
#[derive(Debug)]
pub struct RequireMerchant(pub MerchantId);

impl<S> FromRequestParts<S> for RequireMerchant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let merchant = parts
            .headers
            .get(MERCHANT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(Self(MerchantId::new(merchant)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<RequireMerchant, AppError> {
        let (mut parts, ()) = request.into_parts();
        RequireMerchant::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_header_present() {
        let request = Request::builder()
            .header(MERCHANT_ID_HEADER, "merchant-7")
            .body(())
            .unwrap();

        let RequireMerchant(merchant) = extract(request).await.unwrap();
        assert_eq!(merchant.as_str(), "merchant-7");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_blank_header_rejected() {
        let request = Request::builder()
            .header(MERCHANT_ID_HEADER, "   ")
            .body(())
            .unwrap();

        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
