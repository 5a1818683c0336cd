//! Shop credential extraction.

use axum::{extract::FromRequestParts, http::request::Parts};
use catalog_provisioner_core::ShopDomain;

use crate::error::AppError;
use crate::shopify::ShopSession;

/// Header naming the target shop.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";
/// Header carrying the shop's Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// Extractor that requires the shop domain and access token headers.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireShop(session): RequireShop) -> impl IntoResponse {
///     format!("Provisioning for {}", session.shop)
/// }
/// ```
pub struct RequireShop(pub ShopSession);

impl<S> FromRequestParts<S> for RequireShop
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let (Some(shop), Some(token)) = (header(SHOP_DOMAIN_HEADER), header(ACCESS_TOKEN_HEADER))
        else {
            return Err(AppError::MissingShopHeaders);
        };

        let shop = ShopDomain::parse(shop).map_err(|e| AppError::InvalidShopDomain(e.to_string()))?;
        tracing::Span::current().record("shop", shop.as_str());

        Ok(Self(ShopSession::new(shop, token)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<RequireShop, AppError> {
        let (mut parts, ()) = request.into_parts();
        RequireShop::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_session() {
        let request = Request::builder()
            .header("X-Shopify-Shop-Domain", "Demo.myshopify.com")
            .header("X-Shopify-Access-Token", "shpat_abc")
            .body(())
            .unwrap();

        let RequireShop(session) = extract(request).await.unwrap();
        assert_eq!(session.shop.as_str(), "demo.myshopify.com");
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let request = Request::builder()
            .header("X-Shopify-Shop-Domain", "demo.myshopify.com")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(AppError::MissingShopHeaders)));
    }

    #[tokio::test]
    async fn test_blank_headers_are_rejected() {
        let request = Request::builder()
            .header("X-Shopify-Shop-Domain", " ")
            .header("X-Shopify-Access-Token", "shpat_abc")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(AppError::MissingShopHeaders)));
    }

    #[tokio::test]
    async fn test_invalid_domain_is_rejected() {
        let request = Request::builder()
            .header("X-Shopify-Shop-Domain", "demo.myshopify.com/admin")
            .header("X-Shopify-Access-Token", "shpat_abc")
            .body(())
            .unwrap();

        assert!(matches!(extract(request).await, Err(AppError::InvalidShopDomain(_))));
    }
}
