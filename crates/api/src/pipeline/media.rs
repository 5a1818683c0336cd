//! Media attachment and variant-media linking.

use std::collections::BTreeMap;

use catalog_provisioner_core::{ImageSubmission, ProductSubmission};
use tracing::instrument;

use crate::shopify::queries::product_create_media::{CreateMediaInput, MediaContentType};
use crate::shopify::queries::product_variant_append_media::VariantMediaInput;
use crate::shopify::queries::{
    ProductCreateMedia, ProductVariantAppendMedia, product_create_media,
    product_variant_append_media,
};
use crate::shopify::{
    CatalogApi, MediaLink, ProvisionError, RemoteMedia, RemoteVariant, ShopSession,
};

fn media_input(image: &ImageSubmission) -> CreateMediaInput {
    CreateMediaInput {
        media_content_type: MediaContentType::Image,
        original_source: image.src.trim().to_string(),
        alt: image.alt.clone(),
    }
}

/// Media to attach: variant images in variant order, then product images.
///
/// Variant images come first so that the n-th attached item lines up with
/// the n-th image-bearing variant.
#[must_use]
pub fn media_requests(submission: &ProductSubmission) -> Vec<CreateMediaInput> {
    let variant_images = submission
        .image_bearing_variants()
        .filter_map(|v| v.image.as_ref());
    let product_images = submission.images.iter().filter(|i| i.has_source());

    variant_images.chain(product_images).map(media_input).collect()
}

/// Pair image-bearing variants with attached media by position.
///
/// Variants beyond the end of `media`, media without an ID, and SKUs missing
/// from `variants` produce no link.
#[must_use]
pub fn pair_variant_media(
    submission: &ProductSubmission,
    variants: &BTreeMap<String, RemoteVariant>,
    media: &[RemoteMedia],
) -> Vec<MediaLink> {
    submission
        .image_bearing_variants()
        .zip(media)
        .filter_map(|(variant, item)| {
            let media_id = item.id.as_ref()?;
            let Some(remote) = variants.get(&variant.sku) else {
                tracing::debug!(
                    sku = %variant.sku,
                    "No created variant for SKU, skipping media link"
                );
                return None;
            };
            Some(MediaLink {
                sku: variant.sku.clone(),
                variant_id: remote.id.clone(),
                media_id: media_id.clone(),
            })
        })
        .collect()
}

/// Attaches images to a product as media.
pub struct MediaAttacher<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> MediaAttacher<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Attach every image in the submission.
    ///
    /// Makes no remote call when there is nothing to attach.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Validation` if Shopify reports `mediaUserErrors`.
    #[instrument(skip_all, fields(shop = %session.shop, product_id = %product_id))]
    pub async fn attach(
        &self,
        session: &ShopSession,
        product_id: &str,
        submission: &ProductSubmission,
    ) -> Result<Vec<RemoteMedia>, ProvisionError> {
        let requests = media_requests(submission);
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let data = self
            .api
            .execute::<ProductCreateMedia>(
                session,
                product_create_media::Variables {
                    product_id: product_id.to_string(),
                    media: requests,
                },
            )
            .await?;

        let payload = data.product_create_media.ok_or_else(|| {
            ProvisionError::Integrity("productCreateMedia returned no payload".to_string())
        })?;
        ProvisionError::check_user_errors("productCreateMedia", payload.media_user_errors)?;

        let media: Vec<RemoteMedia> = payload
            .media
            .unwrap_or_default()
            .into_iter()
            .map(|m| RemoteMedia {
                id: m.id,
                alt: m.alt,
                status: m.status,
            })
            .collect();

        for item in media.iter().filter(|m| m.status.is_failed()) {
            tracing::warn!(media_id = ?item.id, "Media processing failed");
        }
        Ok(media)
    }
}

/// Links attached media back onto variants.
pub struct VariantMediaLinker<'a, A> {
    api: &'a A,
}

impl<'a, A: CatalogApi> VariantMediaLinker<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Issue one `productVariantAppendMedia` per positional pair.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Validation` if a link call reports `userErrors`.
    #[instrument(
        skip_all,
        fields(shop = %session.shop, product_id = %product_id, media = media.len())
    )]
    pub async fn link(
        &self,
        session: &ShopSession,
        product_id: &str,
        submission: &ProductSubmission,
        variants: &BTreeMap<String, RemoteVariant>,
        media: &[RemoteMedia],
    ) -> Result<Vec<MediaLink>, ProvisionError> {
        let links = pair_variant_media(submission, variants, media);

        for link in &links {
            let data = self
                .api
                .execute::<ProductVariantAppendMedia>(
                    session,
                    product_variant_append_media::Variables {
                        product_id: product_id.to_string(),
                        variant_media: vec![VariantMediaInput {
                            variant_id: link.variant_id.clone(),
                            media_ids: vec![link.media_id.clone()],
                        }],
                    },
                )
                .await?;

            if let Some(payload) = data.product_variant_append_media {
                ProvisionError::check_user_errors(
                    "productVariantAppendMedia",
                    payload.user_errors,
                )?;
            }
        }

        Ok(links)
    }
}
