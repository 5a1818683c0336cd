//! Catalog submission types.
//!
//! A [`ProductSubmission`] is the normalized, already-validated request to
//! materialize one product in a shop's catalog. Option values on variants are
//! positional: `option_values[i]` belongs to `options[i]`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product to provision, with its option schema, variants and images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
    pub title: String,
    /// HTML description.
    #[serde(default, alias = "body_html", alias = "bodyHtml")]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default, alias = "product_type")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared options, in position order.
    #[serde(default)]
    pub options: Vec<ProductOption>,
    pub variants: Vec<VariantSubmission>,
    /// Product-level gallery images.
    #[serde(default)]
    pub images: Vec<ImageSubmission>,
}

impl ProductSubmission {
    /// Variants that declared an image with a non-empty source, in submission order.
    pub fn image_bearing_variants(&self) -> impl Iterator<Item = &VariantSubmission> {
        self.variants
            .iter()
            .filter(|v| v.image.as_ref().is_some_and(ImageSubmission::has_source))
    }
}

/// A declared product option and the values legal at its position.
///
/// Deserializes from either a bare name (`"Size"`) or an object
/// (`{"name": "Size", "values": ["S", {"name": "M"}]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OptionRepr")]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

impl ProductOption {
    /// Create an option with its legal values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Whether `value` is legal at this option's position.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Name(String),
    Declared {
        name: String,
        #[serde(default)]
        values: Vec<OptionValueRepr>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionValueRepr {
    Plain(String),
    Named { name: String },
}

impl From<OptionRepr> for ProductOption {
    fn from(repr: OptionRepr) -> Self {
        match repr {
            OptionRepr::Name(name) => Self {
                name,
                values: Vec::new(),
            },
            OptionRepr::Declared { name, values } => Self {
                name,
                values: values
                    .into_iter()
                    .map(|v| match v {
                        OptionValueRepr::Plain(s) | OptionValueRepr::Named { name: s } => s,
                    })
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        }
    }
}

/// A variant to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSubmission {
    /// Unique within the submission.
    pub sku: String,
    pub price: Decimal,
    /// Positional values, one per declared option.
    #[serde(alias = "option_values")]
    pub option_values: Vec<String>,
    /// Starting stock; `None` leaves inventory untouched.
    #[serde(default, alias = "inventory_quantity")]
    pub inventory_quantity: Option<i64>,
    #[serde(default)]
    pub image: Option<ImageSubmission>,
}

/// An image to attach as product media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSubmission {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageSubmission {
    /// Whether the image has a usable source URL.
    #[must_use]
    pub fn has_source(&self) -> bool {
        !self.src.trim().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_camel_case_submission() {
        let submission: ProductSubmission = serde_json::from_value(json!({
            "title": "Tee",
            "description": "<p>Soft</p>",
            "vendor": "Acme",
            "productType": "Apparel",
            "options": [{"name": "Size", "values": ["S", "M"]}],
            "variants": [
                {"sku": "TEE-S", "price": "19.99", "optionValues": ["S"], "inventoryQuantity": 3}
            ],
            "images": [{"src": "https://cdn.example.com/tee.png", "alt": "Tee"}]
        }))
        .unwrap();

        assert_eq!(submission.product_type.as_deref(), Some("Apparel"));
        assert_eq!(submission.options[0], ProductOption::new("Size", &["S", "M"]));
        assert_eq!(submission.variants[0].price, Decimal::new(1999, 2));
        assert_eq!(submission.variants[0].inventory_quantity, Some(3));
        assert_eq!(submission.images.len(), 1);
    }

    #[test]
    fn test_deserialize_snake_case_aliases() {
        let submission: ProductSubmission = serde_json::from_value(json!({
            "title": "Tee",
            "body_html": "<p>Soft</p>",
            "product_type": "Apparel",
            "options": ["Size"],
            "variants": [
                {"sku": "TEE-M", "price": 9.5, "option_values": ["M"], "inventory_quantity": 5}
            ]
        }))
        .unwrap();

        assert_eq!(submission.description.as_deref(), Some("<p>Soft</p>"));
        assert_eq!(submission.options[0].name, "Size");
        assert!(submission.options[0].values.is_empty());
        assert_eq!(submission.variants[0].option_values, vec!["M"]);
        assert!(submission.tags.is_empty());
    }

    #[test]
    fn test_option_values_accept_named_objects() {
        let option: ProductOption =
            serde_json::from_value(json!({"name": "Size", "values": [{"name": "S"}, "M", ""]}))
                .unwrap();
        assert_eq!(option.values, vec!["S", "M"]);
        assert!(option.accepts("M"));
        assert!(!option.accepts("L"));
    }

    #[test]
    fn test_image_bearing_variants_skip_empty_sources() {
        let variant = |sku: &str, src: Option<&str>| VariantSubmission {
            sku: sku.to_string(),
            price: Decimal::ONE,
            option_values: vec![],
            inventory_quantity: None,
            image: src.map(|s| ImageSubmission {
                src: s.to_string(),
                alt: None,
            }),
        };
        let submission = ProductSubmission {
            title: "Tee".to_string(),
            description: None,
            vendor: None,
            product_type: None,
            tags: vec![],
            options: vec![],
            variants: vec![
                variant("A", Some("https://cdn.example.com/a.png")),
                variant("B", None),
                variant("C", Some("  ")),
                variant("D", Some("https://cdn.example.com/d.png")),
            ],
            images: vec![],
        };

        let skus: Vec<&str> = submission
            .image_bearing_variants()
            .map(|v| v.sku.as_str())
            .collect();
        assert_eq!(skus, vec!["A", "D"]);
    }
}
