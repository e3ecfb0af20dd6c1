//! Wire shapes returned by the per-source search and detail endpoints.
//!
//! Every endpoint answers with a JSON envelope `{"success": bool, "message"?: string, ...}`.
//! The rest of the body depends on the source.
//!
//! ### pnp
//! Search rows carry `code`, `name` and a pre-formatted `price` (`"R15.99"`).
//! The detail payload is flat: `price_value` is a JSON number (or numeric
//! string), `imageUrls` a list of strings, `defaultUnitOfMeasure` camel-cased.
//! Missing text fields are sent as `"N/A"` or `"No description available."`.
//!
//! ### checkers
//! Search rows carry the product page `href`, `name`, and `price`, which is a
//! bare number string (`"15.99"`) or a JSON number. The detail payload is nested
//! under `product_info`, with the price as `product_price` (currency symbol
//! already stripped) and a single `product_image_url`.
//!
//! ### deeliver
//! Search rows and the detail `product_info` share one shape: `barcode`,
//! `product_name`, `categories`, `supplier_name`, `retail_price` (string).

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct PnpSearchRow {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Value,
}

#[derive(Debug, Deserialize)]
pub struct PnpDetail {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, rename = "defaultUnitOfMeasure")]
    pub default_unit_of_measure: Option<String>,
    #[serde(default, rename = "imageUrls")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub price_value: Value,
    /// Shown only as a fallback when `price_value` is unusable.
    #[serde(default)]
    pub price_formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckersSearchRow {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckersDetail {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub product_price: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub product_image_url: Option<String>,
}

/// Used for both deeliver search rows and its detail `product_info`.
#[derive(Debug, Deserialize)]
pub struct DeeliverProduct {
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub retail_price: Value,
}
