//! Normalization from per-source wire shapes to [`Candidate`] and
//! [`SelectedProduct`].
//!
//! The adapter is picked once from [`SourceKind`]; nothing downstream branches
//! on the source again.

use std::str::FromStr;

use pricematch_core::pricing::parse_price;
use pricematch_core::{Candidate, SelectedProduct, SourceConfig, SourceKind};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SourceError;
use crate::types::{CheckersDetail, CheckersSearchRow, DeeliverProduct, PnpDetail, PnpSearchRow};

/// Text the endpoints send in place of a missing value.
const PLACEHOLDERS: [&str; 2] = ["N/A", "No description available."];

/// Normalizes raw search rows into candidates, in server order.
///
/// Rows that do not match the source's shape, or that carry no identifier,
/// are skipped: they could never be selected.
#[must_use]
pub fn normalize_candidates(source: &SourceConfig, rows: Vec<Value>) -> Vec<Candidate> {
    rows.into_iter()
        .filter_map(|row| {
            let candidate = match source.kind {
                SourceKind::Pnp => {
                    decode_row::<PnpSearchRow>(source, row).map(|r| (r.code, r.name, r.price))
                }
                SourceKind::Checkers => decode_row::<CheckersSearchRow>(source, row)
                    .map(|r| (r.href, r.name, r.price)),
                SourceKind::Deeliver => decode_row::<DeeliverProduct>(source, row)
                    .map(|r| (r.barcode, r.product_name, r.retail_price)),
            }?;

            let (id, name, price) = candidate;
            let Some(id) = id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
                tracing::debug!(source = %source.name, "skipping search row without identifier");
                return None;
            };

            Some(Candidate {
                id,
                name: clean_text(name).unwrap_or_else(|| "N/A".to_string()),
                price: price_label(&price),
            })
        })
        .collect()
}

/// Normalizes a successful detail response body into a [`SelectedProduct`].
///
/// `identifier` is the candidate identifier the detail was requested with.
///
/// # Errors
///
/// Returns [`SourceError::Normalization`] if the body lacks the payload the
/// source's shape requires.
pub fn normalize_detail(
    source: &SourceConfig,
    identifier: &str,
    body: Value,
) -> Result<SelectedProduct, SourceError> {
    match source.kind {
        SourceKind::Pnp => {
            let detail: PnpDetail = decode_detail(source, body)?;
            let price = price_from_value(&detail.price_value)
                .or_else(|| detail.price_formatted.as_deref().and_then(parse_price))
                .unwrap_or(Decimal::ZERO);
            Ok(SelectedProduct {
                identifier: identifier.to_string(),
                name: clean_text(detail.product_name),
                price,
                barcode: clean_text(detail.barcode),
                description: clean_text(detail.description),
                brand: clean_text(detail.brand),
                category: None,
                unit_of_measure: clean_text(detail.default_unit_of_measure),
                image_urls: clean_urls(detail.image_urls),
            })
        }
        SourceKind::Checkers => {
            let detail: CheckersDetail = decode_detail(source, product_info(source, body)?)?;
            Ok(SelectedProduct {
                identifier: identifier.to_string(),
                name: clean_text(detail.product_name),
                price: price_from_value(&detail.product_price).unwrap_or(Decimal::ZERO),
                barcode: clean_text(detail.barcode),
                description: clean_text(detail.description),
                brand: clean_text(detail.product_brand),
                category: clean_text(detail.category),
                unit_of_measure: clean_text(detail.unit_of_measure),
                image_urls: clean_urls(detail.product_image_url.into_iter().collect()),
            })
        }
        SourceKind::Deeliver => {
            let detail: DeeliverProduct = decode_detail(source, product_info(source, body)?)?;
            Ok(SelectedProduct {
                identifier: identifier.to_string(),
                name: clean_text(detail.product_name),
                price: price_from_value(&detail.retail_price).unwrap_or(Decimal::ZERO),
                barcode: clean_text(detail.barcode).or_else(|| clean_text(Some(identifier.to_string()))),
                description: None,
                brand: clean_text(detail.supplier_name),
                category: clean_text(detail.categories),
                unit_of_measure: None,
                image_urls: Vec::new(),
            })
        }
    }
}

/// Reads a price that may arrive as a JSON number or a (possibly
/// currency-prefixed) string.
#[must_use]
pub fn price_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => parse_price(s),
        _ => None,
    }
}

fn price_label(value: &Value) -> String {
    match value {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !PLACEHOLDERS.contains(&s.as_str()))
}

fn clean_urls(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .filter_map(|u| clean_text(Some(u)))
        .collect()
}

fn product_info(source: &SourceConfig, mut body: Value) -> Result<Value, SourceError> {
    match body.get_mut("product_info").map(Value::take) {
        Some(info @ Value::Object(_)) => Ok(info),
        _ => Err(SourceError::Normalization {
            source_name: source.name.clone(),
            reason: "detail response has no product_info object".into(),
        }),
    }
}

fn decode_row<T: DeserializeOwned>(source: &SourceConfig, row: Value) -> Option<T> {
    match serde_json::from_value(row) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(source = %source.name, error = %e, "skipping malformed search row");
            None
        }
    }
}

fn decode_detail<T: DeserializeOwned>(source: &SourceConfig, body: Value) -> Result<T, SourceError> {
    serde_json::from_value(body).map_err(|e| SourceError::Normalization {
        source_name: source.name.clone(),
        reason: format!("detail payload does not match the {} shape: {e}", source.kind),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
