use pricematch_core::SourcesFile;
use serde_json::json;

use super::*;

fn source(name: &str) -> SourceConfig {
    SourcesFile::builtin()
        .get(name)
        .cloned()
        .expect("builtin source")
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// -----------------------------------------------------------------------
// normalize_candidates
// -----------------------------------------------------------------------

#[test]
fn pnp_rows_use_code_as_identifier() {
    let rows = vec![json!({"code": "1", "name": "Milk 1L", "price": "15.99", "images": []})];
    let candidates = normalize_candidates(&source("pnp"), rows);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "1");
    assert_eq!(candidates[0].label(), "Milk 1L - 15.99");
}

#[test]
fn checkers_rows_use_href_and_numeric_price() {
    let rows = vec![json!({"href": "/p/milk-1l", "name": "Milk 1L", "price": 16.49})];
    let candidates = normalize_candidates(&source("checkers"), rows);
    assert_eq!(candidates[0].id, "/p/milk-1l");
    assert_eq!(candidates[0].price, "16.49");
}

#[test]
fn deeliver_rows_use_barcode_and_product_name() {
    let rows = vec![json!({
        "barcode": "6001234567890",
        "product_name": "Clover Milk 1L",
        "categories": "Dairy",
        "supplier_name": "Clover",
        "retail_price": "17.00"
    })];
    let candidates = normalize_candidates(&source("deeliver"), rows);
    assert_eq!(candidates[0].id, "6001234567890");
    assert_eq!(candidates[0].label(), "Clover Milk 1L - 17.00");
}

#[test]
fn rows_without_identifier_are_skipped() {
    let rows = vec![
        json!({"code": "", "name": "Ghost", "price": "1.00"}),
        json!({"name": "No code", "price": "1.00"}),
        json!({"code": "2", "name": "Bread", "price": "R12.99"}),
    ];
    let candidates = normalize_candidates(&source("pnp"), rows);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "2");
}

#[test]
fn malformed_rows_are_skipped() {
    let rows = vec![json!("not an object"), json!({"code": "3", "name": "Eggs"})];
    let candidates = normalize_candidates(&source("pnp"), rows);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].price, "N/A");
}

#[test]
fn missing_name_falls_back_to_placeholder() {
    let rows = vec![json!({"code": "4", "name": "  ", "price": "R5.00"})];
    let candidates = normalize_candidates(&source("pnp"), rows);
    assert_eq!(candidates[0].name, "N/A");
}

// -----------------------------------------------------------------------
// normalize_detail
// -----------------------------------------------------------------------

#[test]
fn pnp_detail_reads_flat_payload() {
    let body = json!({
        "success": true,
        "barcode": "6001234567890",
        "product_name": "Milk 1L",
        "description": "No description available.",
        "brand": "Clover",
        "brandSellerId": "N/A",
        "defaultUnitOfMeasure": "EA",
        "imageUrls": ["https://img.example/1.jpg", ""],
        "price_formatted": "R18.50",
        "price_value": 18.5
    });
    let product = normalize_detail(&source("pnp"), "000123", body).unwrap();
    assert_eq!(product.identifier, "000123");
    assert_eq!(product.price, dec("18.5"));
    assert_eq!(product.barcode.as_deref(), Some("6001234567890"));
    assert!(product.description.is_none(), "placeholder description must be dropped");
    assert_eq!(product.unit_of_measure.as_deref(), Some("EA"));
    assert_eq!(product.image_urls, vec!["https://img.example/1.jpg".to_string()]);
}

#[test]
fn pnp_detail_accepts_string_price_value() {
    let body = json!({"success": true, "price_value": "18.50"});
    let product = normalize_detail(&source("pnp"), "000123", body).unwrap();
    assert_eq!(product.price, dec("18.50"));
}

#[test]
fn pnp_detail_falls_back_to_formatted_price() {
    let body = json!({"success": true, "price_value": null, "price_formatted": "R21.99"});
    let product = normalize_detail(&source("pnp"), "000123", body).unwrap();
    assert_eq!(product.price, dec("21.99"));
}

#[test]
fn checkers_detail_reads_product_info() {
    let body = json!({
        "success": true,
        "product_info": {
            "barcode": "6001234567890",
            "product_brand": "Clover",
            "unit_of_measure": "EACH",
            "product_name": "Clover Milk 1L",
            "product_price": "19.99",
            "description": "Fresh full cream milk",
            "category": "Dairy",
            "product_image_url": "https://img.example/c.jpg"
        }
    });
    let product = normalize_detail(&source("checkers"), "/p/milk-1l", body).unwrap();
    assert_eq!(product.price, dec("19.99"));
    assert_eq!(product.brand.as_deref(), Some("Clover"));
    assert_eq!(product.category.as_deref(), Some("Dairy"));
    assert_eq!(product.image_urls.len(), 1);
}

#[test]
fn checkers_detail_drops_na_image() {
    let body = json!({
        "success": true,
        "product_info": {"product_price": "19.99", "category": "N/A", "product_image_url": "N/A"}
    });
    let product = normalize_detail(&source("checkers"), "/p/x", body).unwrap();
    assert!(product.image_urls.is_empty());
    assert!(product.category.is_none());
}

#[test]
fn checkers_detail_without_product_info_is_an_error() {
    let body = json!({"success": true});
    let err = normalize_detail(&source("checkers"), "/p/x", body).unwrap_err();
    assert!(
        matches!(err, SourceError::Normalization { ref reason, .. } if reason.contains("product_info")),
        "expected Normalization error, got: {err:?}"
    );
}

#[test]
fn deeliver_detail_maps_supplier_and_categories() {
    let body = json!({
        "success": true,
        "product_info": {
            "barcode": "6001234567890",
            "product_name": "Clover Milk 1L",
            "categories": "Dairy",
            "supplier_name": "Clover SA",
            "retail_price": "17.00"
        }
    });
    let product = normalize_detail(&source("deeliver"), "6001234567890", body).unwrap();
    assert_eq!(product.brand.as_deref(), Some("Clover SA"));
    assert_eq!(product.category.as_deref(), Some("Dairy"));
    assert_eq!(product.price, dec("17.00"));
}

#[test]
fn deeliver_detail_uses_identifier_when_barcode_missing() {
    let body = json!({"success": true, "product_info": {"retail_price": "3.50"}});
    let product = normalize_detail(&source("deeliver"), "6009876543210", body).unwrap();
    assert_eq!(product.barcode.as_deref(), Some("6009876543210"));
}

#[test]
fn unusable_price_normalizes_to_zero() {
    let body = json!({"success": true, "product_info": {"product_price": "call for price"}});
    let product = normalize_detail(&source("checkers"), "/p/x", body).unwrap();
    assert_eq!(product.price, Decimal::ZERO);
    assert!(!product.has_positive_price());
}

// -----------------------------------------------------------------------
// price_from_value
// -----------------------------------------------------------------------

#[test]
fn price_from_value_handles_numbers_and_strings() {
    assert_eq!(price_from_value(&json!(18.5)), Some(dec("18.5")));
    assert_eq!(price_from_value(&json!(20)), Some(dec("20")));
    assert_eq!(price_from_value(&json!("R 1,299.00")), Some(dec("1299.00")));
    assert_eq!(price_from_value(&json!(null)), None);
    assert_eq!(price_from_value(&json!(true)), None);
}
