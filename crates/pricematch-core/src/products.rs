use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{fixed, parse_price};

/// One row of a source's search-result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque identifier the source's detail endpoint understands: a product
    /// code, a product page `href`, or a barcode depending on the source.
    pub id: String,
    pub name: String,
    /// Display price exactly as the source formatted it, e.g. `"R15.99"`.
    pub price: String,
}

impl Candidate {
    /// The list label, `"<name> - <price>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.price)
    }
}

/// Resolved detail record for the candidate currently selected in one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedProduct {
    /// The candidate identifier the detail was fetched with.
    pub identifier: String,
    pub name: Option<String>,
    /// Zero when the source did not report a usable price.
    pub price: Decimal,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub unit_of_measure: Option<String>,
    pub image_urls: Vec<String>,
}

impl SelectedProduct {
    #[must_use]
    pub fn has_positive_price(&self) -> bool {
        self.price > Decimal::ZERO
    }

    /// The value this product offers for a main-record field, if any.
    #[must_use]
    pub fn field(&self, field: MainField) -> Option<String> {
        match field {
            MainField::ProductName => self.name.clone(),
            MainField::Description => self.description.clone(),
            MainField::Brand => self.brand.clone(),
            MainField::Category => self.category.clone(),
            MainField::Price => self.has_positive_price().then(|| fixed(self.price, 2)),
            MainField::Barcode => self.barcode.clone(),
        }
    }

    /// Fields that can be copied into the main record, in display order.
    #[must_use]
    pub fn copyable_fields(&self) -> Vec<(MainField, String)> {
        MainField::ALL
            .iter()
            .filter_map(|&f| self.field(f).map(|v| (f, v)))
            .collect()
    }
}

/// A tracked, user-editable field of the [`MainRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainField {
    ProductName,
    Description,
    Brand,
    Category,
    Price,
    Barcode,
}

impl MainField {
    pub const ALL: [MainField; 6] = [
        MainField::ProductName,
        MainField::Description,
        MainField::Brand,
        MainField::Category,
        MainField::Price,
        MainField::Barcode,
    ];

    /// Form field name used in the save submission.
    #[must_use]
    pub fn form_name(self) -> &'static str {
        match self {
            MainField::ProductName => "product_name",
            MainField::Description => "description",
            MainField::Brand => "brand",
            MainField::Category => "category",
            MainField::Price => "price",
            MainField::Barcode => "barcode",
        }
    }
}

impl std::fmt::Display for MainField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            MainField::ProductName => "name",
            MainField::Description => "description",
            MainField::Brand => "brand",
            MainField::Category => "category",
            MainField::Price => "price",
            MainField::Barcode => "barcode",
        })
    }
}

impl FromStr for MainField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "product_name" => Ok(MainField::ProductName),
            "description" => Ok(MainField::Description),
            "brand" => Ok(MainField::Brand),
            "category" => Ok(MainField::Category),
            "price" => Ok(MainField::Price),
            "barcode" => Ok(MainField::Barcode),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// The single product record being curated for save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MainRecord {
    /// Inventory SKU; carried to the submission, never edited.
    pub sku: String,
    pub product_name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub barcode: String,
}

impl MainRecord {
    /// Display value of a field; the price is rendered with two decimals.
    #[must_use]
    pub fn get(&self, field: MainField) -> String {
        match field {
            MainField::ProductName => self.product_name.clone(),
            MainField::Description => self.description.clone(),
            MainField::Brand => self.brand.clone(),
            MainField::Category => self.category.clone(),
            MainField::Price => fixed(self.price, 2),
            MainField::Barcode => self.barcode.clone(),
        }
    }

    /// Overwrites a field from user text. An unparsable price becomes zero.
    pub fn set(&mut self, field: MainField, value: &str) {
        match field {
            MainField::ProductName => self.product_name = value.to_string(),
            MainField::Description => self.description = value.to_string(),
            MainField::Brand => self.brand = value.to_string(),
            MainField::Category => self.category = value.to_string(),
            MainField::Price => self.price = parse_price(value).unwrap_or(Decimal::ZERO),
            MainField::Barcode => self.barcode = value.trim().to_string(),
        }
    }

    /// Fields whose value differs from `other`. Prices compare numerically.
    #[must_use]
    pub fn changed_fields(&self, other: &MainRecord) -> Vec<MainField> {
        MainField::ALL
            .iter()
            .copied()
            .filter(|&f| match f {
                MainField::Price => self.price != other.price,
                _ => self.get(f) != other.get(f),
            })
            .collect()
    }
}
