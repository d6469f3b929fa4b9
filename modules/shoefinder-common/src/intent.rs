use serde_json::{Map, Value};

use crate::catalog::CatalogTable;

pub const DEFAULT_PRICE_MIN: f64 = 0.0;
pub const DEFAULT_PRICE_MAX: f64 = 50_000.0;

/// Structured product query extracted from the analysis model's reply.
///
/// Gender and footwear type stay as the model's lowercase codes; they only
/// become typed through [`QueryIntent::table`], so an out-of-domain code is
/// indistinguishable from an absent one.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    pub gender: Option<String>,
    pub footwear_type: Option<String>,
    pub color: Option<String>,
    pub subtype: Option<String>,
    pub price_min: f64,
    pub price_max: f64,
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self {
            gender: None,
            footwear_type: None,
            color: None,
            subtype: None,
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
        }
    }
}

impl QueryIntent {
    /// Read an intent out of the decoded model JSON.
    ///
    /// Missing, null, empty or non-string text fields are absent. Prices come
    /// from `price_range.min` / `price_range.max`, then top-level `price_min` /
    /// `price_max`; numbers and numeric strings are accepted, anything else
    /// falls back to the default bound.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let price_range = object.get("price_range").and_then(Value::as_object);
        let price = |range_key: &str, flat_key: &str, default: f64| {
            price_range
                .and_then(|range| range.get(range_key))
                .and_then(as_price)
                .or_else(|| object.get(flat_key).and_then(as_price))
                .unwrap_or(default)
        };

        Self {
            gender: lowercase_field(object, "gender"),
            footwear_type: lowercase_field(object, "footwear_type"),
            color: lowercase_field(object, "color"),
            subtype: lowercase_field(object, "subtype"),
            price_min: price("min", "price_min", DEFAULT_PRICE_MIN),
            price_max: price("max", "price_max", DEFAULT_PRICE_MAX),
        }
    }

    /// Catalog table for this intent's gender and footwear type, if any.
    pub fn table(&self) -> Option<CatalogTable> {
        CatalogTable::from_codes(self.gender.as_deref(), self.footwear_type.as_deref())
    }
}

fn lowercase_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    let value = object.get(key)?.as_str()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

fn as_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite())
}
