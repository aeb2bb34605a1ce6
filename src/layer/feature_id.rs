use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::feature_type::FeatureType;

/// Stable key for a feature within its collection type.
/// Keeps the canonical text of the identifying property, so `500` and `"500"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
    pub ty: FeatureType,
    pub id: Arc<str>, // e.g., "500" for a zone, "250177401001234" for a block
}

impl FeatureId {
    pub fn new(ty: FeatureType, id: &str) -> Self {
        Self { ty, id: Arc::from(id.trim()) }
    }

    /// Get the identifier text.
    #[inline] pub fn id(&self) -> &str { &self.id }

    /// Build an id from a JSON value. Integral numbers (and integral strings) are rendered
    /// without a fraction or leading zeros. Returns None for null, booleans, containers, and blank strings.
    pub fn from_value(ty: FeatureType, value: &Value) -> Option<Self> {
        let text = match value {
            Value::String(s) => return Self::parse(ty, s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() { i.to_string() }
                else if let Some(u) = n.as_u64() { u.to_string() }
                else {
                    let f = n.as_f64()?;
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 { format!("{}", f as i64) }
                    else { f.to_string() }
                }
            }
            _ => return None,
        };
        Some(Self { ty, id: Arc::from(text) })
    }

    /// Read the identifying property of a normalized property bag.
    pub fn from_properties(ty: FeatureType, properties: &Map<String, Value>) -> Option<Self> {
        properties.get(ty.id_key()).and_then(|value| Self::from_value(ty, value))
    }

    /// Parse user input, e.g. the text typed into the search box.
    /// Numeric input is canonicalized the same way as numeric properties ("0500" -> "500").
    pub fn parse(ty: FeatureType, input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() { return None }
        match input.parse::<i64>() {
            Ok(i) => Some(Self { ty, id: Arc::from(i.to_string()) }),
            Err(_) => Some(Self::new(ty, input)),
        }
    }
}

/// Serializes as the bare id text.
impl Serialize for FeatureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_and_numeric_strings_match() {
        let a = FeatureId::from_value(FeatureType::OldZone, &json!(500)).unwrap();
        let b = FeatureId::from_value(FeatureType::OldZone, &json!(500.0)).unwrap();
        let c = FeatureId::parse(FeatureType::OldZone, " 500 ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.id(), "500");
    }

    #[test]
    fn type_is_part_of_identity() {
        let zone = FeatureId::new(FeatureType::NewZone, "42");
        let block = FeatureId::new(FeatureType::Block, "42");
        assert_ne!(zone, block);
    }

    #[test]
    fn non_identifiers_are_rejected() {
        for value in [json!(null), json!(true), json!([1]), json!("  ")] {
            assert_eq!(FeatureId::from_value(FeatureType::Block, &value), None);
        }
        assert_eq!(FeatureId::parse(FeatureType::OldZone, ""), None);
    }

    #[test]
    fn text_ids_are_kept_verbatim() {
        let id = FeatureId::parse(FeatureType::OldZone, "A-12").unwrap();
        assert_eq!(id.to_string(), "A-12");
    }
}
