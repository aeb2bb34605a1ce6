use std::{iter::Sum, ops::Add, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{feature_id::FeatureId, feature_type::FeatureType};

/// Household, employment, population and worker counts for the base (19) and horizon (49) years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub hh19: f64,
    pub hh49: f64,
    pub emp19: f64,
    pub emp49: f64,
    pub persns19: f64,
    pub persns49: f64,
    pub workrs19: f64,
    pub workrs49: f64,
}

impl Demographics {
    pub const FIELDS: [&'static str; 8] = ["hh19", "hh49", "emp19", "emp49", "persns19", "persns49", "workrs19", "workrs49"];

    /// Read the eight fields from a normalized property bag.
    /// Missing or non-numeric values count as zero; numeric strings are parsed.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let get = |key: &str| properties.get(key).map_or(0.0, numeric);
        Self {
            hh19: get("hh19"),
            hh49: get("hh49"),
            emp19: get("emp19"),
            emp49: get("emp49"),
            persns19: get("persns19"),
            persns49: get("persns49"),
            workrs19: get("workrs19"),
            workrs49: get("workrs49"),
        }
    }

    /// Values in the order of `FIELDS`.
    pub fn values(&self) -> [f64; 8] {
        [self.hh19, self.hh49, self.emp19, self.emp49, self.persns19, self.persns49, self.workrs19, self.workrs49]
    }
}

impl Add for Demographics {
    type Output = Demographics;

    fn add(self, rhs: Demographics) -> Demographics {
        Demographics {
            hh19: self.hh19 + rhs.hh19,
            hh49: self.hh49 + rhs.hh49,
            emp19: self.emp19 + rhs.emp19,
            emp49: self.emp49 + rhs.emp49,
            persns19: self.persns19 + rhs.persns19,
            persns49: self.persns49 + rhs.persns49,
            workrs19: self.workrs19 + rhs.workrs19,
            workrs49: self.workrs49 + rhs.workrs49,
        }
    }
}

impl Sum for Demographics {
    fn sum<I: Iterator<Item = Demographics>>(iter: I) -> Self {
        iter.fold(Demographics::default(), Add::add)
    }
}

impl<'a> Sum<&'a Demographics> for Demographics {
    fn sum<I: Iterator<Item = &'a Demographics>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Typed attributes of a feature, derived from its normalized property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    OldZone {
        object_id: Option<i64>,
    },
    NewZone {
        demographics: Demographics,
    },
    Block {
        block_label: Option<Arc<str>>,
        taz_id: Option<FeatureId>, // New zone the block belongs to
        demographics: Demographics,
    },
}

impl Record {
    pub fn from_properties(ty: FeatureType, properties: &Map<String, Value>) -> Self {
        match ty {
            FeatureType::OldZone => Record::OldZone {
                object_id: properties.get("object_id").and_then(|v| {
                    v.as_i64().or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                }),
            },
            FeatureType::NewZone => Record::NewZone {
                demographics: Demographics::from_properties(properties),
            },
            FeatureType::Block => Record::Block {
                block_label: properties.get("block_label").and_then(Value::as_str).map(Arc::from),
                taz_id: properties.get("taz_id").and_then(|v| FeatureId::from_value(FeatureType::NewZone, v)),
                demographics: Demographics::from_properties(properties),
            },
        }
    }

    /// Demographic counts, if this feature type carries them.
    pub fn demographics(&self) -> Option<&Demographics> {
        match self {
            Record::OldZone { .. } => None,
            Record::NewZone { demographics } | Record::Block { demographics, .. } => Some(demographics),
        }
    }
}

/// Numeric value of a JSON scalar, zero if it has none.
fn numeric(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn demographics_tolerate_strings_and_gaps() {
        let d = Demographics::from_properties(&props(json!({ "hh19": 10, "emp19": "2.5", "hh49": null, "persns19": "n/a" })));
        assert_eq!(d.hh19, 10.0);
        assert_eq!(d.emp19, 2.5);
        assert_eq!(d.hh49, 0.0);
        assert_eq!(d.persns19, 0.0);
        assert_eq!(d.workrs49, 0.0);
    }

    #[test]
    fn demographics_sum_elementwise() {
        let a = Demographics { hh19: 1.0, workrs49: 2.0, ..Default::default() };
        let b = Demographics { hh19: 3.0, emp49: 5.0, ..Default::default() };
        let total: Demographics = [a, b].iter().sum();
        assert_eq!(total.values(), [4.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn block_record_links_to_new_zone() {
        let record = Record::from_properties(
            FeatureType::Block,
            &props(json!({ "geoid20": 250177401001234_i64, "block_label": "1234", "taz_id": "77", "hh19": 4 })),
        );
        match record {
            Record::Block { block_label, taz_id, demographics } => {
                assert_eq!(block_label.as_deref(), Some("1234"));
                assert_eq!(taz_id, Some(FeatureId::new(FeatureType::NewZone, "77")));
                assert_eq!(demographics.hh19, 4.0);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn old_zone_has_no_demographics() {
        let record = Record::from_properties(FeatureType::OldZone, &props(json!({ "object_id": "9" })));
        assert_eq!(record, Record::OldZone { object_id: Some(9) });
        assert!(record.demographics().is_none());
    }
}
