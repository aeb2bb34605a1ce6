use ahash::AHashSet;
use serde::Serialize;

use crate::layer::{Demographics, FeatureCollection};
use crate::select::SelectionSet;

/// Label of the trailing totals row.
pub const SUM_LABEL: &str = "Sum";

/// One row of a demographics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    #[serde(flatten)]
    pub demographics: Demographics,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_sum: bool,
}

/// Rows for the selected features of `features`, in collection order, followed by a `Sum` row.
/// Each selected id contributes once. With nothing selected the table is just a zero `Sum` row.
pub fn table(features: &FeatureCollection, selection: &SelectionSet) -> Vec<TableRow> {
    let mut seen = AHashSet::new();
    let mut rows = features.iter()
        .filter(|f| f.id().is_some_and(|id| selection.contains(id) && seen.insert(id.clone())))
        .map(|f| TableRow {
            label: f.label(),
            demographics: f.record().demographics().copied().unwrap_or_default(),
            is_sum: false,
        })
        .collect::<Vec<_>>();

    let total: Demographics = rows.iter().map(|row| &row.demographics).sum();
    rows.push(TableRow { label: SUM_LABEL.to_string(), demographics: total, is_sum: true });
    rows
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::layer::{FeatureId, FeatureType};
    use super::*;

    fn blocks() -> FeatureCollection {
        FeatureCollection::from_geojson(FeatureType::Block, &json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "GEOID20": "250177401001234", "HH19": 3, "EMP49": "2.5" }, "geometry": null },
            { "type": "Feature", "properties": { "GEOID20": "250177401005678", "HH19": 4 }, "geometry": null },
            { "type": "Feature", "properties": { "GEOID20": "250177401009999", "HH19": 100 }, "geometry": null },
            { "type": "Feature", "properties": { "GEOID20": "250177401001234", "HH19": 50 }, "geometry": null },
        ]})).unwrap()
    }

    fn block(id: &str) -> FeatureId { FeatureId::new(FeatureType::Block, id) }

    #[test]
    fn empty_selection_is_just_the_sum_row() {
        let rows = table(&blocks(), &SelectionSet::new());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_sum);
        assert_eq!(rows[0].label, "Sum");
        assert_eq!(rows[0].demographics, Demographics::default());
    }

    #[test]
    fn rows_follow_collection_order_and_sum() {
        let selection = SelectionSet::from_iter([block("250177401005678"), block("250177401001234")]);
        let rows = table(&blocks(), &selection);
        let labels = rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["1234", "5678", "Sum"]);

        let sum = &rows[2].demographics;
        assert_eq!(sum.hh19, 7.0);
        assert_eq!(sum.emp49, 2.5);
    }

    #[test]
    fn sum_row_serializes_flat() {
        let rows = table(&blocks(), &SelectionSet::new());
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["label"], "Sum");
        assert_eq!(value["hh19"], 0.0);
        assert_eq!(value["is_sum"], true);
    }
}
