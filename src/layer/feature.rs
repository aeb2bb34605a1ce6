use geo::{CoordsIter, MultiPolygon};
use serde_json::{Map, Value, json};

use crate::common::io::geometry_to_geojson;
use super::{feature_id::FeatureId, feature_type::FeatureType, normalize::normalize_properties, record::Record};

/// Geometry type of the source feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
    Missing, // null, absent, or unreadable geometry
}

/// A single zone or block: immutable once loaded.
#[derive(Debug, Clone)]
pub struct Feature {
    ty: FeatureType,
    id: Option<FeatureId>,
    kind: GeometryKind,
    shape: MultiPolygon<f64>,
    properties: Map<String, Value>, // normalized, kept for export and hit results
    record: Record,
}

impl Feature {
    /// Build a feature from an already normalized property bag.
    pub fn new(ty: FeatureType, kind: GeometryKind, shape: MultiPolygon<f64>, properties: Map<String, Value>) -> Self {
        Self {
            ty,
            id: FeatureId::from_properties(ty, &properties),
            record: Record::from_properties(ty, &properties),
            kind,
            shape,
            properties,
        }
    }

    /// Build a feature from raw source properties, normalizing them first.
    pub fn from_raw(ty: FeatureType, kind: GeometryKind, shape: MultiPolygon<f64>, raw: &Map<String, Value>) -> Self {
        Self::new(ty, kind, shape, normalize_properties(ty, raw))
    }

    #[inline] pub fn ty(&self) -> FeatureType { self.ty }

    #[inline] pub fn id(&self) -> Option<&FeatureId> { self.id.as_ref() }

    #[inline] pub fn kind(&self) -> GeometryKind { self.kind }

    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    #[inline] pub fn properties(&self) -> &Map<String, Value> { &self.properties }

    #[inline] pub fn record(&self) -> &Record { &self.record }

    /// True if the feature has no coordinates at all.
    #[inline] pub fn is_empty(&self) -> bool { self.shape.coords_count() == 0 }

    /// Display label: the block label for blocks, the id otherwise.
    pub fn label(&self) -> String {
        match &self.record {
            Record::Block { block_label: Some(label), .. } => label.to_string(),
            _ => self.id.as_ref().map(|id| id.id().to_string()).unwrap_or_default(),
        }
    }

    /// Export as a GeoJSON Feature.
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": geometry_to_geojson(self.kind, &self.shape),
            "properties": self.properties,
        })
    }
}
