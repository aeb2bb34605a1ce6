use std::{collections::HashMap, sync::Arc};

use anyhow::{Result, anyhow};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::common::io::{parse_geometry, read_feature_collection_bytes};
use super::{feature::Feature, feature_id::FeatureId, feature_type::FeatureType, normalize::normalize_properties};

/// A named, ordered sequence of features with an id lookup.
/// Source collections hold one feature type; derived collections (unions) may mix types.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    name: Arc<str>,
    features: Vec<Arc<Feature>>,
    index: HashMap<FeatureId, u32>, // first position of each id
}

impl FeatureCollection {
    pub fn new(name: &str, features: Vec<Arc<Feature>>) -> Self {
        let mut index = HashMap::with_capacity(features.len());
        for (i, feature) in features.iter().enumerate() {
            if let Some(id) = feature.id() {
                index.entry(id.clone()).or_insert(i as u32);
            }
        }
        Self { name: Arc::from(name), features, index }
    }

    /// An empty collection with the given name.
    pub fn empty(name: &str) -> Self { Self::new(name, Vec::new()) }

    /// Build a normalized collection of type `ty` from a parsed GeoJSON FeatureCollection.
    /// Features with unreadable geometry are kept with an empty shape (and logged).
    pub fn from_geojson(ty: FeatureType, geojson: &Value) -> Result<Self> {
        let features = geojson.get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("[FeatureCollection.from_geojson] {} input has no features array", ty.to_str()))?;

        let mut missing = 0usize;
        let features = features.iter().enumerate().map(|(i, feature)| {
            let properties = feature.get("properties")
                .and_then(Value::as_object)
                .map(|raw| normalize_properties(ty, raw))
                .unwrap_or_default();

            let (kind, shape) = parse_geometry(feature.get("geometry")).unwrap_or_else(|e| {
                warn!(layer = ty.to_str(), feature = i, error = %e, "unreadable geometry, treating as empty");
                (super::GeometryKind::Missing, geo::MultiPolygon(vec![]))
            });

            let feature = Feature::new(ty, kind, shape, properties);
            if feature.id().is_none() { missing += 1 }
            Arc::new(feature)
        }).collect::<Vec<_>>();

        if missing > 0 {
            warn!(layer = ty.to_str(), missing, "features without an {} property", ty.id_key());
        }
        debug!(layer = ty.to_str(), features = features.len(), "loaded collection");

        Ok(Self::new(ty.to_str(), features))
    }

    /// Parse GeoJSON bytes and build a normalized collection of type `ty`.
    pub fn from_geojson_bytes(ty: FeatureType, bytes: &[u8]) -> Result<Self> {
        Self::from_geojson(ty, &read_feature_collection_bytes(bytes)?)
    }

    /// Export as a GeoJSON FeatureCollection (with normalized properties).
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(|f| f.to_geojson()).collect::<Vec<_>>(),
        })
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Arc<Feature>] { &self.features }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Arc<Feature>> { self.features.iter() }

    /// Get a feature by position.
    #[inline] pub fn get(&self, idx: usize) -> Option<&Arc<Feature>> { self.features.get(idx) }

    /// Find the first feature with the given id.
    #[inline]
    pub fn find(&self, id: &FeatureId) -> Option<&Arc<Feature>> {
        self.index.get(id).map(|&i| &self.features[i as usize])
    }

    /// Check whether any feature carries the given id.
    #[inline] pub fn contains(&self, id: &FeatureId) -> bool { self.index.contains_key(id) }

    /// Split into (features with the given id, all other features), preserving order.
    pub fn partition_by_id(&self, id: &FeatureId) -> (Vec<Arc<Feature>>, Vec<Arc<Feature>>) {
        self.features.iter().cloned().partition(|f| f.id() == Some(id))
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Arc<Feature>;
    type IntoIter = std::slice::Iter<'a, Arc<Feature>>;

    fn into_iter(self) -> Self::IntoIter { self.features.iter() }
}
