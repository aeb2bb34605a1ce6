use crate::geom::Centroid;
use crate::layer::{FeatureCollection, FeatureId, FeatureType};
use crate::store::Layers;

/// Everything one search produces: the anchor zone, its neighbours, and the related
/// new zones and blocks, all within the same radius of the anchor's centroid.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub anchor: FeatureId,
    pub radius_km: f64,
    pub center: Option<Centroid>,
    pub target: FeatureCollection,
    pub others: FeatureCollection,
    pub new_zones: FeatureCollection,
    pub blocks: FeatureCollection,
}

impl SearchResult {
    /// Result collection of a given type (the anchor's own features for old zones).
    pub fn collection(&self, ty: FeatureType) -> &FeatureCollection {
        match ty {
            FeatureType::OldZone => &self.target,
            FeatureType::NewZone => &self.new_zones,
            FeatureType::Block => &self.blocks,
        }
    }
}

impl Layers {
    /// Run every radius query for the old zone `anchor_id`. None if the zone does not exist.
    pub fn search(&self, anchor_id: &FeatureId, radius_km: f64) -> Option<SearchResult> {
        let split = self.target_and_others(anchor_id, radius_km)?;
        let center = self.collection(FeatureType::OldZone).centroid_of(anchor_id);

        Some(SearchResult {
            anchor: anchor_id.clone(),
            radius_km,
            center,
            target: FeatureCollection::new(FeatureType::OldZone.to_str(), split.target),
            others: FeatureCollection::new(FeatureType::OldZone.to_str(), split.others),
            new_zones: self.related(FeatureType::NewZone, anchor_id, radius_km)?,
            blocks: self.related(FeatureType::Block, anchor_id, radius_km)?,
        })
    }
}
