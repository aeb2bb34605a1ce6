use std::sync::Arc;

use tracing::debug;

use crate::geom::{BoundingBox, Centroid, SpatialIndex, distance_km};
use crate::layer::{Feature, FeatureCollection, FeatureId, FeatureType};
use crate::store::Layers;

/// Floating-point slack on the radius comparison, in kilometres.
pub const DISTANCE_TOLERANCE_KM: f64 = 1e-9;

/// "Which features of `target_type` lie within `radius_km` of the anchor's centroid".
/// Recomputed from scratch whenever the anchor or radius changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusQuery {
    pub anchor_id: FeatureId,
    pub radius_km: f64,
    pub target_type: FeatureType,
}

impl RadiusQuery {
    pub fn new(anchor_id: FeatureId, radius_km: f64, target_type: FeatureType) -> Self {
        Self { anchor_id, radius_km, target_type }
    }

    /// Collection the anchor is looked up in.
    #[inline] pub fn anchor_type(&self) -> FeatureType { self.anchor_id.ty }

    /// Run against a layer snapshot. None if the anchor id is not in its collection.
    /// A zone split over several features is measured from the centroid of all its parts.
    pub fn run(&self, layers: &Layers) -> Option<FeatureCollection> {
        let anchors = layers.collection(self.anchor_type());
        if !anchors.contains(&self.anchor_id) {
            debug!(anchor = %self.anchor_id, "anchor not found");
            return None;
        }

        let index = layers.layer(self.target_type);
        Some(query_around(anchors.centroid_of(&self.anchor_id), self.radius_km, index.collection(), Some(index)))
    }
}

/// Candidates for a radius search: features whose bounding box meets the search box.
/// The index is only consulted if it was built over `target` itself.
pub fn prefilter<'a>(
    center: Centroid,
    radius_km: f64,
    target: &'a FeatureCollection,
    index: Option<&'a SpatialIndex>,
) -> Vec<&'a Arc<Feature>> {
    let search_box = BoundingBox::around(center, radius_km);
    match index {
        Some(index) if std::ptr::eq(index.collection().as_ref(), target) => index.search(&search_box),
        Some(_) => {
            debug!(target = target.name(), "index does not cover target, scanning");
            target.iter().collect()
        }
        None => target.iter().collect(),
    }
}

/// Features of `target` whose centroid lies in the degrees-per-km box around the anchor's
/// centroid and within `radius_km` great-circle distance of it, in target order.
pub fn query(
    anchor: &Feature,
    radius_km: f64,
    target: &FeatureCollection,
    index: Option<&SpatialIndex>,
) -> FeatureCollection {
    query_around(anchor.centroid(), radius_km, target, index)
}

/// As `query`, from an already computed centre. No centre means nothing is in range.
pub fn query_around(
    center: Option<Centroid>,
    radius_km: f64,
    target: &FeatureCollection,
    index: Option<&SpatialIndex>,
) -> FeatureCollection {
    let Some(center) = center else {
        debug!(target = target.name(), "anchor has no geometry, nothing in range");
        return FeatureCollection::empty(target.name());
    };

    let search_box = BoundingBox::around(center, radius_km);
    let features = prefilter(center, radius_km, target, index).into_iter()
        .filter(|feature| feature.centroid().is_some_and(|c| {
            search_box.contains(c) && distance_km(center, c) <= radius_km + DISTANCE_TOLERANCE_KM
        }))
        .cloned()
        .collect::<Vec<_>>();

    debug!(target = target.name(), radius_km, found = features.len(), "radius query");
    FeatureCollection::new(target.name(), features)
}
