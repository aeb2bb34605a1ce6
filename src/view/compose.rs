use std::sync::Arc;

use ahash::AHashSet;

use crate::geom::BoundingBox;
use crate::layer::{Feature, FeatureCollection};

/// Concatenate collections in order. Duplicates are kept: a feature in two inputs appears twice.
pub fn union(collections: &[&FeatureCollection]) -> FeatureCollection {
    let name = collections.iter().map(|c| c.name()).collect::<Vec<_>>().join("+");
    let features = collections.iter()
        .flat_map(|c| c.iter().cloned())
        .collect();
    FeatureCollection::new(&name, features)
}

/// Keep the first feature per id. Features without an id are all kept.
pub fn dedup_by_id(collection: &FeatureCollection) -> FeatureCollection {
    let mut seen = AHashSet::new();
    let features = collection.iter()
        .filter(|f| f.id().is_none_or(|id| seen.insert(id.clone())))
        .cloned()
        .collect();
    FeatureCollection::new(collection.name(), features)
}

/// Bounding box of every feature with coordinates. None if there are none,
/// in which case the camera should stay where it is.
pub fn bounds_of<'a>(features: impl IntoIterator<Item = &'a Arc<Feature>>) -> Option<BoundingBox> {
    features.into_iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.bounding_box())
        .reduce(|a, b| a.union(&b))
}

/// Camera target for `bounds`: each side pushed out by `margin` of the extent,
/// or by `pad` degrees on an axis with no extent.
#[inline]
pub fn fit(bounds: &BoundingBox, margin: f64, pad: f64) -> BoundingBox {
    bounds.expand(margin, pad)
}
