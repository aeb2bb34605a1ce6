use std::sync::Arc;

use rstar::{AABB, RStarInsertionStrategy, RTree, RTreeObject, RTreeParams};

use crate::layer::{Feature, FeatureCollection};
use super::bbox::BoundingBox;

/// R-tree node capacity: at most 16 children per node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Branching16;

impl RTreeParams for Branching16 {
    const MIN_SIZE: usize = 6;
    const MAX_SIZE: usize = 16;
    const REINSERTION_COUNT: usize = 4;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

/// A bounding box in the R-tree, associated with a feature by position.
#[derive(Debug, Clone)]
pub(crate) struct IndexEntry {
    idx: u32, // Position of the owning feature in the indexed collection
    bbox: BoundingBox,
}

impl IndexEntry {
    /// Get the position of the owning feature.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx as usize }
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.bbox.to_aabb() }
}

/// Bulk-loaded bounding-box index over one collection, used as a cheap pre-filter.
/// Holds a shared reference to the collection it indexes; rebuild it when the collection is replaced.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    collection: Arc<FeatureCollection>,
    rtree: RTree<IndexEntry, Branching16>,
}

impl SpatialIndex {
    /// Index every feature that has coordinates.
    pub fn build(collection: Arc<FeatureCollection>) -> Self {
        let entries = collection.iter().enumerate()
            .filter(|(_, feature)| !feature.is_empty())
            .map(|(i, feature)| IndexEntry { idx: i as u32, bbox: feature.bounding_box() })
            .collect();

        Self { rtree: RTree::bulk_load_with_params(entries), collection }
    }

    /// Get the indexed collection.
    #[inline] pub fn collection(&self) -> &Arc<FeatureCollection> { &self.collection }

    /// Number of indexed features (features without coordinates are skipped).
    #[inline] pub fn len(&self) -> usize { self.rtree.size() }

    /// Check if nothing is indexed.
    #[inline] pub fn is_empty(&self) -> bool { self.rtree.size() == 0 }

    /// Positions of features whose bounding box intersects `query`, in collection order.
    pub(crate) fn search_indices(&self, query: &BoundingBox) -> Vec<usize> {
        let mut indices = self.rtree
            .locate_in_envelope_intersecting(&query.to_aabb())
            .map(IndexEntry::idx)
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    /// Features whose bounding box intersects `query`: a superset of any exact spatial filter inside it.
    pub fn search(&self, query: &BoundingBox) -> Vec<&Arc<Feature>> {
        self.search_indices(query).into_iter()
            .filter_map(|i| self.collection.get(i))
            .collect()
    }
}
