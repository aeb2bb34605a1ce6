use crate::layer::{FeatureCollection, FeatureId, FeatureType, Record};
use super::selection::SelectionSet;

/// Independent highlight sets of the selectable views.
/// The old-zone view has none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub new_zones: SelectionSet,
    pub blocks: SelectionSet,
}

impl Selections {
    /// Selection set of a feature type, if that type is selectable.
    pub fn get(&self, ty: FeatureType) -> Option<&SelectionSet> {
        match ty {
            FeatureType::OldZone => None,
            FeatureType::NewZone => Some(&self.new_zones),
            FeatureType::Block => Some(&self.blocks),
        }
    }

    /// Toggle `id` in the set matching its type. Old-zone ids are ignored (returns None).
    pub fn toggle(&mut self, id: FeatureId) -> Option<bool> {
        match id.ty {
            FeatureType::OldZone => None,
            FeatureType::NewZone => Some(self.new_zones.toggle(id)),
            FeatureType::Block => Some(self.blocks.toggle(id)),
        }
    }

    /// Clear every set (a new search started).
    pub fn clear(&mut self) {
        self.new_zones.clear();
        self.blocks.clear();
    }

    /// Blocks whose `taz_id` names a selected new zone.
    pub fn linked_blocks(&self, blocks: &FeatureCollection) -> SelectionSet {
        if self.new_zones.is_empty() {
            return SelectionSet::new();
        }
        blocks.iter()
            .filter(|block| match block.record() {
                Record::Block { taz_id: Some(zone), .. } => self.new_zones.contains(zone),
                _ => false,
            })
            .filter_map(|block| block.id().cloned())
            .collect()
    }
}
