use ahash::AHashSet;

use crate::layer::FeatureId;

/// The ids highlighted in one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: AHashSet<FeatureId>,
}

impl SelectionSet {
    pub fn new() -> Self { Self::default() }

    /// Flip membership of `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: FeatureId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Copy of this set with membership of `id` flipped.
    pub fn toggled(&self, id: FeatureId) -> Self {
        let mut next = self.clone();
        next.toggle(id);
        next
    }

    #[inline] pub fn clear(&mut self) { self.ids.clear() }

    #[inline] pub fn contains(&self, id: &FeatureId) -> bool { self.ids.contains(id) }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Selected ids in unspecified order.
    #[inline] pub fn iter(&self) -> impl Iterator<Item = &FeatureId> { self.ids.iter() }

    /// Selected ids, sorted.
    pub fn sorted(&self) -> Vec<FeatureId> {
        let mut ids = self.ids.iter().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }
}

impl FromIterator<FeatureId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = FeatureId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
