use serde::{Deserialize, Serialize};

use crate::geom::BoundingBox;
use crate::layer::{FeatureCollection, FeatureType};
use crate::query::SearchResult;
use crate::select::{SelectionSet, Selections};
use super::compose::{bounds_of, dedup_by_id, union};
use super::table::{TableRow, table};

/// The six synchronized panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    OldZoneMap,
    NewZoneMap,
    CombinedMap,
    BlockMap,
    NewZoneTable,
    BlockTable,
}

impl View {
    pub const ALL: [View; 6] = [
        View::OldZoneMap, View::NewZoneMap, View::CombinedMap,
        View::BlockMap, View::NewZoneTable, View::BlockTable,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            View::OldZoneMap => "old_zone_map",
            View::NewZoneMap => "new_zone_map",
            View::CombinedMap => "combined_map",
            View::BlockMap => "block_map",
            View::NewZoneTable => "new_zone_table",
            View::BlockTable => "block_table",
        }
    }

    /// Layers drawn by this panel, bottom to top.
    pub fn layers(&self) -> &'static [FeatureType] {
        match self {
            View::OldZoneMap => &[FeatureType::OldZone],
            View::NewZoneMap | View::NewZoneTable => &[FeatureType::NewZone],
            View::CombinedMap => &[FeatureType::Block, FeatureType::NewZone, FeatureType::OldZone],
            View::BlockMap | View::BlockTable => &[FeatureType::Block],
        }
    }

    /// Feature type a tap on this panel selects, if any.
    pub fn selectable(&self) -> Option<FeatureType> {
        match self {
            View::NewZoneMap | View::NewZoneTable => Some(FeatureType::NewZone),
            View::BlockMap | View::BlockTable => Some(FeatureType::Block),
            View::OldZoneMap | View::CombinedMap => None,
        }
    }

    /// Layer ids a hit test on this panel should consider.
    pub fn hit_layer_ids(&self) -> Vec<&'static str> {
        self.selectable().map(|ty| vec![ty.layer_id()]).unwrap_or_default()
    }

    #[inline] pub fn is_table(&self) -> bool { matches!(self, View::NewZoneTable | View::BlockTable) }
}

/// One drawn layer of a panel.
#[derive(Debug, Clone)]
pub struct PanelLayer {
    pub ty: FeatureType,
    pub features: FeatureCollection,
}

/// What a renderer needs for one panel: its layers, highlights, bounds and table.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub view: View,
    pub layers: Vec<PanelLayer>,
    /// Ids drawn highlighted (the panel's own selection).
    pub highlight: SelectionSet,
    /// Blocks outlined because their new zone is selected (block panels only).
    pub linked: SelectionSet,
    pub bounds: Option<BoundingBox>,
    /// Rows for table panels, empty for maps.
    pub rows: Vec<TableRow>,
}

impl PanelView {
    /// Compose `view` from a search result and the current selections.
    pub fn compose(view: View, result: &SearchResult, selections: &Selections) -> Self {
        let layers = view.layers().iter()
            .map(|&ty| PanelLayer { ty, features: layer_features(ty, result) })
            .collect::<Vec<_>>();

        let drawn = union(&layers.iter().map(|l| &l.features).collect::<Vec<_>>());
        let bounds = bounds_of(&drawn);

        let highlight = view.selectable()
            .and_then(|ty| selections.get(ty))
            .cloned()
            .unwrap_or_default();

        let linked = match view {
            View::BlockMap | View::BlockTable => selections.linked_blocks(&result.blocks),
            _ => SelectionSet::new(),
        };

        let rows = match view {
            View::NewZoneTable => table(&result.new_zones, &selections.new_zones),
            View::BlockTable => table(&result.blocks, &selections.blocks),
            _ => Vec::new(),
        };

        Self { view, layers, highlight, linked, bounds, rows }
    }

    /// An empty panel (before any search, or after a miss).
    pub fn empty(view: View) -> Self {
        let rows = if view.is_table() { table(&FeatureCollection::empty(""), &SelectionSet::new()) } else { Vec::new() };
        Self {
            view,
            layers: Vec::new(),
            highlight: SelectionSet::new(),
            linked: SelectionSet::new(),
            bounds: None,
            rows,
        }
    }

    /// Total number of drawn features.
    pub fn feature_count(&self) -> usize { self.layers.iter().map(|l| l.features.len()).sum() }
}

/// Result features drawn for a layer; old zones show the anchor and its neighbours once each.
fn layer_features(ty: FeatureType, result: &SearchResult) -> FeatureCollection {
    match ty {
        FeatureType::OldZone => dedup_by_id(&union(&[&result.target, &result.others])),
        FeatureType::NewZone => result.new_zones.clone(),
        FeatureType::Block => result.blocks.clone(),
    }
}
