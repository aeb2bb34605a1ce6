use serde::{Deserialize, Serialize};

/// The three source collections under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    OldZone,    // Zone being reviewed (search anchor)
    NewZone,    // Competing delineation
    Block,      // Census block, finest level
}

impl FeatureType {
    pub const ALL: [FeatureType; 3] = [FeatureType::OldZone, FeatureType::NewZone, FeatureType::Block];

    pub fn to_str(&self) -> &'static str {
        match self {
            FeatureType::OldZone => "old_zone",
            FeatureType::NewZone => "new_zone",
            FeatureType::Block => "block",
        }
    }

    /// Key under which the normalized collection is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            FeatureType::OldZone => "old_taz_geojson",
            FeatureType::NewZone => "new_taz_geojson",
            FeatureType::Block => "blocks_geojson",
        }
    }

    /// Layer id used by the map widget when hit testing.
    pub fn layer_id(&self) -> &'static str {
        match self {
            FeatureType::OldZone => "old-taz",
            FeatureType::NewZone => "new-taz",
            FeatureType::Block => "blocks",
        }
    }

    /// Canonical property holding the feature identifier (after normalization).
    pub fn id_key(&self) -> &'static str {
        match self {
            FeatureType::OldZone | FeatureType::NewZone => "taz_id",
            FeatureType::Block => "geoid20",
        }
    }

    /// Parse a user-facing name, e.g. from the command line.
    pub fn parse(s: &str) -> Option<FeatureType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old_zone" | "old" | "old_taz" => Some(FeatureType::OldZone),
            "new_zone" | "new" | "new_taz" => Some(FeatureType::NewZone),
            "block" | "blocks" => Some(FeatureType::Block),
            _ => None,
        }
    }
}
