use std::sync::Arc;

use tracing::debug;

use crate::geom::Centroid;
use crate::layer::{Feature, FeatureCollection, FeatureId, FeatureType};
use crate::store::Layers;
use super::radius::query_around;

/// The searched zone and its neighbours in the same collection.
#[derive(Debug, Clone, Default)]
pub struct TargetAndOthers {
    /// Every old zone carrying the anchor id (a zone may be split over several features).
    pub target: Vec<Arc<Feature>>,
    /// Other old zones within the radius, in collection order.
    pub others: Vec<Arc<Feature>>,
}

impl Layers {
    /// Split the old-zone collection around `anchor_id`: the anchor's own features,
    /// and the remaining old zones within `radius_km` of the anchor's centroid.
    pub fn target_and_others(&self, anchor_id: &FeatureId, radius_km: f64) -> Option<TargetAndOthers> {
        let center = self.anchor_center(anchor_id)?;
        let zones = self.layer(FeatureType::OldZone);

        let (target, _) = zones.collection().partition_by_id(anchor_id);
        let others = query_around(center, radius_km, zones.collection(), Some(zones))
            .iter()
            .filter(|f| f.id() != Some(anchor_id))
            .cloned()
            .collect();

        Some(TargetAndOthers { target, others })
    }

    /// Features of `target_type` within `radius_km` of the old zone `anchor_id`.
    /// None if the anchor does not exist.
    pub fn related(&self, target_type: FeatureType, anchor_id: &FeatureId, radius_km: f64) -> Option<FeatureCollection> {
        let center = self.anchor_center(anchor_id)?;
        let index = self.layer(target_type);
        Some(query_around(center, radius_km, index.collection(), Some(index)))
    }

    /// Centroid of every part of the old zone `anchor_id`.
    /// Outer None if the zone does not exist; inner None if it has no geometry.
    pub(crate) fn anchor_center(&self, anchor_id: &FeatureId) -> Option<Option<Centroid>> {
        let zones = self.collection(FeatureType::OldZone);
        if !zones.contains(anchor_id) {
            debug!(anchor = %anchor_id, "old zone not found");
            return None;
        }
        Some(zones.centroid_of(anchor_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square(id: u32, lng: f64, lat: f64, size: f64) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": { "TAZ_ID": id, "OBJECTID": id * 10 },
            "geometry": { "type": "Polygon", "coordinates": [[
                [lng, lat], [lng + size, lat], [lng + size, lat + size], [lng, lat + size], [lng, lat],
            ]] },
        })
    }

    fn layers() -> Layers {
        let old = json!({ "type": "FeatureCollection", "features": [
            square(500, -71.06, 42.36, 0.001),
            square(501, -71.05, 42.36, 0.001),   // ~0.8 km east
            square(502, -70.50, 42.36, 0.001),   // far away
            square(500, -71.06, 42.37, 0.0005),  // second part of 500
        ]});
        let new = json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "TAZ_NEW1": 7 },
              "geometry": { "type": "Polygon", "coordinates": [[[-71.061, 42.359], [-71.058, 42.359], [-71.058, 42.362], [-71.061, 42.359]]] } },
        ]});
        Layers::from_collections(
            FeatureCollection::from_geojson(FeatureType::OldZone, &old).unwrap(),
            FeatureCollection::from_geojson(FeatureType::NewZone, &new).unwrap(),
            FeatureCollection::empty("block"),
        )
    }

    #[test]
    fn target_holds_every_part_of_the_anchor() {
        let layers = layers();
        let anchor = FeatureId::new(FeatureType::OldZone, "500");
        let split = layers.target_and_others(&anchor, 1.60934).unwrap();
        assert_eq!(split.target.len(), 2);
        let others = split.others.iter().filter_map(|f| f.id()).map(|id| id.id()).collect::<Vec<_>>();
        assert_eq!(others, vec!["501"]);
    }

    #[test]
    fn related_finds_new_zones_and_tolerates_empty_blocks() {
        let layers = layers();
        let anchor = FeatureId::new(FeatureType::OldZone, "500");
        assert_eq!(layers.related(FeatureType::NewZone, &anchor, 1.0).unwrap().len(), 1);
        assert!(layers.related(FeatureType::Block, &anchor, 1.0).unwrap().is_empty());
    }

    #[test]
    fn split_anchor_uses_the_centroid_of_all_parts() {
        // 600 is a sliver plus a large part ~3 km north; new zone 8 sits at their joint centroid
        let old = json!({ "type": "FeatureCollection", "features": [
            square(600, -71.06, 42.36, 0.0001),
            square(600, -71.06, 42.387, 0.03),
        ]});
        let old = FeatureCollection::from_geojson(FeatureType::OldZone, &old).unwrap();
        let anchor = FeatureId::new(FeatureType::OldZone, "600");
        let center = old.centroid_of(&anchor).unwrap();
        let new = json!({ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "TAZ_NEW1": 8 },
              "geometry": { "type": "Polygon", "coordinates": [[
                  [center.x(), center.y()], [center.x() + 0.0001, center.y()],
                  [center.x(), center.y() + 0.0001], [center.x(), center.y()],
              ]] } },
        ]});
        let layers = Layers::from_collections(
            old,
            FeatureCollection::from_geojson(FeatureType::NewZone, &new).unwrap(),
            FeatureCollection::empty("block"),
        );

        assert_eq!(layers.related(FeatureType::NewZone, &anchor, 1.0).unwrap().len(), 1);
        let search = layers.search(&anchor, 1.0).unwrap();
        assert_eq!(search.center, Some(center));
        assert_eq!(search.target.len(), 2);
    }

    #[test]
    fn unknown_anchor_is_none() {
        let layers = layers();
        let missing = FeatureId::new(FeatureType::OldZone, "999");
        assert!(layers.target_and_others(&missing, 1.0).is_none());
        assert!(layers.related(FeatureType::NewZone, &missing, 1.0).is_none());
    }
}
