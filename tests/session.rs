use std::sync::Arc;

use geo::Point;
use serde_json::{Map, Value, json};
use tazview::{
    Catalog, DiskStore, FeatureId, FeatureType, HitTest, SearchStatus, Session, Settings, Store, View,
};

fn square(properties: Value, lng: f64, lat: f64, size: f64) -> Value {
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": { "type": "Polygon", "coordinates": [[
            [lng, lat], [lng + size, lat], [lng + size, lat + size], [lng, lat + size], [lng, lat],
        ]] },
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}

fn import(catalog: &Catalog) {
    catalog.replace(FeatureType::OldZone, &collection(vec![
        square(json!({ "TAZ_ID": 500, "OBJECTID": 1 }), -71.060, 42.360, 0.002),
        square(json!({ "TAZ_ID": 501, "OBJECTID": 2 }), -71.050, 42.360, 0.002),
    ])).unwrap();
    catalog.replace(FeatureType::NewZone, &collection(vec![
        square(json!({ "TAZ_NEW1": 7, "HH19": 10, "EMP19": 5 }), -71.060, 42.360, 0.001),
        square(json!({ "TAZ_NEW1": 8, "HH19": 20, "EMP19": 1 }), -71.059, 42.360, 0.001),
    ])).unwrap();
    catalog.replace(FeatureType::Block, &collection(vec![
        square(json!({ "GEOID20": "250250001001001", "TAZ_ID0": 7, "HH19": 4 }), -71.0600, 42.3600, 0.0005),
        square(json!({ "GEOID20": "250250001001002", "TAZ_ID0": 7, "HH19": 6 }), -71.0595, 42.3600, 0.0005),
        square(json!({ "GEOID20": "250250001001003", "TAZ_ID0": 8, "HH19": 20 }), -71.0590, 42.3600, 0.0005),
    ])).unwrap();
}

/// Returns a fixed feature for whichever layer is asked about first.
struct Hits(Vec<(&'static str, Map<String, Value>)>);

impl HitTest for Hits {
    fn topmost(&self, _point: Point<f64>, layer_ids: &[&str]) -> Option<Map<String, Value>> {
        self.0.iter()
            .find(|(layer, _)| layer_ids.contains(layer))
            .map(|(_, properties)| properties.clone())
    }
}

#[test]
fn search_select_and_reload_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    import(&Catalog::new(Box::new(DiskStore::new(tmp.path()))));

    let store = DiskStore::new(tmp.path());
    for key in ["old_taz_geojson", "new_taz_geojson", "blocks_geojson"] {
        assert!(store.has(key), "{key} not written");
    }

    let catalog = Arc::new(Catalog::load(Box::new(store)));
    let mut session = Session::new(catalog, Settings::default());
    assert_eq!(session.search("0500"), &SearchStatus::Found(FeatureId::new(FeatureType::OldZone, "500")));

    let old_map = session.panel(View::OldZoneMap);
    assert_eq!(old_map.feature_count(), 2); // the anchor and 501, ~0.8 km east
    assert!(old_map.bounds.is_some());

    let camera = session.camera().unwrap();
    assert!((camera.width() - 0.0022).abs() < 1e-9); // 5% margin on each side

    let hits = Hits(vec![
        ("new-taz", json!({ "taz_id": 7 }).as_object().cloned().unwrap()),
        ("blocks", json!({ "geoid20": 250250001001003i64 }).as_object().cloned().unwrap()),
    ]);
    assert_eq!(session.tap(View::NewZoneMap, Point::new(-71.0595, 42.3605), &hits), Some(true));
    assert_eq!(session.tap(View::BlockMap, Point::new(-71.0588, 42.3602), &hits), Some(true));
    assert_eq!(session.tap(View::CombinedMap, Point::new(-71.0588, 42.3602), &hits), None);

    let blocks = session.panel(View::BlockMap);
    assert_eq!(blocks.highlight.len(), 1);
    assert_eq!(blocks.linked.sorted(), vec![
        FeatureId::new(FeatureType::Block, "250250001001001"),
        FeatureId::new(FeatureType::Block, "250250001001002"),
    ]);

    let zone_rows = session.table(View::NewZoneTable);
    assert_eq!(zone_rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(), vec!["7", "Sum"]);
    assert_eq!(zone_rows[1].demographics.emp19, 5.0);

    let block_rows = session.table(View::BlockTable);
    assert_eq!(block_rows.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(), vec!["1003", "Sum"]);
    assert_eq!(block_rows[1].demographics.hh19, 20.0);

    // radius change keeps both selections
    session.set_radius(3.0);
    assert_eq!(session.selections().new_zones.len(), 1);
    assert_eq!(session.selections().blocks.len(), 1);

    // a new search clears them
    session.search("501");
    assert!(session.selections().new_zones.is_empty());
    assert!(session.selections().blocks.is_empty());
    assert_eq!(session.table(View::BlockTable).len(), 1);
}

#[test]
fn empty_catalog_reports_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = Arc::new(Catalog::load(Box::new(DiskStore::new(tmp.path()))));
    let mut session = Session::new(catalog, Settings::default());

    assert_eq!(session.search("500"), &SearchStatus::NotFound("500".into()));
    assert!(session.camera().is_none());
    assert!(session.panel(View::CombinedMap).bounds.is_none());
    assert_eq!(session.table(View::NewZoneTable).len(), 1);
}

#[test]
fn replaced_layer_is_picked_up_on_refresh() {
    let catalog = Arc::new(Catalog::new(Box::new(tazview::MemStore::default())));
    import(&catalog);

    let mut session = Session::new(catalog.clone(), Settings::default());
    session.search("500");
    assert_eq!(session.result().unwrap().blocks.len(), 3);

    catalog.clear(Some(FeatureType::Block)).unwrap();
    assert_eq!(session.result().unwrap().blocks.len(), 3); // still the old snapshot

    session.refresh();
    assert!(session.result().unwrap().blocks.is_empty());
}
