use std::sync::Arc;

use geo::{Point, Polygon};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::geom::{BoundingBox, circle_polygon};
use crate::layer::{FeatureId, FeatureType};
use crate::query::{DistanceUnit, Radius, SearchResult};
use crate::select::Selections;
use crate::settings::Settings;
use crate::store::Catalog;
use crate::view::{PanelView, TableRow, View, bounds_of, fit};

/// Outcome of the last search submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "taz_id", rename_all = "snake_case")]
pub enum SearchStatus {
    /// Nothing searched yet.
    Idle,
    /// The input was blank.
    NoInput,
    /// No old zone carries this id.
    NotFound(String),
    Found(FeatureId),
}

/// Renderer-side hit testing: the topmost rendered feature under a point, among the given layers.
pub trait HitTest {
    fn topmost(&self, point: Point<f64>, layer_ids: &[&str]) -> Option<Map<String, Value>>;
}

/// Search, radius, selection and camera state behind the six panels.
/// Every operation runs to completion against the catalog snapshot current at call time.
pub struct Session {
    catalog: Arc<Catalog>,
    settings: Settings,
    unit: DistanceUnit,
    radius: Radius,
    status: SearchStatus,
    result: Option<SearchResult>,
    selections: Selections,
    camera: Option<BoundingBox>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, settings: Settings) -> Self {
        Self {
            unit: settings.unit,
            radius: settings.initial_radius(),
            catalog,
            settings,
            status: SearchStatus::Idle,
            result: None,
            selections: Selections::default(),
            camera: None,
        }
    }

    #[inline] pub fn settings(&self) -> &Settings { &self.settings }

    #[inline] pub fn status(&self) -> &SearchStatus { &self.status }

    #[inline] pub fn radius(&self) -> Radius { self.radius }

    #[inline] pub fn unit(&self) -> DistanceUnit { self.unit }

    #[inline] pub fn result(&self) -> Option<&SearchResult> { self.result.as_ref() }

    #[inline] pub fn selections(&self) -> &Selections { &self.selections }

    /// Camera target shared by the map panels; None until a search found something with geometry.
    #[inline] pub fn camera(&self) -> Option<BoundingBox> { self.camera }

    /// Submit search text naming an old zone.
    /// A hit replaces the result, clears every selection and refits the camera.
    /// Blank or unknown input only updates the status; the previous result stays on screen.
    pub fn search(&mut self, input: &str) -> &SearchStatus {
        let input = input.trim();
        if input.is_empty() {
            self.status = SearchStatus::NoInput;
            return &self.status;
        }

        let result = FeatureId::parse(FeatureType::OldZone, input)
            .and_then(|anchor| self.catalog.snapshot().search(&anchor, self.radius.km()));

        let Some(result) = result else {
            info!(input, "old zone not found");
            self.status = SearchStatus::NotFound(input.to_string());
            return &self.status;
        };

        info!(
            anchor = %result.anchor,
            new_zones = result.new_zones.len(),
            blocks = result.blocks.len(),
            "search"
        );

        if let Some(bounds) = bounds_of(&result.target) {
            self.camera = Some(fit(&bounds, self.settings.camera_margin, self.settings.camera_pad_deg));
        }
        self.selections.clear();
        self.status = SearchStatus::Found(result.anchor.clone());
        self.result = Some(result);
        &self.status
    }

    /// Change the radius (in the current unit, clamped). Results are recomputed; selections are kept.
    pub fn set_radius(&mut self, value: f64) -> Radius {
        self.radius = Radius::from_display(value, self.unit);
        self.refresh();
        self.radius
    }

    /// As `set_radius`, from user text. Unparsable text clamps to the lower bound.
    pub fn set_radius_text(&mut self, input: &str) -> Radius {
        self.radius = Radius::parse(input, self.unit);
        self.refresh();
        self.radius
    }

    /// Switch the display unit, re-clamping the radius in the new unit.
    pub fn set_unit(&mut self, unit: DistanceUnit) -> Radius {
        if unit != self.unit {
            self.unit = unit;
            self.radius = self.radius.convert(unit);
            self.refresh();
        }
        self.radius
    }

    /// Re-run the current search against the latest catalog snapshot, keeping selections.
    /// If the anchor has disappeared, the result is dropped.
    pub fn refresh(&mut self) {
        let SearchStatus::Found(anchor) = &self.status else { return };
        self.result = self.catalog.snapshot().search(anchor, self.radius.km());
        if self.result.is_none() {
            debug!(anchor = %anchor, "anchor vanished on refresh");
            self.status = SearchStatus::NotFound(anchor.id().to_string());
        }
    }

    /// Flip one feature's selection. None for old-zone ids, which are not selectable.
    pub fn toggle(&mut self, id: FeatureId) -> Option<bool> {
        self.selections.toggle(id)
    }

    /// Clear the selection of one feature type, or all of them.
    pub fn clear_selection(&mut self, ty: Option<FeatureType>) {
        match ty {
            None => self.selections.clear(),
            Some(FeatureType::NewZone) => self.selections.new_zones.clear(),
            Some(FeatureType::Block) => self.selections.blocks.clear(),
            Some(FeatureType::OldZone) => {}
        }
    }

    /// Turn a tap on a panel into a toggle of the feature under it.
    /// None if the panel is not selectable or nothing identifiable was hit.
    pub fn tap(&mut self, view: View, point: Point<f64>, hits: &impl HitTest) -> Option<bool> {
        let ty = view.selectable()?;
        let properties = hits.topmost(point, &view.hit_layer_ids())?;
        let Some(id) = FeatureId::from_properties(ty, &properties) else {
            debug!(view = view.to_str(), "hit feature has no {}", ty.id_key());
            return None;
        };
        self.toggle(id)
    }

    /// The panel as it should currently be drawn.
    pub fn panel(&self, view: View) -> PanelView {
        match &self.result {
            Some(result) => PanelView::compose(view, result, &self.selections),
            None => PanelView::empty(view),
        }
    }

    /// Rows of a table panel (empty for map panels).
    pub fn table(&self, view: View) -> Vec<TableRow> { self.panel(view).rows }

    /// The search circle around the anchor's centroid.
    pub fn circle(&self) -> Option<Polygon<f64>> {
        let result = self.result.as_ref()?;
        let center = result.center?;
        Some(circle_polygon(center, self.radius.km(), self.settings.circle_steps))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::store::MemStore;
    use super::*;

    fn square(props: Value, lng: f64, lat: f64) -> Value {
        let s = 0.001;
        json!({
            "type": "Feature",
            "properties": props,
            "geometry": { "type": "Polygon", "coordinates": [[
                [lng, lat], [lng + s, lat], [lng + s, lat + s], [lng, lat + s], [lng, lat],
            ]] },
        })
    }

    fn catalog() -> Arc<Catalog> {
        let catalog = Catalog::new(Box::new(MemStore::default()));
        catalog.replace(FeatureType::OldZone, &json!({ "type": "FeatureCollection", "features": [
            square(json!({ "TAZ_ID": 500 }), -71.06, 42.36),
            square(json!({ "TAZ_ID": 600 }), -70.00, 42.36),
        ]})).unwrap();
        catalog.replace(FeatureType::NewZone, &json!({ "type": "FeatureCollection", "features": [
            square(json!({ "TAZ_NEW1": 7, "HH19": 10 }), -71.06, 42.36),
            square(json!({ "TAZ_NEW1": 8, "HH19": 20 }), -71.06, 42.375), // ~1.7 km north
        ]})).unwrap();
        catalog.replace(FeatureType::Block, &json!({ "type": "FeatureCollection", "features": [
            square(json!({ "GEOID20": "250250001001000", "TAZ_ID0": 7, "HH19": 4 }), -71.0605, 42.3605),
        ]})).unwrap();
        Arc::new(catalog)
    }

    struct FixedHit(Option<Map<String, Value>>);

    impl HitTest for FixedHit {
        fn topmost(&self, _point: Point<f64>, layer_ids: &[&str]) -> Option<Map<String, Value>> {
            assert_eq!(layer_ids.len(), 1);
            self.0.clone()
        }
    }

    #[test]
    fn search_statuses() {
        let mut session = Session::new(catalog(), Settings::default());
        assert_eq!(session.status(), &SearchStatus::Idle);
        assert_eq!(session.search("  "), &SearchStatus::NoInput);
        assert_eq!(session.search("abc"), &SearchStatus::NotFound("abc".into()));
        assert_eq!(session.search("500"), &SearchStatus::Found(FeatureId::new(FeatureType::OldZone, "500")));
        assert!(session.camera().is_some());
    }

    #[test]
    fn miss_keeps_previous_result() {
        let mut session = Session::new(catalog(), Settings::default());
        session.search("500");
        session.search("999");
        assert!(session.result().is_some());
        assert_eq!(session.status(), &SearchStatus::NotFound("999".into()));
    }

    #[test]
    fn radius_change_keeps_selection_and_new_search_clears_it() {
        let mut session = Session::new(catalog(), Settings::default());
        session.search("500");
        assert_eq!(session.result().unwrap().new_zones.len(), 1);

        session.toggle(FeatureId::new(FeatureType::NewZone, "7"));
        session.set_radius(2.0);
        assert_eq!(session.result().unwrap().new_zones.len(), 2);
        assert_eq!(session.selections().new_zones.len(), 1);

        session.search("500");
        assert!(session.selections().new_zones.is_empty());
    }

    #[test]
    fn tap_toggles_only_on_selectable_panels() {
        let mut session = Session::new(catalog(), Settings::default());
        session.search("500");

        let hit = FixedHit(json!({ "taz_id": 7 }).as_object().cloned());
        assert_eq!(session.tap(View::NewZoneMap, Point::new(0.0, 0.0), &hit), Some(true));
        assert_eq!(session.tap(View::OldZoneMap, Point::new(0.0, 0.0), &hit), None);
        assert_eq!(session.tap(View::NewZoneMap, Point::new(0.0, 0.0), &FixedHit(None)), None);

        let blocks = session.panel(View::BlockMap);
        assert_eq!(blocks.linked.len(), 1);
        assert!(blocks.highlight.is_empty());

        let rows = session.table(View::NewZoneTable);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].demographics.hh19, 10.0);

        assert_eq!(session.tap(View::NewZoneMap, Point::new(0.0, 0.0), &hit), Some(false));
        assert_eq!(session.table(View::NewZoneTable).len(), 1);
    }

    #[test]
    fn unit_switch_reclamps() {
        let mut session = Session::new(catalog(), Settings::default());
        session.set_radius(5.0);
        let radius = session.set_unit(DistanceUnit::Kilometers);
        assert_eq!(radius.meters(), 5000.0);
        assert_eq!(session.set_radius_text("nope").meters(), 500.0);
    }

    #[test]
    fn circle_follows_radius() {
        let mut session = Session::new(catalog(), Settings::default());
        assert!(session.circle().is_none());
        session.search("500");
        let circle = session.circle().unwrap();
        assert_eq!(circle.exterior().0.len(), 65);
    }
}
