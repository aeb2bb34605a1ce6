#![doc = "TAZ review core: normalized zone/block layers, radius queries, selections and panel views"]
mod common;
mod convert;
mod geom;
mod layer;
mod query;
mod select;
mod session;
mod settings;
mod store;
mod view;

#[doc(inline)]
pub use layer::{
    Demographics, Feature, FeatureCollection, FeatureId, FeatureType, GeometryKind, Record,
    normalize_collection, normalize_properties,
};

#[doc(inline)]
pub use geom::{
    BoundingBox, CIRCLE_STEPS, Centroid, EARTH_RADIUS_KM, KM_PER_DEG_LAT, KM_PER_DEG_LNG, SpatialIndex,
    bounding_box, centroid, circle_polygon, distance_km,
};

#[doc(inline)]
pub use query::{
    DISTANCE_TOLERANCE_KM, DistanceUnit, MAX_RADIUS, METERS_PER_MILE, MIN_RADIUS, Radius, RadiusQuery,
    SearchResult, TargetAndOthers, prefilter, query, query_around,
};

#[doc(inline)]
pub use select::{SelectionSet, Selections};

#[doc(inline)]
pub use view::{PanelLayer, PanelView, SUM_LABEL, TableRow, View, bounds_of, dedup_by_id, fit, table, union};

#[doc(inline)]
pub use store::{Catalog, DiskStore, Layers, MemStore, Store};

#[doc(inline)]
pub use session::{HitTest, SearchStatus, Session};

#[doc(inline)]
pub use settings::Settings;

#[doc(inline)]
pub use convert::{convert_shapefile, read_geojson_file};
