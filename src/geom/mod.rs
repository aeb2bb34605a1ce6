mod bbox;
mod geom;
mod index;

pub use bbox::BoundingBox;
pub use geom::{
    CIRCLE_STEPS, Centroid, EARTH_RADIUS_KM, KM_PER_DEG_LAT, KM_PER_DEG_LNG,
    bounding_box, centroid, circle_polygon, distance_km,
};
pub use index::SpatialIndex;
