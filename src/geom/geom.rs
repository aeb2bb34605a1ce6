use std::f64::consts::TAU;

use geo::{BoundingRect, Centroid as _, Coord, LineString, MultiPolygon, Point, Polygon};

use crate::layer::{Feature, FeatureCollection, FeatureId};
use super::bbox::BoundingBox;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (degrees-per-km box approximation).
pub const KM_PER_DEG_LAT: f64 = 110.574;

/// Kilometres per degree of longitude at the equator; scaled by cos(lat).
pub const KM_PER_DEG_LNG: f64 = 111.320;

/// Default number of segments in a circle approximation.
pub const CIRCLE_STEPS: usize = 64;

/// A (lng, lat) centre of mass.
pub type Centroid = Point<f64>;

/// Bounding box of every coordinate in every ring; the zero sentinel if there are none.
pub fn bounding_box(shape: &MultiPolygon<f64>) -> BoundingBox {
    shape.bounding_rect()
        .map(BoundingBox::from_rect)
        .unwrap_or(BoundingBox::EMPTY)
}

/// Area-weighted polygon centroid. None if the shape has no coordinates.
pub fn centroid(shape: &MultiPolygon<f64>) -> Option<Centroid> {
    shape.centroid().filter(|p| p.x().is_finite() && p.y().is_finite())
}

/// Great-circle (haversine) distance in kilometres.
pub fn distance_km(a: Centroid, b: Centroid) -> f64 {
    // Fixed argument order keeps the result bit-for-bit symmetric.
    let (a, b) = if (a.x(), a.y()) <= (b.x(), b.y()) { (a, b) } else { (b, a) };

    let (lat1, lat2) = (a.y().to_radians(), b.y().to_radians());
    let dlat = lat2 - lat1;
    let dlng = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Approximate a circle of `radius_km` around `center` with `steps` segments.
/// Offsets are equirectangular (longitude stretched by 1 / cos(lat)); the ring is closed.
pub fn circle_polygon(center: Centroid, radius_km: f64, steps: usize) -> Polygon<f64> {
    let steps = steps.max(3);
    let angular = radius_km / EARTH_RADIUS_KM;
    let dlat = angular.to_degrees();
    let dlng = (angular / center.y().to_radians().cos()).to_degrees();

    let mut ring = (0..steps)
        .map(|i| {
            let theta = TAU * i as f64 / steps as f64;
            Coord { x: center.x() + dlng * theta.cos(), y: center.y() + dlat * theta.sin() }
        })
        .collect::<Vec<_>>();
    ring.push(ring[0]);

    Polygon::new(LineString(ring), vec![])
}

impl Feature {
    /// Bounding box of the feature's geometry.
    #[inline] pub fn bounding_box(&self) -> BoundingBox { bounding_box(self.shape()) }

    /// Centroid of the feature's geometry.
    #[inline] pub fn centroid(&self) -> Option<Centroid> { centroid(self.shape()) }
}

impl FeatureCollection {
    /// Area-weighted centroid of every part carrying `id`, taken together.
    /// None if no such feature has coordinates.
    pub fn centroid_of(&self, id: &FeatureId) -> Option<Centroid> {
        let parts = self.iter()
            .filter(|f| f.id() == Some(id))
            .flat_map(|f| f.shape().0.iter().cloned())
            .collect::<Vec<_>>();
        centroid(&MultiPolygon(parts))
    }
}
