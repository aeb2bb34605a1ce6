use geo::{Point, Rect};
use rstar::AABB;
use serde::{Deserialize, Serialize};

use super::geom::{KM_PER_DEG_LAT, KM_PER_DEG_LNG};

/// An axis-aligned lon/lat rectangle. All zeros is the "empty" sentinel for features without coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox { min_lng: 0.0, min_lat: 0.0, max_lng: 0.0, max_lat: 0.0 };

    /// Construct from two corners given in any order.
    pub fn new(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> Self {
        Self {
            min_lng: lng1.min(lng2),
            min_lat: lat1.min(lat2),
            max_lng: lng1.max(lng2),
            max_lat: lat1.max(lat2),
        }
    }

    #[inline]
    pub fn from_rect(rect: Rect<f64>) -> Self {
        Self { min_lng: rect.min().x, min_lat: rect.min().y, max_lng: rect.max().x, max_lat: rect.max().y }
    }

    /// Box around `center` spanning `radius_km` in each direction, using the degrees-per-km
    /// approximation at the center's latitude.
    pub fn around(center: Point<f64>, radius_km: f64) -> Self {
        let half_height = radius_km / KM_PER_DEG_LAT;
        let half_width = radius_km / (KM_PER_DEG_LNG * center.y().to_radians().cos());
        Self::new(
            center.x() - half_width, center.y() - half_height,
            center.x() + half_width, center.y() + half_height,
        )
    }

    /// True for the all-zero sentinel.
    #[inline] pub fn is_empty(&self) -> bool { *self == Self::EMPTY }

    #[inline] pub fn width(&self) -> f64 { self.max_lng - self.min_lng }

    #[inline] pub fn height(&self) -> f64 { self.max_lat - self.min_lat }

    #[inline]
    pub fn center(&self) -> Point<f64> {
        Point::new((self.min_lng + self.max_lng) / 2.0, (self.min_lat + self.max_lat) / 2.0)
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, point: Point<f64>) -> bool {
        point.x() >= self.min_lng && point.x() <= self.max_lng
            && point.y() >= self.min_lat && point.y() <= self.max_lat
    }

    /// Inclusive overlap test (touching boxes intersect).
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lng <= other.max_lng && other.min_lng <= self.max_lng
            && self.min_lat <= other.max_lat && other.min_lat <= self.max_lat
    }

    /// Smallest box covering both.
    #[inline]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lng: self.min_lng.min(other.min_lng),
            min_lat: self.min_lat.min(other.min_lat),
            max_lng: self.max_lng.max(other.max_lng),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// Grow each side by `margin` times the box extent; an axis with zero extent is padded by `pad` degrees instead.
    pub fn expand(&self, margin: f64, pad: f64) -> BoundingBox {
        let dx = if self.width() > 0.0 { self.width() * margin } else { pad };
        let dy = if self.height() > 0.0 { self.height() * margin } else { pad };
        BoundingBox {
            min_lng: self.min_lng - dx,
            min_lat: self.min_lat - dy,
            max_lng: self.max_lng + dx,
            max_lat: self.max_lat + dy,
        }
    }

    /// [min_lng, min_lat, max_lng, max_lat], the order map widgets expect for fitBounds.
    #[inline] pub fn to_array(&self) -> [f64; 4] { [self.min_lng, self.min_lat, self.max_lng, self.max_lat] }

    #[inline]
    pub(crate) fn to_aabb(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_lng, self.min_lat], [self.max_lng, self.max_lat])
    }
}
