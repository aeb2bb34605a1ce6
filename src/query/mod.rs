mod radius;
mod related;
mod search;
mod units;

pub use radius::{DISTANCE_TOLERANCE_KM, RadiusQuery, prefilter, query, query_around};
pub use related::TargetAndOthers;
pub use search::SearchResult;
pub use units::{DistanceUnit, MAX_RADIUS, METERS_PER_MILE, MIN_RADIUS, Radius};
