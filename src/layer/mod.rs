mod collection;
mod feature;
mod feature_id;
mod feature_type;
mod normalize;
mod record;

pub use collection::FeatureCollection;
pub use feature::{Feature, GeometryKind};
pub use feature_id::FeatureId;
pub use feature_type::FeatureType;
pub use normalize::{normalize_collection, normalize_properties};
pub use record::{Demographics, Record};
