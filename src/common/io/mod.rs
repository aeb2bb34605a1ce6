pub(crate) mod geojson;
pub(crate) mod shp;

pub(crate) use geojson::*;
pub(crate) use shp::*;
