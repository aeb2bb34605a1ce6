use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::common::io::{find_shapefile, read_feature_collection_bytes, read_shapefile_as_geojson};
use crate::common::{ensure_dir_exists, read_file};

/// Convert a shapefile (or the first one in a folder) to a GeoJSON FeatureCollection file.
/// Returns the number of features written.
pub fn convert_shapefile(input: &Path, output: &Path) -> Result<usize> {
    let shp = find_shapefile(input)?;
    let geojson = read_shapefile_as_geojson(&shp)?;
    let count = geojson["features"].as_array().map_or(0, Vec::len);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    let text = serde_json::to_string(&geojson).context("[convert_shapefile] Failed to serialize GeoJSON")?;
    std::fs::write(output, text)
        .with_context(|| format!("[convert_shapefile] Failed to write {}", output.display()))?;

    info!(input = %shp.display(), output = %output.display(), features = count, "converted shapefile");
    Ok(count)
}

/// Read a GeoJSON FeatureCollection file.
pub fn read_geojson_file(path: &Path) -> Result<Value> {
    read_feature_collection_bytes(&read_file(path)?)
        .with_context(|| format!("[read_geojson_file] {}", path.display()))
}
