use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use shapefile::{PolygonRing, Shape, dbase::FieldValue};
use tracing::{debug, warn};

use crate::common::io::geojson::geometry_to_geojson;
use crate::layer::GeometryKind;

/// Resolve `path` to a `.shp` file: either the path itself, or the first `.shp` (by name) in a folder.
pub(crate) fn find_shapefile(path: &Path) -> Result<PathBuf> {
    if path.is_file() { return Ok(path.to_path_buf()) }
    crate::common::require_dir_exists(path)?;

    let mut candidates = std::fs::read_dir(path)
        .with_context(|| format!("Failed to list directory {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("shp")))
        .collect::<Vec<_>>();
    candidates.sort();

    match candidates.into_iter().next() {
        Some(shp) => Ok(shp),
        None => bail!("No shapefile found in folder: {}", path.display()),
    }
}

/// Read all polygon shapes and attribute records of a `.shp` file into a GeoJSON FeatureCollection.
/// Coordinates are passed through unchanged; non-polygon shapes become features with null geometry.
pub(crate) fn read_shapefile_as_geojson(path: &Path) -> Result<Value> {
    warn_if_projected(path);

    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;

        let (kind, shape) = match shape_to_multipolygon(shape) {
            Some(mp) if mp.0.len() == 1 => (GeometryKind::Polygon, mp),
            Some(mp) => (GeometryKind::MultiPolygon, mp),
            None => (GeometryKind::Missing, geo::MultiPolygon(vec![])),
        };

        let properties = record.into_iter()
            .map(|(field, value)| (field, field_to_json(value)))
            .collect::<Map<_, _>>();

        features.push(json!({
            "type": "Feature",
            "geometry": geometry_to_geojson(kind, &shape),
            "properties": properties,
        }));
    }
    debug!(path = %path.display(), features = features.len(), "read shapefile");

    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// Convert a polygon shape (any flavour) to geo::MultiPolygon<f64>. Returns None for other shapes.
fn shape_to_multipolygon(shape: Shape) -> Option<geo::MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(p) => Some(rings_to_geo(p.rings(), |pt| (pt.x, pt.y))),
        Shape::PolygonM(p) => Some(rings_to_geo(p.rings(), |pt| (pt.x, pt.y))),
        Shape::PolygonZ(p) => Some(rings_to_geo(p.rings(), |pt| (pt.x, pt.y))),
        _ => None,
    }
}

/// Group rings into polygons: each outer ring with the inner rings that follow it (Shapefile order).
fn rings_to_geo<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> geo::MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    let mut polys: Vec<geo::Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<geo::LineString<f64>> = None;
    let mut current_holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in rings {
        let mut coords = ring.points().iter()
            .map(|pt| { let (x, y) = xy(pt); geo::Coord { x, y } })
            .collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let ls = geo::LineString(coords);

        match ring {
            PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(geo::Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(ls);
            }
            PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(geo::Polygon::new(ext, current_holes));
    }

    geo::MultiPolygon(polys)
}

/// Convert a dBase attribute to JSON. Integral numerics become integers so ids read as `500`, not `500.0`.
fn field_to_json(value: FieldValue) -> Value {
    fn number(n: f64) -> Value {
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 { json!(n as i64) } else { json!(n) }
    }

    match value {
        FieldValue::Character(Some(s)) => Value::String(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => number(n),
        FieldValue::Float(Some(f)) => number(f as f64),
        FieldValue::Integer(i) => json!(i),
        FieldValue::Double(d) => number(d),
        FieldValue::Currency(c) => json!(c),
        FieldValue::Logical(Some(b)) => json!(b),
        FieldValue::Memo(s) => Value::String(s),
        _ => Value::Null,
    }
}

/// Warn when the sidecar `.prj` declares a projected CRS, since coordinates are used as lon/lat.
fn warn_if_projected(path: &Path) {
    let prj = path.with_extension("prj");
    if let Ok(wkt) = std::fs::read_to_string(&prj) {
        if wkt.trim_start().starts_with("PROJCS") {
            warn!(prj = %prj.display(), "shapefile uses a projected CRS; coordinates are not reprojected to lon/lat");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numerics_become_integers() {
        assert_eq!(field_to_json(FieldValue::Numeric(Some(500.0))), json!(500));
        assert_eq!(field_to_json(FieldValue::Numeric(Some(1.5))), json!(1.5));
        assert_eq!(field_to_json(FieldValue::Character(Some(" 0123 ".into()))), json!("0123"));
        assert_eq!(field_to_json(FieldValue::Numeric(None)), Value::Null);
    }

    #[test]
    fn rings_group_holes_with_preceding_exterior() {
        let square = |x: f64| vec![
            shapefile::Point { x, y: 0.0 },
            shapefile::Point { x, y: 1.0 },
            shapefile::Point { x: x + 1.0, y: 1.0 },
            shapefile::Point { x: x + 1.0, y: 0.0 },
        ];
        let rings = vec![
            PolygonRing::Outer(square(0.0)),
            PolygonRing::Inner(square(0.25)),
            PolygonRing::Outer(square(5.0)),
        ];
        let mp = rings_to_geo(&rings, |pt| (pt.x, pt.y));
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
        // closed rings
        assert_eq!(mp.0[0].exterior().0.first(), mp.0[0].exterior().0.last());
    }

    #[test]
    fn missing_folder_is_an_error() {
        assert!(find_shapefile(Path::new("/definitely/not/here")).is_err());
    }
}
