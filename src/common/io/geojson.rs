use anyhow::{Context, Result, anyhow, bail, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Value, json};

use crate::layer::GeometryKind;

/// Parse GeoJSON bytes, requiring a FeatureCollection with a `features` array.
pub(crate) fn read_feature_collection_bytes(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    ensure!(
        value.get("type").and_then(Value::as_str) == Some("FeatureCollection"),
        "GeoJSON document is not a FeatureCollection"
    );
    ensure!(
        value.get("features").is_some_and(Value::is_array),
        "GeoJSON FeatureCollection has no features array"
    );
    Ok(value)
}

/// Parse a GeoJSON geometry object into a MultiPolygon.
/// A null or absent geometry is `Missing` with an empty shape; other geometry types are an error.
pub(crate) fn parse_geometry(geometry: Option<&Value>) -> Result<(GeometryKind, MultiPolygon<f64>)> {
    let Some(geometry) = geometry.filter(|g| !g.is_null()) else {
        return Ok((GeometryKind::Missing, MultiPolygon(vec![])));
    };

    let coords = geometry.get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Invalid geometry: missing coordinates"))?;

    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok((GeometryKind::Polygon, MultiPolygon(vec![parse_polygon_coords(coords)?]))),
        Some("MultiPolygon") => {
            let polygons = coords.iter()
                .map(|polygon| polygon.as_array()
                    .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon is not an array"))
                    .and_then(|rings| parse_polygon_coords(rings)))
                .collect::<Result<Vec<_>>>()?;
            Ok((GeometryKind::MultiPolygon, MultiPolygon(polygons)))
        }
        Some(other) => bail!("Unsupported geometry type: {other}"),
        None => bail!("Invalid geometry: missing type"),
    }
}

/// Parse Polygon coordinates: [exterior, hole, hole, ...], each ring [[x, y], ...].
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))
            .and_then(|coords| parse_ring_coords(coords))
    });

    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => LineString(vec![]),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: [[x, y], [x, y], ...]. Extra ordinates (z, m) are dropped.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());

    for pair in coords {
        let pair = pair.as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
        let x = pair[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = pair[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// Convert a shape back to a GeoJSON geometry, keeping the source geometry type.
pub(crate) fn geometry_to_geojson(kind: GeometryKind, shape: &MultiPolygon<f64>) -> Value {
    fn polygon_coords(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect()
    }

    match kind {
        GeometryKind::Missing => Value::Null,
        GeometryKind::Polygon if shape.0.len() == 1 => json!({
            "type": "Polygon",
            "coordinates": polygon_coords(&shape.0[0]),
        }),
        _ => json!({
            "type": "MultiPolygon",
            "coordinates": shape.0.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
    }
}
