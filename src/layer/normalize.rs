use serde_json::{Map, Value};

use super::feature_type::FeatureType;

/// Rewrite a raw property bag into the canonical schema for `ty`.
/// Keys are lowercased first; the per-type renames below then apply to the lowercased keys.
/// Never fails: a bag without the expected keys is returned with only its keys lowercased.
pub fn normalize_properties(ty: FeatureType, properties: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in properties {
        out.insert(key.to_lowercase(), value.clone());
    }

    match ty {
        FeatureType::OldZone => { rename(&mut out, "objectid", "object_id"); }
        FeatureType::NewZone => { rename(&mut out, "taz_new1", "taz_id"); }
        FeatureType::Block => {
            normalize_geoid(&mut out);
            if !rename(&mut out, "taz_id0", "taz_id") && !out.contains_key("taz_id") {
                rename(&mut out, "taz_new1", "taz_id");
            }
        }
    }

    out
}

/// Normalize every feature of a GeoJSON FeatureCollection, returning a new document.
/// Features without a properties object get an empty one; everything else is copied as is.
pub fn normalize_collection(ty: FeatureType, geojson: &Value) -> Value {
    let mut out = geojson.clone();
    if let Some(features) = out.get_mut("features").and_then(Value::as_array_mut) {
        for feature in features.iter_mut().filter_map(Value::as_object_mut) {
            let properties = match feature.get("properties") {
                Some(Value::Object(properties)) => normalize_properties(ty, properties),
                _ => Map::new(),
            };
            feature.insert("properties".to_string(), Value::Object(properties));
        }
    }
    out
}

/// Move `from` to `to`, overwriting `to`. Returns whether `from` was present.
fn rename(properties: &mut Map<String, Value>, from: &str, to: &str) -> bool {
    match properties.remove(from) {
        Some(value) => { properties.insert(to.to_string(), value); true }
        None => false,
    }
}

/// Parse `geoid20` to an integer where possible and derive `block_label` from its text.
fn normalize_geoid(properties: &mut Map<String, Value>) {
    let Some(raw) = properties.get("geoid20").cloned() else { return };

    // A numeric geoid may already have lost leading zeros; keep the label derived before that.
    let keep_label = raw.is_number() && properties.get("block_label").is_some_and(Value::is_string);
    if !keep_label {
        if let Some(text) = value_text(&raw) {
            properties.insert("block_label".to_string(), Value::String(last_chars(&text, 4)));
        }
    }

    if let Value::String(s) = &raw {
        if let Ok(parsed) = s.trim().parse::<i64>() {
            properties.insert("geoid20".to_string(), Value::from(parsed));
        }
    }
}

/// String form of a scalar JSON value.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The last `n` characters of `s`, or all of `s` if it is shorter.
fn last_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}
