use serde::{Deserialize, Serialize};

/// Metres in one statute mile, as used for display conversion.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Lower bound of the user-facing radius, in the displayed unit.
pub const MIN_RADIUS: f64 = 0.5;

/// Upper bound of the user-facing radius, in the displayed unit.
pub const MAX_RADIUS: f64 = 5.0;

/// Unit the radius is displayed and entered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    #[serde(alias = "km")]
    Kilometers,
}

impl DistanceUnit {
    #[inline]
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Miles => METERS_PER_MILE,
            DistanceUnit::Kilometers => 1000.0,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            DistanceUnit::Miles => "mi",
            DistanceUnit::Kilometers => "km",
        }
    }

    pub fn parse(s: &str) -> Option<DistanceUnit> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Some(DistanceUnit::Miles),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some(DistanceUnit::Kilometers),
            _ => None,
        }
    }
}

/// A search radius, stored in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius {
    meters: f64,
}

impl Radius {
    /// Radius from a value in the displayed unit, clamped to [MIN_RADIUS, MAX_RADIUS] in that unit.
    /// NaN clamps to the lower bound.
    pub fn from_display(value: f64, unit: DistanceUnit) -> Self {
        let value = if value.is_nan() { MIN_RADIUS } else { value.clamp(MIN_RADIUS, MAX_RADIUS) };
        Self { meters: value * unit.meters_per_unit() }
    }

    /// Radius from user text in the displayed unit. Never rejects: unparsable text clamps to the lower bound.
    pub fn parse(input: &str, unit: DistanceUnit) -> Self {
        Self::from_display(input.trim().parse::<f64>().unwrap_or(f64::NAN), unit)
    }

    #[inline] pub fn meters(&self) -> f64 { self.meters }

    #[inline] pub fn km(&self) -> f64 { self.meters / 1000.0 }

    /// Value in the given display unit.
    #[inline] pub fn in_unit(&self, unit: DistanceUnit) -> f64 { self.meters / unit.meters_per_unit() }

    /// Re-express in another display unit, re-applying that unit's clamp range.
    pub fn convert(&self, unit: DistanceUnit) -> Self { Self::from_display(self.in_unit(unit), unit) }
}

impl Default for Radius {
    fn default() -> Self { Self::from_display(1.0, DistanceUnit::Miles) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_mile_is_1609_34_meters() {
        let r = Radius::from_display(1.0, DistanceUnit::Miles);
        assert_eq!(r.meters(), 1609.34);
        assert!((r.km() - 1.60934).abs() < 1e-12);
        assert_eq!(Radius::default(), r);
    }

    #[test]
    fn out_of_range_is_clamped_in_the_active_unit() {
        assert_eq!(Radius::from_display(0.1, DistanceUnit::Kilometers).meters(), 500.0);
        assert_eq!(Radius::from_display(12.0, DistanceUnit::Kilometers).meters(), 5000.0);
        assert!((Radius::from_display(12.0, DistanceUnit::Miles).in_unit(DistanceUnit::Miles) - MAX_RADIUS).abs() < 1e-12);
        assert!((Radius::from_display(f64::INFINITY, DistanceUnit::Miles).in_unit(DistanceUnit::Miles) - MAX_RADIUS).abs() < 1e-12);
        assert_eq!(Radius::from_display(f64::NEG_INFINITY, DistanceUnit::Kilometers).meters(), 500.0);
        assert_eq!(Radius::from_display(f64::NAN, DistanceUnit::Kilometers).meters(), 500.0);
    }

    #[test]
    fn non_numeric_input_clamps_to_minimum() {
        assert_eq!(Radius::parse("abc", DistanceUnit::Kilometers).meters(), 500.0);
        assert!((Radius::parse("", DistanceUnit::Miles).in_unit(DistanceUnit::Miles) - MIN_RADIUS).abs() < 1e-12);
        assert_eq!(Radius::parse(" 2.5 ", DistanceUnit::Kilometers).meters(), 2500.0);
    }

    #[test]
    fn convert_reclamps() {
        // 5 miles is ~8 km, above the km range
        let r = Radius::from_display(5.0, DistanceUnit::Miles).convert(DistanceUnit::Kilometers);
        assert_eq!(r.meters(), 5000.0);
    }

    #[test]
    fn unit_names() {
        assert_eq!(DistanceUnit::parse("KM"), Some(DistanceUnit::Kilometers));
        assert_eq!(DistanceUnit::parse("miles"), Some(DistanceUnit::Miles));
        assert_eq!(DistanceUnit::parse("furlongs"), None);
    }
}
