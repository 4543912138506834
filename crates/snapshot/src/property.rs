//! Derivation of the coloring scalar from raw per-grain values.

use std::fmt;

/// Conversion from simulation units of `m·v²` to energy.
pub const KINETIC_ENERGY_FACTOR: f64 = 2.45e-4;
/// Conversion from simulation velocity units.
pub const VELOCITY_FACTOR: f64 = 0.2213594;

/// A named scalar derived from a grain's raw value record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Property {
    /// `-(σxx + σyy) / 2` from `σxx σyy σxy`.
    #[default]
    Pressure,
    /// `0.5 · m · (vx² + vy²)` from `vx vy m`, scaled.
    KineticEnergy,
    /// Sign-flipped fifth component, scaled. Kept for compatibility with
    /// existing frame sequences; see [`Property::Speed`] for the norm.
    VelocityNorm,
    /// Norm of the fourth and fifth components, scaled.
    Speed,
    /// Raw value at a 1-based column.
    Column(usize),
    /// Unrecognized name. Derives the first raw value.
    Unknown(String),
}

impl Property {
    /// Parse a property name. `column:K` and `vK` select a raw column.
    pub fn from_name(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase();
        match key.as_str() {
            "pressure" => Property::Pressure,
            "kinetic_energy" => Property::KineticEnergy,
            "velocity_norm" => Property::VelocityNorm,
            "speed" => Property::Speed,
            _ => {
                let column = key
                    .strip_prefix("column:")
                    .or_else(|| key.strip_prefix('v'))
                    .and_then(|k| k.parse::<usize>().ok())
                    .filter(|&k| k >= 1);
                match column {
                    Some(k) => Property::Column(k),
                    None => Property::Unknown(name.to_string()),
                }
            }
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Property::Unknown(_))
    }

    /// Number of raw values the derivation needs.
    pub fn arity(&self) -> usize {
        match self {
            Property::Pressure | Property::KineticEnergy => 3,
            Property::VelocityNorm | Property::Speed => 5,
            Property::Column(k) => *k,
            Property::Unknown(_) => 0,
        }
    }

    /// Scalar for one grain. Records too short for the derivation fall back
    /// to their first value, or 0 when empty.
    pub fn derive(&self, values: &[f64]) -> f64 {
        let fallback = values.first().copied().unwrap_or(0.0);
        if values.len() < self.arity() {
            return fallback;
        }
        match self {
            Property::Pressure => -(values[0] + values[1]) / 2.0,
            Property::KineticEnergy => {
                let (vx, vy, m) = (values[0], values[1], values[2]);
                0.5 * m * (vx * vx + vy * vy) * KINETIC_ENERGY_FACTOR
            }
            Property::VelocityNorm => -values[4] * VELOCITY_FACTOR,
            Property::Speed => values[3].hypot(values[4]) * VELOCITY_FACTOR,
            Property::Column(k) => values[k - 1],
            Property::Unknown(_) => fallback,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Pressure => write!(f, "pressure"),
            Property::KineticEnergy => write!(f, "kinetic_energy"),
            Property::VelocityNorm => write!(f, "velocity_norm"),
            Property::Speed => write!(f, "speed"),
            Property::Column(k) => write!(f, "column:{}", k),
            Property::Unknown(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Property::from_name("Pressure"), Property::Pressure);
        assert_eq!(Property::from_name("column:3"), Property::Column(3));
        assert_eq!(Property::from_name("v2"), Property::Column(2));
        assert_eq!(Property::from_name("v0"), Property::Unknown("v0".into()));
        assert_eq!(
            Property::from_name("velocity"),
            Property::Unknown("velocity".into())
        );
    }

    #[test]
    fn test_display_round_trips_known_names() {
        for name in ["pressure", "kinetic_energy", "velocity_norm", "speed", "column:4"] {
            assert_eq!(Property::from_name(name).to_string(), name);
        }
    }

    #[test]
    fn test_short_record_falls_back_to_first_value() {
        assert_eq!(Property::Pressure.derive(&[-2.0, -4.0]), -2.0);
        assert_eq!(Property::Speed.derive(&[]), 0.0);
        assert_eq!(Property::Column(9).derive(&[5.0]), 5.0);
    }
}
