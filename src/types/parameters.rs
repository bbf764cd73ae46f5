//! Print parameter types: Material, InfillPattern, Choice, PrintParameters,
//! MaterialDefaults, MaterialGuidance

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Wire choices
// ============================================================================

/// A wire value that is either one of the known variants of `T` or the raw
/// string the client sent.
///
/// The dashboard form submits material and infill pattern as free strings.
/// Keeping the unknown value around lets the validator report it instead of
/// the request failing at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice<T> {
    Known(T),
    Unknown(String),
}

impl<T> Choice<T> {
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v}"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl<T> From<T> for Choice<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

// ============================================================================
// Material
// ============================================================================

/// Filament polymer families the prediction service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "PLA")]
    Pla,
    #[serde(rename = "ABS")]
    Abs,
    #[serde(rename = "PETG")]
    Petg,
    #[serde(rename = "TPU")]
    Tpu,
}

impl Material {
    pub const ALL: [Self; 4] = [Self::Pla, Self::Abs, Self::Petg, Self::Tpu];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pla => "PLA",
            Self::Abs => "ABS",
            Self::Petg => "PETG",
            Self::Tpu => "TPU",
        }
    }

    /// Values applied to the form when this material is selected.
    pub const fn defaults(self) -> MaterialDefaults {
        match self {
            Self::Pla => MaterialDefaults {
                nozzle_temperature: 200.0,
                bed_temperature: 60.0,
                fan_speed: 100.0,
                print_speed: 60.0,
                infill_density: 20.0,
                infill_pattern: InfillPattern::Grid,
            },
            Self::Abs => MaterialDefaults {
                nozzle_temperature: 235.0,
                bed_temperature: 100.0,
                fan_speed: 20.0,
                print_speed: 50.0,
                infill_density: 30.0,
                infill_pattern: InfillPattern::Triangles,
            },
            Self::Petg => MaterialDefaults {
                nozzle_temperature: 240.0,
                bed_temperature: 80.0,
                fan_speed: 40.0,
                print_speed: 45.0,
                infill_density: 25.0,
                infill_pattern: InfillPattern::Grid,
            },
            Self::Tpu => MaterialDefaults {
                nozzle_temperature: 225.0,
                bed_temperature: 35.0,
                fan_speed: 60.0,
                print_speed: 25.0,
                infill_density: 15.0,
                infill_pattern: InfillPattern::Gyroid,
            },
        }
    }

    /// Recommended operating window for this material.
    pub const fn guidance(self) -> MaterialGuidance {
        match self {
            Self::Pla => MaterialGuidance {
                nozzle_temperature: (180.0, 220.0),
                bed_temperature: (50.0, 70.0),
                max_print_speed: 120.0,
                fan_speed: (70.0, 100.0),
                layer_height: (0.1, 0.3),
                wall_thickness: (0.4, 1.2),
            },
            Self::Abs => MaterialGuidance {
                nozzle_temperature: (220.0, 250.0),
                bed_temperature: (95.0, 110.0),
                max_print_speed: 100.0,
                fan_speed: (0.0, 30.0),
                layer_height: (0.1, 0.3),
                wall_thickness: (0.4, 1.6),
            },
            Self::Petg => MaterialGuidance {
                nozzle_temperature: (230.0, 250.0),
                bed_temperature: (75.0, 90.0),
                max_print_speed: 90.0,
                fan_speed: (30.0, 50.0),
                layer_height: (0.1, 0.3),
                wall_thickness: (0.4, 1.4),
            },
            Self::Tpu => MaterialGuidance {
                nozzle_temperature: (220.0, 235.0),
                bed_temperature: (30.0, 45.0),
                max_print_speed: 40.0,
                fan_speed: (50.0, 70.0),
                layer_height: (0.1, 0.25),
                wall_thickness: (0.8, 2.0),
            },
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown material '{s}'"))
    }
}

// ============================================================================
// Infill pattern
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfillPattern {
    Grid,
    Triangles,
    Gyroid,
    Honeycomb,
}

impl InfillPattern {
    pub const ALL: [Self; 4] = [Self::Grid, Self::Triangles, Self::Gyroid, Self::Honeycomb];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Triangles => "triangles",
            Self::Gyroid => "gyroid",
            Self::Honeycomb => "honeycomb",
        }
    }
}

impl fmt::Display for InfillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Material tables
// ============================================================================

/// Per-material starting values for the prediction form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialDefaults {
    pub nozzle_temperature: f64,
    pub bed_temperature: f64,
    pub fan_speed: f64,
    pub print_speed: f64,
    pub infill_density: f64,
    pub infill_pattern: InfillPattern,
}

/// Recommended (non-blocking) ranges for a material, as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialGuidance {
    pub nozzle_temperature: (f64, f64),
    pub bed_temperature: (f64, f64),
    pub max_print_speed: f64,
    pub fan_speed: (f64, f64),
    pub layer_height: (f64, f64),
    pub wall_thickness: (f64, f64),
}

// ============================================================================
// PrintParameters
// ============================================================================

/// Parameters submitted by the prediction form and forwarded to `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintParameters {
    pub material: Choice<Material>,
    /// Nozzle temperature (°C)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub nozzle_temperature: f64,
    /// Bed temperature (°C)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub bed_temperature: f64,
    /// Print speed (mm/s)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub print_speed: f64,
    /// Part cooling fan (%)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub fan_speed: f64,
    /// Layer height (mm)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub layer_height: f64,
    /// Wall thickness (mm)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub wall_thickness: f64,
    /// Nozzle diameter (mm)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub nozzle_diameter: f64,
    /// Estimated print time, forwarded as-is
    #[serde(default, deserialize_with = "int_or_zero")]
    pub print_time: i64,
    /// Infill density (%)
    #[serde(default = "missing_number", deserialize_with = "number_or_nan")]
    pub infill_density: f64,
    pub infill_pattern: Choice<InfillPattern>,
}

/// A missing or `null` number becomes NaN so the range check reports it
/// against its own field.
const fn missing_number() -> f64 {
    f64::NAN
}

fn number_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn int_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}

impl PrintParameters {
    /// Starting parameter set for `material`, with the shared geometry defaults.
    pub fn for_material(material: Material) -> Self {
        let mut params = Self {
            material: Choice::Known(material),
            nozzle_temperature: 0.0,
            bed_temperature: 0.0,
            print_speed: 0.0,
            fan_speed: 0.0,
            layer_height: 0.2,
            wall_thickness: 0.8,
            nozzle_diameter: 0.4,
            print_time: 0,
            infill_density: 0.0,
            infill_pattern: Choice::Known(InfillPattern::Grid),
        };
        params.apply_defaults(material.defaults());
        params
    }

    /// Overwrite the material-dependent fields, leaving geometry untouched.
    pub fn apply_defaults(&mut self, defaults: MaterialDefaults) {
        self.nozzle_temperature = defaults.nozzle_temperature;
        self.bed_temperature = defaults.bed_temperature;
        self.fan_speed = defaults.fan_speed;
        self.print_speed = defaults.print_speed;
        self.infill_density = defaults.infill_density;
        self.infill_pattern = Choice::Known(defaults.infill_pattern);
    }
}

impl Default for PrintParameters {
    fn default() -> Self {
        Self::for_material(Material::Pla)
    }
}
