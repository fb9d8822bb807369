//! Domain value types shared across the pipeline boundary
//!
//! These types cross the seam between the engine and any `ProfileStore`
//! implementation. All of them are plain immutable values: constructed once,
//! cloned freely, never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measured ocean variable carried by a profile's depth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    Salinity,
    Temperature,
    Pressure,
}

impl Variable {
    /// Display unit for this variable.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Salinity => "PSU",
            Self::Temperature => "°C",
            Self::Pressure => "dbar",
        }
    }

    /// Canonical lowercase name, stable across config and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salinity => "salinity",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
        }
    }

    /// Parse a canonical variable name (as produced by [`Variable::as_str`]).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "salinity" => Some(Self::Salinity),
            "temperature" => Some(Self::Temperature),
            "pressure" => Some(Self::Pressure),
            _ => None,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (depth, value) point on a profile's curve for the requested variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Depth below the surface in meters.
    pub depth_m: f64,
    /// Measured value in the variable's unit.
    pub value: f64,
}

/// One ARGO float observation event.
///
/// A float surfaces, reports one depth/value curve, and dives again; each of
/// those events is one `Profile`. Several profiles share a `wmo_id` when they
/// come from the same physical float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// WMO identifier of the float that produced this profile.
    pub wmo_id: i64,
    /// Observation time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Surfacing latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Surfacing longitude in degrees, [-180, 180].
    pub longitude: f64,
    /// Depth/value pairs for the requested variable, as reported by the float.
    pub measurements: Vec<Measurement>,
}

/// Parameterized, store-agnostic query produced by the planner.
///
/// This is the only shape the engine ever hands to a [`ProfileStore`]: bound
/// values, never interpolated SQL text. The cosmetic SQL rendering shown to
/// users is derived from the same values but is never executed.
///
/// [`ProfileStore`]: crate::store::ProfileStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedQuery {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: Option<f64>,
    pub lon_max: Option<f64>,
    pub time_start: DateTime<Utc>,
    /// Exclusive upper time bound.
    pub time_end: DateTime<Utc>,
    /// Variable whose depth curve the store must attach to each profile.
    pub variable: Variable,
    /// Row cap applied by the store.
    pub limit: u32,
}
