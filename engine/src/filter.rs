//! Filter model
//!
//! The canonical structured representation of a spatial/temporal/variable
//! query. A `Filter` is produced by the interpreter, consumed read-only by
//! the planner, and never mutated after construction. The constructor is the
//! single place the model's invariants are enforced; everything downstream
//! may assume them.

use chrono::{DateTime, Datelike, Months, Utc};
use sdk::types::Variable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A filter that violates the model's invariants.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid filter: {0}")]
pub struct InvalidFilter(pub String);

/// Immutable spatial/temporal/variable query bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    lat_min: f64,
    lat_max: f64,
    lon_min: Option<f64>,
    lon_max: Option<f64>,
    time_start: DateTime<Utc>,
    time_end: DateTime<Utc>,
    variable: Variable,
    limit: u32,
}

impl Filter {
    /// Build a filter, enforcing the model invariants:
    /// `lat_min <= lat_max`, `time_start < time_end`, latitudes within
    /// [-90, 90], longitudes (when set) within [-180, 180], both longitude
    /// bounds set together, and a positive limit.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lat_min: f64,
        lat_max: f64,
        lon_min: Option<f64>,
        lon_max: Option<f64>,
        time_start: DateTime<Utc>,
        time_end: DateTime<Utc>,
        variable: Variable,
        limit: u32,
    ) -> Result<Self, InvalidFilter> {
        if !(-90.0..=90.0).contains(&lat_min) || !(-90.0..=90.0).contains(&lat_max) {
            return Err(InvalidFilter(format!(
                "latitude bounds {lat_min}..{lat_max} outside [-90, 90]"
            )));
        }
        if lat_min > lat_max {
            return Err(InvalidFilter(format!(
                "latitude lower bound {lat_min} exceeds upper bound {lat_max}"
            )));
        }
        match (lon_min, lon_max) {
            (None, None) => {}
            (Some(lo), Some(hi)) => {
                if !(-180.0..=180.0).contains(&lo) || !(-180.0..=180.0).contains(&hi) {
                    return Err(InvalidFilter(format!(
                        "longitude bounds {lo}..{hi} outside [-180, 180]"
                    )));
                }
                if lo > hi {
                    return Err(InvalidFilter(format!(
                        "longitude lower bound {lo} exceeds upper bound {hi}"
                    )));
                }
            }
            _ => {
                return Err(InvalidFilter(
                    "longitude bounds must be set together or not at all".to_string(),
                ));
            }
        }
        if time_start >= time_end {
            return Err(InvalidFilter(format!(
                "time window start {time_start} is not before end {time_end}"
            )));
        }
        if limit == 0 {
            return Err(InvalidFilter("limit must be positive".to_string()));
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            time_start,
            time_end,
            variable,
            limit,
        })
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn lon_min(&self) -> Option<f64> {
        self.lon_min
    }

    pub fn lon_max(&self) -> Option<f64> {
        self.lon_max
    }

    pub fn time_start(&self) -> DateTime<Utc> {
        self.time_start
    }

    /// Exclusive upper time bound.
    pub fn time_end(&self) -> DateTime<Utc> {
        self.time_end
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Human-readable description of the spatial bounds.
    pub fn describe_spatial(&self) -> String {
        describe_spatial_bounds(self.lat_min, self.lat_max, self.lon_min, self.lon_max)
    }

    /// Human-readable description of the time window.
    pub fn describe_temporal(&self) -> String {
        describe_time_window(self.time_start, self.time_end)
    }

    /// Combined spatial/temporal description for summary text.
    pub fn describe(&self) -> String {
        format!("{} during {}", self.describe_spatial(), self.describe_temporal())
    }
}

/// Describe latitude/longitude bounds in words.
///
/// A band symmetric around 0° reads as an equator band, matching the way the
/// question was most likely phrased; everything else falls back to plain
/// bounds.
pub fn describe_spatial_bounds(
    lat_min: f64,
    lat_max: f64,
    lon_min: Option<f64>,
    lon_max: Option<f64>,
) -> String {
    let lat = if lat_min == -90.0 && lat_max == 90.0 {
        "all latitudes".to_string()
    } else if lat_min == -lat_max && lat_max > 0.0 {
        format!("±{}° latitude around the equator", lat_max)
    } else {
        format!("latitudes {}° to {}°", lat_min, lat_max)
    };

    match (lon_min, lon_max) {
        (Some(lo), Some(hi)) => format!("{lat}, longitudes {lo}° to {hi}°"),
        _ => lat,
    }
}

/// Describe a half-open time window in words.
///
/// Windows that align exactly to a calendar month or year read as that month
/// or year; anything else reads as an inclusive date range.
pub fn describe_time_window(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    if is_month_start(start) && end == add_months(start, 1) {
        return start.format("%B %Y").to_string();
    }
    if is_year_start(start) && end == add_months(start, 12) {
        return start.format("%Y").to_string();
    }

    let last_day = end - chrono::Duration::days(1);
    format!(
        "{} to {}",
        start.format("%Y-%m-%d"),
        last_day.format("%Y-%m-%d")
    )
}

fn is_month_start(t: DateTime<Utc>) -> bool {
    t.day() == 1 && t.time() == chrono::NaiveTime::MIN
}

fn is_year_start(t: DateTime<Utc>) -> bool {
    is_month_start(t) && t.month() == 1
}

fn add_months(t: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    t.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
