//! Spatial qualifier extraction
//!
//! Turns place wording into latitude/longitude bounds. Three tiers, highest
//! non-empty tier wins: explicit coordinate bounds, then named regions, then
//! hemisphere keywords. Two clauses in the same tier whose bands cannot
//! intersect make the question ambiguous.

use regex::Regex;
use sdk::errors::ExplorerError;

/// Latitude band with optional longitude band, before merging into a Filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: Option<f64>,
    pub lon_max: Option<f64>,
}

impl SpatialBounds {
    fn band(lat_min: f64, lat_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min: None,
            lon_max: None,
        }
    }

    fn boxed(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min: Some(lon_min),
            lon_max: Some(lon_max),
        }
    }

    /// Intersect two bounds; `None` when the latitude or longitude bands are
    /// disjoint.
    fn intersect(&self, other: &Self) -> Option<Self> {
        let lat_min = self.lat_min.max(other.lat_min);
        let lat_max = self.lat_max.min(other.lat_max);
        if lat_min > lat_max {
            return None;
        }

        let (lon_min, lon_max) = match (
            (self.lon_min, self.lon_max),
            (other.lon_min, other.lon_max),
        ) {
            ((Some(a_lo), Some(a_hi)), (Some(b_lo), Some(b_hi))) => {
                let lo = a_lo.max(b_lo);
                let hi = a_hi.min(b_hi);
                if lo > hi {
                    return None;
                }
                (Some(lo), Some(hi))
            }
            ((Some(lo), Some(hi)), _) | (_, (Some(lo), Some(hi))) => (Some(lo), Some(hi)),
            _ => (None, None),
        };

        Some(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }
}

/// A named region and the bounds it denotes.
struct Region {
    pattern: Regex,
    name: &'static str,
    bounds: SpatialBounds,
}

/// Extracts spatial bounds from a lowercased question.
pub struct SpatialRule {
    explicit_band: Regex,
    compass_band: Regex,
    regions: Vec<Region>,
    northern: Regex,
    southern: Regex,
}

impl SpatialRule {
    /// Build the rule with a configurable "equator" band half-width.
    pub fn new(equator_band_degrees: f64) -> anyhow::Result<Self> {
        let band = equator_band_degrees;

        let region = |pattern: &str, name: &'static str, bounds: SpatialBounds| {
            Ok::<_, regex::Error>(Region {
                pattern: Regex::new(pattern)?,
                name,
                bounds,
            })
        };

        let regions = vec![
            region(r"\bequator(?:ial)?\b", "equator", SpatialBounds::band(-band, band))?,
            region(r"\btropic(?:s|al)?\b", "tropics", SpatialBounds::band(-23.43, 23.43))?,
            region(
                r"\bindian ocean\b",
                "Indian Ocean",
                SpatialBounds::boxed(-30.0, 30.0, 20.0, 120.0),
            )?,
            region(
                r"\batlantic\b",
                "Atlantic",
                SpatialBounds::boxed(-60.0, 65.0, -75.0, 20.0),
            )?,
            // The Pacific crosses the antimeridian; a single lon interval
            // cannot hold it, so only the latitude band is constrained.
            region(r"\bpacific\b", "Pacific", SpatialBounds::band(-60.0, 65.0))?,
            region(r"\barctic\b", "Arctic", SpatialBounds::band(66.5, 90.0))?,
            region(
                r"\b(?:antarctic|southern ocean)\b",
                "Southern Ocean",
                SpatialBounds::band(-90.0, -60.0),
            )?,
        ];

        Ok(Self {
            explicit_band: Regex::new(
                r"lat(?:itude)?s?\s+(?:between\s+|from\s+)?(-?\d+(?:\.\d+)?)\s*°?\s*(?:to|and|through)\s+(-?\d+(?:\.\d+)?)",
            )?,
            compass_band: Regex::new(
                r"(?:between|from)\s+(\d+(?:\.\d+)?)\s*°?\s*([ns])\b\s+(?:and|to)\s+(\d+(?:\.\d+)?)\s*°?\s*([ns])\b",
            )?,
            regions,
            northern: Regex::new(r"\bnorthern hemisphere\b")?,
            southern: Regex::new(r"\bsouthern hemisphere\b")?,
        })
    }

    /// Extract spatial bounds from `text` (already lowercased).
    ///
    /// Returns `Ok(None)` when no spatial qualifier is present, and
    /// `AmbiguousQuery` when two clauses in the same tier denote disjoint
    /// areas.
    pub fn extract(&self, text: &str) -> Result<Option<SpatialBounds>, ExplorerError> {
        // Tier 1: explicit coordinate bounds
        if let Some(bounds) = merge_tier(self.explicit_candidates(text), "coordinate bounds")? {
            return Ok(Some(bounds));
        }

        // Tier 2: named regions
        let mut named: Vec<(SpatialBounds, String)> = Vec::new();
        for region in &self.regions {
            if region.pattern.is_match(text) {
                named.push((region.bounds, region.name.to_string()));
            }
        }
        if let Some(bounds) = merge_tier(named, "regions")? {
            return Ok(Some(bounds));
        }

        // Tier 3: hemisphere keywords
        let mut hemis: Vec<(SpatialBounds, String)> = Vec::new();
        if self.northern.is_match(text) {
            hemis.push((SpatialBounds::band(0.0, 90.0), "northern hemisphere".into()));
        }
        if self.southern.is_match(text) {
            hemis.push((SpatialBounds::band(-90.0, 0.0), "southern hemisphere".into()));
        }
        match hemis.len() {
            0 => Ok(None),
            1 => Ok(Some(hemis[0].0)),
            _ => Err(ExplorerError::AmbiguousQuery(
                "both hemispheres were named as the region".to_string(),
            )),
        }
    }

    fn explicit_candidates(&self, text: &str) -> Vec<(SpatialBounds, String)> {
        let mut out = Vec::new();

        for caps in self.explicit_band.captures_iter(text) {
            let a: f64 = caps[1].parse().unwrap_or(0.0);
            let b: f64 = caps[2].parse().unwrap_or(0.0);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            out.push((
                SpatialBounds::band(lo.clamp(-90.0, 90.0), hi.clamp(-90.0, 90.0)),
                format!("latitudes {lo} to {hi}"),
            ));
        }

        for caps in self.compass_band.captures_iter(text) {
            let a = signed_latitude(&caps[1], &caps[2]);
            let b = signed_latitude(&caps[3], &caps[4]);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            out.push((
                SpatialBounds::band(lo.clamp(-90.0, 90.0), hi.clamp(-90.0, 90.0)),
                format!("latitudes {lo} to {hi}"),
            ));
        }

        out
    }
}

fn signed_latitude(value: &str, compass: &str) -> f64 {
    let magnitude: f64 = value.parse().unwrap_or(0.0);
    if compass == "s" {
        -magnitude
    } else {
        magnitude
    }
}

/// Fold same-tier candidates into one bounds value, or report ambiguity.
fn merge_tier(
    candidates: Vec<(SpatialBounds, String)>,
    kind: &str,
) -> Result<Option<SpatialBounds>, ExplorerError> {
    let mut iter = candidates.into_iter();
    let Some((mut acc, mut acc_name)) = iter.next() else {
        return Ok(None);
    };

    for (bounds, name) in iter {
        match acc.intersect(&bounds) {
            Some(merged) => {
                acc = merged;
                acc_name = format!("{acc_name} and {name}");
            }
            None => {
                return Err(ExplorerError::AmbiguousQuery(format!(
                    "the {kind} \"{acc_name}\" and \"{name}\" do not overlap"
                )));
            }
        }
    }

    Ok(Some(acc))
}
