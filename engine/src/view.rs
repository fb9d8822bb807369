//! Visualization state builder
//!
//! Shapes a [`QueryResult`] into the exact artifact set the presentation
//! layer displays: KPI numbers, the representative depth series, the
//! discovery timeline, map markers, table rows, the summary sentence, and
//! the display-only SQL text. Pure function of its input: the same result
//! always yields the same view model, and an empty result yields an empty
//! (but fully formed) view model.

use crate::aggregate::{QueryResult, TimelinePoint};
use crate::filter::{describe_spatial_bounds, describe_time_window};
use crate::planner;
use chrono::{DateTime, Utc};
use sdk::types::Measurement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Headline numbers for the KPI block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiBlock {
    pub profile_count: usize,
    pub float_count: usize,
    /// Mean of the requested variable over every measurement point across
    /// all profiles; `None` when there are no finite measurement values.
    pub average_value: Option<f64>,
    /// Deepest measured point across all profiles, in meters.
    pub max_depth_m: Option<f64>,
    /// Unit string of the requested variable, for axis and KPI labels.
    pub unit: String,
}

/// One map marker per profile; coincident markers are kept, not merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub wmo_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One table row per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub wmo_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Everything the presentation layer needs to render one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub kpis: KpiBlock,
    /// Representative profile's curve, depth-ascending, duplicate depths
    /// collapsed (last write wins).
    pub depth_series: Vec<Measurement>,
    /// Discovery timeline, verbatim from the aggregation.
    pub timeline: Vec<TimelinePoint>,
    pub markers: Vec<MapMarker>,
    /// Table rows sorted by timestamp ascending.
    pub rows: Vec<TableRow>,
    /// Template-filled natural-language summary.
    pub summary: String,
    /// Display-only SQL rendering of the executed query.
    pub generated_sql: String,
}

/// Shape an aggregated result into its view model.
pub fn build_view(result: &QueryResult) -> ViewModel {
    let kpis = KpiBlock {
        profile_count: result.profiles.len(),
        float_count: result.float_count,
        average_value: average_value(result),
        max_depth_m: max_depth(result),
        unit: result.planned.variable.unit().to_string(),
    };

    let depth_series = result
        .representative
        .as_ref()
        .map(|p| depth_sorted(&p.measurements))
        .unwrap_or_default();

    let markers = result
        .profiles
        .iter()
        .map(|p| MapMarker {
            wmo_id: p.wmo_id,
            latitude: p.latitude,
            longitude: p.longitude,
        })
        .collect();

    let mut rows: Vec<TableRow> = result
        .profiles
        .iter()
        .map(|p| TableRow {
            wmo_id: p.wmo_id,
            latitude: p.latitude,
            longitude: p.longitude,
            timestamp: p.timestamp,
        })
        .collect();
    rows.sort_by_key(|r| r.timestamp);

    ViewModel {
        kpis,
        depth_series,
        timeline: result.timeline.clone(),
        markers,
        rows,
        summary: summary_text(result),
        generated_sql: planner::render_sql(&result.planned),
    }
}

/// NaN-safe mean over every measurement point across all profiles.
fn average_value(result: &QueryResult) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u64;
    for profile in &result.profiles {
        for m in &profile.measurements {
            if m.value.is_finite() {
                sum += m.value;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

fn max_depth(result: &QueryResult) -> Option<f64> {
    result
        .profiles
        .iter()
        .flat_map(|p| p.measurements.iter())
        .map(|m| m.depth_m)
        .filter(|d| d.is_finite())
        .fold(None, |acc: Option<f64>, d| {
            Some(acc.map_or(d, |a| a.max(d)))
        })
}

/// Sort measurements by depth ascending, collapsing duplicate depths with
/// last-write-wins semantics.
fn depth_sorted(measurements: &[Measurement]) -> Vec<Measurement> {
    let mut by_depth: HashMap<u64, Measurement> = HashMap::new();
    for m in measurements {
        by_depth.insert(m.depth_m.to_bits(), *m);
    }

    let mut out: Vec<Measurement> = by_depth.into_values().collect();
    out.sort_by(|a, b| {
        a.depth_m
            .partial_cmp(&b.depth_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

fn summary_text(result: &QueryResult) -> String {
    let planned = &result.planned;
    let spatial = describe_spatial_bounds(
        planned.lat_min,
        planned.lat_max,
        planned.lon_min,
        planned.lon_max,
    );
    let temporal = describe_time_window(planned.time_start, planned.time_end);

    if result.is_empty() {
        return format!(
            "No ARGO {} profiles matched {} during {}. Try a wider region or time window.",
            planned.variable, spatial, temporal
        );
    }

    format!(
        "Found {} ARGO {} profiles from {} floats within {} during {}. \
         Here are the highlights and a representative profile.",
        result.profiles.len(),
        planned.variable,
        result.float_count,
        spatial,
        temporal
    )
}
