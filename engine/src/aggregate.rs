//! Data aggregator
//!
//! Executes a planned query against the profile store and folds the returned
//! profiles into a [`QueryResult`]: distinct float count, representative
//! profile, and the discovery timeline. The folds are stateless functions
//! over an immutable snapshot; nothing here mutates shared state, so
//! concurrent sessions can aggregate in parallel.
//!
//! A query matching zero profiles is a normal, fully-formed result — the
//! caller renders a "no data" state from it.

use chrono::{Duration, NaiveDate};
use sdk::errors::ExplorerError;
use sdk::store::ProfileStore;
use sdk::types::{PlannedQuery, Profile};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// One point of the discovery timeline: profiles discovered up to and
/// including `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub day: NaiveDate,
    pub cumulative: u64,
}

/// Aggregate of one filter execution. Derived deterministically from the
/// returned profiles; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The query this result answers; kept so downstream shaping can render
    /// the SQL text and the filter description without re-planning.
    pub planned: PlannedQuery,
    pub profiles: Vec<Profile>,
    /// Count of distinct WMO float identifiers among the profiles.
    pub float_count: usize,
    /// Profile chosen for the detail display, when any profile matched.
    pub representative: Option<Profile>,
    /// Cumulative per-day discovery counts across the filter window.
    pub timeline: Vec<TimelinePoint>,
}

impl QueryResult {
    /// Fold a set of profiles into a result. Order of `profiles` is
    /// irrelevant; every derived field is order-independent.
    pub fn from_profiles(planned: PlannedQuery, profiles: Vec<Profile>) -> Self {
        let float_count = distinct_float_count(&profiles);
        let representative = representative_profile(&profiles).cloned();
        let timeline = discovery_timeline(&profiles, &planned);

        Self {
            planned,
            profiles,
            float_count,
            representative,
            timeline,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Execute a planned query and aggregate its result.
///
/// Fails with `StoreUnavailable`/`StoreTimeout` when the store does; an
/// empty result is returned as a valid [`QueryResult`], not an error.
pub async fn aggregate(
    planned: &PlannedQuery,
    store: &dyn ProfileStore,
) -> Result<QueryResult, ExplorerError> {
    let profiles = store.execute(planned).await?;

    debug!(
        profiles = profiles.len(),
        lat_min = planned.lat_min,
        lat_max = planned.lat_max,
        "store query returned"
    );

    Ok(QueryResult::from_profiles(planned.clone(), profiles))
}

/// Count of distinct WMO identifiers.
fn distinct_float_count(profiles: &[Profile]) -> usize {
    profiles
        .iter()
        .map(|p| p.wmo_id)
        .collect::<HashSet<_>>()
        .len()
}

/// The profile whose latitude is closest to 0°, ties broken by earliest
/// timestamp. The most equatorial curve makes the most typical detail
/// display.
fn representative_profile(profiles: &[Profile]) -> Option<&Profile> {
    profiles.iter().min_by(|a, b| {
        a.latitude
            .abs()
            .partial_cmp(&b.latitude.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    })
}

/// Bucket profiles by calendar day and emit a cumulative running count.
///
/// One point per day from the window's first day through the latest
/// profile's day; days without profiles carry the previous count forward, so
/// the sequence is monotonic non-decreasing and ends at the total profile
/// count. With no profiles at all, every day of the window appears with a
/// zero count.
fn discovery_timeline(profiles: &[Profile], planned: &PlannedQuery) -> Vec<TimelinePoint> {
    let first_day = planned.time_start.date_naive();
    // time_end is exclusive, so the window's last day is the day before it
    // when it sits exactly on midnight
    let window_last_day = (planned.time_end - Duration::nanoseconds(1)).date_naive();

    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for profile in profiles {
        *per_day.entry(profile.timestamp.date_naive()).or_insert(0) += 1;
    }

    let last_day = per_day
        .keys()
        .next_back()
        .copied()
        .unwrap_or(window_last_day)
        .min(window_last_day);

    let mut timeline = Vec::new();
    let mut cumulative = 0u64;
    let mut day = first_day;
    while day <= last_day {
        cumulative += per_day.get(&day).copied().unwrap_or(0);
        timeline.push(TimelinePoint { day, cumulative });
        day += Duration::days(1);
    }

    timeline
}
