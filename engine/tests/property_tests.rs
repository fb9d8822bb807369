//! Property-based tests for the pipeline's pure stages.
//!
//! Planning is total over well-formed filters, the discovery timeline is
//! monotonic and accounts for every profile, and view building is a pure
//! function of the aggregated result.

use argonaut_engine::aggregate::QueryResult;
use argonaut_engine::filter::Filter;
use argonaut_engine::planner::{plan, render_sql};
use argonaut_engine::view::build_view;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sdk::types::{Measurement, PlannedQuery, Profile, Variable};

fn variable() -> impl Strategy<Value = Variable> {
    prop_oneof![
        Just(Variable::Salinity),
        Just(Variable::Temperature),
        Just(Variable::Pressure),
    ]
}

fn march_query() -> PlannedQuery {
    PlannedQuery {
        lat_min: -5.0,
        lat_max: 5.0,
        lon_min: None,
        lon_max: None,
        time_start: "2023-03-01T00:00:00Z".parse().unwrap(),
        time_end: "2023-04-01T00:00:00Z".parse().unwrap(),
        variable: Variable::Salinity,
        limit: 200,
    }
}

/// Arbitrary profiles inside the March 2023 window.
fn march_profiles() -> impl Strategy<Value = Vec<Profile>> {
    prop::collection::vec(
        (
            1i64..40,
            -10.0f64..10.0,
            1u32..=28,
            0u32..24,
            prop::collection::vec((0.0f64..2000.0, 30.0f64..40.0), 0..5),
        ),
        0..60,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .map(|(wmo, lat, day, hour, levels)| Profile {
                wmo_id: 2900000 + wmo,
                timestamp: Utc.with_ymd_and_hms(2023, 3, day, hour, 0, 0).unwrap(),
                latitude: lat,
                longitude: 80.0,
                measurements: levels
                    .into_iter()
                    .map(|(depth_m, value)| Measurement { depth_m, value })
                    .collect(),
            })
            .collect()
    })
}

proptest! {
    /// Any filter that constructs also plans, and planning drops nothing.
    #[test]
    fn planning_is_total_and_lossless(
        a in -90.0f64..=90.0,
        b in -90.0f64..=90.0,
        lon in prop::option::of((-180.0f64..=180.0, -180.0f64..=180.0)),
        var in variable(),
        limit in 1u32..10_000,
    ) {
        let (lat_min, lat_max) = if a <= b { (a, b) } else { (b, a) };
        let (lon_min, lon_max) = match lon {
            Some((x, y)) if x <= y => (Some(x), Some(y)),
            Some((x, y)) => (Some(y), Some(x)),
            None => (None, None),
        };

        let filter = Filter::new(
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            "2023-03-01T00:00:00Z".parse().unwrap(),
            "2023-04-01T00:00:00Z".parse().unwrap(),
            var,
            limit,
        ).unwrap();

        let query = plan(&filter);
        prop_assert_eq!(query.lat_min, lat_min);
        prop_assert_eq!(query.lat_max, lat_max);
        prop_assert_eq!(query.lon_min, lon_min);
        prop_assert_eq!(query.lon_max, lon_max);
        prop_assert_eq!(query.variable, var);
        prop_assert_eq!(query.limit, limit);
    }

    /// The rendered SQL always carries the canonical CTE shape.
    #[test]
    fn rendered_sql_keeps_canonical_shape(
        a in -90.0f64..=90.0,
        b in -90.0f64..=90.0,
        limit in 1u32..10_000,
    ) {
        let (lat_min, lat_max) = if a <= b { (a, b) } else { (b, a) };
        let mut query = march_query();
        query.lat_min = lat_min;
        query.lat_max = lat_max;
        query.limit = limit;

        let sql = render_sql(&query);
        let tail = format!("SELECT * FROM filtered LIMIT {limit};");
        let band = format!("latitude BETWEEN {lat_min} AND {lat_max}");
        prop_assert!(sql.starts_with("WITH filtered AS ("));
        prop_assert!(sql.ends_with(&tail));
        prop_assert!(sql.contains(&band));
    }

    /// The discovery timeline never decreases and accounts for every profile.
    #[test]
    fn timeline_is_monotonic_and_complete(profiles in march_profiles()) {
        let total = profiles.len() as u64;
        let result = QueryResult::from_profiles(march_query(), profiles);

        prop_assert!(!result.timeline.is_empty());
        prop_assert!(result
            .timeline
            .windows(2)
            .all(|w| w[0].cumulative <= w[1].cumulative));
        prop_assert_eq!(result.timeline.last().unwrap().cumulative, total);

        // Consecutive calendar days, no gaps
        prop_assert!(result
            .timeline
            .windows(2)
            .all(|w| w[1].day - w[0].day == chrono::Duration::days(1)));
    }

    /// No profile sits closer to the equator than the representative.
    #[test]
    fn representative_minimizes_absolute_latitude(profiles in march_profiles()) {
        let result = QueryResult::from_profiles(march_query(), profiles);

        match &result.representative {
            None => prop_assert!(result.profiles.is_empty()),
            Some(rep) => {
                prop_assert!(result
                    .profiles
                    .iter()
                    .all(|p| rep.latitude.abs() <= p.latitude.abs()));
            }
        }
    }

    /// View building is deterministic and preserves the profile counts.
    #[test]
    fn view_is_deterministic_and_consistent(profiles in march_profiles()) {
        let result = QueryResult::from_profiles(march_query(), profiles);

        let view = build_view(&result);
        prop_assert_eq!(&view, &build_view(&result));

        prop_assert_eq!(view.kpis.profile_count, result.profiles.len());
        prop_assert_eq!(view.markers.len(), result.profiles.len());
        prop_assert_eq!(view.rows.len(), result.profiles.len());
        prop_assert!(view.rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        // Depth series is strictly ascending after deduplication
        prop_assert!(view
            .depth_series
            .windows(2)
            .all(|w| w[0].depth_m < w[1].depth_m));
    }
}
