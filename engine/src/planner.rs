//! Query planner
//!
//! Turns a [`Filter`] into a [`PlannedQuery`] for the profile store. The
//! filter's constructor already enforced every invariant the planner needs,
//! so planning is total: it never fails for a well-formed filter.
//!
//! The planner also renders a SQL-shaped string for display in the UI. That
//! string is cosmetic only. The store receives the structured `PlannedQuery`
//! with bound parameters; nothing ever executes the rendered text, which is
//! what keeps question text out of any SQL path.

use crate::filter::Filter;
use chrono::{DateTime, Timelike, Utc};
use sdk::types::PlannedQuery;

/// Plan a store query from a filter. Total for any constructed [`Filter`].
pub fn plan(filter: &Filter) -> PlannedQuery {
    PlannedQuery {
        lat_min: filter.lat_min(),
        lat_max: filter.lat_max(),
        lon_min: filter.lon_min(),
        lon_max: filter.lon_max(),
        time_start: filter.time_start(),
        time_end: filter.time_end(),
        variable: filter.variable(),
        limit: filter.limit(),
    }
}

/// Render the canonical display-only SQL text for a planned query.
///
/// Midnight-aligned instants render as bare dates, which is how the window
/// reads most naturally for calendar-month questions.
pub fn render_sql(query: &PlannedQuery) -> String {
    let lon_predicate = match (query.lon_min, query.lon_max) {
        (Some(lo), Some(hi)) => format!("\n    AND longitude BETWEEN {lo} AND {hi}"),
        _ => String::new(),
    };

    format!(
        "WITH filtered AS (\n  \
           SELECT profile_id, time_utc, latitude, longitude\n  \
           FROM profiles\n  \
           WHERE latitude BETWEEN {lat_min} AND {lat_max}{lon_predicate}\n    \
             AND time_utc >= '{start}' AND time_utc < '{end}'\n\
         )\n\
         SELECT * FROM filtered LIMIT {limit};",
        lat_min = query.lat_min,
        lat_max = query.lat_max,
        start = sql_instant(query.time_start),
        end = sql_instant(query.time_end),
        limit = query.limit,
    )
}

fn sql_instant(t: DateTime<Utc>) -> String {
    if t.hour() == 0 && t.minute() == 0 && t.second() == 0 && t.nanosecond() == 0 {
        t.format("%Y-%m-%d").to_string()
    } else {
        t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk::types::Variable;

    fn march_filter() -> Filter {
        Filter::new(
            -5.0,
            5.0,
            None,
            None,
            "2023-03-01T00:00:00Z".parse().unwrap(),
            "2023-04-01T00:00:00Z".parse().unwrap(),
            Variable::Salinity,
            200,
        )
        .unwrap()
    }

    #[test]
    fn test_plan_copies_all_bounds() {
        let filter = march_filter();
        let query = plan(&filter);

        assert_eq!(query.lat_min, -5.0);
        assert_eq!(query.lat_max, 5.0);
        assert_eq!(query.lon_min, None);
        assert_eq!(query.time_start, filter.time_start());
        assert_eq!(query.time_end, filter.time_end());
        assert_eq!(query.variable, Variable::Salinity);
        assert_eq!(query.limit, 200);
    }

    #[test]
    fn test_render_sql_canonical_shape() {
        let sql = render_sql(&plan(&march_filter()));

        let expected = "WITH filtered AS (\n  \
                        SELECT profile_id, time_utc, latitude, longitude\n  \
                        FROM profiles\n  \
                        WHERE latitude BETWEEN -5 AND 5\n    \
                          AND time_utc >= '2023-03-01' AND time_utc < '2023-04-01'\n\
                        )\n\
                        SELECT * FROM filtered LIMIT 200;";
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_render_sql_substitutes_live_values() {
        let filter = Filter::new(
            10.0,
            30.0,
            Some(50.0),
            Some(90.0),
            "2022-01-01T06:30:00Z".parse().unwrap(),
            "2022-02-01T00:00:00Z".parse().unwrap(),
            Variable::Temperature,
            50,
        )
        .unwrap();
        let sql = render_sql(&plan(&filter));

        assert!(sql.contains("latitude BETWEEN 10 AND 30"));
        assert!(sql.contains("AND longitude BETWEEN 50 AND 90"));
        assert!(sql.contains("time_utc >= '2022-01-01T06:30:00Z'"));
        assert!(sql.contains("time_utc < '2022-02-01'"));
        assert!(sql.contains("LIMIT 50;"));
    }
}
