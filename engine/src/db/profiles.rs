/// Profile persistence and the SQLite-backed profile store
///
/// All queries are parameterized; the planner's display SQL never reaches
/// this module. Timestamps are stored as RFC 3339 UTC text, so the half-open
/// time window can be compared lexicographically.
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sdk::store::{ProfileStore, StoreError};
use sdk::types::{Measurement, PlannedQuery, Profile, Variable};
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Write-side repository for loading profiles into the database.
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one profile and its depth curve for `variable`.
    ///
    /// Returns the database id of the inserted profile row.
    pub async fn insert_profile(&self, profile: &Profile, variable: Variable) -> Result<i64> {
        let time_utc = format_instant(profile.timestamp);

        let result = sqlx::query(
            "INSERT INTO profiles (wmo_id, time_utc, latitude, longitude) VALUES (?, ?, ?, ?)",
        )
        .bind(profile.wmo_id)
        .bind(&time_utc)
        .bind(profile.latitude)
        .bind(profile.longitude)
        .execute(&self.pool)
        .await
        .context("Failed to insert profile")?;

        let profile_id = result.last_insert_rowid();

        for m in &profile.measurements {
            sqlx::query(
                "INSERT INTO profile_levels (profile_id, variable, depth_m, value) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(profile_id)
            .bind(variable.as_str())
            .bind(m.depth_m)
            .bind(m.value)
            .execute(&self.pool)
            .await
            .context("Failed to insert profile level")?;
        }

        Ok(profile_id)
    }

    /// Attach an additional depth curve to an already-inserted profile.
    pub async fn insert_levels(
        &self,
        profile_id: i64,
        variable: Variable,
        measurements: &[Measurement],
    ) -> Result<()> {
        for m in measurements {
            sqlx::query(
                "INSERT INTO profile_levels (profile_id, variable, depth_m, value) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(profile_id)
            .bind(variable.as_str())
            .bind(m.depth_m)
            .bind(m.value)
            .execute(&self.pool)
            .await
            .context("Failed to insert profile level")?;
        }

        Ok(())
    }

    /// Total number of stored profiles.
    pub async fn count_profiles(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count profiles")?;
        Ok(count)
    }

    /// Number of distinct floats represented in the database.
    pub async fn count_floats(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT wmo_id) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count floats")?;
        Ok(count)
    }
}

/// Read-side [`ProfileStore`] over the SQLite database.
///
/// Executes the structured [`PlannedQuery`] with bound parameters and
/// attaches the requested variable's depth curve to every returned profile.
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_levels(&self, profile_id: i64, variable: Variable) -> Result<Vec<Measurement>, StoreError> {
        let rows = sqlx::query(
            "SELECT depth_m, value FROM profile_levels \
             WHERE profile_id = ? AND variable = ? ORDER BY depth_m ASC",
        )
        .bind(profile_id)
        .bind(variable.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| Measurement {
                depth_m: row.get("depth_m"),
                value: row.get("value"),
            })
            .collect())
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn execute(&self, query: &PlannedQuery) -> Result<Vec<Profile>, StoreError> {
        let start = format_instant(query.time_start);
        let end = format_instant(query.time_end);

        // Longitude is an optional predicate, so the two shapes are prepared
        // separately; every value is bound, never interpolated
        let rows = match (query.lon_min, query.lon_max) {
            (Some(lon_min), Some(lon_max)) => {
                sqlx::query(
                    "SELECT id, wmo_id, time_utc, latitude, longitude FROM profiles \
                     WHERE latitude BETWEEN ? AND ? \
                       AND longitude BETWEEN ? AND ? \
                       AND time_utc >= ? AND time_utc < ? \
                     ORDER BY time_utc ASC LIMIT ?",
                )
                .bind(query.lat_min)
                .bind(query.lat_max)
                .bind(lon_min)
                .bind(lon_max)
                .bind(&start)
                .bind(&end)
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
            _ => {
                sqlx::query(
                    "SELECT id, wmo_id, time_utc, latitude, longitude FROM profiles \
                     WHERE latitude BETWEEN ? AND ? \
                       AND time_utc >= ? AND time_utc < ? \
                     ORDER BY time_utc ASC LIMIT ?",
                )
                .bind(query.lat_min)
                .bind(query.lat_max)
                .bind(&start)
                .bind(&end)
                .bind(query.limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!(rows = rows.len(), "profile query executed");

        let mut profiles = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.get("id");
            let time_utc: String = row.get("time_utc");
            let timestamp = parse_instant(&time_utc)?;

            profiles.push(Profile {
                wmo_id: row.get("wmo_id"),
                timestamp,
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                measurements: self.fetch_levels(id, query.variable).await?,
            });
        }

        Ok(profiles)
    }
}

fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Unavailable(format!("corrupt timestamp '{text}': {e}")))
}
