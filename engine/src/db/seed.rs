/// Demo dataset loader
///
/// Seeds a deterministic equatorial Indian-Ocean dataset: 52 profiles from
/// 17 floats spread over March 2023, each carrying salinity, temperature,
/// and pressure depth curves. Deterministic on purpose — the same seed
/// always produces the same database, which keeps demos and integration
/// tests reproducible.
use super::Database;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use sdk::types::{Measurement, Profile, Variable};
use tracing::info;

/// What the seeding pass loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub profiles: usize,
    pub floats: usize,
}

const FLOAT_IDS: [i64; 17] = [
    2902745, 2903321, 2901358, 2904112, 2900881, 2901204, 2901776, 2902033, 2902410, 2902658,
    2903007, 2903194, 2903542, 2903880, 2904256, 2904471, 2904693,
];

/// Reference salinity curve (depth m, PSU) for the equatorial Indian Ocean.
const SALINITY_CURVE: [(f64, f64); 7] = [
    (0.0, 34.2),
    (100.0, 34.4),
    (300.0, 34.6),
    (500.0, 34.8),
    (1000.0, 35.0),
    (1500.0, 35.1),
    (2000.0, 35.2),
];

/// Reference temperature curve (depth m, °C).
const TEMPERATURE_CURVE: [(f64, f64); 7] = [
    (0.0, 28.6),
    (100.0, 22.4),
    (300.0, 12.8),
    (500.0, 9.1),
    (1000.0, 4.6),
    (1500.0, 3.2),
    (2000.0, 2.4),
];

/// Load the demo dataset. Appends to whatever is already stored.
pub async fn seed_demo(db: &Database) -> Result<SeedSummary> {
    let repo = db.profiles();

    for i in 0..52i64 {
        let profile = demo_profile(i);
        let profile_id = repo.insert_profile(&profile, Variable::Salinity).await?;

        repo.insert_levels(profile_id, Variable::Temperature, &curve(&TEMPERATURE_CURVE, i, 0.05))
            .await?;

        // Pressure in dbar tracks depth almost one-to-one
        let pressure: Vec<Measurement> = SALINITY_CURVE
            .iter()
            .map(|(depth_m, _)| Measurement {
                depth_m: *depth_m,
                value: depth_m * 1.01,
            })
            .collect();
        repo.insert_levels(profile_id, Variable::Pressure, &pressure)
            .await?;
    }

    let summary = SeedSummary {
        profiles: 52,
        floats: FLOAT_IDS.len(),
    };
    info!(
        profiles = summary.profiles,
        floats = summary.floats,
        "demo dataset loaded"
    );
    Ok(summary)
}

/// The i-th demo profile, spread over March 1–30 within ±5° of the equator
/// and the 55°E–115°E band.
fn demo_profile(i: i64) -> Profile {
    let day = (i % 30) + 1;
    let hour = (i * 7) % 24;
    let minute = (i * 13) % 60;

    let latitude = -4.8 + ((i as f64) * 0.37) % 9.6;
    let longitude = 55.0 + ((i as f64) * 3.1) % 60.0;

    Profile {
        wmo_id: FLOAT_IDS[(i % FLOAT_IDS.len() as i64) as usize],
        timestamp: Utc
            .with_ymd_and_hms(2023, 3, day as u32, hour as u32, minute as u32, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        latitude,
        longitude,
        measurements: curve(&SALINITY_CURVE, i, 0.01),
    }
}

/// Reference curve shifted by a small per-profile offset.
fn curve(reference: &[(f64, f64)], i: i64, step: f64) -> Vec<Measurement> {
    let offset = ((i % 5) as f64 - 2.0) * step;
    reference
        .iter()
        .map(|(depth_m, value)| Measurement {
            depth_m: *depth_m,
            value: value + offset,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdk::store::ProfileStore;
    use sdk::types::PlannedQuery;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_matches_advertised_counts() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(&temp_dir.path().join("test.db")).await.unwrap();

        let summary = seed_demo(&db).await.unwrap();
        assert_eq!(summary.profiles, 52);
        assert_eq!(summary.floats, 17);

        let repo = db.profiles();
        assert_eq!(repo.count_profiles().await.unwrap(), 52);
        assert_eq!(repo.count_floats().await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_seeded_profiles_answer_the_march_question() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(&temp_dir.path().join("test.db")).await.unwrap();
        seed_demo(&db).await.unwrap();

        let query = PlannedQuery {
            lat_min: -5.0,
            lat_max: 5.0,
            lon_min: None,
            lon_max: None,
            time_start: "2023-03-01T00:00:00Z".parse().unwrap(),
            time_end: "2023-04-01T00:00:00Z".parse().unwrap(),
            variable: Variable::Salinity,
            limit: 200,
        };
        let profiles = db.store().execute(&query).await.unwrap();

        assert_eq!(profiles.len(), 52);
        assert!(profiles.iter().all(|p| p.latitude.abs() <= 5.0));
        assert!(profiles.iter().all(|p| p.measurements.len() == 7));
    }
}
