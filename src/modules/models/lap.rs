use std::collections::HashMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

/// # a recorded lap
/// `lap_time` is stored by RotorHazard in milliseconds
#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Lap {
    pub id: i32,
    pub race_id: Option<i32>,
    pub pilotrace_id: Option<i32>,
    pub pilot_id: Option<i32>,
    pub lap_time_stamp: Option<f64>,
    pub lap_time: Option<f64>,
    pub deleted: Option<bool>,
}

impl Lap {
    /************ GETTERS ************/
    /// # get the laps of pilot runs
    /// get the laps that were not deleted from the given pilot runs, in the
    /// order they were driven
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `run_ids` - The ids of the pilot runs
    ///
    /// ## Returns
    /// * `Vec<Lap>` - the laps of the runs
    pub fn from_pilot_runs(conn: &mut SqliteConnection, run_ids: &[i32]) -> QueryResult<Vec<Lap>> {
        use crate::schema::saved_race_lap::dsl::*;
        saved_race_lap
            .filter(pilotrace_id.eq_any(run_ids))
            .filter(deleted.is_null().or(deleted.eq(false)))
            .order((pilotrace_id.asc(), lap_time_stamp.asc(), id.asc()))
            .load::<Lap>(conn)
    }

    /************ UTILS ************/

    /// # the lap time in seconds
    /// `None` for laps without a usable time
    pub fn seconds(&self) -> Option<f64> {
        self.lap_time
            .filter(|e| e.is_finite() && *e >= 0.0)
            .map(|e| e / 1000.0)
    }

    /// # group laps by pilot run
    /// keeps the order of the laps within each run
    ///
    /// ## Arguments
    /// * `laps` - The laps to group
    ///
    /// ## Returns
    /// * `HashMap<i32, Vec<f64>>` - lap times in seconds per pilot run id
    pub fn seconds_per_run(laps: &[Lap]) -> HashMap<i32, Vec<f64>> {
        let mut run_laps: HashMap<i32, Vec<f64>> = HashMap::new();
        for lap in laps {
            let (Some(run), Some(seconds)) = (lap.pilotrace_id, lap.seconds()) else {
                continue;
            };

            run_laps.entry(run).or_default().push(seconds);
        }

        run_laps
    }
}
