use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

/// # a saved race
/// one run of a heat. `round_id` is the round number within the heat
#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct SavedRace {
    pub id: i32,
    pub round_id: Option<i32>,
    pub heat_id: Option<i32>,
    pub class_id: Option<i32>,
}

impl SavedRace {
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<SavedRace>> {
        use crate::schema::saved_race_meta::dsl::*;
        saved_race_meta.order(id.asc()).load::<SavedRace>(conn)
    }

    /// # get the races of heats
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `heat_ids` - the heats to get the races for
    pub fn from_heats(conn: &mut SqliteConnection, heat_ids: &[i32]) -> QueryResult<Vec<SavedRace>> {
        use crate::schema::saved_race_meta::dsl::*;
        saved_race_meta
            .filter(heat_id.eq_any(heat_ids))
            .order(id.asc())
            .load::<SavedRace>(conn)
    }

    /// # amount of saved races in the event
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        use crate::schema::saved_race_meta::dsl::*;
        saved_race_meta.select(count_star()).first(conn)
    }

    pub fn round(&self) -> i32 {
        self.round_id.unwrap_or(0)
    }
}

/// # a pilot in a saved race
#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct PilotRun {
    pub id: i32,
    pub race_id: Option<i32>,
    pub pilot_id: Option<i32>,
}

impl PilotRun {
    /// # get the pilot runs of races
    /// seats without a pilot (`pilot_id` 0) are skipped
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `race_ids` - the races to get the runs for
    pub fn from_races(conn: &mut SqliteConnection, race_ids: &[i32]) -> QueryResult<Vec<PilotRun>> {
        use crate::schema::saved_pilot_race::dsl::*;
        saved_pilot_race
            .filter(race_id.eq_any(race_ids))
            .filter(pilot_id.gt(0))
            .order((race_id.asc(), id.asc()))
            .load::<PilotRun>(conn)
    }
}
