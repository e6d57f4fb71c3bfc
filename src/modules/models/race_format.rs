use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct RaceFormat {
    pub id: i32,
    pub name: Option<String>,
    pub win_condition: Option<i32>,
}

impl RaceFormat {
    pub fn get_by_id(conn: &mut SqliteConnection, id_in: i32) -> QueryResult<Option<RaceFormat>> {
        use crate::schema::race_format::dsl::*;
        race_format
            .filter(id.eq(id_in))
            .first::<RaceFormat>(conn)
            .optional()
    }

    pub fn win_condition(&self) -> WinCondition {
        self.win_condition
            .map(WinCondition::from_id)
            .unwrap_or_default()
    }
}

/// # rule deciding the winner of a race format
/// the numbering follows the `win_condition` column of RotorHazard
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// just count laps
    #[default]
    None,
    /// fastest to pass the finish post after n laps
    MostProgress,
    /// first to pass the finish post after n laps
    FirstToLapX,
    FastestLap,
    FastestConsecutive,
    /// most laps in a given time
    MostLaps,
}

impl WinCondition {
    pub fn from_id(id: i32) -> WinCondition {
        match id {
            1 => WinCondition::MostProgress,
            2 => WinCondition::FirstToLapX,
            3 => WinCondition::FastestLap,
            4 => WinCondition::FastestConsecutive,
            5 => WinCondition::MostLaps,
            _ => WinCondition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_conditions_from_ids() {
        assert_eq!(WinCondition::from_id(4), WinCondition::FastestConsecutive);
        assert_eq!(WinCondition::from_id(0), WinCondition::None);
        assert_eq!(WinCondition::from_id(42), WinCondition::None);
        assert_eq!(WinCondition::from_id(-1), WinCondition::None);
    }

    #[test]
    fn format_without_win_condition() {
        let format = RaceFormat { id: 1, name: None, win_condition: None };
        assert_eq!(format.win_condition(), WinCondition::None);
    }
}
