use std::collections::HashMap;

use diesel::SqliteConnection;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::errors::{ClassNotFoundSnafu, CustomResult, NoRacesSnafu, QuerySnafu};
use crate::modules::models::general::GlobalSetting;
use crate::modules::models::heat::Heat;
use crate::modules::models::lap::Lap;
use crate::modules::models::pilot::Pilot;
use crate::modules::models::race::{PilotRun, SavedRace};
use crate::modules::models::race_class::RaceClass;
use crate::modules::models::race_format::{RaceFormat, WinCondition};
use crate::modules::settings::Settings;

pub const DEFAULT_CONSECUTIVE_BASE: usize = 3;
const MAX_CONSECUTIVE_BASE: i64 = 100;
const MAX_ROW_HEIGHT: u32 = 1000;

/// # the laps of one pilot in one race
/// lap times are in seconds, the first lap is the holeshot
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct RunLaps {
    pub pilot_id: i32,
    pub race_id: i32,
    pub heat_id: i32,
    pub round: i32,
    pub laps: Vec<f64>,
}

/// # everything needed to plot a race class
#[derive(Clone, Debug)]
pub struct EventData {
    pub event_name: String,
    /// empty for the event wide plot
    pub class_name: String,
    pub format_name: String,
    pub win_condition: WinCondition,
    pub consecutive_base: usize,
    pub row_height: u32,
    pub pilots: Vec<Pilot>,
    pub runs: Vec<RunLaps>,
}

impl EventData {
    /// # load a race class
    /// load the pilots and laps of the races driven in the heats of a class
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `class_id` - the race class to load
    /// * `settings` - used for defaults of options that are not set
    pub fn load_class(conn: &mut SqliteConnection, class_id: i32, settings: &Settings) -> CustomResult<EventData> {
        let class = RaceClass::get_by_id(conn, class_id)
            .context(QuerySnafu { what: "race class" })?
            .context(ClassNotFoundSnafu { class_id })?;
        let class_name = class.display_name();

        EventData::ensure_races(conn, &class_name)?;

        let format = match class.format_id {
            Some(format_id) if format_id > 0 => RaceFormat::get_by_id(conn, format_id)
                .context(QuerySnafu { what: "race format" })?,
            _ => None,
        };

        let heat_ids: Vec<i32> = Heat::from_class(conn, class.id)
            .context(QuerySnafu { what: "heats of class" })?
            .iter()
            .map(|e| e.id)
            .collect();
        debug!(target: "event_data:load_class", "class {} has heats {:?}", class.id, heat_ids);

        let races = SavedRace::from_heats(conn, &heat_ids).context(QuerySnafu { what: "races of class" })?;

        let mut data = EventData::from_races(conn, &races, settings)?;
        data.class_name = class_name;
        if heat_ids.is_empty() {
            // a class without heats lists every pilot of the event
            data.pilots = Pilot::get_all(conn).context(QuerySnafu { what: "pilots" })?;
        }
        if let Some(format) = format {
            data.win_condition = format.win_condition();
            data.format_name = format.name.unwrap_or_default();
        }

        Ok(data)
    }

    /// # load the whole event
    /// every lap of every saved race regardless of class
    pub fn load_event(conn: &mut SqliteConnection, settings: &Settings) -> CustomResult<EventData> {
        let event_name = EventData::event_name(conn)?;
        EventData::ensure_races(conn, &event_name)?;

        let races = SavedRace::get_all(conn).context(QuerySnafu { what: "races" })?;
        EventData::from_races(conn, &races, settings)
    }

    /// name used in messages, the class or otherwise the event
    pub fn display_name(&self) -> &str {
        if self.class_name.is_empty() {
            &self.event_name
        } else {
            &self.class_name
        }
    }

    fn ensure_races(conn: &mut SqliteConnection, name: &str) -> CustomResult<()> {
        let races = SavedRace::count(conn).context(QuerySnafu { what: "race count" })?;
        ensure!(races > 0, NoRacesSnafu { name });
        Ok(())
    }

    /// the `eventName` option, "Event" when unset
    pub fn event_name(conn: &mut SqliteConnection) -> CustomResult<String> {
        Ok(GlobalSetting::get_option(conn, "eventName")?
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Event".to_string()))
    }

    fn from_races(conn: &mut SqliteConnection, races: &[SavedRace], settings: &Settings) -> CustomResult<EventData> {
        let race_map: HashMap<i32, &SavedRace> = races.iter().map(|e| (e.id, e)).collect();
        let race_ids: Vec<i32> = races.iter().map(|e| e.id).collect();

        let pilot_runs = PilotRun::from_races(conn, &race_ids).context(QuerySnafu { what: "pilot runs" })?;
        let run_ids: Vec<i32> = pilot_runs.iter().map(|e| e.id).collect();
        let laps = Lap::from_pilot_runs(conn, &run_ids).context(QuerySnafu { what: "laps" })?;
        let mut laps_per_run = Lap::seconds_per_run(&laps);

        let mut pilot_ids: Vec<i32> = pilot_runs.iter().filter_map(|e| e.pilot_id).collect();
        pilot_ids.sort_unstable();
        pilot_ids.dedup();
        let pilots = Pilot::from_ids(conn, &pilot_ids).context(QuerySnafu { what: "pilots" })?;

        // runs are ordered by race, so counting per pilot gives the round
        // for races that were saved without one
        let mut runs_per_pilot: HashMap<i32, i32> = HashMap::new();
        let mut runs = Vec::with_capacity(pilot_runs.len());
        for pilot_run in &pilot_runs {
            let (Some(pilot_id), Some(race)) = (pilot_run.pilot_id, pilot_run.race_id.and_then(|e| race_map.get(&e)))
            else {
                continue;
            };

            let position = runs_per_pilot.entry(pilot_id).or_insert(0);
            *position += 1;

            let round = match race.round() {
                0 => *position,
                round => round,
            };

            runs.push(RunLaps {
                pilot_id,
                race_id: race.id,
                heat_id: race.heat_id.unwrap_or(0),
                round,
                laps: laps_per_run.remove(&pilot_run.id).unwrap_or_default(),
            });
        }

        Ok(EventData {
            event_name: EventData::event_name(conn)?,
            class_name: String::new(),
            format_name: String::new(),
            win_condition: WinCondition::None,
            consecutive_base: EventData::consecutive_base(conn)?,
            row_height: EventData::row_height(conn, settings)?,
            pilots,
            runs,
        })
    }

    fn consecutive_base(conn: &mut SqliteConnection) -> CustomResult<usize> {
        let base = GlobalSetting::get_option_int(conn, "consecutivesCount", DEFAULT_CONSECUTIVE_BASE as i64)?;
        if base <= 0 || base > MAX_CONSECUTIVE_BASE {
            warn!(target: "event_data:consecutive_base", "invalid consecutive laps base: {}, using {}", base, DEFAULT_CONSECUTIVE_BASE);
            return Ok(DEFAULT_CONSECUTIVE_BASE);
        }

        Ok(base as usize)
    }

    fn row_height(conn: &mut SqliteConnection, settings: &Settings) -> CustomResult<u32> {
        let height = GlobalSetting::get_option_int(conn, "event_plots_row_height", settings.row_height as i64)?;
        match u32::try_from(height) {
            Ok(height) if height > 0 && height <= MAX_ROW_HEIGHT => Ok(height),
            _ => {
                warn!(target: "event_data:row_height", "invalid row height: {}, using {}", height, settings.row_height);
                Ok(settings.row_height)
            }
        }
    }
}
