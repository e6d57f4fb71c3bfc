#![allow(dead_code)]

use std::path::PathBuf;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tempfile::TempDir;

use event_plots::modules::settings::{Settings, DATABASE_VAR};

const SCHEMA: &str = r#"
CREATE TABLE pilot (id INTEGER PRIMARY KEY, callsign VARCHAR(80), name VARCHAR(120), team VARCHAR(80), color VARCHAR(7));
CREATE TABLE race_format (id INTEGER PRIMARY KEY, name VARCHAR(80), race_time_sec INTEGER, win_condition INTEGER);
CREATE TABLE race_class (id INTEGER PRIMARY KEY, name VARCHAR(80), description VARCHAR(256), format_id INTEGER);
CREATE TABLE heat (id INTEGER PRIMARY KEY, name VARCHAR(80), class_id INTEGER);
CREATE TABLE saved_race_meta (id INTEGER PRIMARY KEY, round_id INTEGER, heat_id INTEGER, class_id INTEGER, format_id INTEGER);
CREATE TABLE saved_pilot_race (id INTEGER PRIMARY KEY, race_id INTEGER, node_index INTEGER, pilot_id INTEGER);
CREATE TABLE saved_race_lap (id INTEGER PRIMARY KEY, race_id INTEGER, pilotrace_id INTEGER, node_index INTEGER, pilot_id INTEGER, lap_time_stamp FLOAT, lap_time FLOAT, lap_time_formatted VARCHAR, source INTEGER, deleted BOOLEAN);
CREATE TABLE global_settings (id INTEGER PRIMARY KEY, option_name VARCHAR(40), option_value TEXT);
"#;

/// two classes with races and one class without heats
const EVENT: &str = r#"
INSERT INTO global_settings (option_name, option_value) VALUES ('eventName', 'Summer Cup');

INSERT INTO pilot (id, callsign, name, color) VALUES (1, 'Ace', 'Alice', '#FF0000'), (2, 'Bolt', 'Bob', NULL), (3, 'Comet', 'Carol', 'blue');

INSERT INTO race_format (id, name, win_condition) VALUES (1, 'Qualifier', 4), (2, 'Main', 3);
INSERT INTO race_class (id, name, format_id) VALUES (1, 'Open', 1), (2, 'Spec', 2), (3, 'Empty', 2);
INSERT INTO heat (id, name, class_id) VALUES (1, 'Heat 1', 1), (2, 'Heat 2', 1), (3, 'Final', 2);

INSERT INTO saved_race_meta (id, round_id, heat_id, class_id) VALUES (1, 1, 1, 1), (2, 1, 2, 1), (3, 1, 3, 2);
INSERT INTO saved_pilot_race (id, race_id, node_index, pilot_id) VALUES
    (1, 1, 0, 1), (2, 1, 1, 2), (3, 2, 0, 3), (4, 3, 0, 1), (5, 3, 1, 2), (6, 1, 2, 0);

INSERT INTO saved_race_lap (race_id, pilotrace_id, pilot_id, lap_time_stamp, lap_time, deleted) VALUES
    (1, 1, 1, 3000, 3000, 0),
    (1, 1, 1, 24000, 21000, 0),
    (1, 1, 1, 44000, 20000, 0),
    (1, 1, 1, 66000, 22000, 0),
    (1, 1, 1, 86500, 20500, 0),
    (1, 2, 2, 2500, 2500, 0),
    (1, 2, 2, 12500, 10000, 1),
    (1, 2, 2, 27500, 25000, 0),
    (1, 2, 2, 51500, 24000, 0),
    (1, 2, 2, 77500, 26000, 0),
    (2, 3, 3, 2000, 2000, 0),
    (2, 3, 3, 32000, 30000, 0),
    (3, 4, 1, 2800, 2800, 0),
    (3, 4, 1, 22300, 19500, 0),
    (3, 4, 1, 45300, 23000, 0),
    (3, 5, 2, 2600, 2600, 0),
    (3, 5, 2, 24100, 21500, 0);
"#;

/// # a RotorHazard database in a temporary directory
pub struct TestDatabase {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestDatabase {
    /// an event without any data
    pub fn empty() -> TestDatabase {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.db");

        let database = TestDatabase { dir, path };
        database.execute(SCHEMA);
        database
    }

    /// the event with two classes of results
    pub fn event() -> TestDatabase {
        let database = TestDatabase::empty();
        database.execute(EVENT);
        database
    }

    pub fn execute(&self, sql: &str) {
        let mut conn = SqliteConnection::establish(self.path.to_str().unwrap()).unwrap();
        conn.batch_execute(sql).unwrap();
    }

    pub fn settings(&self) -> Settings {
        let path = self.path.to_string_lossy().to_string();
        Settings::from_vars(|key| match key {
            DATABASE_VAR => Some(path.clone()),
            "EVENT_PLOTS_CACHE_SIZE" => Some("16".to_string()),
            _ => None,
        })
        .unwrap()
    }
}
