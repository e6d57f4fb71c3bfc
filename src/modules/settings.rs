use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use log::LevelFilter;
use snafu::prelude::*;

use crate::errors::{CustomResult, InvalidSettingSnafu, MissingSettingSnafu};
use crate::modules::helpers::logging::parse_level;

pub const DATABASE_VAR: &str = "EVENT_PLOTS_DATABASE";

/// # service settings
/// read from the environment, a `.env` file in the working directory is
/// loaded first
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// the `database.db` of the RotorHazard server
    pub database_path: PathBuf,
    /// height of a pilot row when the event has no `event_plots_row_height` option
    pub row_height: u32,
    /// url plotly.js is loaded from
    pub plotly_js: String,
    /// directory served under `/event_plots/static`
    pub static_dir: PathBuf,
    /// seconds between checks of the database for new results, 0 disables watching
    pub watch_interval: u64,
    /// amount of pages kept in the cache, 0 disables caching
    pub cache_size: usize,
    pub log_file: PathBuf,
    pub logging_level: LevelFilter,
}

impl Settings {
    pub fn from_env() -> CustomResult<Settings> {
        dotenv().ok();
        Settings::from_vars(|key| env::var(key).ok())
    }

    /// # build settings from variables
    ///
    /// ## Arguments
    /// * `get` - looks up a variable, `None` when it is not set
    pub fn from_vars<F: Fn(&str) -> Option<String>>(get: F) -> CustomResult<Settings> {
        let get = |key: &str| get(key).filter(|e| !e.trim().is_empty());

        let database_path = get(DATABASE_VAR)
            .map(PathBuf::from)
            .context(MissingSettingSnafu { key: DATABASE_VAR })?;

        Ok(Settings {
            database_path,
            row_height: parse_var(get("EVENT_PLOTS_ROW_HEIGHT"), "EVENT_PLOTS_ROW_HEIGHT", 100)?,
            plotly_js: get("EVENT_PLOTS_PLOTLY_JS")
                .unwrap_or_else(|| "/event_plots/static/plotly-3.0.0.min.js".to_string()),
            static_dir: get("EVENT_PLOTS_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            watch_interval: parse_var(get("EVENT_PLOTS_WATCH_INTERVAL"), "EVENT_PLOTS_WATCH_INTERVAL", 5)?,
            cache_size: parse_var(get("EVENT_PLOTS_CACHE_SIZE"), "EVENT_PLOTS_CACHE_SIZE", 64)?,
            log_file: get("EVENT_PLOTS_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("event_plots.log")),
            logging_level: parse_level(get("LOGGING_LEVEL").as_deref().unwrap_or("INFO")),
        })
    }
}

fn parse_var<T: FromStr>(value: Option<String>, key: &str, default: T) -> CustomResult<T> {
    match value {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => InvalidSettingSnafu { key, value }.fail(),
        },
    }
}
