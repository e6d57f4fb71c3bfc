use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("setting {key} must be set"))]
    MissingSettingError { key: String },

    #[snafu(display("invalid value `{value}` for setting {key}"))]
    InvalidSettingError { key: String, value: String },

    #[snafu(display("database {} does not exist", path.display()))]
    DatabaseMissingError { path: PathBuf },

    #[snafu(display("could not open database {}: {}", path.display(), source))]
    DatabaseConnectionError {
        path: PathBuf,
        source: diesel::ConnectionError,
    },

    #[snafu(display("error getting {what}: {source}"))]
    QueryError {
        what: String,
        source: diesel::result::Error,
    },

    #[snafu(display("race class {class_id} not found"))]
    ClassNotFoundError { class_id: i32 },

    #[snafu(display("no races have been completed yet for '{name}'"))]
    NoRacesError { name: String },

    #[snafu(display("no pilots have completed races in '{name}'"))]
    NoPilotsError { name: String },

    #[snafu(display("no lap data found for '{name}'"))]
    NoLapsError { name: String },

    #[snafu(display("error scheduling database watcher: {source}"))]
    SchedulerError {
        source: tokio_cron_scheduler::JobSchedulerError,
    },
}

pub type CustomResult<T> = Result<T, Error>;

impl Error {
    /// errors that describe missing data rather than a failure.
    /// these are shown to the user as a message page
    pub fn is_empty_data(&self) -> bool {
        matches!(
            self,
            Error::NoRacesError { .. } | Error::NoPilotsError { .. } | Error::NoLapsError { .. }
        )
    }
}
