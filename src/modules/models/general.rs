use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::{debug, warn};
use snafu::prelude::*;

use crate::errors::{CustomResult, DatabaseConnectionSnafu, DatabaseMissingSnafu, QuerySnafu};

/// # establish a connection to the RotorHazard database
/// the database is opened read only. the timing server keeps writing to it
/// while we read, so wait a bit on locks instead of failing right away.
///
/// ## Arguments
/// * `path` - path to the `database.db` of the RotorHazard server
///
/// ## Returns
/// * `SqliteConnection` - a read only connection
pub fn establish_connection(path: &Path) -> CustomResult<SqliteConnection> {
    ensure!(path.is_file(), DatabaseMissingSnafu { path });

    let mut conn = SqliteConnection::establish(&read_only_uri(path))
        .context(DatabaseConnectionSnafu { path })?;

    if let Err(error) = conn.batch_execute("PRAGMA busy_timeout = 2000;") {
        warn!(target: "models/general:establish_connection", "could not set busy timeout: {}", error);
    }

    Ok(conn)
}

fn read_only_uri(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('%', "%25")
        .replace('?', "%3f")
        .replace('#', "%23");

    format!("file:{escaped}?mode=ro")
}

#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct GlobalSetting {
    pub id: i32,
    pub option_name: Option<String>,
    pub option_value: Option<String>,
}

impl GlobalSetting {
    /// # get an option value
    /// get the raw value of a RotorHazard option, `None` when it was never set
    pub fn get_option(conn: &mut SqliteConnection, name: &str) -> CustomResult<Option<String>> {
        use crate::schema::global_settings::dsl::*;

        let setting = global_settings
            .filter(option_name.eq(name))
            .first::<GlobalSetting>(conn)
            .optional()
            .context(QuerySnafu { what: format!("option {name}") })?;

        Ok(setting.and_then(|s| s.option_value))
    }

    /// # get a numeric option
    /// values that are missing, empty, or not a number fall back to the default
    pub fn get_option_int(conn: &mut SqliteConnection, name: &str, default: i64) -> CustomResult<i64> {
        let value = match GlobalSetting::get_option(conn, name)? {
            Some(value) => value,
            None => return Ok(default),
        };

        match value.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number as i64),
            _ => {
                debug!(target: "models/general:get_option_int", "option {} has non numeric value `{}`", name, value);
                Ok(default)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_uri_escapes_uri_characters() {
        let uri = read_only_uri(Path::new("/data/rh 100%/db?#.db"));
        assert_eq!(uri, "file:/data/rh 100%25/db%3f%23.db?mode=ro");
    }

    #[test]
    fn missing_database_is_reported() {
        let result = establish_connection(Path::new("/nonexistent/database.db"));
        assert!(matches!(result, Err(crate::errors::Error::DatabaseMissingError { .. })));
    }
}
