use diesel::prelude::*;
use diesel::SqliteConnection;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Pilot {
    pub id: i32,
    pub callsign: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Pilot {
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Pilot>> {
        use crate::schema::pilot::dsl::*;
        pilot.order(id.asc()).load::<Pilot>(conn)
    }

    /// # get pilots by id
    /// ids that do not exist are skipped
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `ids` - The ids of the pilots to get
    pub fn from_ids(conn: &mut SqliteConnection, ids: &[i32]) -> QueryResult<Vec<Pilot>> {
        use crate::schema::pilot::dsl::*;
        pilot
            .filter(id.eq_any(ids))
            .order(id.asc())
            .load::<Pilot>(conn)
    }

    /// # name shown in the plots
    /// the callsign, or the pilot name when no callsign is set
    pub fn display_name(&self) -> String {
        [&self.callsign, &self.name]
            .into_iter()
            .flatten()
            .map(|e| e.trim())
            .find(|e| !e.is_empty())
            .map(|e| e.to_string())
            .unwrap_or_else(|| format!("Pilot {}", self.id))
    }

    /// # colour of the pilot
    /// only `#rrggbb` colours are passed on, anything else is treated as unset
    pub fn display_color(&self) -> Option<String> {
        static HEX_COLOR: OnceLock<Regex> = OnceLock::new();
        let hex = HEX_COLOR.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid regex"));

        self.color
            .as_deref()
            .map(str::trim)
            .filter(|e| hex.is_match(e))
            .map(|e| e.to_lowercase())
    }
}
