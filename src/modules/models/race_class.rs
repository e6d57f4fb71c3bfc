use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct RaceClass {
    pub id: i32,
    pub name: Option<String>,
    pub format_id: Option<i32>,
}

impl RaceClass {
    /// # get all race classes
    /// ordered by id, the order they were created in
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<RaceClass>> {
        use crate::schema::race_class::dsl::*;
        race_class.order(id.asc()).load::<RaceClass>(conn)
    }

    /// # get a race class by id
    ///
    /// ## Returns
    /// * `Option<RaceClass>` - `None` if no class has the id
    pub fn get_by_id(conn: &mut SqliteConnection, id_in: i32) -> QueryResult<Option<RaceClass>> {
        use crate::schema::race_class::dsl::*;
        race_class
            .filter(id.eq(id_in))
            .first::<RaceClass>(conn)
            .optional()
    }

    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Class {}", self.id),
        }
    }
}
