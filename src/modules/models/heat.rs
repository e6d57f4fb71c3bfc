use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Serialize, PartialEq, Debug, Clone, Deserialize, Eq, Hash)]
pub struct Heat {
    pub id: i32,
    pub name: Option<String>,
    pub class_id: Option<i32>,
}

impl Heat {
    /// # get all heats
    pub fn get_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Heat>> {
        use crate::schema::heat::dsl::*;
        heat.order(id.asc()).load::<Heat>(conn)
    }

    /// # get the heats of a race class
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `class_id_in` - the id of the race class
    ///
    /// ## Returns
    /// * `Vec<Heat>` - the heats assigned to the class
    pub fn from_class(conn: &mut SqliteConnection, class_id_in: i32) -> QueryResult<Vec<Heat>> {
        use crate::schema::heat::dsl::*;
        heat.filter(class_id.eq(class_id_in))
            .order(id.asc())
            .load::<Heat>(conn)
    }
}
