#![allow(missing_docs)]

pub(crate) mod http;

use rusqlite::Connection;

use crate::db::initialize;

pub(crate) use http::parse_json_body;

/// An in-memory database with all of the tables created.
#[track_caller]
pub(crate) fn must_create_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    connection
}
