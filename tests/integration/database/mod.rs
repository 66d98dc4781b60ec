//! Database integration tests
//!
//! The full router running on a SQLite file

mod sqlite_test;
