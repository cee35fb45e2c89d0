//! SQLite schema and the storage gateway.

mod db;
pub mod migrations;

pub use db::{Database, DEFAULT_BUSY_TIMEOUT};
