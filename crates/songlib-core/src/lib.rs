//! Core domain model for songlib.
//!
//! This crate defines the `Song` record, verse splitting, filter and
//! pagination types, the SQLite schema, and the song repository that turns
//! list/filter/slice requests into parameter-bound queries.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod repository;
pub mod schema;

pub use error::{Error, Result};
pub use model::{NewSong, PageLimits, PageRequest, Song, SongField, SongFilter, SongId};
pub use repository::SongRepository;
pub use schema::Database;
