//! Song repository: query construction and row mapping.

mod song_repo;

pub use song_repo::{ListQuery, SongRepository};
