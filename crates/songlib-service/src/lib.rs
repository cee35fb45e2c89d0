//! Enrichment and orchestration for songlib.
//!
//! Holds the configuration layer, the music-info client that enriches new
//! songs, and the [`SongService`] that ties enrichment to the repository in
//! `songlib-core`.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod service;

pub use config::Config;
pub use enrich::resilience::RetryPolicy;
pub use enrich::{MetadataSource, MusicInfoClient, SongDetail};
pub use error::{EnrichError, EnrichResult, ServiceError, ServiceResult};
pub use service::{SongService, SongUpdate};
