//! Song metadata enrichment.
//!
//! New songs are enriched from an external music-info service that knows
//! the release date, lyrics, and a reference link for a `(group, song)`
//! pair. The service is reached through the [`MetadataSource`] trait so the
//! song service can be exercised without a network.

mod client;
pub mod resilience;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EnrichResult;

pub use client::{MusicInfoClient, DEFAULT_TIMEOUT};

/// Metadata returned by a music-info lookup.
///
/// Every field is required; a response missing any of them is a parse
/// error rather than a partially filled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetail {
    pub release_date: String,
    /// Full lyrics, verses separated by blank lines.
    pub text: String,
    pub link: String,
}

/// A lookup service for song metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Fetch metadata for the song titled `song` by `group`.
    async fn fetch(&self, group: &str, song: &str) -> EnrichResult<SongDetail>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_uses_camel_case() {
        let detail: SongDetail = serde_json::from_str(
            r#"{"releaseDate":"16.07.2006","text":"a\n\nb","link":"https://example.com"}"#,
        )
        .unwrap();
        assert_eq!(detail.release_date, "16.07.2006");
        assert_eq!(detail.text, "a\n\nb");
    }

    #[test]
    fn test_detail_rejects_missing_fields() {
        let result: Result<SongDetail, _> = serde_json::from_str(r#"{"releaseDate":"2006"}"#);
        assert!(result.is_err());
    }
}
