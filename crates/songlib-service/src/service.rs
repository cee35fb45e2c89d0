//! The song service.
//!
//! Ties metadata enrichment to the song repository. Every store operation
//! opens its own connection on tokio's blocking pool, so concurrent
//! requests share nothing in-process and contention is left to SQLite.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use songlib_core::schema::DEFAULT_BUSY_TIMEOUT;
use songlib_core::{Database, NewSong, PageRequest, Song, SongFilter, SongId, SongRepository};

use crate::config::Config;
use crate::enrich::resilience::RetryPolicy;
use crate::enrich::{MetadataSource, MusicInfoClient};
use crate::error::{ServiceError, ServiceResult};

/// Full replacement for a stored song.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SongUpdate {
    pub group: String,
    pub song: String,
    pub release_date: String,
    /// Lyrics, verses separated by blank lines.
    pub text: String,
    pub link: String,
}

/// Song library operations.
#[derive(Debug, Clone)]
pub struct SongService {
    db_path: PathBuf,
    busy_timeout: Duration,
    source: Arc<dyn MetadataSource>,
    enrichment_required: bool,
}

impl SongService {
    /// Create a service over the database at `db_path`, enriching new songs
    /// from `source`.
    pub fn new(db_path: impl Into<PathBuf>, source: Arc<dyn MetadataSource>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            source,
            enrichment_required: true,
        }
    }

    /// Build the service described by `config`, talking to the configured
    /// music-info service.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let Some(url) = config.music_info_url.as_deref() else {
            anyhow::bail!(
                "music_info_url is not set (use --music-info-url, MUSIC_INFO_URL, \
                 or `songlib config set music_info_url <url>`)"
            );
        };
        let client = MusicInfoClient::new(url, config.enrichment.timeout())?
            .with_retry(RetryPolicy::new(config.enrichment.max_retries));

        Ok(Self::new(&config.database_path, Arc::new(client))
            .with_busy_timeout(config.database.busy_timeout())
            .with_enrichment_required(config.enrichment.required))
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// When `false`, a song whose metadata cannot be fetched is stored
    /// without it instead of being rejected.
    #[must_use]
    pub fn with_enrichment_required(mut self, required: bool) -> Self {
        self.enrichment_required = required;
        self
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Create the database file and its parent directory if needed and
    /// bring the schema up to date.
    pub async fn prepare(&self) -> ServiceResult<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(songlib_core::Error::from)?;
            }
        }
        self.with_repo(|_| Ok(())).await
    }

    /// Enrich and store a new song, returning its id.
    pub async fn create_song(&self, group: &str, song: &str) -> ServiceResult<SongId> {
        check_names("CreateSong", group, song)?;

        let new_song = match self.source.fetch(group, song).await {
            Ok(detail) => NewSong::new(group, song)
                .with_release_date(detail.release_date)
                .with_text(&detail.text)
                .with_link(detail.link),
            Err(err) if !self.enrichment_required => {
                log::warn!(
                    "CreateSong: {} lookup for {:?} / {:?} failed, storing without metadata: {}",
                    self.source.name(),
                    group,
                    song,
                    err
                );
                NewSong::new(group, song)
            }
            Err(err) => {
                log::error!(
                    "CreateSong: {} lookup for {:?} / {:?} failed: {}",
                    self.source.name(),
                    group,
                    song,
                    err
                );
                return Err(err.into());
            }
        };

        let id = self
            .with_repo(move |repo| repo.create(&new_song))
            .await
            .inspect_err(|e| log_failure("CreateSong", e))?;
        log::info!("CreateSong: stored {:?} / {:?} as {}", group, song, id);
        Ok(id)
    }

    /// List songs matching every condition in `filter`.
    pub async fn list_songs(
        &self,
        filter: SongFilter,
        page: PageRequest,
    ) -> ServiceResult<Vec<Song>> {
        let songs = self
            .with_repo(move |repo| repo.list(&filter, page))
            .await
            .inspect_err(|e| log_failure("ListSongs", e))?;
        log::debug!("ListSongs: {} songs on page {}", songs.len(), page.offset());
        Ok(songs)
    }

    /// One page of a song's verses, joined back into text.
    pub async fn get_text(&self, id: SongId, page: PageRequest) -> ServiceResult<String> {
        let verses = self
            .with_repo(move |repo| repo.verses(id, page))
            .await
            .inspect_err(|e| log_failure("GetSongText", e))?;
        Ok(songlib_core::model::join_verses(&verses))
    }

    /// Replace every field of song `id`.
    pub async fn update_song(&self, id: SongId, update: SongUpdate) -> ServiceResult<()> {
        check_names("UpdateSong", &update.group, &update.song)?;

        let song = NewSong::new(update.group, update.song)
            .with_release_date(update.release_date)
            .with_text(&update.text)
            .with_link(update.link)
            .into_song(id);

        self.with_repo(move |repo| repo.update(&song))
            .await
            .inspect_err(|e| log_failure("UpdateSong", e))?;
        log::info!("UpdateSong: updated {}", id);
        Ok(())
    }

    /// Remove song `id`.
    pub async fn delete_song(&self, id: SongId) -> ServiceResult<()> {
        self.with_repo(move |repo| repo.delete(id))
            .await
            .inspect_err(|e| log_failure("DeleteSong", e))?;
        log::info!("DeleteSong: deleted {}", id);
        Ok(())
    }

    /// Number of stored songs.
    pub async fn count(&self) -> ServiceResult<u64> {
        self.with_repo(|repo| repo.count())
            .await
            .inspect_err(|e| log_failure("CountSongs", e))
    }

    async fn with_repo<T, F>(&self, op: F) -> ServiceResult<T>
    where
        F: FnOnce(SongRepository<'_>) -> songlib_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.db_path.clone();
        let busy_timeout = self.busy_timeout;
        let result = tokio::task::spawn_blocking(move || {
            let db = Database::open_with_timeout(&path, busy_timeout)?;
            op(SongRepository::new(&db))
        })
        .await?;
        Ok(result?)
    }
}

fn check_names(operation: &str, group: &str, song: &str) -> ServiceResult<()> {
    let missing = if group.trim().is_empty() {
        "group"
    } else if song.trim().is_empty() {
        "song"
    } else {
        return Ok(());
    };
    let err = ServiceError::Validation(format!("{missing} must not be empty"));
    log_failure(operation, &err);
    Err(err)
}

fn log_failure(operation: &str, err: &ServiceError) {
    match err {
        ServiceError::Validation(_) | ServiceError::NotFound { .. } => {
            log::warn!("{operation}: {err}");
        }
        _ => log::error!("{operation}: {err}"),
    }
}
