//! Request handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use songlib_core::{PageLimits, PageRequest, Song, SongField, SongFilter, SongId};
use songlib_service::{SongService, SongUpdate};

use super::error::{ApiError, ErrorBody};

/// Paging parameters arrive as raw strings so that unparseable values fall
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    offset: Option<String>,
    limit: Option<String>,
}

impl PageParams {
    fn page(&self, limits: PageLimits) -> PageRequest {
        PageRequest::new(
            parse_number(self.offset.as_deref()),
            parse_number(self.limit.as_deref()),
            limits,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    group: Option<String>,
    song: Option<String>,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(flatten)]
    page: PageParams,
}

impl ListParams {
    fn filter(&self) -> SongFilter {
        let mut filter = SongFilter::new();
        for (field, value) in [
            (SongField::Group, &self.group),
            (SongField::Song, &self.song),
            (SongField::ReleaseDate, &self.release_date),
        ] {
            if let Some(value) = value {
                filter.set(field, value.as_str());
            }
        }
        filter
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSongRequest {
    group: String,
    song: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SongsResponse {
    songs: Vec<Song>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextResponse {
    text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    id: SongId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn parse_id(operation: &str, raw: &str) -> Result<SongId, ApiError> {
    raw.parse().map_err(|_| {
        log::warn!("{operation}: invalid song ID {raw:?}");
        ApiError::bad_request("invalid song ID")
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "The service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/songs",
    tag = "songs",
    params(
        ("group" = Option<String>, Query, description = "Exact group name"),
        ("song" = Option<String>, Query, description = "Exact song title"),
        ("releaseDate" = Option<String>, Query, description = "Exact release date"),
        ("offset" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("limit" = Option<i64>, Query, description = "Songs per page (default 10, max 100)"),
    ),
    responses(
        (status = 200, description = "One page of matching songs", body = SongsResponse),
        (status = 400, description = "Malformed query", body = ErrorBody),
        (status = 500, description = "Failed to fetch songs", body = ErrorBody),
    )
)]
pub async fn list_songs(
    State(service): State<SongService>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<SongsResponse>, ApiError> {
    log::debug!("ListSongs: received request");
    let Query(params) = params.inspect_err(|e| log::warn!("ListSongs: {e}"))?;

    let filter = params.filter();
    let page = params.page.page(PageLimits::SONGS);
    log::debug!(
        "ListSongs: filter={:?}, offset={}, limit={}",
        filter,
        page.offset(),
        page.limit()
    );

    let songs = service
        .list_songs(filter, page)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to fetch songs"))?;

    log::info!("ListSongs: retrieved {} songs", songs.len());
    Ok(Json(SongsResponse { songs }))
}

#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "songs",
    params(
        ("id" = u64, Path, description = "Song id"),
        ("offset" = Option<i64>, Query, description = "1-based page number (default 1)"),
        ("limit" = Option<i64>, Query, description = "Verses per page (default 4, max 10)"),
    ),
    responses(
        (status = 200, description = "One page of the song's verses", body = TextResponse),
        (status = 400, description = "Invalid song ID", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 500, description = "Failed to fetch text", body = ErrorBody),
    )
)]
pub async fn get_text(
    State(service): State<SongService>,
    Path(id): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    log::debug!("GetSongText: received request");
    let id = parse_id("GetSongText", &id)?;
    let Query(params) = params.inspect_err(|e| log::warn!("GetSongText: {e}"))?;
    let page = params.page(PageLimits::VERSES);

    let text = service
        .get_text(id, page)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to fetch text"))?;

    log::info!("GetSongText: retrieved page {} of song {}", page.offset(), id);
    Ok(Json(TextResponse { text }))
}

#[utoipa::path(
    post,
    path = "/songs",
    tag = "songs",
    request_body = CreateSongRequest,
    responses(
        (status = 201, description = "Song enriched and stored", body = CreatedResponse),
        (status = 400, description = "Invalid body or blank names", body = ErrorBody),
        (status = 500, description = "Failed to create song", body = ErrorBody),
    )
)]
pub async fn create_song(
    State(service): State<SongService>,
    body: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    log::debug!("CreateSong: received request");
    let Json(request) = body.inspect_err(|e| log::warn!("CreateSong: {e}"))?;

    let id = service
        .create_song(&request.group, &request.song)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to create song"))?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = u64, Path, description = "Song id")),
    request_body = SongUpdate,
    responses(
        (status = 204, description = "Song replaced"),
        (status = 400, description = "Invalid song ID or body", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 500, description = "Failed to update song", body = ErrorBody),
    )
)]
pub async fn update_song(
    State(service): State<SongService>,
    Path(id): Path<String>,
    body: Result<Json<SongUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    log::debug!("UpdateSong: received request");
    let id = parse_id("UpdateSong", &id)?;
    let Json(update) = body.inspect_err(|e| log::warn!("UpdateSong: {e}"))?;

    service
        .update_song(id, update)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to update song"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "songs",
    params(("id" = u64, Path, description = "Song id")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 400, description = "Invalid song ID", body = ErrorBody),
        (status = 404, description = "Song not found", body = ErrorBody),
        (status = 500, description = "Failed to delete song", body = ErrorBody),
    )
)]
pub async fn delete_song(
    State(service): State<SongService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    log::debug!("DeleteSong: received request");
    let id = parse_id("DeleteSong", &id)?;

    service
        .delete_song(id)
        .await
        .map_err(|e| ApiError::from_service(e, "failed to delete song"))?;

    Ok(StatusCode::NO_CONTENT)
}
