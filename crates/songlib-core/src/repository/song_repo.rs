use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Row, ToSql};

use crate::error::{Error, Result};
use crate::model::{NewSong, PageRequest, Song, SongFilter, SongId};
use crate::schema::Database;

const SONG_COLUMNS: &str = "id, group_name, song, release_date, verses, link";

/// A list query with its bind values.
///
/// Filter values only ever appear as bind parameters; the SQL text is built
/// from fixed column names and `?N` placeholders.
#[derive(Debug)]
pub struct ListQuery<'f> {
    sql: String,
    values: Vec<&'f str>,
    limit: i64,
    skip: i64,
}

impl<'f> ListQuery<'f> {
    #[must_use]
    pub fn build(filter: &'f SongFilter, page: PageRequest) -> Self {
        let clauses: Vec<String> = filter
            .conditions()
            .enumerate()
            .map(|(i, (field, _))| format!("{} = ?{}", field.column(), i + 1))
            .collect();
        let values: Vec<&str> = filter.conditions().map(|(_, value)| value).collect();

        let mut sql = format!("SELECT {SONG_COLUMNS} FROM songs");
        if !clauses.is_empty() {
            sql = format!("{sql} WHERE {}", clauses.join(" AND "));
        }
        let n = values.len();
        let sql = format!("{sql} ORDER BY id LIMIT ?{} OFFSET ?{}", n + 1, n + 2);

        Self {
            sql,
            values,
            limit: i64::from(page.limit()),
            skip: i64::try_from(page.skip()).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind values in placeholder order: filter values, limit, row skip.
    #[must_use]
    pub fn params(&self) -> Vec<&dyn ToSql> {
        let mut params: Vec<&dyn ToSql> = self.values.iter().map(|v| v as &dyn ToSql).collect();
        params.push(&self.limit);
        params.push(&self.skip);
        params
    }
}

/// Song CRUD over a [`Database`].
#[derive(Debug, Clone, Copy)]
pub struct SongRepository<'a> {
    db: &'a Database,
}

impl<'a> SongRepository<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List songs matching every filter condition, one page at a time,
    /// ordered by id.
    pub fn list(&self, filter: &SongFilter, page: PageRequest) -> Result<Vec<Song>> {
        let query = ListQuery::build(filter, page);
        log::debug!("list songs: {} ({} filters)", query.sql(), query.values.len());
        self.db.query_rows(query.sql(), &query.params(), row_to_song)
    }

    /// Fetch a single song.
    pub fn get(&self, id: SongId) -> Result<Song> {
        self.db
            .query_opt(
                &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
                &[&id.as_i64()],
                row_to_song,
            )?
            .ok_or_else(|| not_found(id))
    }

    /// Return one page of a song's verses.
    ///
    /// A page past the last verse is empty; an unknown id is an error.
    pub fn verses(&self, id: SongId, page: PageRequest) -> Result<Vec<String>> {
        let raw = self
            .db
            .query_opt("SELECT verses FROM songs WHERE id = ?1", &[&id.as_i64()], |row| {
                row.get::<_, String>(0)
            })?
            .ok_or_else(|| not_found(id))?;

        let verses: Vec<String> = serde_json::from_str(&raw)?;
        Ok(page.slice(&verses).to_vec())
    }

    /// Insert a new song and return the id the store assigned.
    pub fn create(&self, song: &NewSong) -> Result<SongId> {
        let verses = serde_json::to_string(&song.verses)?;
        let now = Utc::now().to_rfc3339();
        let id = self.db.insert(
            "INSERT INTO songs (group_name, song, release_date, verses, link, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            &[
                &song.group,
                &song.song,
                &song.release_date,
                &verses,
                &song.link,
                &now,
            ],
        )?;
        Ok(SongId::from_raw(id))
    }

    /// Replace every mutable field of an existing song.
    pub fn update(&self, song: &Song) -> Result<()> {
        let verses = serde_json::to_string(&song.verses)?;
        let changed = self.db.execute(
            "UPDATE songs SET
                group_name = ?2, song = ?3, release_date = ?4,
                verses = ?5, link = ?6, updated_at = ?7
             WHERE id = ?1",
            &[
                &song.id.as_i64(),
                &song.group,
                &song.song,
                &song.release_date,
                &verses,
                &song.link,
                &Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(not_found(song.id));
        }
        Ok(())
    }

    /// Delete a song.
    pub fn delete(&self, id: SongId) -> Result<()> {
        let changed = self
            .db
            .execute("DELETE FROM songs WHERE id = ?1", &[&id.as_i64()])?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Total number of stored songs.
    pub fn count(&self) -> Result<u64> {
        let count = self
            .db
            .query_opt("SELECT COUNT(*) FROM songs", &[], |row| row.get::<_, i64>(0))?
            .unwrap_or(0);
        u64::try_from(count).map_err(|_| Error::InvalidData(format!("negative song count {count}")))
    }
}

fn not_found(id: SongId) -> Error {
    Error::NotFound {
        entity: "song",
        id: id.to_string(),
    }
}

fn row_to_song(row: &Row<'_>) -> rusqlite::Result<Song> {
    let verses_json: String = row.get(4)?;
    let verses: Vec<String> = serde_json::from_str(&verses_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Song {
        id: SongId::from_raw(row.get(0)?),
        group: row.get(1)?,
        song: row.get(2)?,
        release_date: row.get(3)?,
        verses,
        link: row.get(5)?,
    })
}
