use serde::{Deserialize, Serialize};

use crate::model::ids::SongId;
use crate::model::verses::{join_verses, split_verses};

/// A song in the catalog.
///
/// `group` + `song` is not unique: the same title by the same group may be
/// stored more than once, each under its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,

    /// Performing group or artist name.
    pub group: String,

    /// Song title.
    pub song: String,

    /// Release date as reported by the music-info service.
    pub release_date: String,

    /// Lyric text split into verses, in song order.
    pub verses: Vec<String>,

    /// External reference URL.
    pub link: String,
}

impl Song {
    /// The song's full lyric text.
    #[must_use]
    pub fn text(&self) -> String {
        join_verses(&self.verses)
    }
}

/// A song that has not been stored yet and so has no id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSong {
    pub group: String,
    pub song: String,
    pub release_date: String,
    pub verses: Vec<String>,
    pub link: String,
}

impl NewSong {
    #[must_use]
    pub fn new(group: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            song: song.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = release_date.into();
        self
    }

    /// Set the verses by splitting raw lyric text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.verses = split_verses(text);
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Attach the id the store assigned.
    #[must_use]
    pub fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            group: self.group,
            song: self.song,
            release_date: self.release_date,
            verses: self.verses,
            link: self.link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_song_builder() {
        let song = NewSong::new("Muse", "Supermassive Black Hole")
            .with_release_date("16.07.2006")
            .with_text("verse one\n\nverse two")
            .with_link("https://www.youtube.com/watch?v=Xsp3_a-PMTw");

        assert_eq!(song.group, "Muse");
        assert_eq!(song.verses, vec!["verse one", "verse two"]);
        assert_eq!(song.release_date, "16.07.2006");
    }

    #[test]
    fn test_song_json_field_names() {
        let song = NewSong::new("A", "B")
            .with_release_date("2020")
            .with_text("v1")
            .with_link("http://x")
            .into_song(SongId::from_raw(3));

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["group"], "A");
        assert_eq!(json["song"], "B");
        assert_eq!(json["releaseDate"], "2020");
        assert_eq!(json["verses"][0], "v1");
        assert_eq!(json["link"], "http://x");
    }

    #[test]
    fn test_song_text_joins_verses() {
        let song = NewSong::new("A", "B")
            .with_text("one\n\ntwo")
            .into_song(SongId::from_raw(1));
        assert_eq!(song.text(), "one\n\ntwo");
    }
}
