/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Songs
CREATE TABLE IF NOT EXISTS songs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_name TEXT NOT NULL,
    song TEXT NOT NULL,
    release_date TEXT NOT NULL DEFAULT '',
    -- JSON array of verse strings, in song order
    verses TEXT NOT NULL DEFAULT '[]',
    link TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- (group_name, song) is deliberately not unique.
CREATE INDEX IF NOT EXISTS idx_songs_group_name ON songs(group_name);
CREATE INDEX IF NOT EXISTS idx_songs_song ON songs(song);
"#;

const MIGRATION_002: &str = r#"
CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs(release_date);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "release_date_index",
        sql: MIGRATION_002,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_versions_ascend() {
        let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(versions, sorted);
    }
}
