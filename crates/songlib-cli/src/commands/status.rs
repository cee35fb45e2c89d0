use anyhow::{Context, Result};

use songlib_core::{Database, Song, SongId, SongRepository};
use songlib_service::Config;

pub fn show_status(config: &Config, id: Option<SongId>) -> Result<()> {
    let db_path = &config.database_path;

    println!("\n🎵 Songlib Status\n");

    if !db_path.exists() {
        println!("  Database: {} (not created yet)", db_path.display());
        println!("\n  Run `songlib serve` to start the API");
        return Ok(());
    }

    let db = Database::open_with_timeout(db_path, config.database.busy_timeout())
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    let repo = SongRepository::new(&db);

    if let Some(id) = id {
        let song = repo
            .get(id)
            .with_context(|| format!("Failed to load song {id}"))?;
        println!("{}", describe_song(&song));
        return Ok(());
    }

    let count = repo.count()?;

    println!("  Database: {}", db_path.display());
    println!("  Songs: {count}");
    println!(
        "  Music info: {}",
        config.music_info_url.as_deref().unwrap_or("<not set>")
    );
    println!(
        "  Enrichment: {}",
        if config.enrichment.required {
            "required"
        } else {
            "optional"
        }
    );

    Ok(())
}

fn describe_song(song: &Song) -> String {
    let mut lines = vec![
        format!("  Song {}: {} - {}", song.id, song.group, song.song),
        format!("  Released: {}", song.release_date),
        format!("  Link: {}", song.link),
        format!("  Verses: {}", song.verses.len()),
        String::new(),
    ];
    lines.extend(song.text().lines().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            format!("    {line}")
        }
    }));
    lines.join("\n")
}
