//! Splitting lyric text into verses and joining it back.
//!
//! A verse is a block of text separated from its neighbours by one blank
//! line (`"\n\n"`). The two functions are exact inverses: for any text `t`,
//! `join_verses(&split_verses(t)) == t`.

/// Separator between consecutive verses.
pub const VERSE_SEPARATOR: &str = "\n\n";

/// Split raw lyric text into its ordered verses.
///
/// Empty text has no verses.
#[must_use]
pub fn split_verses(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(VERSE_SEPARATOR).map(str::to_string).collect()
}

/// Join verses back into lyric text.
#[must_use]
pub fn join_verses<S: AsRef<str>>(verses: &[S]) -> String {
    let mut text = String::new();
    for (i, verse) in verses.iter().enumerate() {
        if i > 0 {
            text.push_str(VERSE_SEPARATOR);
        }
        text.push_str(verse.as_ref());
    }
    text
}
