//! Filters and pagination for song queries.

use std::fmt;

/// A song field that list queries can filter on.
///
/// The set is closed so a filter can only ever name a known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongField {
    Group,
    Song,
    ReleaseDate,
}

impl SongField {
    /// Column holding this field in the `songs` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Group => "group_name",
            Self::Song => "song",
            Self::ReleaseDate => "release_date",
        }
    }

    /// Name used for this field in query strings and JSON.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Song => "song",
            Self::ReleaseDate => "releaseDate",
        }
    }
}

impl fmt::Display for SongField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

/// Exact-match constraints on song fields, ANDed together.
///
/// Setting the same field twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    conditions: Vec<(SongField, String)>,
}

impl SongFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: SongField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: SongField, value: impl Into<String>) {
        let value = value.into();
        match self.conditions.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = value,
            None => self.conditions.push((field, value)),
        }
    }

    #[must_use]
    pub fn get(&self, field: SongField) -> Option<&str> {
        self.conditions
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = (SongField, &str)> {
        self.conditions.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

/// Default and maximum page sizes for one kind of paginated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PageLimits {
    /// Song listing: 10 per page, at most 100.
    pub const SONGS: Self = Self {
        default_limit: 10,
        max_limit: 100,
    };

    /// Verse text: 4 verses per page, at most 10.
    pub const VERSES: Self = Self {
        default_limit: 4,
        max_limit: 10,
    };
}

/// A validated page request.
///
/// `offset` is a 1-based page index, not a row count: page `n` starts
/// after `(n - 1) * limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a page request from raw, possibly missing, inputs.
    ///
    /// A missing or non-positive offset becomes page 1. A missing limit, or
    /// one outside `[1, max_limit]`, becomes the default limit.
    #[must_use]
    pub fn new(offset: Option<i64>, limit: Option<i64>, limits: PageLimits) -> Self {
        let offset = offset
            .filter(|o| *o >= 1)
            .map(|o| u32::try_from(o).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1 && *l <= i64::from(limits.max_limit))
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(limits.default_limit);
        Self { offset, limit }
    }

    /// Page one with the default limit.
    #[must_use]
    pub fn first(limits: PageLimits) -> Self {
        Self::new(None, None, limits)
    }

    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows (or verses) that precede this page.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.offset - 1).saturating_mul(u64::from(self.limit))
    }

    /// Slice this page out of an in-memory sequence.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.skip()).unwrap_or(usize::MAX);
        if start >= items.len() {
            return &[];
        }
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::first(PageLimits::SONGS);
        assert_eq!(page.offset(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn test_offset_below_one_becomes_first_page() {
        for raw in [0, -1, -100] {
            let page = PageRequest::new(Some(raw), None, PageLimits::SONGS);
            assert_eq!(page.offset(), 1);
        }
    }

    #[test]
    fn test_limit_out_of_range_uses_default() {
        for raw in [0, -5, 101, 5000] {
            let page = PageRequest::new(None, Some(raw), PageLimits::SONGS);
            assert_eq!(page.limit(), 10, "raw limit {raw}");
        }
    }

    #[test]
    fn test_limit_in_range_kept() {
        for raw in [1, 50, 100] {
            let page = PageRequest::new(None, Some(raw), PageLimits::SONGS);
            assert_eq!(i64::from(page.limit()), raw);
        }
    }

    #[test]
    fn test_verse_limits() {
        assert_eq!(PageRequest::first(PageLimits::VERSES).limit(), 4);
        assert_eq!(
            PageRequest::new(None, Some(11), PageLimits::VERSES).limit(),
            4
        );
        assert_eq!(
            PageRequest::new(None, Some(10), PageLimits::VERSES).limit(),
            10
        );
    }

    #[test]
    fn test_skip_is_page_index_times_limit() {
        let page = PageRequest::new(Some(3), Some(20), PageLimits::SONGS);
        assert_eq!(page.skip(), 40);
    }

    #[test]
    fn test_slice() {
        let items = [1, 2, 3, 4, 5];
        let limits = PageLimits::VERSES;
        assert_eq!(PageRequest::new(Some(1), Some(2), limits).slice(&items), &[1, 2]);
        assert_eq!(PageRequest::new(Some(3), Some(2), limits).slice(&items), &[5]);
        assert!(PageRequest::new(Some(4), Some(2), limits).slice(&items).is_empty());
    }

    #[test]
    fn test_slice_huge_offset() {
        let items = [1, 2, 3];
        let page = PageRequest::new(Some(i64::MAX), Some(10), PageLimits::VERSES);
        assert!(page.slice(&items).is_empty());
    }

    #[test]
    fn test_filter_set_replaces() {
        let filter = SongFilter::new()
            .with(SongField::Group, "Muse")
            .with(SongField::Group, "Queen");
        assert_eq!(filter.get(SongField::Group), Some("Queen"));
        assert_eq!(filter.conditions().count(), 1);
    }

    #[test]
    fn test_field_columns_are_fixed() {
        assert_eq!(SongField::Group.column(), "group_name");
        assert_eq!(SongField::Song.column(), "song");
        assert_eq!(SongField::ReleaseDate.column(), "release_date");
        assert_eq!(SongField::ReleaseDate.to_string(), "releaseDate");
    }
}
