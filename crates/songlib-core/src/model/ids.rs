use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Unique identifier for a song, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct SongId(i64);

impl SongId {
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SongId {
    type Err = Error;

    /// Parse a textual id: an unsigned integer that fits the store's
    /// rowid. Zero is well-formed; the store never assigns it, so lookups
    /// report it as not found.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidData(format!("invalid song id: {s:?}"));
        let raw: u64 = s.trim().parse().map_err(|_| invalid())?;
        let raw = i64::try_from(raw).map_err(|_| invalid())?;
        Ok(Self(raw))
    }
}

impl From<SongId> for i64 {
    fn from(id: SongId) -> Self {
        id.0
    }
}
