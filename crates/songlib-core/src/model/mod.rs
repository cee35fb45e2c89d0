pub mod ids;
pub mod page;
pub mod song;
pub mod verses;

pub use ids::SongId;
pub use page::{PageLimits, PageRequest, SongField, SongFilter};
pub use song::{NewSong, Song};
pub use verses::{join_verses, split_verses};
