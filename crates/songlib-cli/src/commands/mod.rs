pub mod config;
pub mod serve;
pub mod status;

pub use serve::run_serve;
pub use status::show_status;
