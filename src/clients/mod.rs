/// Setlist, page and row entities
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// setlist.fm REST API client
pub mod setlistfm;

pub use setlistfm::SetlistFmClient;
