//! Setlist Export - Export attended concerts from setlist.fm to Excel
//!
//! This library fetches a user's attended-concert history page by page and
//! writes it to a styled `.xlsx` spreadsheet.

/// Client modules for interacting with the setlist.fm API
pub mod clients;
/// Spreadsheet layout and writing
pub mod exporter;
/// Paginated retrieval of attended setlists
pub mod fetcher;
/// Wiring of fetcher and exporter from configuration
pub mod job;
