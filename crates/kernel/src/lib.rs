//! Charadex kernel library.
//!
//! Turns flat spreadsheet rows into browsable dex pages: enrichment,
//! relation joins, sorting, filtering, pagination, grouping and the
//! profile/gallery view selection. The `charadex` binary serves the pages
//! over HTTP; this library exposes the same pipeline for integration tests.

pub mod config;
pub mod dex;
pub mod error;
pub mod routes;
pub mod source;
pub mod state;
pub mod theme;
