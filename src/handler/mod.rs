//! Request handler module
//!
//! Request routing dispatch, page and report rendering, and static assets.

pub mod pages;
pub mod reports;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
