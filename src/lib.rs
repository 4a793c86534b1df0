//! Markdown report server
//!
//! Serves a catalog of Markdown reports named `<language>.<time>.<title>.md`,
//! handlebars-rendered pages, and static assets. [`handler::handle_request`]
//! is the transport-agnostic entry point; [`server`] runs it behind a TCP
//! listener.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod markdown;
pub mod path;
pub mod server;
pub mod templates;

pub use config::{AppState, Config};
pub use error::SiteError;
pub use handler::handle_request;
