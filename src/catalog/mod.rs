//! Report catalog module
//!
//! Builds the list of reports shown by the listing and single-report views
//! from a directory of `<language>.<time>.<title>.md` files.

mod record;
mod resolver;

pub use record::{ReportName, ReportRecord, REPORT_SUFFIX};
pub use resolver::ReportCatalog;
