//! Report record and filename convention
//!
//! Report files are named `<language>.<time>.<title>.md`. The title may itself
//! contain dots, so everything after the second segment is rejoined.

use serde::Serialize;

/// File suffix identifying a report
pub const REPORT_SUFFIX: &str = ".md";

/// One rendered report, built per request and handed to a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    /// File name without `.md`, the address under `/port/`
    pub id: String,
    pub language: String,
    /// Opaque token, never parsed as a date
    pub time: String,
    pub title: String,
    pub html: String,
}

/// Identifier of a directory entry, or `None` if it is not a report file
pub fn report_id(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(REPORT_SUFFIX)
}

/// The three fields encoded in a report file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    pub language: String,
    pub time: String,
    pub title: String,
}

impl ReportName {
    /// Split a report identifier (file name without `.md`) into its fields.
    ///
    /// Missing segments come back empty: `en` has no time and no title.
    pub fn parse(identifier: &str) -> Self {
        let mut segments = identifier.splitn(3, '.');
        let language = segments.next().unwrap_or_default().to_string();
        let time = segments.next().unwrap_or_default().to_string();
        let title = segments.next().unwrap_or_default().to_string();
        Self {
            language,
            time,
            title,
        }
    }

    pub fn into_record(self, id: &str, html: String) -> ReportRecord {
        ReportRecord {
            id: id.to_string(),
            language: self.language,
            time: self.time,
            title: self.title,
            html,
        }
    }
}
