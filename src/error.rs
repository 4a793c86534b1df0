//! Request-level error type
//!
//! Every failure a route can hit maps to exactly one HTTP status. Conversion
//! to a response happens once, at the route boundary in the router.

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    /// A required request parameter is missing or malformed
    #[error("{0}")]
    BadRequest(String),

    /// A template or report file does not exist
    #[error("{0}")]
    NotFound(String),

    /// A directory or file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template failed to parse at load time
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// A template failed to render
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl SiteError {
    pub fn read_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ReadFailure { .. } | Self::Template(_) | Self::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body sent to the client. Server-side details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::ReadFailure { .. } => "Failed to read content".to_string(),
            Self::Template(_) | Self::Render(_) => "Failed to render page".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SiteError::BadRequest("Missing page name".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SiteError::NotFound("Report not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        let err = SiteError::read_failure("public/prot", io::Error::other("denied"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_read_failure_hides_path() {
        let err = SiteError::read_failure("/srv/secret/prot", io::Error::other("denied"));
        assert!(err.to_string().contains("/srv/secret/prot"));
        assert!(!err.public_message().contains("secret"));
    }
}
