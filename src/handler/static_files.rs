//! Static file serving module
//!
//! Serves public assets for paths no route claims, with MIME type detection
//! and `ETag` revalidation.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a file from the static directory
pub async fn serve_static(ctx: &RequestContext<'_>, site: &SiteConfig) -> Response<Full<Bytes>> {
    match load_from_directory(&site.static_dir, ctx.path, &site.index_files).await {
        Some((content, content_type)) => {
            build_static_file_response(content, content_type, ctx.if_none_match.as_deref())
        }
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(path).ok()?;
    let relative = decoded.trim_start_matches('/');

    let root = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = root.join(relative);

    // Directories resolve to their index file
    if relative.is_empty() || relative.ends_with('/') || is_dir(&file_path).await {
        file_path = find_index_file(&file_path, index_files).await?;
    }

    // File not found is common (404), no need to log at warning level
    let canonical = fs::canonicalize(&file_path).await.ok()?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        ));
        return None;
    }
    if !fs::metadata(&canonical).await.is_ok_and(|m| m.is_file()) {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Build static file response with `ETag`
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag)
}
