//! Template page handlers
//!
//! The home page and arbitrary named pages (`/page?name=...`).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::{json, Map, Value};

use crate::config::AppState;
use crate::error::SiteError;
use crate::handler::router::LISTING_ROUTE;
use crate::http::{self, QueryParams};
use crate::templates::page_not_found;

pub const HOME_VIEW: &str = "index";

/// Render the home page
pub async fn render_home(state: &AppState) -> Result<Response<Full<Bytes>>, SiteError> {
    let vars = json!({ "title": state.config.site.home_title });
    let html = state.templates.render(HOME_VIEW, &vars).await?;
    Ok(http::build_html_response(html))
}

/// Render the view named by the `name` query parameter
///
/// The configured legacy page redirects to the report listing, but only if
/// its view exists, so a missing view is always a 404.
pub async fn render_named_page(
    state: &AppState,
    query: &QueryParams,
) -> Result<Response<Full<Bytes>>, SiteError> {
    let name = query
        .get("name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SiteError::BadRequest("Missing page name".to_string()))?;

    if !state.templates.exists(name).await {
        return Err(page_not_found());
    }

    if name == state.config.pages.legacy_page {
        return Ok(http::build_redirect_response(LISTING_ROUTE));
    }

    let vars = forwarded_params(query, &state.config.pages.forward_params);
    let html = state.templates.render(name, &vars).await?;
    Ok(http::build_html_response(html))
}

/// Template variables taken from the query string, restricted to `allowed`
fn forwarded_params(query: &QueryParams, allowed: &[String]) -> Map<String, Value> {
    let mut vars = Map::new();
    for (key, value) in query.iter() {
        if allowed.iter().any(|a| a == key) && !vars.contains_key(key) {
            vars.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    vars
}
