//! Report route handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Serialize;

use crate::catalog::ReportRecord;
use crate::config::{AppState, LegacyRouteMode};
use crate::error::SiteError;
use crate::handler::router::LISTING_ROUTE;
use crate::http;

pub const LISTING_VIEW: &str = "port-list";
pub const REPORT_VIEW: &str = "port";

/// Variables handed to the listing and report views
#[derive(Serialize)]
struct ReportsView<'a> {
    reports: &'a [ReportRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// `GET /port-list`
pub async fn render_listing(state: &AppState) -> Result<Response<Full<Bytes>>, SiteError> {
    let reports = state.catalog.list().await?;
    render(state, LISTING_VIEW, &reports, None).await
}

/// `GET /port`, either a redirect or the catalog under the report view
pub async fn legacy_listing(state: &AppState) -> Result<Response<Full<Bytes>>, SiteError> {
    match state.config.reports.legacy_route {
        LegacyRouteMode::Redirect => Ok(http::build_redirect_response(LISTING_ROUTE)),
        LegacyRouteMode::Render => {
            let reports = state.catalog.list().await?;
            let title = state.config.site.listing_title.as_str();
            render(state, REPORT_VIEW, &reports, Some(title)).await
        }
    }
}

/// `GET /port/:id`, where `raw_id` is still percent-encoded
pub async fn render_report(
    state: &AppState,
    raw_id: &str,
) -> Result<Response<Full<Bytes>>, SiteError> {
    let id = urlencoding::decode(raw_id)
        .map_err(|_| SiteError::BadRequest("Invalid report id".to_string()))?;
    let reports = state.catalog.get(&id).await?;
    render(state, REPORT_VIEW, &reports, None).await
}

async fn render(
    state: &AppState,
    view: &str,
    reports: &[ReportRecord],
    title: Option<&str>,
) -> Result<Response<Full<Bytes>>, SiteError> {
    let html = state
        .templates
        .render(view, &ReportsView { reports, title })
        .await?;
    Ok(http::build_html_response(html))
}
