//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route matching,
//! and conversion of route errors into status codes.

use crate::config::AppState;
use crate::error::SiteError;
use crate::handler::{pages, reports, static_files};
use crate::http::{self, QueryParams};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, IF_NONE_MATCH, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

pub const HOME_ROUTE: &str = "/";
pub const PAGE_ROUTE: &str = "/page";
pub const LISTING_ROUTE: &str = "/port-list";
pub const LEGACY_ROUTE: &str = "/port";
const REPORT_PREFIX: &str = "/port/";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: QueryParams,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
///
/// Generic over the body type: routes only look at the method, URI and
/// headers, so any front end (the TCP listener or a serverless adapter) can
/// drive it.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let is_head = *method == Method::HEAD;
    let server_name = &state.config.http.server_name;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return Ok(finalize(resp, is_head, server_name));
    }

    // 2. Extract what the routes need
    let ctx = RequestContext {
        path: normalize_path(req.uri().path()),
        query: QueryParams::parse(req.uri().query()),
        is_head,
        if_none_match: req
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };

    // 3. Dispatch and convert failures at the boundary
    let response = match route_request(&ctx, &state).await {
        Ok(resp) => resp,
        Err(e) => {
            log_route_error(ctx.path, &e);
            http::build_error_response(&e)
        }
    };

    Ok(finalize(response, is_head, server_name))
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, SiteError> {
    let health = &state.config.health;
    if health.enabled && ctx.path == health.path {
        return Ok(http::build_health_response("ok"));
    }

    match ctx.path {
        HOME_ROUTE => pages::render_home(state).await,
        PAGE_ROUTE => pages::render_named_page(state, &ctx.query).await,
        LISTING_ROUTE => reports::render_listing(state).await,
        LEGACY_ROUTE => reports::legacy_listing(state).await,
        path => match path.strip_prefix(REPORT_PREFIX) {
            Some(id) if !id.is_empty() && !id.contains('/') => {
                reports::render_report(state, id).await
            }
            _ => Ok(static_files::serve_static(ctx, &state.config.site).await),
        },
    }
}

/// Treat `/port-list/` like `/port-list`
fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

fn log_route_error(path: &str, error: &SiteError) {
    match error {
        SiteError::NotFound(_) => {}
        SiteError::BadRequest(msg) => logger::log_warning(&format!("{path}: {msg}")),
        _ => logger::log_error(&format!("{path}: {error}")),
    }
}

/// Stamp the `Server` header and drop the body for HEAD
fn finalize(
    mut response: Response<Full<Bytes>>,
    is_head: bool,
    server_name: &str,
) -> Response<Full<Bytes>> {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().insert(SERVER, value);
    }
    if is_head {
        http::response::strip_body(response)
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LegacyRouteMode};
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["views", "public/prot", "public/md", "public/css"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        write(root, "views/index.hbs", "<h1>{{title}}</h1>{{render_markdown \"intro\"}}");
        write(
            root,
            "views/port-list.hbs",
            "{{#each reports}}<li>{{language}}|{{time}}|{{title}}</li>{{/each}}",
        );
        write(
            root,
            "views/port.hbs",
            "{{#if title}}<h1>{{title}}</h1>{{/if}}{{#each reports}}<article>{{{html}}}</article>{{/each}}",
        );
        write(root, "views/about.hbs", "lang={{lang}};name={{name}};secret={{secret}}");
        write(root, "public/md/intro.md", "Welcome *all*");
        write(root, "public/prot/en.2023-01-01.My.Report.md", "# Title\n");
        write(root, "public/prot/readme.txt", "ignored");
        write(root, "public/css/site.css", "body{}");

        let mut config = Config::load_from("does-not-exist/config").unwrap();
        let path = |p: &str| root.join(p).to_string_lossy().into_owned();
        config.site.views_dir = path("views");
        config.site.static_dir = path("public");
        config.site.reports_dir = path("public/prot");
        config.site.markdown_dir = path("public/md");
        config.pages.forward_params = vec!["lang".to_string()];

        Fixture { _dir: dir, config }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        fs::write(root.join(rel), content).unwrap();
    }

    async fn get(config: &Config, method: Method, uri: &str) -> (StatusCode, hyper::HeaderMap, String) {
        let state = Arc::new(AppState::new(config.clone()).unwrap());
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        let resp = handle_request(req, state).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_home_renders_with_fragment() {
        let fx = fixture();
        let (status, headers, body) = get(&fx.config, Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "text/html; charset=utf-8");
        assert_eq!(headers["server"], "port-reports");
        assert_eq!(body, "<h1>Home</h1><p>Welcome <em>all</em></p>\n");
    }

    #[tokio::test]
    async fn test_page_without_name_is_bad_request() {
        let fx = fixture();
        let (status, _, body) = get(&fx.config, Method::GET, "/page").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Missing page name");

        let (status, _, _) = get(&fx.config, Method::GET, "/page?name=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_page_missing_template_is_not_found() {
        let fx = fixture();
        let (status, _, body) = get(&fx.config, Method::GET, "/page?name=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Page not found");

        let (status, _, _) = get(&fx.config, Method::GET, "/page?name=..%2Fviews%2Findex").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_forwards_only_allowed_params() {
        let fx = fixture();
        let (status, _, body) = get(
            &fx.config,
            Method::GET,
            "/page?name=about&lang=zh&secret=leak",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "lang=zh;name=;secret=");
    }

    #[tokio::test]
    async fn test_page_legacy_name_redirects() {
        let fx = fixture();
        let (status, headers, _) = get(&fx.config, Method::GET, "/page?name=port").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(headers["location"], LISTING_ROUTE);
    }

    #[tokio::test]
    async fn test_page_legacy_name_without_template_is_not_found() {
        let fx = fixture();
        fs::remove_file(Path::new(&fx.config.site.views_dir).join("port.hbs")).unwrap();
        let (status, _, _) = get(&fx.config, Method::GET, "/page?name=port").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_existing_template_never_redirects() {
        let fx = fixture();
        for name in ["about", "index", "port-list"] {
            let (status, _, _) = get(&fx.config, Method::GET, &format!("/page?name={name}")).await;
            assert_eq!(status, StatusCode::OK, "page {name}");
        }
    }

    #[tokio::test]
    async fn test_listing() {
        let fx = fixture();
        let (status, _, body) = get(&fx.config, Method::GET, "/port-list").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<li>en|2023-01-01|My.Report</li>");

        let (status, _, _) = get(&fx.config, Method::GET, "/port-list/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_listing_unreadable_directory_is_server_error() {
        let mut fx = fixture();
        fx.config.site.reports_dir.push_str("/missing");
        let (status, _, body) = get(&fx.config, Method::GET, "/port-list").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("missing"));
    }

    #[tokio::test]
    async fn test_single_report() {
        let fx = fixture();
        let (status, _, body) =
            get(&fx.config, Method::GET, "/port/en.2023-01-01.My.Report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<article><h1>Title</h1>\n</article>");
    }

    #[tokio::test]
    async fn test_single_report_percent_encoded() {
        let fx = fixture();
        write(
            Path::new(&fx.config.site.reports_dir),
            "zh.2024.Port Notes.md",
            "text",
        );
        let (status, _, _) = get(&fx.config, Method::GET, "/port/zh.2024.Port%20Notes").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_single_report_missing_is_not_found() {
        let fx = fixture();
        let (status, _, body) = get(&fx.config, Method::GET, "/port/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Report not found");

        let (status, _, _) = get(&fx.config, Method::GET, "/port/..%2F..%2Fviews%2Findex").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_legacy_route_redirect_mode() {
        let fx = fixture();
        let (status, headers, _) = get(&fx.config, Method::GET, "/port").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(headers["location"], "/port-list");
    }

    #[tokio::test]
    async fn test_legacy_route_render_mode() {
        let mut fx = fixture();
        fx.config.reports.legacy_route = LegacyRouteMode::Render;
        let (status, _, body) = get(&fx.config, Method::GET, "/port").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>Reports</h1><article><h1>Title</h1>\n</article>");
    }

    #[tokio::test]
    async fn test_static_file_and_etag() {
        let fx = fixture();
        let (status, headers, body) = get(&fx.config, Method::GET, "/css/site.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "text/css; charset=utf-8");
        assert_eq!(body, "body{}");

        let state = Arc::new(AppState::new(fx.config.clone()).unwrap());
        let req = Request::builder()
            .uri("/css/site.css")
            .header("if-none-match", headers["etag"].clone())
            .body(())
            .unwrap();
        let resp = handle_request(req, state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let fx = fixture();
        let (status, _, _) = get(&fx.config, Method::GET, "/nothing/here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = get(&fx.config, Method::GET, "/port/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_keeps_headers_without_body() {
        let fx = fixture();
        let (status, headers, body) = get(&fx.config, Method::HEAD, "/port-list").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-length"], "32");
        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn test_methods() {
        let fx = fixture();
        let (status, _, _) = get(&fx.config, Method::POST, "/port-list").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _, _) = get(&fx.config, Method::OPTIONS, "/").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health() {
        let fx = fixture();
        let (status, _, body) = get(&fx.config, Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
