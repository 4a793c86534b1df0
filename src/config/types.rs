// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
    pub pages: PagesConfig,
    pub reports: ReportsConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; a single-threaded runtime is used when unset
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

/// Content locations and template settings
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root of the public assets served as-is
    pub static_dir: String,
    /// Directory holding `<language>.<time>.<title>.md` reports
    pub reports_dir: String,
    /// Directory holding fragments for the `render_markdown` helper
    pub markdown_dir: String,
    pub views_dir: String,
    pub template_extension: String,
    /// Re-read templates from disk on every render
    pub dev_mode: bool,
    pub home_title: String,
    pub listing_title: String,
    pub index_files: Vec<String>,
}

/// Named page rendering (`/page?name=...`)
#[derive(Debug, Deserialize, Clone)]
pub struct PagesConfig {
    /// Page name that redirects to the report listing instead of rendering
    pub legacy_page: String,
    /// Query parameters forwarded to templates as variables
    #[serde(default)]
    pub forward_params: Vec<String>,
}

/// Report routes configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    pub legacy_route: LegacyRouteMode,
}

/// Behaviour of the legacy `/port` route
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRouteMode {
    /// 302 to the report listing
    #[default]
    Redirect,
    /// Render the catalog with the single-report view
    Render,
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoint
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            path: default_healthz_path(),
        }
    }
}
