// Configuration module entry point
// Loads application configuration and holds the process-wide state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LegacyRouteMode, LoggingConfig, PagesConfig,
    PerformanceConfig, ReportsConfig, ServerConfig, SiteConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables prefixed with `PORT_REPORTS`
    /// override file values, e.g. `PORT_REPORTS_SERVER__PORT=8080`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PORT_REPORTS")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("pages.forward_params")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "port-reports")?
            .set_default("http.enable_cors", false)?
            .set_default("site.static_dir", "public")?
            .set_default("site.reports_dir", "public/prot")?
            .set_default("site.markdown_dir", "public/md")?
            .set_default("site.views_dir", "views")?
            .set_default("site.template_extension", "hbs")?
            .set_default("site.dev_mode", false)?
            .set_default("site.home_title", "Home")?
            .set_default("site.listing_title", "Reports")?
            .set_default("site.index_files", vec!["index.html", "index.htm"])?
            .set_default("pages.legacy_page", "port")?
            .set_default("pages.forward_params", Vec::<String>::new())?
            .set_default("reports.legacy_route", "redirect")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
