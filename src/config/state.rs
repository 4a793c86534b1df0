// Application state module
// The process-wide service object, built once at startup and shared by every request

use super::types::Config;
use crate::catalog::ReportCatalog;
use crate::error::SiteError;
use crate::markdown::MarkdownRenderer;
use crate::templates::TemplateRegistry;

/// Application state
///
/// Immutable after construction; requests only read from it.
pub struct AppState {
    pub config: Config,
    pub templates: TemplateRegistry,
    pub catalog: ReportCatalog,
}

impl AppState {
    /// Load templates and wire up the report catalog
    pub fn new(config: Config) -> Result<Self, SiteError> {
        let renderer = MarkdownRenderer::new();
        let templates = TemplateRegistry::load(&config.site, renderer)?;
        let catalog = ReportCatalog::new(&config.site.reports_dir, renderer);

        Ok(Self {
            config,
            templates,
            catalog,
        })
    }
}
