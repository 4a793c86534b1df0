//! Template registry module
//!
//! Loads every view in the views directory into a handlebars registry at
//! startup and renders them by name. A view added to the directory after
//! startup is still found: it is rendered straight from its source.

mod helpers;

pub use helpers::{MarkdownFragmentHelper, RENDER_MARKDOWN};

use handlebars::Handlebars;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::markdown::MarkdownRenderer;
use crate::path::resolve_named_file;

/// Named views backed by files in the views directory
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
    views_dir: PathBuf,
    extension: String,
}

impl TemplateRegistry {
    /// Build the registry from site configuration
    pub fn load(site: &SiteConfig, renderer: MarkdownRenderer) -> Result<Self, SiteError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_dev_mode(site.dev_mode);
        handlebars.register_helper(
            RENDER_MARKDOWN,
            Box::new(MarkdownFragmentHelper::new(&site.markdown_dir, renderer)),
        );

        let mut registry = Self {
            handlebars,
            views_dir: PathBuf::from(&site.views_dir),
            extension: site.template_extension.trim_start_matches('.').to_string(),
        };
        registry.register_views()?;
        Ok(registry)
    }

    /// Register every top-level `*.<extension>` file under its file stem
    fn register_views(&mut self) -> Result<(), SiteError> {
        let entries = std::fs::read_dir(&self.views_dir)
            .map_err(|e| SiteError::read_failure(&self.views_dir, e))?;

        for entry in entries {
            let path = entry
                .map_err(|e| SiteError::read_failure(&self.views_dir, e))?
                .path();
            let extension = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || extension != Some(self.extension.as_str()) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            self.handlebars.register_template_file(name, &path)?;
        }
        Ok(())
    }

    pub fn views_dir(&self) -> &Path {
        &self.views_dir
    }

    /// Names of the views registered at startup, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlebars.get_templates().keys().cloned().collect();
        names.sort();
        names
    }

    fn template_path(&self, name: &str) -> Option<PathBuf> {
        resolve_named_file(&self.views_dir, name, &self.extension)
    }

    /// Whether a view file for `name` exists on disk right now
    pub async fn exists(&self, name: &str) -> bool {
        match self.template_path(name) {
            Some(path) => fs::metadata(&path).await.is_ok_and(|m| m.is_file()),
            None => false,
        }
    }

    /// Render the view called `name` with `data` as its context
    pub async fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, SiteError> {
        if self.handlebars.has_template(name) {
            return Ok(self.handlebars.render(name, data)?);
        }

        let path = self.template_path(name).ok_or_else(page_not_found)?;
        let source = match fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(page_not_found()),
            Err(e) => return Err(SiteError::read_failure(path, e)),
        };
        Ok(self.handlebars.render_template(&source, data)?)
    }
}

pub fn page_not_found() -> SiteError {
    SiteError::NotFound("Page not found".to_string())
}
