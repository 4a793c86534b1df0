//! Template helpers
//!
//! `render_markdown` inlines a Markdown fragment as HTML:
//! `{{render_markdown "about"}}` renders `<markdown dir>/about.md`.

use handlebars::{Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext};
use std::io;
use std::path::PathBuf;

use crate::logger;
use crate::markdown::MarkdownRenderer;
use crate::path::resolve_named_file;

pub const RENDER_MARKDOWN: &str = "render_markdown";

/// Renders fragments from a fixed Markdown directory.
///
/// A missing or unnamed fragment renders as an empty string. The helper runs inside the
/// synchronous template engine, so it reads with blocking I/O.
#[derive(Debug, Clone)]
pub struct MarkdownFragmentHelper {
    dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl MarkdownFragmentHelper {
    pub fn new(dir: impl Into<PathBuf>, renderer: MarkdownRenderer) -> Self {
        Self {
            dir: dir.into(),
            renderer,
        }
    }

    /// Look up a fragment by name and convert it to HTML.
    pub fn fragment(&self, name: &str) -> io::Result<String> {
        let Some(path) = resolve_named_file(&self.dir, name, "md") else {
            return Ok(String::new());
        };
        match std::fs::read(&path) {
            Ok(bytes) => Ok(self.renderer.render(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read markdown fragment '{}': {e}",
                    path.display()
                ));
                Err(e)
            }
        }
    }
}

impl HelperDef for MarkdownFragmentHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        // No name (e.g. an unset variable) finds no fragment
        let Some(name) = h.param(0).and_then(|p| p.value().as_str()) else {
            return Ok(());
        };

        // Written unescaped: the fragment is already HTML
        out.write(&self.fragment(name)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry(dir: &std::path::Path) -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper(
            RENDER_MARKDOWN,
            Box::new(MarkdownFragmentHelper::new(dir, MarkdownRenderer::new())),
        );
        handlebars
    }

    #[test]
    fn test_fragment_renders_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("about.md"), "# About\n").unwrap();

        let res = registry(dir.path())
            .render_template(r#"<main>{{render_markdown "about"}}</main>"#, &json!({}))
            .expect("This to render");
        assert_eq!(res, "<main><h1>About</h1>\n</main>");
    }

    #[test]
    fn test_missing_fragment_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let res = registry(dir.path())
            .render_template(r#"[{{render_markdown "nope"}}]"#, &json!({}))
            .expect("This to render");
        assert_eq!(res, "[]");
    }

    #[test]
    fn test_unset_fragment_name_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let res = registry(dir.path())
            .render_template("[{{render_markdown section}}]", &json!({}))
            .expect("This to render");
        assert_eq!(res, "[]");
    }

    #[test]
    fn test_fragment_name_from_variable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("intro.md"), "hello").unwrap();

        let res = registry(dir.path())
            .render_template("{{render_markdown section}}", &json!({"section": "intro"}))
            .expect("This to render");
        assert_eq!(res, "<p>hello</p>\n");
    }

    #[test]
    fn test_traversal_fragment_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("md");
        std::fs::create_dir(&md).unwrap();
        std::fs::write(dir.path().join("secret.md"), "hidden").unwrap();

        let helper = MarkdownFragmentHelper::new(&md, MarkdownRenderer::new());
        assert_eq!(helper.fragment("../secret").unwrap(), "");
    }
}
