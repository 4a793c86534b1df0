//! Markdown rendering with GitHub Flavored Markdown support.

use comrak::Options;

/// Renders markdown to HTML with GitHub Flavored Markdown extensions.
///
/// Report and fragment files are operator-controlled flat files, so raw HTML
/// inside them is passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub const fn new() -> Self {
        Self
    }

    /// Renders markdown content to an HTML string.
    pub fn render(&self, content: &str) -> String {
        comrak::markdown_to_html(content, &Self::options())
    }

    fn options() -> Options<'static> {
        let mut options = Options::default();

        // GFM extensions
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;

        options.parse.smart = true;
        options.render.unsafe_ = true;

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading() {
        let html = MarkdownRenderer::new().render("# Title\n");
        assert!(html.contains("<h1>Title</h1>"), "got: {html}");
    }

    #[test]
    fn test_gfm_table_and_strikethrough() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n";
        let html = MarkdownRenderer::new().render(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_tasklist() {
        let html = MarkdownRenderer::new().render("- [x] done\n- [ ] todo\n");
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let html = MarkdownRenderer::new().render("<div class=\"note\">hi</div>\n");
        assert!(html.contains("<div class=\"note\">hi</div>"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(MarkdownRenderer::new().render(""), "");
    }
}
