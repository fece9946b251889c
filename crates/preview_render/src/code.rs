//! Code renderer: JSON-wrapped text content with syntax highlighting.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use preview_host::{
    escape_html, file_content_path, FileApi, PreviewContainer, PreviewError, SyntaxHighlighter,
};
use serde_json::Value;

use crate::markup;

/// Renders source files with highlighting, a language badge, and an optional
/// line-number gutter.
///
/// The highlighting capability is loaded lazily on first render; a load
/// failure is fatal, but a highlighter that fails on a specific input is not:
/// the renderer falls back to escaped plain text rather than blocking display.
pub struct CodeRenderer {
    api: Rc<dyn FileApi>,
    highlighter: Rc<dyn SyntaxHighlighter>,
    show_line_numbers: bool,
    state: RefCell<CodeState>,
    generation: Cell<u64>,
}

#[derive(Default)]
struct CodeState {
    content: Option<String>,
    language: Option<String>,
    container: Option<PreviewContainer>,
}

impl CodeRenderer {
    /// Builds a renderer over the given fetch and highlighting services.
    pub fn new(
        api: Rc<dyn FileApi>,
        highlighter: Rc<dyn SyntaxHighlighter>,
        show_line_numbers: bool,
    ) -> Self {
        Self {
            api,
            highlighter,
            show_line_numbers,
            state: RefCell::new(CodeState::default()),
            generation: Cell::new(0),
        }
    }

    /// Maps a file name's final extension segment to a highlighter language.
    ///
    /// Case-insensitive; unknown extensions yield `None`.
    pub fn detect_language(file_name: &str) -> Option<&'static str> {
        let extension = file_name.rsplit('.').next()?.to_ascii_lowercase();
        let language = match extension.as_str() {
            "js" | "jsx" => "javascript",
            "ts" | "tsx" => "typescript",
            "java" => "java",
            "py" => "python",
            "rb" => "ruby",
            "php" => "php",
            "c" | "h" => "c",
            "cpp" | "cc" | "cxx" | "hpp" => "cpp",
            "cs" => "csharp",
            "go" => "go",
            "rs" => "rust",
            "swift" => "swift",
            "kt" => "kotlin",
            "scala" => "scala",
            "css" => "css",
            "scss" => "scss",
            "sass" => "sass",
            "less" => "less",
            "html" => "html",
            "xml" => "xml",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "sql" => "sql",
            "sh" | "bash" | "zsh" => "bash",
            "ps1" => "powershell",
            "r" => "r",
            "matlab" | "m" => "matlab",
            "md" | "markdown" => "markdown",
            _ => return None,
        };
        Some(language)
    }

    /// Fetches the file's text content and renders it into `container`.
    ///
    /// When `language` is not supplied it is detected from `file_name`; a
    /// language the highlighter auto-detects during rendering is recorded the
    /// same way.
    pub async fn render(
        &self,
        file_id: &str,
        file_name: &str,
        container: Option<PreviewContainer>,
        language: Option<&str>,
    ) -> Result<(), PreviewError> {
        let container = container.ok_or(PreviewError::MissingContainer)?;
        self.destroy();
        let generation = self.generation.get();
        self.state.borrow_mut().container = Some(container.clone());

        let content = self.fetch_content(file_id).await?;
        self.highlighter.ensure_loaded().await?;
        if self.generation.get() != generation {
            return Ok(());
        }

        let requested = language
            .map(str::to_string)
            .or_else(|| Self::detect_language(file_name).map(str::to_string));
        let (code_html, resolved) = match self.highlighter.highlight(&content, requested.as_deref())
        {
            Ok(highlighted) => (highlighted.html, highlighted.language),
            // never block display on a highlighting failure
            Err(_) => (escape_html(&content), requested),
        };

        let line_count = content.split('\n').count();
        container.set_class_name("code-renderer-container h-full overflow-auto bg-gray-50 dark:bg-gray-900");
        container.set_html(&markup::code_block(
            &code_html,
            resolved.as_deref(),
            line_count,
            self.show_line_numbers,
        ));

        let mut state = self.state.borrow_mut();
        state.content = Some(content);
        state.language = resolved;
        Ok(())
    }

    async fn fetch_content(&self, file_id: &str) -> Result<String, PreviewError> {
        let value = self.api.fetch_json(&file_content_path(file_id)).await?;
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        match value.get("data").and_then(Value::as_str) {
            Some(data) if success => Ok(data.to_string()),
            _ => Err(PreviewError::Format(
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Failed to load file content")
                    .to_string(),
            )),
        }
    }

    /// Content of the last successful render.
    pub fn current_content(&self) -> Option<String> {
        self.state.borrow().content.clone()
    }

    /// Language of the last successful render, supplied, detected, or
    /// highlighter-chosen.
    pub fn current_language(&self) -> Option<String> {
        self.state.borrow().language.clone()
    }

    /// Clears content and language fields. Idempotent.
    pub fn destroy(&self) {
        self.generation.set(self.generation.get() + 1);
        *self.state.borrow_mut() = CodeState::default();
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use preview_host::{
        FailingHighlighter, FileBlob, MemoryFileApi, PlainHighlighter, UnavailableHighlighter,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn content_api(file_id: &str, content: &str) -> MemoryFileApi {
        let api = MemoryFileApi::default();
        let body = serde_json::json!({ "success": true, "data": content });
        api.insert_blob(
            &file_content_path(file_id),
            FileBlob::new(Some("application/json"), body.to_string()),
        );
        api
    }

    #[test]
    fn detect_language_maps_known_extensions() {
        assert_eq!(CodeRenderer::detect_language("Main.java"), Some("java"));
        assert_eq!(CodeRenderer::detect_language("app.js"), Some("javascript"));
        assert_eq!(CodeRenderer::detect_language("query.sql"), Some("sql"));
        assert_eq!(CodeRenderer::detect_language("notes.md"), Some("markdown"));
        assert_eq!(CodeRenderer::detect_language("deploy.YML"), Some("yaml"));
        assert_eq!(CodeRenderer::detect_language("lib.rs"), Some("rust"));
    }

    #[test]
    fn detect_language_uses_the_final_extension_segment() {
        assert_eq!(CodeRenderer::detect_language("bundle.min.js"), Some("javascript"));
        assert_eq!(CodeRenderer::detect_language("archive.tar.gz"), None);
        assert_eq!(CodeRenderer::detect_language("README"), None);
        assert_eq!(CodeRenderer::detect_language("weird.unknownext"), None);
    }

    #[test]
    fn render_builds_a_gutter_with_one_entry_per_line() {
        let renderer = CodeRenderer::new(
            Rc::new(content_api("7", "a\nb\nc")),
            Rc::new(PlainHighlighter),
            true,
        );
        let container = PreviewContainer::capture();
        block_on(renderer.render("7", "demo.py", Some(container.clone()), None)).expect("render");

        let html = container.html();
        assert_eq!(html.matches("<div class=\"leading-6\">").count(), 3);
        assert!(html.contains("class=\"language-python\""));
        assert!(html.contains(">PYTHON</div>"));
        assert_eq!(renderer.current_content().as_deref(), Some("a\nb\nc"));
        assert_eq!(renderer.current_language().as_deref(), Some("python"));
    }

    #[test]
    fn explicit_language_overrides_extension_detection() {
        let renderer = CodeRenderer::new(
            Rc::new(content_api("7", "SELECT 1;")),
            Rc::new(PlainHighlighter),
            false,
        );
        block_on(renderer.render("7", "export.txt", Some(PreviewContainer::capture()), Some("sql")))
            .expect("render");
        assert_eq!(renderer.current_language().as_deref(), Some("sql"));
    }

    #[test]
    fn highlighting_failure_falls_back_to_escaped_plain_text() {
        let renderer = CodeRenderer::new(
            Rc::new(content_api("7", "if (a < b) { run(); }")),
            Rc::new(FailingHighlighter),
            false,
        );
        let container = PreviewContainer::capture();
        block_on(renderer.render("7", "app.js", Some(container.clone()), None))
            .expect("fallback must not escape render");

        assert!(container.html().contains("if (a &lt; b) { run(); }"));
        assert_eq!(renderer.current_language().as_deref(), Some("javascript"));
    }

    #[test]
    fn highlighter_load_failure_is_fatal() {
        let renderer = CodeRenderer::new(
            Rc::new(content_api("7", "x")),
            Rc::new(UnavailableHighlighter),
            true,
        );
        let err = block_on(renderer.render("7", "x.py", Some(PreviewContainer::capture()), None))
            .expect_err("must fail");
        assert_eq!(
            err,
            PreviewError::CapabilityLoad("Failed to load highlighting library".into())
        );
    }

    #[test]
    fn unsuccessful_content_envelopes_are_rejected() {
        let api = MemoryFileApi::default();
        api.insert_blob(
            &file_content_path("7"),
            FileBlob::new(
                Some("application/json"),
                r#"{"success":false,"message":"File content is not available"}"#,
            ),
        );
        let renderer = CodeRenderer::new(Rc::new(api), Rc::new(PlainHighlighter), true);
        let err = block_on(renderer.render("7", "x.py", Some(PreviewContainer::capture()), None))
            .expect_err("must fail");
        assert_eq!(
            err,
            PreviewError::Format("File content is not available".into())
        );
    }

    #[test]
    fn destroy_is_idempotent_and_clears_introspection_fields() {
        let renderer = CodeRenderer::new(
            Rc::new(content_api("7", "x")),
            Rc::new(PlainHighlighter),
            true,
        );
        block_on(renderer.render("7", "x.rs", Some(PreviewContainer::capture()), None))
            .expect("render");
        renderer.destroy();
        renderer.destroy();
        assert_eq!(renderer.current_content(), None);
        assert_eq!(renderer.current_language(), None);
    }
}
