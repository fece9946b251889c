//! Optional-capability provider contracts and test adapters.
//!
//! Page counting and syntax highlighting are host capabilities loaded lazily at
//! first use. They are injected so renderer tests can supply fakes without any
//! loader-script machinery.

use std::{future::Future, pin::Pin};

use crate::{error::PreviewError, html::escape_html};

/// Object-safe boxed future used by capability-provider async methods.
pub type CapabilityFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Best-effort PDF page counting.
///
/// `None` means the count is unknown; nothing in the preview pipeline may
/// depend on an exact count being available.
pub trait PageCountProvider {
    /// Counts pages in a PDF body, when the host can.
    fn count_pages<'a>(&'a self, pdf_bytes: &'a [u8]) -> CapabilityFuture<'a, Option<u32>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Page-count adapter that always reports the count as unknown.
pub struct UnknownPageCount;

impl PageCountProvider for UnknownPageCount {
    fn count_pages<'a>(&'a self, _pdf_bytes: &'a [u8]) -> CapabilityFuture<'a, Option<u32>> {
        Box::pin(async { None })
    }
}

#[derive(Debug, Clone, Copy)]
/// Page-count adapter reporting a fixed count, for tests.
pub struct FixedPageCount(pub u32);

impl PageCountProvider for FixedPageCount {
    fn count_pages<'a>(&'a self, _pdf_bytes: &'a [u8]) -> CapabilityFuture<'a, Option<u32>> {
        let count = self.0;
        Box::pin(async move { Some(count) })
    }
}

/// Highlight output: markup plus the language the highlighter settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    /// Escaped, highlighted HTML markup for the code body.
    pub html: String,
    /// Language used, including one auto-detected by the highlighter.
    pub language: Option<String>,
}

/// Lazily-loaded syntax-highlighting capability.
pub trait SyntaxHighlighter {
    /// Loads the highlighting library if it is not already present.
    ///
    /// Failure is fatal for the code renderer and surfaces as
    /// [`PreviewError::CapabilityLoad`].
    fn ensure_loaded<'a>(&'a self) -> CapabilityFuture<'a, Result<(), PreviewError>>;

    /// Highlights source text, auto-detecting the language when none is given.
    ///
    /// An `Err` here is non-fatal: callers fall back to escaped plain text.
    fn highlight(&self, code: &str, language: Option<&str>) -> Result<HighlightedCode, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Highlighter that escapes without decorating, for tests and degraded hosts.
pub struct PlainHighlighter;

impl SyntaxHighlighter for PlainHighlighter {
    fn ensure_loaded<'a>(&'a self) -> CapabilityFuture<'a, Result<(), PreviewError>> {
        Box::pin(async { Ok(()) })
    }

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<HighlightedCode, String> {
        Ok(HighlightedCode {
            html: escape_html(code),
            language: language.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Highlighter whose `highlight` always fails, for fallback-path tests.
pub struct FailingHighlighter;

impl SyntaxHighlighter for FailingHighlighter {
    fn ensure_loaded<'a>(&'a self) -> CapabilityFuture<'a, Result<(), PreviewError>> {
        Box::pin(async { Ok(()) })
    }

    fn highlight(&self, _code: &str, _language: Option<&str>) -> Result<HighlightedCode, String> {
        Err("highlighter rejected input".to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Highlighter whose library never loads, for fatal-path tests.
pub struct UnavailableHighlighter;

impl SyntaxHighlighter for UnavailableHighlighter {
    fn ensure_loaded<'a>(&'a self) -> CapabilityFuture<'a, Result<(), PreviewError>> {
        Box::pin(async {
            Err(PreviewError::CapabilityLoad(
                "Failed to load highlighting library".to_string(),
            ))
        })
    }

    fn highlight(&self, _code: &str, _language: Option<&str>) -> Result<HighlightedCode, String> {
        Err("highlighting library is not loaded".to_string())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unknown_and_fixed_page_counts() {
        let unknown: &dyn PageCountProvider = &UnknownPageCount;
        assert_eq!(block_on(unknown.count_pages(b"%PDF-1.7")), None);

        let fixed: &dyn PageCountProvider = &FixedPageCount(12);
        assert_eq!(block_on(fixed.count_pages(b"%PDF-1.7")), Some(12));
    }

    #[test]
    fn plain_highlighter_escapes_and_keeps_language() {
        let hl: &dyn SyntaxHighlighter = &PlainHighlighter;
        block_on(hl.ensure_loaded()).expect("load");
        let out = hl.highlight("a < b", Some("rust")).expect("highlight");
        assert_eq!(out.html, "a &lt; b");
        assert_eq!(out.language.as_deref(), Some("rust"));
    }

    #[test]
    fn unavailable_highlighter_fails_to_load() {
        let hl: &dyn SyntaxHighlighter = &UnavailableHighlighter;
        let err = block_on(hl.ensure_loaded()).expect_err("load should fail");
        assert_eq!(err, PreviewError::CapabilityLoad(
            "Failed to load highlighting library".to_string()
        ));
    }
}
