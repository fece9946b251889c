//! Markup builders shared by the renderer variants.
//!
//! Every builder returns a complete fragment for [`PreviewContainer::set_html`]
//! so render state machines stay pure string-in/string-out and testable off
//! the browser. Interactive controls carry stable class hooks
//! (`pdf-prev-btn`, `pdf-page-input`, `office-download-btn`) that host pages
//! bind through event delegation.
//!
//! [`PreviewContainer::set_html`]: preview_host::PreviewContainer::set_html

use preview_host::escape_html;

/// Stylesheet injected into converted-Office HTML documents: readable
/// typography plus bordered tables.
const OFFICE_DOCUMENT_STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
'Helvetica Neue', Arial, sans-serif; padding: 2rem; max-width: 1200px; \
margin: 0 auto; background: white; color: #1f2937; } \
table { border-collapse: collapse; width: 100%; margin: 1rem 0; } \
table, th, td { border: 1px solid #d1d5db; } \
th, td { padding: 0.5rem; text-align: left; } \
th { background-color: #f3f4f6; font-weight: 600; }";

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// PDF viewer: navigation bar plus an embedded frame anchored at `page`.
///
/// An unknown total renders as `--` and leaves forward navigation enabled.
pub fn pdf_viewer(url: &str, page: u32, total: Option<u32>) -> String {
    let total_label = total.map_or_else(|| "--".to_string(), |t| t.to_string());
    let max_attr = total.map_or_else(String::new, |t| format!(" max=\"{t}\""));
    let prev_disabled = if page <= 1 { " disabled" } else { "" };
    let next_disabled = if total.is_some_and(|t| page >= t) {
        " disabled"
    } else {
        ""
    };

    format!(
        "<div class=\"flex items-center justify-between px-4 py-3 bg-gray-100 dark:bg-gray-800 \
         border-b border-gray-200 dark:border-gray-700\">\
         <div class=\"flex items-center gap-2\">\
         <button class=\"pdf-prev-btn px-3 py-1.5 text-sm bg-white dark:bg-gray-700 rounded \
         disabled:opacity-50 disabled:cursor-not-allowed\" title=\"Previous page\" \
         aria-label=\"Previous page\"{prev_disabled}>&lsaquo;</button>\
         <button class=\"pdf-next-btn px-3 py-1.5 text-sm bg-white dark:bg-gray-700 rounded \
         disabled:opacity-50 disabled:cursor-not-allowed\" title=\"Next page\" \
         aria-label=\"Next page\"{next_disabled}>&rsaquo;</button>\
         <div class=\"flex items-center gap-2 ml-2\">\
         <span class=\"text-sm text-gray-600 dark:text-gray-400\">Page</span>\
         <input type=\"number\" class=\"pdf-page-input w-16 px-2 py-1 text-sm text-center border \
         border-gray-300 dark:border-gray-600 rounded\" value=\"{page}\" min=\"1\"{max_attr} \
         aria-label=\"Current page number\">\
         <span class=\"text-sm text-gray-600 dark:text-gray-400\">of \
         <span class=\"pdf-total-pages\">{total_label}</span></span>\
         </div></div>\
         <div class=\"text-xs text-gray-500 dark:text-gray-400\">\
         Use browser's built-in PDF controls for zoom and additional features</div></div>\
         <iframe src=\"{url}#page={page}\" class=\"flex-1 w-full border-0 bg-gray-100 \
         dark:bg-gray-800\" style=\"min-height:500px\" title=\"PDF Preview\"></iframe>"
    )
}

/// Sandboxed frame carrying a converted-Office HTML document.
///
/// The sandbox keeps injected script away from the host page's scripting
/// context while still letting the document read host-origin resources for
/// layout. The standard stylesheet is added ahead of the injected body.
pub fn office_html_frame(html_body: &str) -> String {
    let document = format!(
        "<html><head><style>{OFFICE_DOCUMENT_STYLE}</style></head><body>{html_body}</body></html>"
    );
    format!(
        "<iframe class=\"w-full h-full border-0\" sandbox=\"allow-same-origin\" \
         title=\"Office Document Preview\" srcdoc=\"{}\"></iframe>",
        escape_attr(&document)
    )
}

/// Frame over a converted-to-PDF resource handle, with an indicator badge.
pub fn office_pdf_frame(url: &str) -> String {
    format!(
        "<iframe src=\"{url}\" class=\"w-full h-full border-0\" \
         title=\"Office Document Preview (PDF)\"></iframe>\
         <div class=\"absolute top-2 right-2 px-3 py-1 bg-green-100 dark:bg-green-900 \
         text-green-700 dark:text-green-300 text-xs rounded-full shadow-sm\">Converted to PDF</div>"
    )
}

/// Panel shown when the backend returned an unconvertible binary body.
pub fn office_unavailable_panel() -> String {
    "<div class=\"text-center p-8 max-w-md\">\
     <h3 class=\"text-lg font-semibold text-gray-900 dark:text-gray-100 mb-2\">\
     Preview Not Available</h3>\
     <p class=\"text-gray-600 dark:text-gray-400 mb-6\">Office document preview is currently \
     not available. Please download the file to view its contents.</p>\
     <button class=\"office-download-btn px-6 py-2.5 bg-blue-600 hover:bg-blue-700 text-white \
     rounded-lg\" aria-label=\"Download file\">Download File</button></div>"
        .to_string()
}

/// Panel shown when fetching or converting the Office document failed.
pub fn office_error_panel(message: &str) -> String {
    format!(
        "<div class=\"text-center p-8 max-w-md\">\
         <h3 class=\"text-lg font-semibold text-gray-900 dark:text-gray-100 mb-2\">\
         Conversion Failed</h3>\
         <p class=\"text-gray-600 dark:text-gray-400 mb-2\">Unable to convert document for \
         preview.</p>\
         <p class=\"text-sm text-gray-500 dark:text-gray-500 mb-6\">{}</p>\
         <button class=\"office-download-btn px-6 py-2.5 bg-blue-600 hover:bg-blue-700 \
         text-white rounded-lg\" aria-label=\"Download file\">Download File Instead</button></div>",
        escape_html(message)
    )
}

/// Highlighted code block with an optional line-number gutter and badge.
///
/// `code_html` must already be escaped or highlighter-produced markup.
pub fn code_block(
    code_html: &str,
    language: Option<&str>,
    line_count: usize,
    show_line_numbers: bool,
) -> String {
    let code_class = language.map_or_else(String::new, |language| {
        format!(" class=\"language-{language}\"")
    });
    let pre = format!("<pre class=\"text-sm m-0 p-0\"><code{code_class}>{code_html}</code></pre>");

    let body = if show_line_numbers {
        let mut gutter = String::new();
        for line in 1..=line_count {
            gutter.push_str(&format!("<div class=\"leading-6\">{line}</div>"));
        }
        format!(
            "<div class=\"flex\"><div class=\"line-numbers bg-gray-100 dark:bg-gray-800 \
             text-gray-500 dark:text-gray-400 text-sm font-mono text-right select-none \
             border-r border-gray-300 dark:border-gray-700 py-4 px-3 sticky left-0\">{gutter}\
             </div>{pre}</div>"
        )
    } else {
        pre
    };

    let badge = language.map_or_else(String::new, |language| {
        format!(
            "<div class=\"absolute top-2 right-2 px-3 py-1 bg-blue-100 dark:bg-blue-900 \
             text-blue-700 dark:text-blue-300 text-xs rounded-full shadow-sm\">{}</div>",
            escape_html(&language.to_uppercase())
        )
    });

    format!("<div class=\"relative\">{body}{badge}</div>")
}

/// Plain-text body, pre-escaped by the caller.
pub fn text_block(escaped_content: &str) -> String {
    format!(
        "<pre class=\"text-sm whitespace-pre-wrap p-4 font-mono\">{escaped_content}</pre>"
    )
}

/// Fallback panel for files no renderer variant supports.
pub fn unsupported_panel(display_name: &str) -> String {
    format!(
        "<div class=\"text-center p-8 max-w-md\">\
         <h3 class=\"text-lg font-semibold text-gray-900 dark:text-gray-100 mb-2\">\
         Preview Not Available</h3>\
         <p class=\"text-gray-600 dark:text-gray-400\">Preview is not supported for \
         <span class=\"font-medium\">{}</span>. Please download the file to view its \
         contents.</p></div>",
        escape_html(display_name)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn pdf_viewer_reports_unknown_totals_as_dashes() {
        let markup = pdf_viewer("memory:1", 1, None);
        assert!(markup.contains("<span class=\"pdf-total-pages\">--</span>"));
        assert!(markup.contains("src=\"memory:1#page=1\""));
        // forward navigation stays unbounded while the total is unknown
        assert!(!markup.contains("aria-label=\"Next page\" disabled"));
        assert!(markup.contains("aria-label=\"Previous page\" disabled"));
    }

    #[test]
    fn pdf_viewer_disables_forward_navigation_at_the_known_boundary() {
        let markup = pdf_viewer("memory:2", 5, Some(5));
        assert!(markup.contains("<span class=\"pdf-total-pages\">5</span>"));
        assert!(markup.contains("value=\"5\" min=\"1\" max=\"5\""));
        assert!(markup.contains("aria-label=\"Next page\" disabled"));
        assert!(!markup.contains("aria-label=\"Previous page\" disabled"));
    }

    #[test]
    fn office_html_frame_escapes_the_embedded_document() {
        let markup = office_html_frame("<p class=\"lead\">Q1 &amp; Q2</p>");
        assert!(markup.contains("sandbox=\"allow-same-origin\""));
        assert!(markup.contains("srcdoc=\"<html>"));
        assert!(markup.contains("<p class=&quot;lead&quot;>Q1 &amp;amp; Q2</p>"));
    }

    #[test]
    fn code_block_gutter_has_one_entry_per_line() {
        let markup = code_block("a<br>b<br>c", Some("rust"), 3, true);
        let entries = markup.matches("<div class=\"leading-6\">").count();
        assert_eq!(entries, 3);
        assert!(markup.contains("class=\"language-rust\""));
        assert!(markup.contains(">RUST</div>"));

        let bare = code_block("a", None, 1, false);
        assert!(!bare.contains("line-numbers"));
        assert!(!bare.contains("language-"));
    }

    #[test]
    fn error_panels_escape_backend_messages() {
        let markup = office_error_panel("boom <script>");
        assert!(markup.contains("boom &lt;script&gt;"));
        assert!(markup.contains("office-download-btn"));
    }
}
