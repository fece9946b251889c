//! Browser (`wasm32`) implementations of [`preview_host`] service contracts.
//!
//! Concrete adapters for the preview subsystem's host services: the
//! authenticated `fetch` file API, the Web Storage token store, and the
//! lazily-loaded Highlight.js and PDF.js capabilities. Every adapter carries
//! a native fallback arm so higher layers stay compilable and testable
//! off-browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod highlight;
pub mod http;
pub mod pdf_pages;
pub mod token;

pub use highlight::HljsHighlighter;
pub use http::HttpFileApi;
pub use pdf_pages::PdfJsPageCount;
pub use token::WebTokenStore;
