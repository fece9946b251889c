#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

//! Format-specific preview renderers and the dispatch layer that drives them.
//!
//! Given an opaque file id and a target container, [`PreviewDispatcher`]
//! selects one of the renderer variants by MIME type, tears down the previous
//! variant, and drives the new one: PDF files go through the browser's native
//! viewer with a page-navigation bar, Office documents through the backend's
//! conversion endpoint, source files through lazy-loaded syntax highlighting,
//! and plain text through an escaped preformatted block.
//!
//! All renderers run single-threaded and event-loop-cooperative. Each owns at
//! most one revocable resource handle, releases it through its `destroy`
//! path, and tolerates being destroyed while a fetch is in flight: a stale
//! continuation checks its instance generation and never writes into a
//! detached container.

pub mod code;
pub mod dispatch;
pub mod markup;
pub mod office;
pub mod pdf;
pub mod text;

#[cfg(test)]
mod testutil;

pub use code::CodeRenderer;
pub use dispatch::{
    select_renderer, FileDescriptor, PreviewDispatcher, PreviewKind, PreviewRenderer,
    PreviewServices,
};
pub use office::{OfficeFormat, OfficeRenderer};
pub use pdf::PdfRenderer;
pub use text::TextRenderer;
