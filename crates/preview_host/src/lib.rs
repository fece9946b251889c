//! Typed host-domain contracts shared by the preview renderers and browser adapters.
//!
//! This crate is the API-first boundary for the file-preview subsystem. It exposes the
//! classified error taxonomy, the authenticated file API trait with in-memory test adapters,
//! token-store and capability-provider contracts, and the container/resource-handle surface
//! types the renderers draw into. Concrete browser adapters live in `preview_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod capability;
pub mod error;
pub mod html;
pub mod surface;
pub mod token;

pub use api::{
    file_content_path, file_download_path, office_preview_path,
    parse_content_disposition_filename, DownloadedFile, FileApi, FileApiFuture, FileBlob,
    MemoryFileApi, NoopFileApi,
};
pub use capability::{
    CapabilityFuture, FailingHighlighter, FixedPageCount, HighlightedCode, PageCountProvider,
    PlainHighlighter, SyntaxHighlighter, UnavailableHighlighter, UnknownPageCount,
};
pub use error::PreviewError;
pub use html::escape_html;
pub use surface::{deliver_file_download, PreviewContainer, ResourceHandle};
pub use token::{NoopTokenStore, StaticTokenStore, TokenStore};
