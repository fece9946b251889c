//! Renderer selection and per-render lifecycle.

use std::{cell::RefCell, rc::Rc};

use preview_host::{
    FileApi, PageCountProvider, PreviewContainer, PreviewError, SyntaxHighlighter,
};

use crate::{
    code::CodeRenderer, markup, office::OfficeRenderer, pdf::PdfRenderer, text::TextRenderer,
};

/// Immutable input to a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Opaque backend identifier.
    pub id: String,
    /// Name shown to the user; also drives code-language detection.
    pub display_name: String,
    /// Declared MIME type, when the backend knows one.
    pub mime_type: Option<String>,
}

impl FileDescriptor {
    /// Builds a descriptor.
    pub fn new(id: &str, display_name: &str, mime_type: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            mime_type: mime_type.map(str::to_string),
        }
    }
}

/// Renderer variant a MIME type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Native-viewer PDF preview.
    Pdf,
    /// Syntax-highlighted source preview.
    Code,
    /// Escaped plain-text preview.
    Text,
    /// Backend-converted Office preview.
    Office,
}

const CODE_MIME_TYPES: [&str; 18] = [
    "text/javascript",
    "application/javascript",
    "text/x-java-source",
    "text/x-python",
    "text/x-c",
    "text/x-c++",
    "text/x-csharp",
    "text/x-php",
    "text/x-ruby",
    "text/x-go",
    "text/x-rust",
    "text/x-swift",
    "text/x-kotlin",
    "text/x-scala",
    "text/css",
    "text/html",
    "application/xhtml+xml",
    "text/x-sql",
];

const TEXT_MIME_TYPES: [&str; 7] = [
    "text/plain",
    "text/markdown",
    "text/csv",
    "text/log",
    "application/json",
    "application/xml",
    "text/xml",
];

/// Maps a MIME type to the renderer variant that handles it, or `None` when
/// no variant does.
///
/// Order matters: PDF first, then known code types, then textual types (any
/// remaining `text/*` counts as text), then the Office family.
pub fn select_renderer(mime_type: Option<&str>) -> Option<PreviewKind> {
    let mime_type = mime_type?;
    if mime_type == "application/pdf" {
        return Some(PreviewKind::Pdf);
    }
    if CODE_MIME_TYPES.contains(&mime_type) {
        return Some(PreviewKind::Code);
    }
    if TEXT_MIME_TYPES.contains(&mime_type) || mime_type.starts_with("text/") {
        return Some(PreviewKind::Text);
    }
    if OfficeRenderer::supports_format(Some(mime_type)) {
        return Some(PreviewKind::Office);
    }
    None
}

/// Host services every renderer variant draws from.
#[derive(Clone)]
pub struct PreviewServices {
    /// Authenticated backend fetches.
    pub api: Rc<dyn FileApi>,
    /// Best-effort PDF page counting.
    pub page_counts: Rc<dyn PageCountProvider>,
    /// Lazily-loaded syntax highlighting.
    pub highlighter: Rc<dyn SyntaxHighlighter>,
    /// Whether code previews get a line-number gutter.
    pub show_line_numbers: bool,
}

/// A constructed renderer variant, kept alive by the dispatcher for teardown
/// and host-page control wiring.
pub enum PreviewRenderer {
    /// PDF variant.
    Pdf(PdfRenderer),
    /// Office variant.
    Office(OfficeRenderer),
    /// Code variant.
    Code(CodeRenderer),
    /// Text variant.
    Text(TextRenderer),
}

impl PreviewRenderer {
    /// Tears the variant down, releasing any resource handle.
    pub fn destroy(&self) {
        match self {
            Self::Pdf(renderer) => renderer.destroy(),
            Self::Office(renderer) => renderer.destroy(),
            Self::Code(renderer) => renderer.destroy(),
            Self::Text(renderer) => renderer.destroy(),
        }
    }

    /// The PDF renderer, when this is the PDF variant.
    pub fn as_pdf(&self) -> Option<&PdfRenderer> {
        match self {
            Self::Pdf(renderer) => Some(renderer),
            _ => None,
        }
    }

    /// The Office renderer, when this is the Office variant.
    pub fn as_office(&self) -> Option<&OfficeRenderer> {
        match self {
            Self::Office(renderer) => Some(renderer),
            _ => None,
        }
    }

    /// The code renderer, when this is the code variant.
    pub fn as_code(&self) -> Option<&CodeRenderer> {
        match self {
            Self::Code(renderer) => Some(renderer),
            _ => None,
        }
    }

    /// The text renderer, when this is the text variant.
    pub fn as_text(&self) -> Option<&TextRenderer> {
        match self {
            Self::Text(renderer) => Some(renderer),
            _ => None,
        }
    }
}

/// Entry point host pages call to preview a file.
///
/// Holds no state beyond the currently active renderer, and always destroys
/// the previous renderer before constructing the next so resource handles
/// never leak across re-renders in the same container. The new renderer is
/// installed before its render is awaited, so a `destroy` arriving while the
/// fetch is in flight still reaches it.
pub struct PreviewDispatcher {
    services: PreviewServices,
    active: RefCell<Option<Rc<PreviewRenderer>>>,
}

impl PreviewDispatcher {
    /// Builds a dispatcher over the given services.
    pub fn new(services: PreviewServices) -> Self {
        Self {
            services,
            active: RefCell::new(None),
        }
    }

    /// Renders `file` into `container` with the variant its MIME type maps
    /// to. Files no variant supports get a fallback panel and succeed.
    pub async fn render(
        &self,
        file: &FileDescriptor,
        container: Option<PreviewContainer>,
    ) -> Result<(), PreviewError> {
        self.destroy();
        let container = container.ok_or(PreviewError::MissingContainer)?;

        let Some(kind) = select_renderer(file.mime_type.as_deref()) else {
            container.set_class_name("flex items-center justify-center h-full bg-gray-50 dark:bg-gray-900");
            container.set_html(&markup::unsupported_panel(&file.display_name));
            return Ok(());
        };

        let renderer = Rc::new(self.build(kind));
        *self.active.borrow_mut() = Some(Rc::clone(&renderer));

        match renderer.as_ref() {
            PreviewRenderer::Pdf(pdf) => pdf.render(&file.id, Some(container)).await,
            PreviewRenderer::Office(office) => office.render(&file.id, Some(container)).await,
            PreviewRenderer::Code(code) => {
                code.render(&file.id, &file.display_name, Some(container), None)
                    .await
            }
            PreviewRenderer::Text(text) => text.render(&file.id, Some(container)).await,
        }
    }

    fn build(&self, kind: PreviewKind) -> PreviewRenderer {
        let services = &self.services;
        match kind {
            PreviewKind::Pdf => PreviewRenderer::Pdf(PdfRenderer::new(
                Rc::clone(&services.api),
                Rc::clone(&services.page_counts),
            )),
            PreviewKind::Office => {
                PreviewRenderer::Office(OfficeRenderer::new(Rc::clone(&services.api)))
            }
            PreviewKind::Code => PreviewRenderer::Code(CodeRenderer::new(
                Rc::clone(&services.api),
                Rc::clone(&services.highlighter),
                services.show_line_numbers,
            )),
            PreviewKind::Text => {
                PreviewRenderer::Text(TextRenderer::new(Rc::clone(&services.api)))
            }
        }
    }

    /// The currently active renderer, for host-page control wiring.
    pub fn active(&self) -> Option<Rc<PreviewRenderer>> {
        self.active.borrow().clone()
    }

    /// Tears down the active renderer, including one whose render is still in
    /// flight. Idempotent.
    pub fn destroy(&self) {
        if let Some(renderer) = self.active.borrow_mut().take() {
            renderer.destroy();
        }
    }
}
