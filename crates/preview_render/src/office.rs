//! Office renderer: backend-converted previews with graceful degradation.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use preview_host::{
    deliver_file_download, file_download_path, office_preview_path, FileApi, FileBlob,
    PreviewContainer, PreviewError, ResourceHandle,
};

use crate::markup;

const SUPPORTED_OFFICE_TYPES: [&str; 6] = [
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Shape the backend converted an Office document into, derived from the
/// response's declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeFormat {
    /// Converted HTML, shown in a sandboxed document.
    Html,
    /// Converted PDF, shown in an embedded frame.
    Pdf,
    /// Conversion unsupported; only download is offered.
    Binary,
}

impl OfficeFormat {
    /// Wire-level name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::Binary => "binary",
        }
    }
}

fn classify_format(content_type: Option<&str>) -> OfficeFormat {
    let Some(content_type) = content_type else {
        return OfficeFormat::Binary;
    };
    if content_type.contains("text/html") {
        OfficeFormat::Html
    } else if content_type.contains("application/pdf") {
        OfficeFormat::Pdf
    } else {
        OfficeFormat::Binary
    }
}

#[derive(Default)]
struct OfficeState {
    file_id: Option<String>,
    container: Option<PreviewContainer>,
    handle: Option<ResourceHandle>,
    format: Option<OfficeFormat>,
}

/// Renders Office documents from the backend's converted representation.
///
/// There is no client-side Office parsing: the backend's `office-preview`
/// endpoint answers with HTML, PDF, or an opaque binary body, and the
/// response's content type alone drives the display branch. Conversion-class
/// failures degrade to an inline fallback panel with a download action;
/// configuration errors rethrow to the host page.
pub struct OfficeRenderer {
    api: Rc<dyn FileApi>,
    state: RefCell<OfficeState>,
    generation: Cell<u64>,
}

impl OfficeRenderer {
    /// Builds a renderer over the given fetch service.
    pub fn new(api: Rc<dyn FileApi>) -> Self {
        Self {
            api,
            state: RefCell::new(OfficeState::default()),
            generation: Cell::new(0),
        }
    }

    /// Whether the given MIME type names an Office document this renderer
    /// handles.
    pub fn supports_format(mime_type: Option<&str>) -> bool {
        let Some(mime_type) = mime_type else {
            return false;
        };
        SUPPORTED_OFFICE_TYPES
            .iter()
            .any(|supported| mime_type.contains(supported))
    }

    /// Fetches the converted representation and renders it into `container`.
    pub async fn render(
        &self,
        file_id: &str,
        container: Option<PreviewContainer>,
    ) -> Result<(), PreviewError> {
        let container = container.ok_or(PreviewError::MissingContainer)?;
        self.destroy();
        let generation = self.generation.get();
        {
            let mut state = self.state.borrow_mut();
            state.file_id = Some(file_id.to_string());
            state.container = Some(container.clone());
        }

        let outcome = match self.api.fetch_blob(&office_preview_path(file_id)).await {
            Ok(blob) => {
                if self.generation.get() != generation {
                    return Ok(());
                }
                self.show_converted(&container, blob)
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_conversion_error() => {
                if self.generation.get() != generation {
                    return Ok(());
                }
                container
                    .set_class_name("flex items-center justify-center h-full bg-gray-50 dark:bg-gray-900");
                container.set_html(&markup::office_error_panel(&err.to_string()));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn show_converted(
        &self,
        container: &PreviewContainer,
        blob: FileBlob,
    ) -> Result<(), PreviewError> {
        let format = classify_format(blob.content_type.as_deref());
        match format {
            OfficeFormat::Html => {
                container
                    .set_class_name("office-renderer-container h-full overflow-auto bg-white dark:bg-gray-900");
                container.set_html(&markup::office_html_frame(&blob.text()));
            }
            OfficeFormat::Pdf => {
                let handle =
                    ResourceHandle::from_bytes(&blob.bytes, blob.content_type.as_deref())
                        .map_err(PreviewError::Format)?;
                container
                    .set_class_name("office-renderer-container relative h-full overflow-auto bg-white dark:bg-gray-900");
                container.set_html(&markup::office_pdf_frame(handle.url()));
                self.state.borrow_mut().handle = Some(handle);
            }
            OfficeFormat::Binary => {
                container
                    .set_class_name("flex items-center justify-center h-full bg-gray-50 dark:bg-gray-900");
                container.set_html(&markup::office_unavailable_panel());
            }
        }
        self.state.borrow_mut().format = Some(format);
        Ok(())
    }

    /// Fetches the raw, unconverted file and hands it to the browser's
    /// save-as machinery. The save-as name comes from the backend's
    /// `Content-Disposition` header when present.
    pub async fn download_file(&self) -> Result<(), PreviewError> {
        let Some(file_id) = self.state.borrow().file_id.clone() else {
            return Ok(());
        };
        let download = self.api.fetch_download(&file_download_path(&file_id)).await?;
        let file_name = download.file_name.as_deref().unwrap_or("document");
        deliver_file_download(
            &download.blob.bytes,
            download.blob.content_type.as_deref(),
            file_name,
        )
        .map_err(PreviewError::Format)
    }

    /// Format of the last successful render.
    pub fn current_format(&self) -> Option<OfficeFormat> {
        self.state.borrow().format
    }

    /// Revokes any resource handle and clears identity and format fields.
    /// Idempotent.
    pub fn destroy(&self) {
        self.generation.set(self.generation.get() + 1);
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            handle.revoke();
        }
        *state = OfficeState::default();
    }
}
