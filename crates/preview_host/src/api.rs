//! Authenticated file API contracts and in-memory adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use crate::error::PreviewError;

/// Object-safe boxed future used by [`FileApi`] async methods.
pub type FileApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Raw response body plus the declared content type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileBlob {
    /// `Content-Type` header value, when the response carried one.
    pub content_type: Option<String>,
    /// Response body bytes.
    pub bytes: Vec<u8>,
}

impl FileBlob {
    /// Builds a blob from a content type and body bytes.
    pub fn new(content_type: Option<&str>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }

    /// Reads the body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Downloaded raw file plus the save-as name suggested by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Raw file body.
    pub blob: FileBlob,
    /// Filename parsed from `Content-Disposition`, when present.
    pub file_name: Option<String>,
}

/// Host service for authenticated backend fetches.
///
/// Implementations classify every failure into [`PreviewError`] exactly once;
/// callers never inspect raw HTTP state.
pub trait FileApi {
    /// Fetches a raw body as a blob.
    fn fetch_blob<'a>(&'a self, path: &'a str)
        -> FileApiFuture<'a, Result<FileBlob, PreviewError>>;

    /// Fetches and parses a JSON body.
    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<serde_json::Value, PreviewError>>;

    /// Fetches a raw body and the suggested save-as filename.
    fn fetch_download<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<DownloadedFile, PreviewError>>;
}

/// Builds the text-content endpoint path for a file id.
pub fn file_content_path(file_id: &str) -> String {
    format!("/api/file-explorer/files/{file_id}/content")
}

/// Builds the converted-Office-preview endpoint path for a file id.
pub fn office_preview_path(file_id: &str) -> String {
    format!("/api/file-explorer/files/{file_id}/office-preview")
}

/// Builds the raw-download endpoint path for a file id.
pub fn file_download_path(file_id: &str) -> String {
    format!("/api/file-explorer/files/{file_id}/download")
}

/// Extracts the filename from a `Content-Disposition` header value.
///
/// Accepts both quoted and bare `filename=` parameters; returns `None` when
/// the header has no filename parameter.
pub fn parse_content_disposition_filename(header: &str) -> Option<String> {
    let lower = header.to_ascii_lowercase();
    let start = lower.find("filename")?;
    let rest = &header[start..];
    let eq = rest.find('=')?;
    let raw = rest[eq + 1..].split(';').next()?.trim();
    let name = raw.trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// File API adapter that always fails with a network error.
pub struct NoopFileApi;

impl FileApi for NoopFileApi {
    fn fetch_blob<'a>(
        &'a self,
        _path: &'a str,
    ) -> FileApiFuture<'a, Result<FileBlob, PreviewError>> {
        Box::pin(async { Err(PreviewError::Network) })
    }

    fn fetch_json<'a>(
        &'a self,
        _path: &'a str,
    ) -> FileApiFuture<'a, Result<serde_json::Value, PreviewError>> {
        Box::pin(async { Err(PreviewError::Network) })
    }

    fn fetch_download<'a>(
        &'a self,
        _path: &'a str,
    ) -> FileApiFuture<'a, Result<DownloadedFile, PreviewError>> {
        Box::pin(async { Err(PreviewError::Network) })
    }
}

/// Canned response registered on a [`MemoryFileApi`] route.
#[derive(Debug, Clone)]
pub struct MemoryRoute {
    blob: Result<FileBlob, PreviewError>,
    file_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// In-memory file API adapter serving canned responses, for renderer tests.
pub struct MemoryFileApi {
    routes: Rc<RefCell<HashMap<String, MemoryRoute>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MemoryFileApi {
    /// Registers a successful blob response for a path.
    pub fn insert_blob(&self, path: &str, blob: FileBlob) {
        self.routes.borrow_mut().insert(
            path.to_string(),
            MemoryRoute {
                blob: Ok(blob),
                file_name: None,
            },
        );
    }

    /// Registers a successful blob response with a suggested download name.
    pub fn insert_download(&self, path: &str, blob: FileBlob, file_name: &str) {
        self.routes.borrow_mut().insert(
            path.to_string(),
            MemoryRoute {
                blob: Ok(blob),
                file_name: Some(file_name.to_string()),
            },
        );
    }

    /// Registers a classified failure for a path.
    pub fn insert_error(&self, path: &str, error: PreviewError) {
        self.routes.borrow_mut().insert(
            path.to_string(),
            MemoryRoute {
                blob: Err(error),
                file_name: None,
            },
        );
    }

    /// Returns every path requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, path: &str) -> Result<MemoryRoute, PreviewError> {
        self.requests.borrow_mut().push(path.to_string());
        self.routes
            .borrow()
            .get(path)
            .cloned()
            .ok_or(PreviewError::NotFound)
    }
}

impl FileApi for MemoryFileApi {
    fn fetch_blob<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<FileBlob, PreviewError>> {
        Box::pin(async move { self.lookup(path)?.blob })
    }

    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<serde_json::Value, PreviewError>> {
        Box::pin(async move {
            let blob = self.lookup(path)?.blob?;
            serde_json::from_slice(&blob.bytes)
                .map_err(|err| PreviewError::Format(format!("Invalid JSON response: {err}")))
        })
    }

    fn fetch_download<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<DownloadedFile, PreviewError>> {
        Box::pin(async move {
            let route = self.lookup(path)?;
            Ok(DownloadedFile {
                blob: route.blob?,
                file_name: route.file_name,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn endpoint_paths_embed_the_file_id() {
        assert_eq!(file_content_path("42"), "/api/file-explorer/files/42/content");
        assert_eq!(
            office_preview_path("42"),
            "/api/file-explorer/files/42/office-preview"
        );
        assert_eq!(
            file_download_path("abc-7"),
            "/api/file-explorer/files/abc-7/download"
        );
    }

    #[test]
    fn content_disposition_filename_handles_quoted_and_bare_forms() {
        assert_eq!(
            parse_content_disposition_filename("attachment; filename=\"report.docx\""),
            Some("report.docx".to_string())
        );
        assert_eq!(
            parse_content_disposition_filename("attachment; filename=notes.txt"),
            Some("notes.txt".to_string())
        );
        assert_eq!(
            parse_content_disposition_filename("attachment; FILENAME=UPPER.pdf"),
            Some("UPPER.pdf".to_string())
        );
        assert_eq!(parse_content_disposition_filename("inline"), None);
        assert_eq!(parse_content_disposition_filename("attachment; filename="), None);
    }

    #[test]
    fn memory_api_serves_canned_blobs_and_records_requests() {
        let api = MemoryFileApi::default();
        api.insert_blob("/a", FileBlob::new(Some("text/plain"), "hi"));
        api.insert_error("/b", PreviewError::Forbidden);

        let api_obj: &dyn FileApi = &api;
        let blob = block_on(api_obj.fetch_blob("/a")).expect("blob");
        assert_eq!(blob.text(), "hi");
        assert_eq!(
            block_on(api_obj.fetch_blob("/b")).expect_err("error"),
            PreviewError::Forbidden
        );
        assert_eq!(
            block_on(api_obj.fetch_blob("/missing")).expect_err("missing"),
            PreviewError::NotFound
        );
        assert_eq!(api.requests(), vec!["/a", "/b", "/missing"]);
    }

    #[test]
    fn memory_api_parses_json_and_rejects_invalid_bodies() {
        let api = MemoryFileApi::default();
        api.insert_blob(
            "/ok",
            FileBlob::new(Some("application/json"), r#"{"success":true}"#),
        );
        api.insert_blob("/bad", FileBlob::new(Some("application/json"), "not json"));

        let value = block_on(api.fetch_json("/ok")).expect("json");
        assert_eq!(value["success"], serde_json::Value::Bool(true));
        assert!(matches!(
            block_on(api.fetch_json("/bad")),
            Err(PreviewError::Format(_))
        ));
    }

    #[test]
    fn memory_api_download_carries_the_suggested_name() {
        let api = MemoryFileApi::default();
        api.insert_download("/d", FileBlob::new(None, vec![1, 2]), "report.docx");
        let download = block_on(api.fetch_download("/d")).expect("download");
        assert_eq!(download.file_name.as_deref(), Some("report.docx"));
        assert_eq!(download.blob.bytes, vec![1, 2]);
    }
}
