//! `fetch`-backed implementation of the file API contract.

use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use preview_host::parse_content_disposition_filename;
use preview_host::{DownloadedFile, FileApi, FileApiFuture, FileBlob, PreviewError, TokenStore};

/// Authenticated HTTP file API over the browser's `fetch`.
///
/// Attaches `Authorization: Bearer <token>` when the token store resolves
/// one. Non-2xx statuses classify through [`PreviewError::from_status`];
/// transport failures classify as [`PreviewError::Network`]. One attempt per
/// call, no retries.
pub struct HttpFileApi {
    tokens: Rc<dyn TokenStore>,
}

impl HttpFileApi {
    /// Builds the API over the given token store.
    pub fn new(tokens: Rc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    #[cfg(target_arch = "wasm32")]
    async fn request(&self, path: &str) -> Result<web_sys::Response, PreviewError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let init = web_sys::RequestInit::new();
        init.set_method("GET");
        let request = web_sys::Request::new_with_str_and_init(path, &init)
            .map_err(|_| PreviewError::Network)?;
        if let Some(token) = self.tokens.bearer_token() {
            request
                .headers()
                .set("Authorization", &format!("Bearer {token}"))
                .map_err(|_| PreviewError::Network)?;
        }

        let window = web_sys::window().ok_or(PreviewError::Network)?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| PreviewError::Network)?;
        let response: web_sys::Response =
            response.dyn_into().map_err(|_| PreviewError::Network)?;

        if !response.ok() {
            return Err(PreviewError::from_status(response.status()));
        }
        Ok(response)
    }

    #[cfg(target_arch = "wasm32")]
    async fn read_blob(response: &web_sys::Response) -> Result<FileBlob, PreviewError> {
        use wasm_bindgen_futures::JsFuture;

        let content_type = response.headers().get("content-type").ok().flatten();
        let buffer = JsFuture::from(response.array_buffer().map_err(|_| PreviewError::Network)?)
            .await
            .map_err(|_| PreviewError::Network)?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        Ok(FileBlob {
            content_type,
            bytes,
        })
    }
}

impl FileApi for HttpFileApi {
    fn fetch_blob<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<FileBlob, PreviewError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let response = self.request(path).await?;
                Self::read_blob(&response).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = path;
                Err(PreviewError::Network)
            }
        })
    }

    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<serde_json::Value, PreviewError>> {
        Box::pin(async move {
            let blob = self.fetch_blob(path).await?;
            serde_json::from_slice(&blob.bytes)
                .map_err(|err| PreviewError::Format(format!("Invalid JSON response: {err}")))
        })
    }

    fn fetch_download<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<DownloadedFile, PreviewError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let response = self.request(path).await?;
                let file_name = response
                    .headers()
                    .get("content-disposition")
                    .ok()
                    .flatten()
                    .and_then(|header| parse_content_disposition_filename(&header));
                let blob = Self::read_blob(&response).await?;
                Ok(DownloadedFile { blob, file_name })
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = path;
                Err(PreviewError::Network)
            }
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;
    use preview_host::NoopTokenStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn native_fallback_classifies_as_network_failure() {
        let api = HttpFileApi::new(Rc::new(NoopTokenStore));
        assert_eq!(
            block_on(api.fetch_blob("/api/file-explorer/files/1/content"))
                .expect_err("no transport off-browser"),
            PreviewError::Network
        );
        assert_eq!(
            block_on(api.fetch_download("/api/file-explorer/files/1/download"))
                .expect_err("no transport off-browser"),
            PreviewError::Network
        );
    }
}
