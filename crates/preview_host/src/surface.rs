//! Render-target container and revocable resource handles.
//!
//! On `wasm32` these wrap the live DOM element and object-URL machinery; on
//! native targets they are capture buffers so renderer state machines stay
//! testable off-browser.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::{cell::RefCell, rc::Rc};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct CapturedContainer {
    class_name: String,
    html: String,
}

/// Host-page container a renderer exclusively draws into.
#[derive(Clone)]
pub struct PreviewContainer {
    #[cfg(target_arch = "wasm32")]
    element: web_sys::Element,
    #[cfg(not(target_arch = "wasm32"))]
    captured: Rc<RefCell<CapturedContainer>>,
}

impl PreviewContainer {
    /// Wraps a live DOM element supplied by the host page.
    #[cfg(target_arch = "wasm32")]
    pub fn from_element(element: web_sys::Element) -> Self {
        Self { element }
    }

    /// Returns the wrapped DOM element for host-page event wiring.
    #[cfg(target_arch = "wasm32")]
    pub fn element(&self) -> &web_sys::Element {
        &self.element
    }

    /// Builds a capture-buffer container for native tests.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn capture() -> Self {
        Self {
            captured: Rc::new(RefCell::new(CapturedContainer::default())),
        }
    }

    /// Replaces the container's class attribute.
    pub fn set_class_name(&self, class_name: &str) {
        #[cfg(target_arch = "wasm32")]
        self.element.set_class_name(class_name);

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.captured.borrow_mut().class_name = class_name.to_string();
        }
    }

    /// Replaces the container's markup.
    pub fn set_html(&self, html: &str) {
        #[cfg(target_arch = "wasm32")]
        self.element.set_inner_html(html);

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.captured.borrow_mut().html = html.to_string();
        }
    }

    /// Returns the container's current markup.
    pub fn html(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            self.element.inner_html()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.captured.borrow().html.clone()
        }
    }

    /// Returns the container's current class attribute.
    pub fn class_name(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            self.element.class_name()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.captured.borrow().class_name.clone()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static NEXT_HANDLE_ID: Cell<u64> = const { Cell::new(1) };
}

/// Revocable object-URL handle over a fetched body.
///
/// A renderer owns at most one live handle at a time and releases it through
/// its structured `destroy` path; release is explicit, never left to drop
/// order.
#[derive(Debug)]
pub struct ResourceHandle {
    url: String,
    revoked: Cell<bool>,
}

impl ResourceHandle {
    /// Creates a handle over the given body bytes and declared content type.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(bytes).buffer());
            let options = web_sys::BlobPropertyBag::new();
            options.set_type(content_type.unwrap_or(""));
            let blob =
                web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &options)
                    .map_err(|err| format!("failed to build blob: {err:?}"))?;
            let url = web_sys::Url::create_object_url_with_blob(&blob)
                .map_err(|err| format!("failed to create object URL: {err:?}"))?;
            Ok(Self {
                url,
                revoked: Cell::new(false),
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (bytes, content_type);
            let id = NEXT_HANDLE_ID.with(|next| {
                let id = next.get();
                next.set(id + 1);
                id
            });
            Ok(Self {
                url: format!("memory:{id}"),
                revoked: Cell::new(false),
            })
        }
    }

    /// Returns the transient URL this handle refers to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Releases the underlying object URL. Safe to call repeatedly.
    pub fn revoke(&self) {
        if self.revoked.replace(true) {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        {
            let _ = web_sys::Url::revoke_object_url(&self.url);
        }
    }

    /// Whether [`ResourceHandle::revoke`] has run.
    pub fn is_revoked(&self) -> bool {
        self.revoked.get()
    }
}

/// Hands a downloaded file to the browser's save-as machinery.
///
/// Creates a transient anchor pointing at a short-lived object URL, clicks it,
/// and revokes the URL. On native targets this is a no-op so renderer download
/// paths stay exercisable in tests.
pub fn deliver_file_download(
    bytes: &[u8],
    content_type: Option<&str>,
    file_name: &str,
) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let handle = ResourceHandle::from_bytes(bytes, content_type)?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "document unavailable".to_string())?;
        let anchor = document
            .create_element("a")
            .map_err(|err| format!("failed to create download anchor: {err:?}"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "failed to cast download anchor".to_string())?;
        anchor.set_href(handle.url());
        anchor.set_download(file_name);
        if let Some(body) = document.body() {
            let _ = body.append_child(&anchor);
        }
        anchor.click();
        anchor.remove();
        handle.revoke();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (bytes, content_type, file_name);
        Ok(())
    }
}
