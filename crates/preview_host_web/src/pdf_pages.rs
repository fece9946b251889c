//! PDF.js page-count capability adapter.

use preview_host::{CapabilityFuture, PageCountProvider};

#[cfg(target_arch = "wasm32")]
mod bridge {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(inline_js = r#"
export function pdfjsCountPages(bytes) {
  if (typeof globalThis.pdfjsLib === 'undefined') {
    return Promise.resolve(null);
  }
  return globalThis.pdfjsLib
    .getDocument({ data: bytes })
    .promise.then((pdf) => pdf.numPages)
    .catch(() => null);
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = pdfjsCountPages)]
        pub fn pdfjs_count_pages(bytes: &[u8]) -> js_sys::Promise;
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Best-effort page counting through a host-page `pdfjsLib` global.
///
/// When PDF.js is absent or fails to parse the document, the count stays
/// unknown and the viewer degrades to unbounded forward navigation.
pub struct PdfJsPageCount;

impl PageCountProvider for PdfJsPageCount {
    fn count_pages<'a>(&'a self, pdf_bytes: &'a [u8]) -> CapabilityFuture<'a, Option<u32>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let value =
                    wasm_bindgen_futures::JsFuture::from(bridge::pdfjs_count_pages(pdf_bytes))
                        .await
                        .ok()?;
                let pages = value.as_f64()?;
                (pages >= 1.0).then_some(pages as u32)
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = pdf_bytes;
                None
            }
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_fallback_reports_unknown() {
        assert_eq!(block_on(PdfJsPageCount.count_pages(b"%PDF-1.7")), None);
    }
}
