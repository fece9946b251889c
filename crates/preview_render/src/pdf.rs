//! PDF renderer: blob fetch, frame embedding, and page navigation.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use preview_host::{
    file_download_path, FileApi, PageCountProvider, PreviewContainer, PreviewError,
    ResourceHandle,
};

use crate::markup;

struct PdfState {
    container: Option<PreviewContainer>,
    handle: Option<ResourceHandle>,
    current_page: u32,
    total_pages: Option<u32>,
}

impl Default for PdfState {
    fn default() -> Self {
        Self {
            container: None,
            handle: None,
            current_page: 1,
            total_pages: None,
        }
    }
}

/// Renders PDF files through the browser's native viewer with a navigation
/// bar on top.
///
/// Page counting is best-effort: an absent [`PageCountProvider`] result leaves
/// the total unknown and forward navigation unbounded. The renderer owns at
/// most one revocable resource handle; `destroy` releases it and is safe to
/// call while a render is still in flight.
pub struct PdfRenderer {
    api: Rc<dyn FileApi>,
    page_counts: Rc<dyn PageCountProvider>,
    state: RefCell<PdfState>,
    generation: Cell<u64>,
}

impl PdfRenderer {
    /// Builds a renderer over the given fetch and page-count services.
    pub fn new(api: Rc<dyn FileApi>, page_counts: Rc<dyn PageCountProvider>) -> Self {
        Self {
            api,
            page_counts,
            state: RefCell::new(PdfState::default()),
            generation: Cell::new(0),
        }
    }

    /// Fetches the file as a blob, validates it is a PDF, and renders the
    /// viewer into `container`.
    ///
    /// A blob whose declared content type does not contain `pdf` is rejected
    /// as corrupted; a blob with no declared type is given the benefit of the
    /// doubt. All errors propagate to the caller.
    pub async fn render(
        &self,
        file_id: &str,
        container: Option<PreviewContainer>,
    ) -> Result<(), PreviewError> {
        let container = container.ok_or(PreviewError::MissingContainer)?;
        self.destroy();
        let generation = self.generation.get();
        self.state.borrow_mut().container = Some(container.clone());

        let blob = self.api.fetch_blob(&file_download_path(file_id)).await?;
        if let Some(content_type) = &blob.content_type {
            if !content_type.contains("pdf") {
                return Err(PreviewError::Format(
                    "File is corrupted or not a valid PDF".to_string(),
                ));
            }
        }

        let total_pages = self.page_counts.count_pages(&blob.bytes).await;
        if self.generation.get() != generation {
            // destroyed while the fetch was in flight
            return Ok(());
        }

        let handle = ResourceHandle::from_bytes(&blob.bytes, blob.content_type.as_deref())
            .map_err(PreviewError::Format)?;
        container.set_class_name("flex flex-col h-full");
        container.set_html(&markup::pdf_viewer(handle.url(), 1, total_pages));

        let mut state = self.state.borrow_mut();
        state.handle = Some(handle);
        state.current_page = 1;
        state.total_pages = total_pages;
        Ok(())
    }

    /// Navigates to `requested`, clamped to `[1, total]` when the total is
    /// known and only to a minimum of 1 otherwise. Returns the page landed on.
    ///
    /// Navigation is synchronous and never refetches; it rewrites the frame's
    /// page anchor and the numeric input display.
    pub fn go_to_page(&self, requested: i64) -> u32 {
        let mut state = self.state.borrow_mut();
        let mut page = requested.clamp(1, i64::from(u32::MAX)) as u32;
        if let Some(total) = state.total_pages {
            page = page.min(total);
        }
        state.current_page = page;

        if let (Some(handle), Some(container)) = (&state.handle, &state.container) {
            container.set_html(&markup::pdf_viewer(handle.url(), page, state.total_pages));
        }
        page
    }

    /// Steps back one page; no-op on page 1.
    pub fn previous_page(&self) {
        let current = self.state.borrow().current_page;
        if current > 1 {
            self.go_to_page(i64::from(current) - 1);
        }
    }

    /// Steps forward one page; no-op at a known last page.
    pub fn next_page(&self) {
        let (current, total) = {
            let state = self.state.borrow();
            (state.current_page, state.total_pages)
        };
        if total.is_none() || total.is_some_and(|t| current < t) {
            self.go_to_page(i64::from(current) + 1);
        }
    }

    /// Current page number.
    pub fn current_page(&self) -> u32 {
        self.state.borrow().current_page
    }

    /// Detected page count; `None` while unknown.
    pub fn total_pages(&self) -> Option<u32> {
        self.state.borrow().total_pages
    }

    /// Revokes the resource handle and resets all fields. Idempotent, and
    /// turns any still-running render into a no-op.
    pub fn destroy(&self) {
        self.generation.set(self.generation.get() + 1);
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            handle.revoke();
        }
        *state = PdfState::default();
    }
}

#[cfg(test)]
mod tests {
    use std::task::{Context, Poll};

    use futures::{executor::block_on, task::noop_waker, Future};
    use preview_host::{FileBlob, FixedPageCount, MemoryFileApi, UnknownPageCount};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testutil::SlowApi;

    fn pdf_api(file_id: &str, content_type: Option<&str>) -> MemoryFileApi {
        let api = MemoryFileApi::default();
        api.insert_blob(
            &file_download_path(file_id),
            FileBlob::new(content_type, b"%PDF-1.7".to_vec()),
        );
        api
    }

    fn rendered(api: MemoryFileApi, pages: Rc<dyn PageCountProvider>) -> (PdfRenderer, PreviewContainer) {
        let renderer = PdfRenderer::new(Rc::new(api), pages);
        let container = PreviewContainer::capture();
        block_on(renderer.render("9", Some(container.clone()))).expect("render");
        (renderer, container)
    }

    #[test]
    fn render_builds_the_viewer_with_an_exact_page_count() {
        let (renderer, container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(FixedPageCount(5)));
        assert_eq!(renderer.current_page(), 1);
        assert_eq!(renderer.total_pages(), Some(5));
        assert!(container.html().contains("pdf-page-input"));
        assert!(container.html().contains("<span class=\"pdf-total-pages\">5</span>"));
        assert_eq!(container.class_name(), "flex flex-col h-full");
    }

    #[test]
    fn render_rejects_blobs_that_are_not_pdfs() {
        let api = pdf_api("9", Some("text/html"));
        let renderer = PdfRenderer::new(Rc::new(api), Rc::new(UnknownPageCount));
        let err = block_on(renderer.render("9", Some(PreviewContainer::capture())))
            .expect_err("must reject");
        assert!(err.to_string().contains("not a valid PDF"));
    }

    #[test]
    fn render_accepts_blobs_with_no_declared_content_type() {
        let (renderer, _container) = rendered(pdf_api("9", None), Rc::new(UnknownPageCount));
        assert_eq!(renderer.total_pages(), None);
    }

    #[test]
    fn render_requires_a_container() {
        let renderer = PdfRenderer::new(
            Rc::new(pdf_api("9", Some("application/pdf"))),
            Rc::new(UnknownPageCount),
        );
        assert_eq!(
            block_on(renderer.render("9", None)).expect_err("must fail"),
            PreviewError::MissingContainer
        );
    }

    #[test]
    fn go_to_page_clamps_to_the_known_total() {
        let (renderer, container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(FixedPageCount(5)));
        assert_eq!(renderer.go_to_page(15), 5);
        assert_eq!(renderer.current_page(), 5);
        assert!(container.html().contains("#page=5"));
        assert_eq!(renderer.go_to_page(0), 1);
        assert_eq!(renderer.go_to_page(-3), 1);
    }

    #[test]
    fn go_to_page_is_unbounded_above_while_the_total_is_unknown() {
        let (renderer, container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(UnknownPageCount));
        assert_eq!(renderer.go_to_page(9999), 9999);
        assert!(container.html().contains("#page=9999"));
        assert_eq!(renderer.go_to_page(-1), 1);
    }

    #[test]
    fn page_steps_no_op_at_the_boundaries() {
        let (renderer, _container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(FixedPageCount(2)));
        renderer.previous_page();
        assert_eq!(renderer.current_page(), 1);
        renderer.next_page();
        renderer.next_page();
        assert_eq!(renderer.current_page(), 2);

        let (unbounded, _container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(UnknownPageCount));
        unbounded.go_to_page(7);
        unbounded.next_page();
        assert_eq!(unbounded.current_page(), 8);
    }

    #[test]
    fn destroy_is_idempotent_and_resets_all_fields() {
        let (renderer, _container) = rendered(pdf_api("9", Some("application/pdf")), Rc::new(FixedPageCount(5)));
        renderer.go_to_page(3);
        renderer.destroy();
        renderer.destroy();
        assert_eq!(renderer.current_page(), 1);
        assert_eq!(renderer.total_pages(), None);
    }

    #[test]
    fn destroy_during_an_in_flight_fetch_leaves_the_container_untouched() {
        let renderer = PdfRenderer::new(
            Rc::new(SlowApi(pdf_api("9", Some("application/pdf")))),
            Rc::new(FixedPageCount(5)),
        );
        let container = PreviewContainer::capture();

        let mut fut = Box::pin(renderer.render("9", Some(container.clone())));
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(fut.as_mut().poll(&mut cx).is_pending());

        renderer.destroy();
        loop {
            match fut.as_mut().poll(&mut cx) {
                Poll::Pending => continue,
                Poll::Ready(result) => {
                    result.expect("stale render resolves cleanly");
                    break;
                }
            }
        }

        assert_eq!(container.html(), "");
        assert_eq!(renderer.total_pages(), None);
    }
}
