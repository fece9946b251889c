//! Plain-text renderer for files that need no highlighting.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use preview_host::{escape_html, file_content_path, FileApi, PreviewContainer, PreviewError};
use serde_json::Value;

use crate::markup;

/// Renders plain-text content as an escaped, preformatted block.
pub struct TextRenderer {
    api: Rc<dyn FileApi>,
    state: RefCell<TextState>,
    generation: Cell<u64>,
}

#[derive(Default)]
struct TextState {
    content: Option<String>,
    container: Option<PreviewContainer>,
}

impl TextRenderer {
    /// Builds a renderer over the given fetch service.
    pub fn new(api: Rc<dyn FileApi>) -> Self {
        Self {
            api,
            state: RefCell::new(TextState::default()),
            generation: Cell::new(0),
        }
    }

    /// Fetches the file's text content and renders it into `container`.
    pub async fn render(
        &self,
        file_id: &str,
        container: Option<PreviewContainer>,
    ) -> Result<(), PreviewError> {
        let container = container.ok_or(PreviewError::MissingContainer)?;
        self.destroy();
        let generation = self.generation.get();
        self.state.borrow_mut().container = Some(container.clone());

        let value = self.api.fetch_json(&file_content_path(file_id)).await?;
        if self.generation.get() != generation {
            return Ok(());
        }
        let success = value
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let content = match value.get("data").and_then(Value::as_str) {
            Some(data) if success => data.to_string(),
            _ => {
                return Err(PreviewError::Format(
                    value
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("Failed to load file content")
                        .to_string(),
                ))
            }
        };

        container.set_class_name("text-renderer-container h-full overflow-auto bg-white dark:bg-gray-900");
        container.set_html(&markup::text_block(&escape_html(&content)));
        self.state.borrow_mut().content = Some(content);
        Ok(())
    }

    /// Content of the last successful render.
    pub fn current_content(&self) -> Option<String> {
        self.state.borrow().content.clone()
    }

    /// Clears the content field. Idempotent.
    pub fn destroy(&self) {
        self.generation.set(self.generation.get() + 1);
        *self.state.borrow_mut() = TextState::default();
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use preview_host::{FileBlob, MemoryFileApi};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn render_escapes_and_preserves_the_body() {
        let api = MemoryFileApi::default();
        let body = serde_json::json!({ "success": true, "data": "1 < 2\nplain & simple" });
        api.insert_blob(
            &file_content_path("4"),
            FileBlob::new(Some("application/json"), body.to_string()),
        );
        let renderer = TextRenderer::new(Rc::new(api));
        let container = PreviewContainer::capture();
        block_on(renderer.render("4", Some(container.clone()))).expect("render");

        assert!(container.html().contains("1 &lt; 2\nplain &amp; simple"));
        assert_eq!(
            renderer.current_content().as_deref(),
            Some("1 < 2\nplain & simple")
        );

        renderer.destroy();
        renderer.destroy();
        assert_eq!(renderer.current_content(), None);
    }
}
