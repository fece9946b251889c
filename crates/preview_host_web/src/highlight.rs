//! Highlight.js capability adapter, loaded lazily from the CDN.

use preview_host::{CapabilityFuture, HighlightedCode, PreviewError, SyntaxHighlighter};
#[cfg(target_arch = "wasm32")]
use serde::Deserialize;

#[cfg(target_arch = "wasm32")]
mod bridge {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(inline_js = r#"
const HLJS_BASE = 'https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0';

export function loadHljs(theme) {
  return new Promise((resolve, reject) => {
    if (typeof globalThis.hljs !== 'undefined') {
      resolve();
      return;
    }

    const css = document.createElement('link');
    css.rel = 'stylesheet';
    css.href = `${HLJS_BASE}/styles/${theme}.min.css`;
    document.head.appendChild(css);

    const script = document.createElement('script');
    script.src = `${HLJS_BASE}/highlight.min.js`;
    script.onload = () => resolve();
    script.onerror = () => reject(new Error('Failed to load highlighting library'));
    document.head.appendChild(script);
  });
}

export function hljsHighlight(code, language) {
  const hljs = globalThis.hljs;
  if (typeof hljs === 'undefined') {
    throw new Error('highlighting library is not loaded');
  }
  if (language) {
    const result = hljs.highlight(code, { language: language, ignoreIllegals: true });
    return JSON.stringify({ value: result.value, language: language });
  }
  const result = hljs.highlightAuto(code);
  return JSON.stringify({ value: result.value, language: result.language || null });
}
"#)]
    extern "C" {
        #[wasm_bindgen(js_name = loadHljs)]
        pub fn load_hljs(theme: &str) -> js_sys::Promise;

        #[wasm_bindgen(js_name = hljsHighlight, catch)]
        pub fn hljs_highlight(code: &str, language: Option<&str>) -> Result<String, JsValue>;
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Deserialize)]
struct RawHighlight {
    value: String,
    language: Option<String>,
}

/// Syntax highlighter backed by Highlight.js, injected into the page on
/// first use.
///
/// Off-browser the library can never load highlights, so `highlight` fails
/// and callers take their plain-text fallback.
#[derive(Debug, Clone)]
pub struct HljsHighlighter {
    theme: String,
}

impl HljsHighlighter {
    /// Builds a highlighter that loads the given Highlight.js theme.
    pub fn new(theme: &str) -> Self {
        Self {
            theme: theme.to_string(),
        }
    }
}

impl Default for HljsHighlighter {
    fn default() -> Self {
        Self::new("github")
    }
}

impl SyntaxHighlighter for HljsHighlighter {
    fn ensure_loaded<'a>(&'a self) -> CapabilityFuture<'a, Result<(), PreviewError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                wasm_bindgen_futures::JsFuture::from(bridge::load_hljs(&self.theme))
                    .await
                    .map(|_| ())
                    .map_err(|_| {
                        PreviewError::CapabilityLoad(
                            "Failed to load highlighting library".to_string(),
                        )
                    })
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Ok(())
            }
        })
    }

    fn highlight(&self, code: &str, language: Option<&str>) -> Result<HighlightedCode, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let raw = bridge::hljs_highlight(code, language)
                .map_err(|err| format!("highlight failed: {err:?}"))?;
            let parsed: RawHighlight = serde_json::from_str(&raw)
                .map_err(|err| format!("highlight result unreadable: {err}"))?;
            Ok(HighlightedCode {
                html: parsed.value,
                language: parsed.language,
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (code, language);
            Err("highlighting library is not loaded".to_string())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_fallback_degrades_to_plain_text_rendering() {
        let highlighter = HljsHighlighter::default();
        block_on(highlighter.ensure_loaded()).expect("load is a no-op off-browser");
        assert!(highlighter.highlight("let x = 1;", Some("rust")).is_err());
    }
}
