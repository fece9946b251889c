//! Browser token store backed by Web Storage.

use preview_host::TokenStore;

#[cfg(target_arch = "wasm32")]
const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Copy, Default)]
/// Two-tier bearer-token lookup: `localStorage` first, then `sessionStorage`.
///
/// An absent token is not an error; requests simply go out unauthenticated.
pub struct WebTokenStore;

impl TokenStore for WebTokenStore {
    fn bearer_token(&self) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window()?;
            if let Some(token) = window
                .local_storage()
                .ok()
                .flatten()
                .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
            {
                return Some(token);
            }
            window
                .session_storage()
                .ok()
                .flatten()
                .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            None
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_fallback_resolves_no_token() {
        assert_eq!(WebTokenStore.bearer_token(), None);
    }
}
