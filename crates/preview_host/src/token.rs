//! Auth-token lookup contracts.

/// Client-side bearer-token source.
///
/// Token absence is not an error: requests proceed unauthenticated and the
/// backend's 401/403 answer is classified normally.
pub trait TokenStore {
    /// Returns the bearer token to attach, when one is resolvable.
    fn bearer_token(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Token store that never resolves a token.
pub struct NoopTokenStore;

impl TokenStore for NoopTokenStore {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Default)]
/// Fixed-token store for tests and non-browser targets.
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    /// Builds a store resolving the given token.
    pub fn new(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStore for StaticTokenStore {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_store_resolves_and_noop_does_not() {
        let fixed: &dyn TokenStore = &StaticTokenStore::new("t0ken");
        assert_eq!(fixed.bearer_token().as_deref(), Some("t0ken"));

        let none: &dyn TokenStore = &NoopTokenStore;
        assert_eq!(none.bearer_token(), None);
    }
}
