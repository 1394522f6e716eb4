//! Navigation surface: where the user is sent and which URL they came back on.

use std::sync::{PoisonError, RwLock};

use url::Url;

/// Browser-like navigation surface.
pub trait Navigator: Send + Sync {
    /// Send the user to `url` (full page navigation).
    fn navigate(&self, url: &str);

    /// Current location, including its query string.
    fn location(&self) -> Url;

    /// Rewrite the visible URL to `path` without navigating or adding a history entry.
    fn replace_url(&self, path: &str);
}

/// In-memory location that records every navigation.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: RwLock<Url>,
    navigations: RwLock<Vec<String>>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new(location: Url) -> Self {
        Self { current: RwLock::new(location), navigations: RwLock::new(Vec::new()) }
    }

    /// Start at a location given as a string.
    pub fn parse(location: &str) -> Result<Self, url::ParseError> {
        Url::parse(location).map(Self::new)
    }

    /// Every URL passed to [`Navigator::navigate`], oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.read().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(Url::parse("about:blank").expect("valid blank url"))
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, url: &str) {
        self.navigations.write().unwrap_or_else(PoisonError::into_inner).push(url.to_string());
        match Url::parse(url) {
            Ok(parsed) => *self.current.write().unwrap_or_else(PoisonError::into_inner) = parsed,
            Err(error) => tracing::warn!(%error, url, "navigated to unparsable url"),
        }
    }

    fn location(&self) -> Url {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace_url(&self, path: &str) {
        // Same origin only: a leading `//` stays part of the path.
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.set_path(path);
        current.set_query(None);
        current.set_fragment(None);
    }
}

/// Opens navigations in the system's default browser.
///
/// A native process has no address bar, so the browser never comes back here;
/// hosts capture the redirect URL separately (see [`MemoryNavigator::new`]).
#[derive(Debug, Default)]
pub struct SystemNavigator {
    inner: MemoryNavigator,
}

impl SystemNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&self, url: &str) {
        self.inner.navigate(url);
        if let Err(error) = open::that(url) {
            tracing::warn!(%error, url, "failed to open browser");
        }
    }

    fn location(&self) -> Url {
        self.inner.location()
    }

    fn replace_url(&self, path: &str) {
        self.inner.replace_url(path);
    }
}
