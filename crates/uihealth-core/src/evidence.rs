//! Screenshot evidence.

use std::sync::Arc;

use tracing::debug;
use uihealth_protocols::BrowserPage;

use crate::error::EvidenceError;
use crate::store::ArtifactStore;

/// Artifact name for a route: `/` is `root`, `/a/b` is `a_b`.
pub fn slug_for_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', "_")
    }
}

/// Artifact name for a display name: lowercased, whitespace runs become `_`.
pub fn slug_for_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// A stored screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvidence {
    pub key: String,
    pub location: String,
    pub bytes: Vec<u8>,
}

/// Takes one screenshot per page and stores it under a name derived from the route.
pub struct EvidenceCapturer {
    store: Arc<dyn ArtifactStore>,
    full_page: bool,
}

impl EvidenceCapturer {
    pub fn new(store: Arc<dyn ArtifactStore>, full_page: bool) -> Self {
        Self { store, full_page }
    }

    /// Screenshot the page as it is now and store it as `<slug>.png`.
    pub async fn capture(
        &self,
        page: &dyn BrowserPage,
        path: &str,
    ) -> Result<CapturedEvidence, EvidenceError> {
        let bytes = page.screenshot(self.full_page).await?;
        let key = format!("{}.png", slug_for_path(path));
        let location = self.store.put(&key, &bytes).await?;
        debug!("Captured {} ({} bytes)", location, bytes.len());
        Ok(CapturedEvidence {
            key,
            location,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryArtifactStore;
    use crate::testing::FakePage;
    use std::time::Duration;

    #[test]
    fn test_slug_for_path() {
        assert_eq!(slug_for_path("/"), "root");
        assert_eq!(slug_for_path(""), "root");
        assert_eq!(slug_for_path("/signals"), "signals");
        assert_eq!(slug_for_path("/a/b"), "a_b");
        assert_eq!(slug_for_path("/deep_dive/"), "deep_dive");
    }

    #[test]
    fn test_slug_for_name() {
        assert_eq!(slug_for_name("Agents Status"), "agents_status");
        assert_eq!(slug_for_name("Root (redirect to Dashboard)"), "root_(redirect_to_dashboard)");
        assert_eq!(slug_for_name("  Deep   Dive "), "deep_dive");
    }

    #[tokio::test]
    async fn test_capture_stores_png_under_route_slug() {
        let store = Arc::new(MemoryArtifactStore::new());
        let capturer = EvidenceCapturer::new(store.clone(), true);
        let page = FakePage::new();
        page.goto("http://h/a/b", Duration::from_secs(1)).await.unwrap();

        let evidence = capturer.capture(&page, "/a/b").await.unwrap();
        assert_eq!(evidence.key, "a_b.png");
        assert_eq!(evidence.location, "memory://a_b.png");
        assert_eq!(store.keys(), vec!["a_b.png"]);
        assert_eq!(evidence.bytes, b"PNG:http://h/a/b");
    }

    #[tokio::test]
    async fn test_capture_failure() {
        let store = Arc::new(MemoryArtifactStore::new());
        let capturer = EvidenceCapturer::new(store.clone(), true);
        let page = FakePage::new().failing_screenshots();

        let err = capturer.capture(&page, "/").await.unwrap_err();
        assert!(matches!(err, EvidenceError::Page(_)));
        assert!(store.keys().is_empty());
    }
}
