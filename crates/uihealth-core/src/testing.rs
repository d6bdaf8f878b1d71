//! Hand-written fakes for the browser and evaluator seams.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use uihealth_protocols::{
    AgentError, BrowserPage, PageError, UsabilityEvaluator, UsabilityReply, UsabilityRequest,
};

#[derive(Debug, Clone, Default)]
struct FakeElement {
    count: usize,
    text: Option<String>,
    /// Number of `count` queries that report zero before the element shows up.
    hidden_for: u32,
}

#[derive(Debug, Clone)]
enum NavigationFailure {
    Timeout,
    Refused(String),
}

#[derive(Default)]
struct FakePageState {
    current_url: Option<String>,
    visited: Vec<String>,
    count_calls: HashMap<String, u32>,
    screenshots: u32,
}

/// Scriptable in-memory page.
///
/// Elements are keyed by the exact selector string; a selector that was never
/// registered matches nothing.
#[derive(Default)]
pub struct FakePage {
    elements: HashMap<String, FakeElement>,
    body_text: Option<String>,
    navigation_failures: HashMap<String, NavigationFailure>,
    query_failures: HashMap<String, String>,
    screenshot_fails: bool,
    state: Mutex<FakePageState>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` matches of `selector`, present from the first query.
    pub fn with(mut self, selector: &str, count: usize) -> Self {
        self.elements.entry(selector.to_string()).or_default().count = count;
        self
    }

    /// One match of `selector` whose text content is `text`.
    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        let element = self.elements.entry(selector.to_string()).or_default();
        element.count = element.count.max(1);
        element.text = Some(text.to_string());
        self
    }

    /// `selector` matches only after `queries` count queries returned zero.
    pub fn appearing_after(mut self, selector: &str, queries: u32) -> Self {
        let element = self.elements.entry(selector.to_string()).or_default();
        element.count = element.count.max(1);
        element.hidden_for = queries;
        self
    }

    pub fn with_body(mut self, text: &str) -> Self {
        self.body_text = Some(text.to_string());
        self
    }

    pub fn timing_out_on(mut self, url: &str) -> Self {
        self.navigation_failures
            .insert(url.to_string(), NavigationFailure::Timeout);
        self
    }

    pub fn refusing(mut self, url: &str, message: &str) -> Self {
        self.navigation_failures.insert(
            url.to_string(),
            NavigationFailure::Refused(message.to_string()),
        );
        self
    }

    pub fn failing_query(mut self, selector: &str, message: &str) -> Self {
        self.query_failures
            .insert(selector.to_string(), message.to_string());
        self
    }

    pub fn failing_screenshots(mut self) -> Self {
        self.screenshot_fails = true;
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().visited.clone()
    }

    pub fn count_calls(&self, selector: &str) -> u32 {
        self.state
            .lock()
            .count_calls
            .get(selector)
            .copied()
            .unwrap_or(0)
    }

    pub fn screenshots_taken(&self) -> u32 {
        self.state.lock().screenshots
    }

    fn check_query(&self, selector: &str) -> Result<(), PageError> {
        match self.query_failures.get(selector) {
            Some(message) => Err(PageError::query(selector, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.visited.push(url.to_string());
        match self.navigation_failures.get(url) {
            Some(NavigationFailure::Timeout) => Err(PageError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
            Some(NavigationFailure::Refused(message)) => {
                Err(PageError::navigation(url, message.clone()))
            }
            None => {
                state.current_url = Some(url.to_string());
                Ok(())
            }
        }
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        self.check_query(selector)?;
        let mut state = self.state.lock();
        let calls = state.count_calls.entry(selector.to_string()).or_insert(0);
        *calls += 1;
        let seen = *calls;

        Ok(match self.elements.get(selector) {
            Some(element) if seen > element.hidden_for => element.count,
            _ => 0,
        })
    }

    async fn first_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        self.check_query(selector)?;
        if selector == "body" {
            if let Some(body) = &self.body_text {
                return Ok(Some(body.clone()));
            }
        }
        Ok(self
            .elements
            .get(selector)
            .filter(|e| e.count > 0)
            .map(|e| e.text.clone().unwrap_or_default()))
    }

    async fn screenshot(&self, _full_page: bool) -> Result<Vec<u8>, PageError> {
        if self.screenshot_fails {
            return Err(PageError::Screenshot("capture failed".to_string()));
        }
        let mut state = self.state.lock();
        state.screenshots += 1;
        let url = state.current_url.clone().unwrap_or_default();
        Ok(format!("PNG:{}", url).into_bytes())
    }
}

/// Evaluator that replays scripted replies in order.
#[derive(Default)]
pub struct FakeEvaluator {
    replies: Mutex<VecDeque<Result<UsabilityReply, AgentError>>>,
    requests: Mutex<Vec<UsabilityRequest>>,
}

impl FakeEvaluator {
    pub fn new(replies: Vec<Result<UsabilityReply, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<UsabilityRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl UsabilityEvaluator for FakeEvaluator {
    async fn evaluate(&self, request: UsabilityRequest) -> Result<UsabilityReply, AgentError> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Closed))
    }
}
