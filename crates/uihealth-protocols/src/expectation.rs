//! Page registry definitions.
//!
//! A [`PageTarget`] is one route of the application under test together with the
//! structural [`Expectation`]s that define "healthy" for it.

use serde::{Deserialize, Serialize};

/// A single declarative check against a page's rendered structure.
///
/// Serialized with a `type` discriminant. Unknown types are rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// At least one element matching `selector` must appear.
    Exists {
        #[serde(alias = "sel")]
        selector: String,
    },

    /// The first element matching `selector` must contain `contains` in its text.
    ///
    /// A missing element is an error; a text mismatch is only a warning.
    #[serde(alias = "text")]
    TextContains {
        #[serde(alias = "sel")]
        selector: String,
        contains: String,
    },

    /// At least one of `selectors` must match.
    #[serde(alias = "anyOf")]
    AnyOf {
        #[serde(alias = "sels")]
        selectors: Vec<String>,
    },
}

impl Expectation {
    pub fn exists(selector: impl Into<String>) -> Self {
        Expectation::Exists {
            selector: selector.into(),
        }
    }

    pub fn text_contains(selector: impl Into<String>, contains: impl Into<String>) -> Self {
        Expectation::TextContains {
            selector: selector.into(),
            contains: contains.into(),
        }
    }

    pub fn any_of<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expectation::AnyOf {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }

    /// Every selector this expectation queries, in evaluation order.
    pub fn selectors(&self) -> Vec<&str> {
        match self {
            Expectation::Exists { selector } => vec![selector.as_str()],
            Expectation::TextContains { selector, .. } => vec![selector.as_str()],
            Expectation::AnyOf { selectors } => selectors.iter().map(String::as_str).collect(),
        }
    }

    /// Short kind label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Expectation::Exists { .. } => "exists",
            Expectation::TextContains { .. } => "text_contains",
            Expectation::AnyOf { .. } => "any_of",
        }
    }
}

/// One route of the application under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTarget {
    /// Route path, resolved against the target origin (e.g. `/signals`).
    pub path: String,

    /// Human-readable name, used by the agent strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, alias = "expect")]
    pub expectations: Vec<Expectation>,
}

impl PageTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            expectations: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Absolute URL of this page under `base`.
    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }

    /// Configured name, or one derived from the path (`/deep_dive` -> `Deep Dive`).
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            return "Root".to_string();
        }

        trimmed
            .split(['/', '_', '-'])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
#[path = "expectation_tests.rs"]
mod tests;
