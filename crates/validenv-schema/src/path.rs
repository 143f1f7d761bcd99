//! Namespace paths used to attribute diagnostics to nested keys.

use std::fmt;

/// Ordered sequence of keys identifying a nested schema location.
///
/// Empty at the root. Displayed as a `/`-joined key sequence, or `root`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path one level below this one.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Join the segments with a separator, e.g. to build nested env keys.
    pub fn join(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

impl<S: Into<String>> FromIterator<S> for NamespacePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}
