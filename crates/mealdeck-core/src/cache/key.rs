// ── Hierarchical cache keys ──

use std::fmt;

/// Ordered tuple identifying a cached query result.
///
/// Keys form a hierarchy: `["food"]` is a prefix of `["food", "list"]`,
/// which is a prefix of `["food", "list", "search", "pizza"]`. Group
/// invalidation and removal match on that prefix relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// A new key one level below `self`.
    pub fn child(&self, part: impl Into<String>) -> Self {
        let mut parts = self.0.clone();
        parts.push(part.into());
        Self(parts)
    }

    /// `true` when every segment of `prefix` matches the start of `self`.
    /// A key is a prefix of itself.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
