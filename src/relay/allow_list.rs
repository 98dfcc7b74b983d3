//! Client allow-list.

use std::collections::BTreeSet;

/// Set of client identifiers permitted to use the relay.
///
/// Built once at startup and never mutated. An empty list places no
/// restriction on clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(Into::into)
                .filter(|id: &String| !id.is_empty())
                .collect(),
        }
    }

    /// Whether any restriction applies at all.
    pub fn is_restricted(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Decide whether a request carrying `client_id` may be forwarded.
    ///
    /// A request without an identifier only passes an unrestricted list.
    pub fn permits(&self, client_id: Option<&str>) -> bool {
        if !self.is_restricted() {
            return true;
        }
        client_id.is_some_and(|id| self.ids.contains(id))
    }
}

/// Split a comma-separated list of identifiers, trimming each entry and
/// dropping blanks (`"a,,b,"` yields `["a", "b"]`).
pub fn parse_client_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
