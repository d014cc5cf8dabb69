//! # Opaque saved state.
//!
//! [`SavedState`] is the container interactors write into when the tree is
//! saved and read from when it is attached again. The crate treats it as an
//! opaque, string-keyed bag: values are strings and nested containers. How it
//! is persisted is up to the host.
//!
//! ## Example
//! ```rust
//! use ribvisor::SavedState;
//!
//! let mut state = SavedState::new();
//! state.put("score", "3:1");
//!
//! let mut child = SavedState::new();
//! child.put("turn", "x");
//! state.put_nested("board", child);
//!
//! assert_eq!(state.get("score"), Some("3:1"));
//! assert_eq!(state.nested("board").and_then(|b| b.get("turn")), Some("x"));
//! ```

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Value(String),
    Nested(SavedState),
}

/// String-keyed container of saved values and nested containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState {
    entries: BTreeMap<String, Entry>,
}

impl SavedState {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing whatever was under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Entry::Value(value.into()));
    }

    /// Returns the value under `key`, if it is a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Entry::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Stores a nested container, replacing whatever was under `key`.
    pub fn put_nested(&mut self, key: impl Into<String>, state: SavedState) {
        self.entries.insert(key.into(), Entry::Nested(state));
    }

    /// Returns the nested container under `key`, if it is one.
    pub fn nested(&self, key: &str) -> Option<&SavedState> {
        match self.entries.get(key) {
            Some(Entry::Nested(s)) => Some(s),
            _ => None,
        }
    }

    /// Removes and discards whatever was under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// True if anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the container holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates top-level keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_nested_do_not_alias() {
        let mut state = SavedState::new();
        state.put("k", "v");
        assert_eq!(state.nested("k"), None);

        state.put_nested("k", SavedState::new());
        assert_eq!(state.get("k"), None);
        assert!(state.nested("k").is_some());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut state = SavedState::new();
        state.put("a", "1");
        assert!(state.remove("a"));
        assert!(!state.remove("a"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_keys_sorted() {
        let mut state = SavedState::new();
        state.put("b", "2");
        state.put("a", "1");
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
