#![forbid(unsafe_code)]

//! Row identity.
//!
//! Every orderable unit carries a [`RowId`]: a kind prefix plus a stable
//! domain key, e.g. `folder:work` or `item:/home/docs`. The prefix keeps
//! folders and items distinct even when their keys collide, and commits
//! parse the id back into `(kind, key)` before talking to the domain.
//!
//! # Invariants
//! 1. Ids are unique within one sortable domain (one snapshot).
//! 2. The kind prefix is stable for the lifetime of the row.
//! 3. Keys are never empty for ids built through the typed constructors.

use std::fmt;

/// The kind of an orderable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// A container row (folder, directory).
    Folder,
    /// A leaf row (file, favorite, track).
    Item,
}

impl RowKind {
    /// The id prefix for this kind, including the separator.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Folder => "folder:",
            Self::Item => "item:",
        }
    }
}

/// Identity of one orderable row within a sortable domain.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Build a folder id from its stable key.
    #[must_use]
    pub fn folder(key: impl AsRef<str>) -> Self {
        Self(format!("{}{}", RowKind::Folder.prefix(), key.as_ref()))
    }

    /// Build an item id from its stable key (typically a path).
    #[must_use]
    pub fn item(key: impl AsRef<str>) -> Self {
        Self(format!("{}{}", RowKind::Item.prefix(), key.as_ref()))
    }

    /// The full prefixed id.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the id back into its kind and domain key.
    ///
    /// Returns `None` for ids that carry no known prefix (foreign ids are
    /// treated as absent, not as errors).
    #[must_use]
    pub fn parse(&self) -> Option<(RowKind, &str)> {
        for kind in [RowKind::Folder, RowKind::Item] {
            if let Some(key) = self.0.strip_prefix(kind.prefix()) {
                return Some((kind, key));
            }
        }
        None
    }

    /// The row kind, if the prefix is recognized.
    #[must_use]
    pub fn kind(&self) -> Option<RowKind> {
        self.parse().map(|(kind, _)| kind)
    }

    /// The domain key, if the prefix is recognized.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.parse().map(|(_, key)| key)
    }

    /// True for container (folder) ids.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind() == Some(RowKind::Folder)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_and_item_ids_round_trip() {
        let folder = RowId::folder("work");
        assert_eq!(folder.as_str(), "folder:work");
        assert_eq!(folder.parse(), Some((RowKind::Folder, "work")));
        assert!(folder.is_folder());

        let item = RowId::item("/home/docs");
        assert_eq!(item.as_str(), "item:/home/docs");
        assert_eq!(item.kind(), Some(RowKind::Item));
        assert_eq!(item.key(), Some("/home/docs"));
        assert!(!item.is_folder());
    }

    #[test]
    fn same_key_different_kind_are_distinct() {
        assert_ne!(RowId::folder("music"), RowId::item("music"));
    }

    #[test]
    fn keys_may_contain_colons() {
        // Windows-style paths keep their drive colon intact.
        let item = RowId::item("C:/Games");
        assert_eq!(item.key(), Some("C:/Games"));
    }

    #[test]
    fn display_matches_raw_id() {
        assert_eq!(RowId::folder("a").to_string(), "folder:a");
    }
}
