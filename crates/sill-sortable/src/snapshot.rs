#![forbid(unsafe_code)]

//! Ordered snapshots of the orderable tree.
//!
//! A [`Snapshot`] is a fresh, flat view of every node a drag could target,
//! in display order, with parent links for whatever containers are
//! currently expanded. Snapshots are regenerated on every drag-relevant
//! query — never cached across drag frames — so a concurrent external
//! mutation (a background refresh, a sibling widget's move) is reflected
//! before any decision is made against one.
//!
//! # Invariants
//! 1. No two nodes in one snapshot share an id. Duplicates are rejected in
//!    debug builds and dropped (first occurrence wins) in release.
//! 2. Ordering is the node sequence itself; there is no stored index.
//! 3. Parent links only reference nodes present in the same snapshot (a
//!    collapsed container's children simply do not appear).

use ahash::AHashMap;
use sill_core::id::RowId;

use crate::intent::{DropIntent, Placement};

/// How a row's position within its parent is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// User-controlled ordering; the row participates in drag reorder.
    #[default]
    Manual,
    /// Ordering derived elsewhere (alphabetical, most-recent); drags onto
    /// neighbouring positions are meaningless and refused by the model.
    Derived,
}

/// One orderable unit: a leaf row or a container such as a folder.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    /// Identity, unique within the snapshot.
    pub id: RowId,
    /// Parent container, if this node is currently nested.
    pub parent: Option<RowId>,
    /// How this node is ordered within its parent.
    pub sort_mode: SortMode,
    /// Whether the node can receive `Inside` drops.
    pub is_container: bool,
}

impl NodeRef {
    /// A root-level leaf node.
    #[must_use]
    pub fn leaf(id: RowId) -> Self {
        Self {
            id,
            parent: None,
            sort_mode: SortMode::Manual,
            is_container: false,
        }
    }

    /// A root-level container node.
    #[must_use]
    pub fn container(id: RowId) -> Self {
        Self {
            id,
            parent: None,
            sort_mode: SortMode::Manual,
            is_container: true,
        }
    }

    /// Nest the node under a parent container.
    #[must_use]
    pub fn with_parent(mut self, parent: RowId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Override the sort mode.
    #[must_use]
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }
}

/// A fresh ordered view of all orderable nodes at a point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    nodes: Vec<NodeRef>,
    index: AHashMap<RowId, usize>,
}

impl Snapshot {
    /// Build a snapshot from nodes in display order.
    ///
    /// Duplicate ids violate the uniqueness invariant: debug builds
    /// assert, release builds keep the first occurrence.
    #[must_use]
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        let mut unique = Vec::with_capacity(nodes.len());
        let mut index = AHashMap::with_capacity(nodes.len());
        for node in nodes {
            if index.contains_key(&node.id) {
                debug_assert!(false, "duplicate row id in snapshot: {}", node.id);
                continue;
            }
            index.insert(node.id.clone(), unique.len());
            unique.push(node);
        }
        Self {
            nodes: unique,
            index,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the snapshot holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in display order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// Iterate nodes in display order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeRef> {
        self.nodes.iter()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: &RowId) -> Option<&NodeRef> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Display position of a node.
    #[must_use]
    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Whether the snapshot contains a node.
    #[must_use]
    pub fn contains(&self, id: &RowId) -> bool {
        self.index.contains_key(id)
    }

    /// Parent of a node, if nested.
    #[must_use]
    pub fn parent_of(&self, id: &RowId) -> Option<&RowId> {
        self.get(id).and_then(|n| n.parent.as_ref())
    }

    /// Whether `candidate` sits anywhere below `ancestor` in the parent
    /// chain.
    ///
    /// This is the cycle guard: an `Inside` (or adjacent) drop whose
    /// target is a descendant of the dragged container would re-parent the
    /// container into its own subtree. The walk is bounded by the snapshot
    /// size, so a malformed parent cycle terminates instead of spinning.
    #[must_use]
    pub fn is_descendant(&self, candidate: &RowId, ancestor: &RowId) -> bool {
        let mut current = self.parent_of(candidate);
        let mut steps = self.nodes.len();
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps = match steps.checked_sub(1) {
                Some(s) => s,
                None => return false,
            };
            current = self.parent_of(parent);
        }
        false
    }

    /// Index one past the end of a node's subtree (the node plus all of
    /// its descendants) in display order.
    fn subtree_end(&self, id: &RowId) -> Option<usize> {
        let start = self.position(id)?;
        let mut end = start + 1;
        while end < self.nodes.len() && self.is_descendant(&self.nodes[end].id, id) {
            end += 1;
        }
        Some(end)
    }

    /// The snapshot that results from moving `moved` per `intent`.
    ///
    /// The moved node's subtree travels with it; `Before`/`After` place it
    /// adjacent to the target at the target's nesting level, `Inside`
    /// appends it as the target's last child. Returns `None` when either
    /// id is absent or the move would create a cycle (target equals the
    /// moved node or is one of its descendants).
    ///
    /// This is a pure computation used for previews, optimistic cache
    /// refreshes, and tests; models remain free to commit however their
    /// domain requires.
    #[must_use]
    pub fn with_move(&self, moved: &RowId, intent: &DropIntent) -> Option<Snapshot> {
        if !self.contains(moved) || !self.contains(&intent.target) {
            return None;
        }
        if &intent.target == moved || self.is_descendant(&intent.target, moved) {
            return None;
        }

        let start = self.position(moved)?;
        let end = self.subtree_end(moved)?;
        let mut remaining = self.nodes.clone();
        let mut subtree: Vec<NodeRef> = remaining.drain(start..end).collect();

        let without = Snapshot::new(remaining);

        // Re-parent the subtree root; descendants keep their links.
        subtree[0].parent = match intent.placement {
            Placement::Inside => Some(intent.target.clone()),
            Placement::Before | Placement::After => without.get(&intent.target)?.parent.clone(),
        };

        let insert_at = match intent.placement {
            Placement::Before => without.position(&intent.target)?,
            Placement::After | Placement::Inside => without.subtree_end(&intent.target)?,
        };

        let mut nodes = without.nodes;
        nodes.splice(insert_at..insert_at, subtree);
        Some(Snapshot::new(nodes))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
