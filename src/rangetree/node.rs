// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interned DFA nodes.
//!
//! Nodes are hash-consed through a process-wide table so that structurally
//! identical sub-trees collapse to the same allocation. This gives O(1) tree
//! equality (pointer comparison), makes set algebra cheap through structural
//! sharing, and is safe under concurrent construction: the table is a sharded
//! concurrent map with insert-or-get semantics, so two threads interning the
//! same content race benignly to the same node. The table never evicts; nodes
//! live for the process.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

pub(crate) type NodeRef = Arc<DfaNode>;

/// A single DFA state: whether a sequence may end here, plus outgoing edges
/// over disjoint digit class masks, ordered by their lowest digit.
///
/// The distinguished terminal node is the interned `(can_terminate, no
/// edges)` node; a node with no edges and no termination is never created
/// (the empty language is represented by the absence of a node).
#[derive(Debug)]
pub struct DfaNode {
    can_terminate: bool,
    edges: Vec<DfaEdge>,
}

/// One deterministic transition: a digit class mask and the target state.
#[derive(Debug, Clone)]
pub struct DfaEdge {
    mask: u16,
    target: NodeRef,
}

impl DfaNode {
    /// True when a digit sequence may end at this state.
    pub fn can_terminate(&self) -> bool {
        self.can_terminate
    }

    /// Outgoing edges, ordered by lowest digit, with pairwise disjoint masks.
    pub fn edges(&self) -> &[DfaEdge] {
        &self.edges
    }

    /// The target state for one digit, if it has a transition.
    pub fn target_for_digit(&self, digit: u32) -> Option<&NodeRef> {
        let bit = 1u16 << digit;
        self.edges
            .iter()
            .find(|e| e.mask & bit != 0)
            .map(|e| &e.target)
    }
}

impl DfaEdge {
    pub(crate) fn new(mask: u16, target: NodeRef) -> Self {
        debug_assert!(mask != 0 && mask <= 0x3FF, "invalid digit class mask {:#x}", mask);
        DfaEdge { mask, target }
    }

    pub fn mask(&self) -> u16 {
        self.mask
    }

    pub fn target(&self) -> &NodeRef {
        &self.target
    }
}

/// Structural content of a node; the interning key. Child identity is the
/// address of the child allocation, which is stable because the table keeps
/// every interned node alive.
#[derive(PartialEq, Eq, Hash)]
struct NodeKey {
    can_terminate: bool,
    edges: Vec<(u16, usize)>,
}

static TERMINAL: LazyLock<NodeRef> = LazyLock::new(|| {
    Arc::new(DfaNode { can_terminate: true, edges: Vec::new() })
});

static INTERN_TABLE: LazyLock<DashMap<NodeKey, NodeRef>> = LazyLock::new(DashMap::new);

/// Stable identity of a node, used as a memoization key.
pub(crate) fn node_id(node: &NodeRef) -> usize {
    Arc::as_ptr(node) as usize
}

/// The distinguished terminal node: termination and nothing else.
pub(crate) fn terminal() -> NodeRef {
    TERMINAL.clone()
}

/// Interns a node by structural content. Edges must already be normalized
/// (disjoint masks, ordered by lowest digit, no duplicate targets); the
/// algebra only builds nodes through [`node_from_digit_targets`], which
/// guarantees this.
pub(crate) fn intern(can_terminate: bool, edges: Vec<DfaEdge>) -> NodeRef {
    if edges.is_empty() {
        assert!(can_terminate, "a node without edges or termination is the empty language");
        return terminal();
    }
    debug_assert!(edges_normalized(&edges), "edges must be disjoint and ordered");
    let key = NodeKey {
        can_terminate,
        edges: edges.iter().map(|e| (e.mask, node_id(&e.target))).collect(),
    };
    INTERN_TABLE
        .entry(key)
        .or_insert_with(move || Arc::new(DfaNode { can_terminate, edges }))
        .value()
        .clone()
}

/// Builds the canonical node for a per-digit transition table, merging digits
/// with the same target into one mask edge. Returns `None` for the empty
/// language (no transitions and no termination).
pub(crate) fn node_from_digit_targets(
    can_terminate: bool,
    targets: [Option<NodeRef>; 10],
) -> Option<NodeRef> {
    // Group digits by target in first-seen order, which is lowest-digit order.
    let mut grouped: Vec<DfaEdge> = Vec::new();
    for (digit, target) in targets.into_iter().enumerate() {
        let Some(target) = target else { continue };
        let bit = 1u16 << digit;
        match grouped.iter_mut().find(|e| Arc::ptr_eq(&e.target, &target)) {
            Some(edge) => edge.mask |= bit,
            None => grouped.push(DfaEdge { mask: bit, target }),
        }
    }
    if grouped.is_empty() && !can_terminate {
        return None;
    }
    Some(intern(can_terminate, grouped))
}

fn edges_normalized(edges: &[DfaEdge]) -> bool {
    let mut seen = 0u16;
    let mut last_low = None;
    for edge in edges {
        if edge.mask == 0 || edge.mask & seen != 0 {
            return false;
        }
        let low = edge.mask.trailing_zeros();
        if last_low.is_some_and(|l| low < l) {
            return false;
        }
        seen |= edge.mask;
        last_low = Some(low);
    }
    true
}
