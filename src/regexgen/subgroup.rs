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

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::rangetree::{NodeRef, RangeTree, node_from_digit_targets, node_id, terminal};

/// A tree divided at one heavily shared interior state: `prefix` holds the
/// paths from the root to that state (the state itself replaced by
/// termination), `suffix` the sub-tree below it, and `bypass` everything in
/// the tree that does not pass through it. Rendering
/// `prefix (?:suffix) | bypass` writes the shared sub-tree once instead of
/// once per incoming path.
pub(crate) struct SubgroupSplit {
    pub(crate) prefix: RangeTree,
    pub(crate) suffix: RangeTree,
    pub(crate) bypass: RangeTree,
}

/// Picks the interior state where splitting pays off most: the score of a
/// state is its sub-tree's state count times the incoming paths beyond the
/// first, i.e. the duplication the plain conversion would produce.
pub(crate) struct SubgroupOptimizer;

impl SubgroupOptimizer {
    /// `None` when no state is shared, in which case splitting cannot help.
    pub(crate) fn split(tree: &RangeTree) -> Option<SubgroupSplit> {
        let root = tree.root()?;
        let order = topological(root);
        // Incoming path counts, accumulated in topological order.
        let mut paths: HashMap<usize, u64> = HashMap::new();
        paths.insert(node_id(root), 1);
        for node in &order {
            let count = paths.get(&node_id(node)).copied().unwrap_or(0);
            for edge in node.edges() {
                *paths.entry(node_id(edge.target())).or_insert(0) += count;
            }
        }
        let mut sizes = HashMap::new();
        let mut best: Option<(u64, &NodeRef)> = None;
        for node in &order {
            if Arc::ptr_eq(node, root) || node.edges().is_empty() {
                continue;
            }
            let incoming = paths.get(&node_id(node)).copied().unwrap_or(0);
            let score = incoming.saturating_sub(1) * subtree_states(node, &mut sizes);
            // Strictly-greater keeps the first (shallowest) state on ties.
            if score > 0 && best.is_none_or(|(b, _)| score > b) {
                best = Some((score, node));
            }
        }
        let (_, shared) = best?;
        let prefix =
            RangeTree::from_root(cut_at(root, shared, &mut HashMap::new(), CutMode::Terminate));
        let through =
            RangeTree::from_root(cut_at(root, shared, &mut HashMap::new(), CutMode::Keep));
        Some(SubgroupSplit {
            prefix,
            suffix: RangeTree::from_root(Some(shared.clone())),
            bypass: tree.subtract(&through),
        })
    }
}

/// All states reachable from `root`, parents before children.
fn topological(root: &NodeRef) -> Vec<NodeRef> {
    fn post(node: &NodeRef, seen: &mut HashSet<usize>, out: &mut Vec<NodeRef>) {
        if !seen.insert(node_id(node)) {
            return;
        }
        for edge in node.edges() {
            post(edge.target(), seen, out);
        }
        out.push(node.clone());
    }
    let mut out = Vec::new();
    post(root, &mut HashSet::new(), &mut out);
    out.reverse();
    out
}

fn subtree_states(node: &NodeRef, memo: &mut HashMap<usize, u64>) -> u64 {
    if let Some(&found) = memo.get(&node_id(node)) {
        return found;
    }
    // Seed against sharing within the sub-tree itself.
    memo.insert(node_id(node), 1);
    let total = 1 + node
        .edges()
        .iter()
        .map(|e| subtree_states(e.target(), memo))
        .sum::<u64>();
    memo.insert(node_id(node), total);
    total
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CutMode {
    /// Replace the shared state with the terminal: paths up to it.
    Terminate,
    /// Keep the shared state's sub-tree: paths through it.
    Keep,
}

/// Restricts the tree to sequences whose path passes through `shared`,
/// dropping terminations on the way.
fn cut_at(
    node: &NodeRef,
    shared: &NodeRef,
    memo: &mut HashMap<usize, Option<NodeRef>>,
    mode: CutMode,
) -> Option<NodeRef> {
    if Arc::ptr_eq(node, shared) {
        return Some(match mode {
            CutMode::Terminate => terminal(),
            CutMode::Keep => node.clone(),
        });
    }
    if let Some(found) = memo.get(&node_id(node)) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        node.target_for_digit(d as u32)
            .and_then(|t| cut_at(t, shared, memo, mode))
    });
    let result = node_from_digit_targets(false, targets);
    memo.insert(node_id(node), result.clone());
    result
}
