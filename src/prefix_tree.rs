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

use std::collections::HashMap;

use crate::rangetree::{NodeRef, RangeTree, node_from_digit_targets, terminal};

/// A range tree used as a "starts with" filter: its sequences are prefixes,
/// never ending in an any-digit position. Typical use is deciding which
/// sub-ranges of a larger table row a shorter prefix column should keep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixTree {
    tree: RangeTree,
}

impl PrefixTree {
    /// Builds a prefix tree from an arbitrary range tree by stripping the
    /// trailing any-digit positions off every range in it.
    pub fn from_ranges(tree: &RangeTree) -> Self {
        let specs: Vec<_> = tree
            .as_specifications()
            .iter()
            .map(|s| s.prefix())
            .collect();
        PrefixTree { tree: RangeTree::from_specs(specs.iter()) }
    }

    /// The underlying range tree of prefixes.
    pub fn as_range_tree(&self) -> &RangeTree {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Computes the shortest set of prefixes that captures every sequence of
    /// `include` while excluding as much of `exclude` as possible, with
    /// prefixes no shorter than `min_length` where the trees leave a choice.
    ///
    /// A prefix stops as soon as nothing below it is contested: where an
    /// exclude region is fully contained in the include region, a shorter
    /// prefix wins and the exclude is ignored, since splitting further could
    /// never exclude it anyway. Where include and exclude genuinely overlap,
    /// the prefix splits per digit, and only by the minimal amount needed to
    /// tell them apart.
    pub fn minimal(include: &RangeTree, exclude: &RangeTree, min_length: usize) -> Self {
        let mut memo = HashMap::new();
        let root = minimal_node(include.root(), exclude.root(), min_length, &mut memo);
        PrefixTree { tree: RangeTree::from_root(root) }
    }

    /// Keeps the sequences of `tree` that start with one of these prefixes
    /// (a sequence equal to a prefix is kept too).
    pub fn retain_from(&self, tree: &RangeTree) -> RangeTree {
        let mut memo = HashMap::new();
        RangeTree::from_root(retain_node(self.tree.root(), tree.root(), &mut memo))
    }
}

type MinimalMemo = HashMap<(usize, usize, usize), Option<NodeRef>>;

fn minimal_node(
    include: Option<&NodeRef>,
    exclude: Option<&NodeRef>,
    needed: usize,
    memo: &mut MinimalMemo,
) -> Option<NodeRef> {
    let include = include?;
    if include.can_terminate() {
        // A whole include sequence ends here; a longer prefix would miss it.
        return Some(terminal());
    }
    if needed == 0 {
        let uncontested = match exclude {
            None => true,
            // Exclude fully inside include: nothing below can be carved out,
            // so a longer prefix would only be wasted specificity.
            Some(exclude) => RangeTree::from_root(Some(include.clone()))
                .contains_all(&RangeTree::from_root(Some(exclude.clone()))),
        };
        if uncontested {
            return Some(terminal());
        }
    }
    let key = (
        crate::rangetree::node_id(include),
        exclude.map_or(0, crate::rangetree::node_id),
        needed,
    );
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        minimal_node(
            include.target_for_digit(d as u32),
            exclude.and_then(|e| e.target_for_digit(d as u32)),
            needed.saturating_sub(1),
            memo,
        )
    });
    let result = node_from_digit_targets(false, targets);
    memo.insert(key, result.clone());
    result
}

fn retain_node(
    prefix: Option<&NodeRef>,
    tree: Option<&NodeRef>,
    memo: &mut HashMap<(usize, usize), Option<NodeRef>>,
) -> Option<NodeRef> {
    let prefix = prefix?;
    let tree = tree?;
    if prefix.can_terminate() {
        // Prefix matched in full; everything below is retained.
        return Some(tree.clone());
    }
    let key = (crate::rangetree::node_id(prefix), crate::rangetree::node_id(tree));
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        retain_node(
            prefix.target_for_digit(d as u32),
            tree.target_for_digit(d as u32),
            memo,
        )
    });
    let result = node_from_digit_targets(false, targets);
    memo.insert(key, result.clone());
    result
}
