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

//! Canonical DFA representation of a set of digit sequences, closed under
//! set algebra. This is the core data structure behind possible-number
//! range handling: ranges parsed from specification text are combined here
//! and either compiled to matcher bytecode or rendered back to regexes.

mod node;

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

pub(crate) use node::{DfaEdge, NodeRef, intern, node_from_digit_targets, node_id, terminal};

use crate::digit_sequence::{DigitSequence, MAX_DIGITS};
use crate::range_specification::{ALL_DIGITS_MASK, RangeSpecification, RangeSpecificationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeTreeError {
    #[error("operation requires a non-empty range tree")]
    EmptyTree,
    #[error("sample index {index} out of bounds for a tree of {size} sequences")]
    SampleOutOfBounds { index: u64, size: u64 },
}

/// Depth-first edge enumeration over a range tree. `visit` is called once per
/// edge of the current node in digit-ascending order; a visitor recurses by
/// calling [`RangeTree::accept`] on the target it is handed. A shared
/// sub-tree is therefore visited once per distinct incoming path, which is
/// what serializers that track the accumulated prefix need.
pub trait DfaVisitor {
    fn visit(&mut self, mask: u16, target: &RangeTree);
}

/// A set of digit sequences, represented as a canonical interned DFA over
/// digit class edges.
///
/// Trees are immutable; every operation returns a new, structurally shared
/// tree. Because nodes are interned, two trees holding the same set of
/// sequences are always pointer-identical, so equality is O(1). The empty
/// tree (matching nothing) is distinct from the tree matching only the empty
/// sequence.
#[derive(Clone)]
pub struct RangeTree {
    root: Option<NodeRef>,
}

impl RangeTree {
    /// The empty tree, matching no sequence at all.
    pub fn empty() -> Self {
        RangeTree { root: None }
    }

    /// The tree matching exactly the empty digit sequence.
    pub fn matching_empty() -> Self {
        RangeTree { root: Some(terminal()) }
    }

    /// The tree matching every sequence of exactly `n` digits.
    pub fn any(n: usize) -> Self {
        assert!(n <= MAX_DIGITS, "length {} out of range", n);
        let mut node = terminal();
        for _ in 0..n {
            node = intern(false, vec![edge(ALL_DIGITS_MASK, node)]);
        }
        RangeTree { root: Some(node) }
    }

    /// The tree matching every sequence whose length is in `lengths`.
    pub fn any_of_lengths(lengths: impl IntoIterator<Item = usize>) -> Self {
        lengths
            .into_iter()
            .fold(RangeTree::empty(), |acc, l| acc.union(&RangeTree::any(l)))
    }

    /// The tree matching exactly the sequences described by `spec`.
    pub fn from_spec(spec: &RangeSpecification) -> Self {
        let mut node = terminal();
        for i in (0..spec.len()).rev() {
            node = intern(false, vec![edge(spec.bitmask(i), node)]);
        }
        RangeTree { root: Some(node) }
    }

    /// The union of several specifications.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a RangeSpecification>) -> Self {
        specs
            .into_iter()
            .fold(RangeTree::empty(), |acc, s| acc.union(&RangeTree::from_spec(s)))
    }

    /// Parses a specification string and builds its tree, e.g.
    /// `RangeTree::from_pattern("[1-4]xxx")`.
    pub fn from_pattern(pattern: &str) -> Result<Self, RangeSpecificationError> {
        Ok(RangeTree::from_spec(&RangeSpecification::parse(pattern)?))
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// True when the empty sequence is in this set.
    pub fn can_terminate(&self) -> bool {
        self.root.as_ref().is_some_and(|n| n.can_terminate())
    }

    /// True when `seq` is in this set.
    pub fn contains(&self, seq: &DigitSequence) -> bool {
        let Some(mut node) = self.root.clone() else { return false };
        for i in 0..seq.len() {
            match node.target_for_digit(seq.digit(i)) {
                Some(target) => node = target.clone(),
                None => return false,
            }
        }
        node.can_terminate()
    }

    /// The union of both sets.
    pub fn union(&self, other: &RangeTree) -> RangeTree {
        let mut memo = HashMap::new();
        RangeTree { root: union_nodes(self.root.as_ref(), other.root.as_ref(), &mut memo) }
    }

    /// The intersection of both sets.
    pub fn intersect(&self, other: &RangeTree) -> RangeTree {
        let mut memo = HashMap::new();
        RangeTree { root: intersect_nodes(self.root.as_ref(), other.root.as_ref(), &mut memo) }
    }

    /// This set with every sequence of `other` removed.
    pub fn subtract(&self, other: &RangeTree) -> RangeTree {
        let mut memo = HashMap::new();
        RangeTree { root: subtract_nodes(self.root.as_ref(), other.root.as_ref(), &mut memo) }
    }

    /// True when every sequence of `other` is in this set.
    pub fn contains_all(&self, other: &RangeTree) -> bool {
        let mut memo = HashMap::new();
        contains_all_nodes(self.root.as_ref(), other.root.as_ref(), &mut memo)
    }

    /// Number of digit sequences in this set.
    pub fn size(&self) -> u64 {
        let mut memo = HashMap::new();
        self.root.as_ref().map_or(0, |n| size_of(n, &mut memo))
    }

    /// The set of sequence lengths present in this tree.
    pub fn lengths(&self) -> BTreeSet<usize> {
        let mut memo = HashMap::new();
        self.root
            .as_ref()
            .map_or_else(BTreeSet::new, |n| lengths_of(n, &mut memo))
    }

    /// Restricts this set to sequences with `lo <= length <= hi`.
    pub fn slice(&self, lo: usize, hi: usize) -> RangeTree {
        assert!(lo <= hi, "invalid length slice {}..={}", lo, hi);
        let mut memo = HashMap::new();
        RangeTree { root: self.root.as_ref().and_then(|n| slice_node(n, lo, hi, &mut memo)) }
    }

    /// Widens every digit position after the first `n` to any-digit while
    /// keeping sequence lengths, e.g. `"12345"` with 3 significant digits
    /// becomes `"123xx"`.
    pub fn significant_digits(&self, n: usize) -> RangeTree {
        let mut memo = HashMap::new();
        RangeTree {
            root: self
                .root
                .as_ref()
                .and_then(|node| significant_node(node, n, &mut memo)),
        }
    }

    /// The smallest sequence in this set, in domain order.
    pub fn first(&self) -> Result<DigitSequence, RangeTreeError> {
        let mut node = self.root.clone().ok_or(RangeTreeError::EmptyTree)?;
        let mut seq = DigitSequence::empty();
        while !node.can_terminate() {
            // A non-terminating node always has edges; take the lowest digit.
            let edge = &node.edges()[0];
            let digit = edge.mask().trailing_zeros();
            seq = seq.extend_by(digit).expect("tree depth within digit bounds");
            node = edge.target().clone();
        }
        Ok(seq)
    }

    /// The `index`-th sequence of this set in domain order. Used to derive
    /// deterministic example numbers from a range.
    pub fn sample(&self, index: u64) -> Result<DigitSequence, RangeTreeError> {
        let mut sizes = HashMap::new();
        let mut node = self.root.clone().ok_or(RangeTreeError::EmptyTree)?;
        let size = size_of(&node, &mut sizes);
        if index >= size {
            return Err(RangeTreeError::SampleOutOfBounds { index, size });
        }
        let mut remaining = index;
        let mut seq = DigitSequence::empty();
        'walk: loop {
            if node.can_terminate() {
                if remaining == 0 {
                    return Ok(seq);
                }
                remaining -= 1;
            }
            for digit in 0..10u32 {
                let Some(target) = node.target_for_digit(digit) else { continue };
                let target_size = size_of(target, &mut sizes);
                if remaining < target_size {
                    seq = seq.extend_by(digit).expect("tree depth within digit bounds");
                    node = target.clone();
                    continue 'walk;
                }
                remaining -= target_size;
            }
            unreachable!("sample index was checked against the tree size");
        }
    }

    /// Prepends a fixed specification to every sequence in this set.
    pub fn prefix_with(&self, spec: &RangeSpecification) -> RangeTree {
        let Some(mut node) = self.root.clone() else { return RangeTree::empty() };
        for i in (0..spec.len()).rev() {
            node = intern(false, vec![edge(spec.bitmask(i), node)]);
        }
        RangeTree { root: Some(node) }
    }

    /// Decomposes this tree back into range specifications whose union is
    /// exactly this set. Specifications come out depth-first in
    /// digit-ascending order, shorter sequences before their extensions;
    /// `RangeTree::from_specs` round-trips to an equal tree.
    pub fn as_specifications(&self) -> Vec<RangeSpecification> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            let mut stack = Vec::new();
            collect_specs(root, &mut stack, &mut out);
        }
        out
    }

    /// Feeds the root's edges to `visitor` in digit-ascending order.
    pub fn accept(&self, visitor: &mut dyn DfaVisitor) {
        let Some(root) = &self.root else { return };
        for edge in root.edges() {
            visitor.visit(edge.mask(), &RangeTree { root: Some(edge.target().clone()) });
        }
    }

    pub(crate) fn root(&self) -> Option<&NodeRef> {
        self.root.as_ref()
    }

    pub(crate) fn from_root(root: Option<NodeRef>) -> RangeTree {
        RangeTree { root }
    }
}

impl PartialEq for RangeTree {
    fn eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for RangeTree {}

impl Hash for RangeTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.as_ref().map_or(0, node_id).hash(state);
    }
}

impl fmt::Debug for RangeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for spec in self.as_specifications() {
            set.entry(&format_args!("{}", spec));
        }
        set.finish()
    }
}

impl std::str::FromStr for RangeTree {
    type Err = RangeSpecificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeTree::from_pattern(s)
    }
}

pub(crate) fn edge(mask: u16, target: NodeRef) -> DfaEdge {
    node::DfaEdge::new(mask, target)
}

type PairMemo = HashMap<(usize, usize), Option<NodeRef>>;

fn pair_key(a: &NodeRef, b: &NodeRef) -> (usize, usize) {
    (node_id(a), node_id(b))
}

fn union_nodes(a: Option<&NodeRef>, b: Option<&NodeRef>, memo: &mut PairMemo) -> Option<NodeRef> {
    let (a, b) = match (a, b) {
        (None, None) => return None,
        (Some(a), None) => return Some(a.clone()),
        (None, Some(b)) => return Some(b.clone()),
        (Some(a), Some(b)) => (a, b),
    };
    if std::sync::Arc::ptr_eq(a, b) {
        return Some(a.clone());
    }
    // Union is commutative; normalize the key so (a, b) and (b, a) share it.
    let key = if node_id(a) <= node_id(b) { pair_key(a, b) } else { pair_key(b, a) };
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        union_nodes(a.target_for_digit(d as u32), b.target_for_digit(d as u32), memo)
    });
    let result = node_from_digit_targets(a.can_terminate() || b.can_terminate(), targets);
    memo.insert(key, result.clone());
    result
}

fn intersect_nodes(
    a: Option<&NodeRef>,
    b: Option<&NodeRef>,
    memo: &mut PairMemo,
) -> Option<NodeRef> {
    let (Some(a), Some(b)) = (a, b) else { return None };
    if std::sync::Arc::ptr_eq(a, b) {
        return Some(a.clone());
    }
    let key = if node_id(a) <= node_id(b) { pair_key(a, b) } else { pair_key(b, a) };
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        intersect_nodes(a.target_for_digit(d as u32), b.target_for_digit(d as u32), memo)
    });
    let result = node_from_digit_targets(a.can_terminate() && b.can_terminate(), targets);
    memo.insert(key, result.clone());
    result
}

fn subtract_nodes(
    a: Option<&NodeRef>,
    b: Option<&NodeRef>,
    memo: &mut PairMemo,
) -> Option<NodeRef> {
    let Some(a) = a else { return None };
    let Some(b) = b else { return Some(a.clone()) };
    if std::sync::Arc::ptr_eq(a, b) {
        return None;
    }
    let key = pair_key(a, b);
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        subtract_nodes(a.target_for_digit(d as u32), b.target_for_digit(d as u32), memo)
    });
    let result =
        node_from_digit_targets(a.can_terminate() && !b.can_terminate(), targets);
    memo.insert(key, result.clone());
    result
}

fn contains_all_nodes(
    a: Option<&NodeRef>,
    b: Option<&NodeRef>,
    memo: &mut HashMap<(usize, usize), bool>,
) -> bool {
    let Some(b) = b else { return true };
    let Some(a) = a else { return false };
    if std::sync::Arc::ptr_eq(a, b) {
        return true;
    }
    let key = pair_key(a, b);
    if let Some(&found) = memo.get(&key) {
        return found;
    }
    let result = (!b.can_terminate() || a.can_terminate())
        && (0..10u32).all(|d| match b.target_for_digit(d) {
            Some(tb) => contains_all_nodes(a.target_for_digit(d), Some(tb), memo),
            None => true,
        });
    memo.insert(key, result);
    result
}

pub(crate) fn size_of(node: &NodeRef, memo: &mut HashMap<usize, u64>) -> u64 {
    let key = node_id(node);
    if let Some(&found) = memo.get(&key) {
        return found;
    }
    let mut size = node.can_terminate() as u64;
    for edge in node.edges() {
        size += edge.mask().count_ones() as u64 * size_of(edge.target(), memo);
    }
    memo.insert(key, size);
    size
}

fn lengths_of(node: &NodeRef, memo: &mut HashMap<usize, BTreeSet<usize>>) -> BTreeSet<usize> {
    let key = node_id(node);
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let mut lengths = BTreeSet::new();
    if node.can_terminate() {
        lengths.insert(0);
    }
    for edge in node.edges() {
        lengths.extend(lengths_of(edge.target(), memo).into_iter().map(|l| l + 1));
    }
    memo.insert(key, lengths.clone());
    lengths
}

fn slice_node(
    node: &NodeRef,
    lo: usize,
    hi: usize,
    memo: &mut HashMap<(usize, usize, usize), Option<NodeRef>>,
) -> Option<NodeRef> {
    let can_terminate = node.can_terminate() && lo == 0;
    if hi == 0 {
        return can_terminate.then(terminal);
    }
    let key = (node_id(node), lo, hi);
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let targets = std::array::from_fn(|d| {
        node.target_for_digit(d as u32)
            .and_then(|t| slice_node(t, lo.saturating_sub(1), hi - 1, memo))
    });
    let result = node_from_digit_targets(can_terminate, targets);
    memo.insert(key, result.clone());
    result
}

fn significant_node(
    node: &NodeRef,
    remaining: usize,
    memo: &mut HashMap<(usize, usize), Option<NodeRef>>,
) -> Option<NodeRef> {
    let key = (node_id(node), remaining);
    if let Some(found) = memo.get(&key) {
        return found.clone();
    }
    let result = if remaining == 0 {
        let mut lengths_memo = HashMap::new();
        RangeTree::any_of_lengths(lengths_of(node, &mut lengths_memo)).root
    } else {
        let targets = std::array::from_fn(|d| {
            node.target_for_digit(d as u32)
                .and_then(|t| significant_node(t, remaining - 1, memo))
        });
        node_from_digit_targets(node.can_terminate(), targets)
    };
    memo.insert(key, result.clone());
    result
}

fn collect_specs(node: &NodeRef, stack: &mut Vec<u16>, out: &mut Vec<RangeSpecification>) {
    if node.can_terminate() {
        out.push(RangeSpecification::from_masks(stack.clone()));
    }
    for edge in node.edges() {
        stack.push(edge.mask());
        collect_specs(edge.target(), stack, out);
        stack.pop();
    }
}
