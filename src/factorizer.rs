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

use log::trace;

use crate::range_key::RangeKey;
use crate::range_specification::RangeSpecification;
use crate::rangetree::RangeTree;

/// How aggressively [`RangeTreeFactorizer`] may restructure ranges when
/// grouping them into factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Ranges share a factor only when their digit classes are byte-identical
    /// over their whole shared length (so a factor holds length variants of
    /// one shape). Ranges that branch apart stay in separate factors and no
    /// edge is ever divided.
    RequireEqualEdges,
    /// Additionally permits splitting an edge's digit class between factors,
    /// so that a wide class whose continuations differ can contribute its
    /// uniform trailing part to one factor and the special cases to others.
    /// Produces simpler factors at the cost of repeating the leading edges
    /// across them; the union is still exact.
    AllowEdgeSplitting,
}

/// Splits a range tree into several trees whose union reproduces the
/// original but whose individual regex or tabular representations are
/// simpler: every factor is a family of ranges agreeing position by
/// position, differing only in trailing any-digit length.
pub struct RangeTreeFactorizer;

impl RangeTreeFactorizer {
    pub fn factor(tree: &RangeTree, strategy: MergeStrategy) -> Vec<RangeTree> {
        let factors = match strategy {
            MergeStrategy::RequireEqualEdges => factor_equal_edges(tree),
            MergeStrategy::AllowEdgeSplitting => factor_with_splitting(tree),
        };
        trace!("factored tree into {} group(s)", factors.len());
        factors
    }
}

/// Greedy first-fit grouping of the tree's specifications: a specification
/// joins a factor only if it is a position-wise length variant of everything
/// already there.
fn factor_equal_edges(tree: &RangeTree) -> Vec<RangeTree> {
    let mut groups: Vec<Vec<RangeSpecification>> = Vec::new();
    for spec in tree.as_specifications() {
        match groups.iter_mut().find(|g| g.iter().all(|s| length_variants(s, &spec))) {
            Some(group) => group.push(spec),
            None => groups.push(vec![spec]),
        }
    }
    groups
        .iter()
        .map(|group| RangeTree::from_specs(group.iter()))
        .collect()
}

/// With edge splitting, each factor is one decomposed row key: the key
/// decomposition already divides a mask between the uniform any-digit core
/// below it and the remaining special cases, repeating leading edges across
/// the resulting keys where needed.
fn factor_with_splitting(tree: &RangeTree) -> Vec<RangeTree> {
    RangeKey::decompose(tree)
        .iter()
        .map(RangeKey::as_range_tree)
        .collect()
}

/// True when the two specifications carry identical digit classes over their
/// shared length, i.e. they only differ by trailing positions.
fn length_variants(a: &RangeSpecification, b: &RangeSpecification) -> bool {
    let shared = a.len().min(b.len());
    (0..shared).all(|i| a.bitmask(i) == b.bitmask(i))
}
