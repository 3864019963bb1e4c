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

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::digit_sequence::MAX_DIGITS;
use crate::errors::MetadataError;
use crate::range_specification::RangeSpecification;
use crate::rangetree::{NodeRef, RangeTree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeKeyError {
    #[error("range key prefix '{0}' must not end in an any-digit position")]
    PrefixEndsInAnyDigit(RangeSpecification),
    #[error("range key length {length} is shorter than its prefix '{prefix}'")]
    LengthShorterThanPrefix { prefix: RangeSpecification, length: usize },
    #[error("range key length {0} exceeds the maximum of {max} digits", max = MAX_DIGITS)]
    LengthOutOfRange(usize),
    #[error("range key must have at least one length")]
    NoLengths,
    #[error("malformed range key text '{0}'")]
    MalformedKey(String),
    #[error(transparent)]
    MalformedPrefix(#[from] crate::range_specification::RangeSpecificationError),
}

/// A compact unique row key for a fragment of a range tree: a prefix
/// specification plus the set of total sequence lengths, representing every
/// sequence that starts with the prefix and has one of the lengths. The
/// prefix never ends in an any-digit position (trailing any-digit structure
/// is what the lengths express).
///
/// Keys order by prefix, then by smallest length, which gives range tables a
/// stable row order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeKey {
    prefix: RangeSpecification,
    lengths: BTreeSet<usize>,
}

impl RangeKey {
    pub fn new(
        prefix: RangeSpecification,
        lengths: BTreeSet<usize>,
    ) -> Result<Self, RangeKeyError> {
        if prefix != prefix.prefix() {
            return Err(RangeKeyError::PrefixEndsInAnyDigit(prefix));
        }
        if lengths.is_empty() {
            return Err(RangeKeyError::NoLengths);
        }
        for &length in &lengths {
            if length > MAX_DIGITS {
                return Err(RangeKeyError::LengthOutOfRange(length));
            }
            if length < prefix.len() {
                return Err(RangeKeyError::LengthShorterThanPrefix { prefix, length });
            }
        }
        Ok(RangeKey { prefix, lengths })
    }

    pub fn prefix(&self) -> &RangeSpecification {
        &self.prefix
    }

    pub fn lengths(&self) -> &BTreeSet<usize> {
        &self.lengths
    }

    /// Expands this key to one specification per length, e.g. prefix `123`
    /// with lengths `{3, 4, 5}` yields `123`, `123x`, `123xx`.
    pub fn as_specifications(&self) -> Vec<RangeSpecification> {
        self.lengths
            .iter()
            .map(|&l| {
                self.prefix
                    .extend_by_length(l - self.prefix.len())
                    .expect("lengths validated against maximum")
            })
            .collect()
    }

    /// The set of sequences this key stands for.
    pub fn as_range_tree(&self) -> RangeTree {
        RangeTree::from_specs(self.as_specifications().iter())
    }

    /// Decomposes a range tree into the minimal ordered list of disjoint
    /// keys whose union reproduces it exactly.
    ///
    /// The walk extracts, at every node, the largest any-digit-only core the
    /// node's sub-tree fully contains (splitting edge masks between that core
    /// and the rest where necessary) and emits a key for it at the current
    /// prefix; what remains is recursed into edge by edge. Because the core
    /// is removed before descending, a key is emitted at the first non-any
    /// edge above its trailing any-digit run, or at the root for a tree of
    /// nothing but any-digit positions (a single empty-prefix key).
    pub fn decompose(tree: &RangeTree) -> Vec<RangeKey> {
        let mut by_prefix: BTreeMap<RangeSpecification, BTreeSet<usize>> = BTreeMap::new();
        if let Some(root) = tree.root() {
            let mut path = Vec::new();
            walk(root, &mut path, &mut by_prefix);
        }
        by_prefix
            .into_iter()
            .map(|(prefix, lengths)| RangeKey { prefix, lengths })
            .collect()
    }

    /// Renders the lengths in row-key shorthand, e.g. `4,7,9-12`.
    pub fn format_lengths(&self) -> String {
        let mut out = String::new();
        let mut buf = itoa::Buffer::new();
        let lengths: Vec<usize> = self.lengths.iter().copied().collect();
        let mut i = 0;
        while i < lengths.len() {
            let start = lengths[i];
            let mut end = start;
            while i + 1 < lengths.len() && lengths[i + 1] == end + 1 {
                end = lengths[i + 1];
                i += 1;
            }
            if !out.is_empty() {
                out.push(',');
            }
            out.push_str(buf.format(start));
            if end > start {
                out.push('-');
                out.push_str(buf.format(end));
            }
            i += 1;
        }
        out
    }
}

/// Emits keys for `node`'s sub-tree. `path` holds the edge masks from the
/// root to `node`.
fn walk(
    node: &NodeRef,
    path: &mut Vec<u16>,
    out: &mut BTreeMap<RangeSpecification, BTreeSet<usize>>,
) {
    let tree = RangeTree::from_root(Some(node.clone()));
    // The any-digit lengths this sub-tree fully covers.
    let any_lengths: BTreeSet<usize> = tree
        .lengths()
        .into_iter()
        .filter(|&k| tree.contains_all(&RangeTree::any(k)))
        .collect();
    let mut rest = tree;
    if !any_lengths.is_empty() {
        let prefix = RangeSpecification::from_masks(path.clone());
        // If the last path mask were any-digit, the parent's sole edge was
        // any-digit and its own extraction would have absorbed this core.
        debug_assert!(prefix == prefix.prefix(), "prefix ends in an any-digit position");
        out.entry(prefix)
            .or_default()
            .extend(any_lengths.iter().map(|k| k + path.len()));
        rest = rest.subtract(&RangeTree::any_of_lengths(any_lengths));
    }
    let Some(rest_root) = rest.root() else { return };
    // Termination implies the empty sequence, which is any(0) and was
    // extracted above; the remainder only ever continues downward.
    assert!(!rest_root.can_terminate(), "termination must be part of the any-digit core");
    for edge in rest_root.edges() {
        path.push(edge.mask());
        walk(edge.target(), path, out);
        path.pop();
    }
}

/// Checks that a set of keys describes pairwise disjoint ranges, as table
/// rows must. Returns the first offending pair as a metadata error.
pub fn check_disjoint(keys: &[RangeKey]) -> Result<(), MetadataError> {
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            if !a.as_range_tree().intersect(&b.as_range_tree()).is_empty() {
                return Err(MetadataError::OverlappingRanges {
                    first: a.to_string(),
                    second: b.to_string(),
                });
            }
        }
    }
    Ok(())
}

impl fmt::Display for RangeKey {
    /// The CSV row-key form: `"<prefix>","<length-list>"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\",\"{}\"", self.prefix, self.format_lengths())
    }
}

impl std::str::FromStr for RangeKey {
    type Err = RangeKeyError;

    /// Parses the CSV row-key form produced by `Display`, e.g.
    /// `"0[2-4]","4,7,9-12"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RangeKeyError::MalformedKey(s.to_string());
        let inner = s
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(malformed)?;
        let (prefix_text, lengths_text) = inner.split_once("\",\"").ok_or_else(malformed)?;
        let prefix: RangeSpecification = prefix_text.parse()?;
        RangeKey::new(prefix, parse_lengths(lengths_text)?)
    }
}

fn parse_lengths(text: &str) -> Result<BTreeSet<usize>, RangeKeyError> {
    let mut lengths = BTreeSet::new();
    for part in text.split(',') {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo = parse_length(lo)?;
                let hi = parse_length(hi)?;
                if lo > hi {
                    return Err(RangeKeyError::MalformedKey(part.to_string()));
                }
                if hi > MAX_DIGITS {
                    return Err(RangeKeyError::LengthOutOfRange(hi));
                }
                lengths.extend(lo..=hi);
            }
            None => {
                lengths.insert(parse_length(part)?);
            }
        }
    }
    Ok(lengths)
}

fn parse_length(text: &str) -> Result<usize, RangeKeyError> {
    text.trim()
        .parse()
        .map_err(|_| RangeKeyError::MalformedKey(text.to_string()))
}
