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
use std::sync::Arc;

use log::error;
use regex::Regex;

use crate::digit_sequence::DigitSequence;
use crate::matcher::MatchResult;
use crate::rangetree::{NodeRef, RangeTree, intern, node_id};
use crate::regex_util::RegexFullMatch;
use crate::regexgen::RegexGenerator;
use crate::regexp_cache::RegexCache;

/// Matches digit sequences through the generated regex of a range instead of
/// its bytecode. Slower and bigger, but exercises the whole regex pipeline;
/// the test suites and benches use it as the reference the bytecode matcher
/// is held against.
///
/// Classification needs two patterns: the range itself and the language of
/// its viable prefixes (inputs the range can still extend to a match).
pub struct RegexBasedMatcher {
    full: Option<Arc<Regex>>,
    viable: Option<Arc<Regex>>,
}

impl RegexBasedMatcher {
    pub fn for_tree(cache: &RegexCache, generator: &RegexGenerator, tree: &RangeTree) -> Self {
        RegexBasedMatcher {
            full: anchored(cache, generator, tree),
            viable: anchored(cache, generator, &viable_prefixes(tree)),
        }
    }

    pub fn matches(&self, seq: &DigitSequence) -> bool {
        self.classify(seq) == MatchResult::Matched
    }

    /// Mirrors the bytecode interpreter's classification exactly, including
    /// its preference for `Invalid` when the failing state still had other
    /// continuations.
    pub fn classify(&self, seq: &DigitSequence) -> MatchResult {
        let Some(full) = &self.full else {
            // The empty range: no digit is ever consumed.
            return if seq.len() == 0 { MatchResult::TooShort } else { MatchResult::Invalid };
        };
        let text = seq.to_string();
        if full.full_match(&text) {
            return MatchResult::Matched;
        }
        if self.is_viable(&text) {
            return MatchResult::TooShort;
        }
        // The input left the range at some digit. Find the longest live
        // prefix: overran only if that prefix was a complete match with no
        // continuation.
        for end in (0..text.len()).rev() {
            let prefix = &text[..end];
            let in_viable = self.is_viable(prefix);
            let in_full = full.full_match(prefix);
            if in_full && !in_viable {
                return MatchResult::TooLong;
            }
            if in_full || in_viable {
                return MatchResult::Invalid;
            }
        }
        MatchResult::Invalid
    }

    fn is_viable(&self, text: &str) -> bool {
        self.viable.as_ref().is_some_and(|v| v.full_match(text))
    }
}

fn anchored(
    cache: &RegexCache,
    generator: &RegexGenerator,
    tree: &RangeTree,
) -> Option<Arc<Regex>> {
    let pattern = generator.generate(tree).ok()?;
    match cache.get_regex(&format!("^(?:{})$", pattern)) {
        Ok(regex) => Some(regex),
        Err(err) => {
            error!("Invalid regex! {}: {}", pattern, err);
            None
        }
    }
}

/// The language of proper prefixes of `tree` that can still be extended to a
/// member: every path to a state with outgoing edges. In the canonical DFA
/// every state leads to acceptance, so reachability is viability.
fn viable_prefixes(tree: &RangeTree) -> RangeTree {
    fn rebuild(node: &NodeRef, memo: &mut HashMap<usize, Option<NodeRef>>) -> Option<NodeRef> {
        if node.edges().is_empty() {
            return None;
        }
        if let Some(found) = memo.get(&node_id(node)) {
            return found.clone();
        }
        let edges = node
            .edges()
            .iter()
            .filter_map(|e| rebuild(e.target(), memo).map(|t| crate::rangetree::edge(e.mask(), t)))
            .collect::<Vec<_>>();
        let result = Some(intern(true, edges));
        memo.insert(node_id(node), result.clone());
        result
    }
    match tree.root() {
        Some(root) => RangeTree::from_root(rebuild(root, &mut HashMap::new())),
        None => RangeTree::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::DigitSequenceMatcher;

    fn seq(s: &str) -> DigitSequence {
        s.parse().unwrap()
    }

    fn tree(patterns: &[&str]) -> RangeTree {
        patterns.iter().fold(RangeTree::empty(), |acc, p| {
            acc.union(&RangeTree::from_pattern(p).unwrap())
        })
    }

    #[test]
    fn viable_prefixes_are_the_extendable_inputs() {
        let v = viable_prefixes(&tree(&["12x", "15"]));
        assert!(v.contains(&seq("")));
        assert!(v.contains(&seq("1")));
        assert!(v.contains(&seq("12")));
        assert!(!v.contains(&seq("15")));
        assert!(!v.contains(&seq("123")));
    }

    #[test]
    fn agrees_with_the_bytecode_matcher() {
        let trees = [
            tree(&["11[2-7]xxx"]),
            tree(&["1", "13", "13x"]),
            tree(&["12xxx", "1[3-5]xx", "9xx"]),
            RangeTree::empty(),
            RangeTree::matching_empty(),
        ];
        let cache = RegexCache::with_capacity(16);
        let generator = RegexGenerator::new().with_tail_optimization();
        for t in &trees {
            let by_regex = RegexBasedMatcher::for_tree(&cache, &generator, t);
            let by_bytecode = DigitSequenceMatcher::for_tree(t);
            assert_eq!(by_regex.classify(&seq("")), by_bytecode.classify(&seq("")));
            for value in 0..20_000u64 {
                let s = seq(&value.to_string());
                assert_eq!(
                    by_regex.classify(&s),
                    by_bytecode.classify(&s),
                    "{:?} on {}",
                    t,
                    s
                );
            }
        }
    }
}
