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

//! Rendering range trees back into compact regular expressions: an exact
//! textual form of the same language, for consumers that speak regex rather
//! than range trees. Several rewrite strategies compete and the shortest
//! result wins.

mod converter;
mod edge;
mod flattener;
mod subgroup;
mod tail;
mod writer;

use log::debug;

use crate::factorizer::{MergeStrategy, RangeTreeFactorizer};
use crate::rangetree::{NodeRef, RangeTree, RangeTreeError};

use converter::RangeTreeConverter;
use edge::Edge;
use flattener::NfaFlattener;
use subgroup::SubgroupOptimizer;
use tail::TrailingPathOptimizer;

/// Generates a regex matching exactly the sequences of a range tree.
///
/// The plain rendering is always produced; each enabled strategy adds a
/// candidate and [`RegexGenerator::generate`] keeps the shortest. All
/// candidates describe the same language, so the choice is purely textual.
#[derive(Debug, Clone, Default)]
pub struct RegexGenerator {
    dot_match: bool,
    dfa_factorization: bool,
    subgroup_optimization: bool,
    tail_optimization: bool,
}

impl RegexGenerator {
    pub fn new() -> Self {
        RegexGenerator::default()
    }

    /// Writes the any-digit class as `.` instead of `\d`, for use on input
    /// already known to be all digits.
    pub fn with_dot_match(mut self) -> Self {
        self.dot_match = true;
        self
    }

    /// Adds a candidate that renders the tree as an alternation of simple
    /// factors (prefix plus trailing any-digit lengths).
    pub fn with_dfa_factorization(mut self) -> Self {
        self.dfa_factorization = true;
        self
    }

    /// Adds a candidate that writes the most-shared sub-tree once, as
    /// `prefix(?:suffix)|bypass`.
    pub fn with_subgroup_optimization(mut self) -> Self {
        self.subgroup_optimization = true;
        self
    }

    /// Factors common trailing elements out of alternations in every
    /// candidate, e.g. `12x|34x` into `(?:12|34)x`.
    pub fn with_tail_optimization(mut self) -> Self {
        self.tail_optimization = true;
        self
    }

    /// The shortest regex among the enabled strategies. The empty tree has
    /// no regex (no pattern matches nothing against every input length).
    pub fn generate(&self, tree: &RangeTree) -> Result<String, RangeTreeError> {
        let root = tree.root().ok_or(RangeTreeError::EmptyTree)?;
        let mut candidates = vec![self.render(root, true)];
        if self.dfa_factorization {
            let factors = RangeTreeFactorizer::factor(tree, MergeStrategy::AllowEdgeSplitting);
            let rendered: Vec<String> = factors
                .iter()
                .filter_map(|f| f.root().map(|r| self.render(r, factors.len() == 1)))
                .collect();
            candidates.push(rendered.join("|"));
        }
        if self.subgroup_optimization {
            if let Some(split) = SubgroupOptimizer::split(tree) {
                let mut parts = Vec::new();
                if let (Some(p), Some(s)) = (split.prefix.root(), split.suffix.root()) {
                    parts.push(format!("{}{}", self.render_part(p), self.render_part(s)));
                }
                if let Some(b) = split.bypass.root() {
                    parts.push(self.render(b, false));
                }
                candidates.push(parts.join("|"));
            }
        }
        let best = candidates
            .into_iter()
            .min_by_key(String::len)
            .unwrap_or_default();
        debug!("generated regex of {} byte(s)", best.len());
        Ok(best)
    }

    fn edge_for(&self, root: &NodeRef) -> Edge {
        let edge = NfaFlattener::flatten(RangeTreeConverter::to_nfa_graph(root));
        if self.tail_optimization { TrailingPathOptimizer::optimize(edge) } else { edge }
    }

    fn render(&self, root: &NodeRef, top_level: bool) -> String {
        let writer = writer::EdgeWriter::new(self.dot_match);
        let edge = self.edge_for(root);
        if top_level { writer.write(&edge) } else { writer.write_nested(&edge) }
    }

    /// Renders one side of a subgroup split, grouped so the two sides
    /// concatenate cleanly.
    fn render_part(&self, root: &NodeRef) -> String {
        self.render(root, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digit_sequence::DigitSequence;
    use crate::regexp_cache::RegexCache;
    use crate::regex_util::RegexFullMatch;

    fn tree(patterns: &[&str]) -> RangeTree {
        patterns.iter().fold(RangeTree::empty(), |acc, p| {
            acc.union(&RangeTree::from_pattern(p).unwrap())
        })
    }

    fn assert_exact(generator: &RegexGenerator, t: &RangeTree) {
        let cache = RegexCache::with_capacity(16);
        let pattern = generator.generate(t).unwrap();
        let regex = cache.get_regex(&format!("^(?:{})$", pattern)).unwrap();
        // Compare against tree membership over a sweep of short inputs.
        for value in 0..20_000u64 {
            let text = value.to_string();
            let seq: DigitSequence = text.parse().unwrap();
            assert_eq!(
                regex.full_match(&text),
                t.contains(&seq),
                "pattern {} input {}",
                pattern,
                text
            );
        }
    }

    #[test]
    fn renders_simple_ranges() {
        let generator = RegexGenerator::new();
        assert_eq!(generator.generate(&tree(&["1[2-5]xxx"])).unwrap(), "1[2-5]\\d{3}");
        assert_eq!(
            generator.generate(&tree(&["123", "123x", "123xx"])).unwrap(),
            "123\\d{0,2}"
        );
    }

    #[test]
    fn dot_match_uses_dots() {
        let generator = RegexGenerator::new().with_dot_match();
        assert_eq!(generator.generate(&tree(&["1[2-5]xxx"])).unwrap(), "1[2-5].{3}");
    }

    #[test]
    fn every_strategy_is_exact() {
        let trees = [
            tree(&["12xxx", "1[3-5]xx", "13", "9xx"]),
            tree(&["12[2-5]x", "34[2-5]x", "56[2-5]x", "9"]),
            tree(&["1xx", "13"]),
        ];
        let generators = [
            RegexGenerator::new(),
            RegexGenerator::new().with_tail_optimization(),
            RegexGenerator::new().with_dfa_factorization(),
            RegexGenerator::new().with_subgroup_optimization(),
            RegexGenerator::new()
                .with_dfa_factorization()
                .with_subgroup_optimization()
                .with_tail_optimization(),
        ];
        for t in &trees {
            for generator in &generators {
                assert_exact(generator, t);
            }
        }
    }

    #[test]
    fn empty_tree_has_no_regex() {
        assert_eq!(
            RegexGenerator::new().generate(&RangeTree::empty()),
            Err(RangeTreeError::EmptyTree)
        );
    }

    #[test]
    fn shortest_candidate_wins() {
        let t = tree(&["12[2-5]xx", "34[2-5]xx", "56[2-5]xx"]);
        let plain = RegexGenerator::new().generate(&t).unwrap();
        let optimized = RegexGenerator::new()
            .with_subgroup_optimization()
            .with_tail_optimization()
            .generate(&t)
            .unwrap();
        assert!(optimized.len() <= plain.len());
    }
}
