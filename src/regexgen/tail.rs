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

use super::edge::Edge;
use super::flattener::NfaFlattener;

/// Factors the common trailing elements out of alternations, turning
/// `12x|34x|56x` into `(?:12|34|56)x`. Works on flattened expressions and
/// leaves them flattened.
pub(crate) struct TrailingPathOptimizer;

impl TrailingPathOptimizer {
    pub(crate) fn optimize(edge: Edge) -> Edge {
        rewrite(edge)
    }
}

fn rewrite(edge: Edge) -> Edge {
    match edge {
        Edge::Simple(mask) => Edge::Simple(mask),
        Edge::Sequence(elems) => {
            NfaFlattener::flatten(Edge::Sequence(elems.into_iter().map(rewrite).collect()))
        }
        Edge::Group { alternatives, optional } => {
            let lists: Vec<Vec<Edge>> = alternatives
                .into_iter()
                .map(|alt| rewrite(alt).into_elements())
                .collect();
            let shared = common_suffix_len(&lists);
            if shared == 0 {
                return NfaFlattener::flatten(Edge::Group {
                    alternatives: lists.into_iter().map(Edge::Sequence).collect(),
                    optional,
                });
            }
            // Factoring distributes over optionality: (?:AB|CB)? is
            // (?:(?:A|C)B)? only when B itself cannot be empty, which holds
            // here since the suffix is made of concrete elements.
            let mut suffix = Vec::new();
            let mut heads = Vec::new();
            for mut list in lists {
                let tail = list.split_off(list.len() - shared);
                if suffix.is_empty() {
                    suffix = tail;
                }
                heads.push(Edge::Sequence(list));
            }
            let head = NfaFlattener::flatten(Edge::Group { alternatives: heads, optional: false });
            let mut elems = head.into_elements();
            elems.extend(suffix);
            let factored = NfaFlattener::flatten(Edge::Sequence(elems));
            if optional {
                NfaFlattener::flatten(Edge::Group { alternatives: vec![factored], optional: true })
            } else {
                factored
            }
        }
    }
}

/// Longest suffix of elements shared by every list, capped so that at least
/// one element of the shortest list remains as a head.
fn common_suffix_len(lists: &[Vec<Edge>]) -> usize {
    let Some(first) = lists.first() else { return 0 };
    if lists.len() < 2 {
        return 0;
    }
    let max = lists.iter().map(Vec::len).min().unwrap_or(0).saturating_sub(1);
    let mut shared = 0;
    while shared < max {
        let candidate = &first[first.len() - 1 - shared];
        if lists[1..]
            .iter()
            .all(|list| &list[list.len() - 1 - shared] == candidate)
        {
            shared += 1;
        } else {
            break;
        }
    }
    shared
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(masks: &[u16]) -> Edge {
        Edge::Sequence(masks.iter().map(|&m| Edge::Simple(m)).collect())
    }

    #[test]
    fn factors_a_shared_trailing_element() {
        let edge = Edge::Group {
            alternatives: vec![seq(&[1, 2, 0x3FF]), seq(&[4, 8, 0x3FF])],
            optional: false,
        };
        let expected = Edge::Sequence(vec![
            Edge::Group {
                alternatives: vec![seq(&[1, 2]), seq(&[4, 8])],
                optional: false,
            },
            Edge::Simple(0x3FF),
        ]);
        assert_eq!(TrailingPathOptimizer::optimize(edge), expected);
    }

    #[test]
    fn leaves_disjoint_tails_alone() {
        let edge = Edge::Group {
            alternatives: vec![seq(&[1, 2]), seq(&[4, 8])],
            optional: false,
        };
        assert_eq!(TrailingPathOptimizer::optimize(edge.clone()), edge);
    }
}
