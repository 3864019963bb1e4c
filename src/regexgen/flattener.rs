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

/// Normalizes a raw converted expression: splices nested sequences and
/// alternations, folds epsilon alternatives into optionality, merges digit
/// class alternatives into one class, and sorts alternations into the
/// canonical order. Every later rewrite assumes flattened input.
pub(crate) struct NfaFlattener;

impl NfaFlattener {
    pub(crate) fn flatten(edge: Edge) -> Edge {
        flatten(edge)
    }
}

fn flatten(edge: Edge) -> Edge {
    match edge {
        Edge::Simple(mask) => Edge::Simple(mask),
        Edge::Sequence(elems) => {
            let mut out = Vec::new();
            for elem in elems {
                match flatten(elem) {
                    Edge::Sequence(inner) => out.extend(inner),
                    other => out.push(other),
                }
            }
            if out.len() == 1 { out.swap_remove(0) } else { Edge::Sequence(out) }
        }
        Edge::Group { alternatives, optional } => {
            let mut optional = optional;
            let mut alts = Vec::new();
            let mut class_mask = 0u16;
            for alt in alternatives {
                absorb(flatten(alt), &mut alts, &mut class_mask, &mut optional);
            }
            if class_mask != 0 {
                alts.push(Edge::Simple(class_mask));
            }
            alts.sort();
            alts.dedup();
            match (alts.len(), optional) {
                (0, _) => Edge::epsilon(),
                (1, false) => alts.swap_remove(0),
                _ => Edge::Group { alternatives: alts, optional },
            }
        }
    }
}

/// Adds one flattened alternative to an alternation under construction.
fn absorb(alt: Edge, alts: &mut Vec<Edge>, class_mask: &mut u16, optional: &mut bool) {
    match alt {
        edge if edge.is_epsilon() => *optional = true,
        Edge::Simple(mask) => *class_mask |= mask,
        Edge::Group { alternatives, optional: inner_optional } => {
            // An alternative that is itself an alternation splices in; its
            // optionality hoists to this level.
            *optional |= inner_optional;
            for inner in alternatives {
                absorb(inner, alts, class_mask, optional);
            }
        }
        other => alts.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_digit_class_alternatives() {
        let edge = Edge::Group {
            alternatives: vec![Edge::Simple(0b0010), Edge::Simple(0b1000)],
            optional: false,
        };
        assert_eq!(NfaFlattener::flatten(edge), Edge::Simple(0b1010));
    }

    #[test]
    fn epsilon_alternative_becomes_optionality() {
        let edge = Edge::Group {
            alternatives: vec![
                Edge::epsilon(),
                Edge::Sequence(vec![Edge::Simple(1), Edge::Simple(2)]),
            ],
            optional: false,
        };
        assert_eq!(
            NfaFlattener::flatten(edge),
            Edge::Group {
                alternatives: vec![Edge::Sequence(vec![Edge::Simple(1), Edge::Simple(2)])],
                optional: true,
            }
        );
    }

    #[test]
    fn splices_nested_structure() {
        let edge = Edge::Sequence(vec![
            Edge::Simple(1),
            Edge::Sequence(vec![Edge::Simple(2), Edge::Sequence(vec![Edge::Simple(4)])]),
        ]);
        assert_eq!(
            NfaFlattener::flatten(edge),
            Edge::Sequence(vec![Edge::Simple(1), Edge::Simple(2), Edge::Simple(4)])
        );
    }
}
