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

use crate::rangetree::{NodeRef, node_id};

use super::edge::Edge;

/// Converts DFA states into the [`Edge`] expression form that the rest of
/// the generator rewrites and renders.
pub(crate) struct RangeTreeConverter;

impl RangeTreeConverter {
    /// The expression for the language rooted at `root`. Shared states are
    /// converted once and their expressions cloned per incoming path, so a
    /// heavily shared sub-tree inflates the output; the subgroup strategy
    /// exists to counter exactly that.
    pub(crate) fn to_nfa_graph(root: &NodeRef) -> Edge {
        convert(root, &mut HashMap::new())
    }
}

fn convert(node: &NodeRef, memo: &mut HashMap<usize, Edge>) -> Edge {
    if let Some(found) = memo.get(&node_id(node)) {
        return found.clone();
    }
    let mut alternatives: Vec<Edge> = node
        .edges()
        .iter()
        .map(|edge| {
            let mut elems = vec![Edge::Simple(edge.mask())];
            elems.extend(convert(edge.target(), memo).into_elements());
            Edge::Sequence(elems)
        })
        .collect();
    let result = match alternatives.len() {
        // The terminal state: only the empty match.
        0 => Edge::epsilon(),
        1 if !node.can_terminate() => alternatives.swap_remove(0),
        // A state that both terminates and continues becomes optional.
        _ => Edge::Group { alternatives, optional: node.can_terminate() },
    };
    memo.insert(node_id(node), result.clone());
    result
}
