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

/// An expression node of the regex under construction: a digit class, a
/// concatenation, or an alternation. The derived ordering keeps generated
/// alternations in a stable order regardless of construction history.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Edge {
    /// One digit class, as a bitmask over digits 0..9.
    Simple(u16),
    /// Concatenation of sub-edges; empty means epsilon.
    Sequence(Vec<Edge>),
    /// Alternation of sub-edges; `optional` admits the empty match as well.
    Group { alternatives: Vec<Edge>, optional: bool },
}

impl Edge {
    pub(crate) fn epsilon() -> Edge {
        Edge::Sequence(Vec::new())
    }

    pub(crate) fn is_epsilon(&self) -> bool {
        matches!(self, Edge::Sequence(elems) if elems.is_empty())
    }

    /// This edge as a list of concatenated elements.
    pub(crate) fn into_elements(self) -> Vec<Edge> {
        match self {
            Edge::Sequence(elems) => elems,
            other => vec![other],
        }
    }
}
