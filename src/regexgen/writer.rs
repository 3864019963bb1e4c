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

use std::fmt::Write;

use crate::range_specification::ALL_DIGITS_MASK;

use super::edge::Edge;

/// Renders a flattened [`Edge`] expression as regex text. With dot matching
/// enabled the any-digit class writes as `.` instead of `\d`, for regex
/// engines applied to already-validated digit strings.
pub(crate) struct EdgeWriter {
    dot_match: bool,
}

impl EdgeWriter {
    pub(crate) fn new(dot_match: bool) -> Self {
        EdgeWriter { dot_match }
    }

    /// Renders `edge` as a complete pattern: a top-level alternation needs
    /// no enclosing group.
    pub(crate) fn write(&self, edge: &Edge) -> String {
        let mut out = String::new();
        self.write_edge(edge, true, &mut out);
        out
    }

    /// Renders `edge` for embedding into a concatenation.
    pub(crate) fn write_nested(&self, edge: &Edge) -> String {
        let mut out = String::new();
        self.write_edge(edge, false, &mut out);
        out
    }

    fn any_token(&self) -> &'static str {
        if self.dot_match { "." } else { "\\d" }
    }

    fn write_edge(&self, edge: &Edge, top_level: bool, out: &mut String) {
        match edge {
            Edge::Simple(mask) => self.write_class(*mask, out),
            Edge::Sequence(elems) => {
                // Runs of any-digit collapse into one quantified token, and
                // a trailing optional any-digit chain extends it to a span.
                let mut i = 0;
                while i < elems.len() {
                    if elems[i] == Edge::Simple(ALL_DIGITS_MASK) {
                        let mut run = 1;
                        while elems.get(i + run) == Some(&Edge::Simple(ALL_DIGITS_MASK)) {
                            run += 1;
                        }
                        if let Some(extent) = elems.get(i + run).and_then(optional_any_extent) {
                            let _ = write!(out, "{}{{{},{}}}", self.any_token(), run, run + extent);
                            i += run + 1;
                            continue;
                        }
                        out.push_str(self.any_token());
                        if run > 1 {
                            let _ = write!(out, "{{{}}}", run);
                        }
                        i += run;
                    } else if let Some(extent) = optional_any_extent(&elems[i]) {
                        let _ = write!(out, "{}{{0,{}}}", self.any_token(), extent);
                        i += 1;
                    } else {
                        self.write_edge(&elems[i], false, out);
                        i += 1;
                    }
                }
            }
            Edge::Group { alternatives, optional } => {
                if let Some(extent) = optional_any_extent(edge) {
                    let _ = write!(out, "{}{{0,{}}}", self.any_token(), extent);
                    return;
                }
                if let Some((lo, hi)) = any_digit_span(alternatives, *optional) {
                    let _ = write!(out, "{}{{{},{}}}", self.any_token(), lo, hi);
                    return;
                }
                let needs_group = *optional || !top_level;
                if needs_group {
                    out.push_str("(?:");
                }
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    self.write_edge(alt, false, out);
                }
                if needs_group {
                    out.push(')');
                }
                if *optional {
                    out.push('?');
                }
            }
        }
    }

    fn write_class(&self, mask: u16, out: &mut String) {
        if mask == ALL_DIGITS_MASK {
            out.push_str(self.any_token());
            return;
        }
        if mask.count_ones() == 1 {
            out.push(digit_char(mask.trailing_zeros()));
            return;
        }
        out.push('[');
        let mut digit = 0u32;
        while digit < 10 {
            if mask & (1 << digit) == 0 {
                digit += 1;
                continue;
            }
            let mut end = digit;
            while end + 1 < 10 && mask & (1 << (end + 1)) != 0 {
                end += 1;
            }
            out.push(digit_char(digit));
            if end > digit + 1 {
                out.push('-');
            }
            if end > digit {
                out.push(digit_char(end));
            }
            digit = end + 1;
        }
        out.push(']');
    }
}

/// When every alternative is a plain run of any-digit positions and the run
/// lengths are contiguous (counting zero if the group is optional), the whole
/// alternation is a single quantified token `\d{lo,hi}`.
fn any_digit_span(alternatives: &[Edge], optional: bool) -> Option<(usize, usize)> {
    let mut lengths: Vec<usize> = alternatives.iter().map(any_digit_len).collect::<Option<_>>()?;
    if optional {
        lengths.push(0);
    }
    lengths.sort_unstable();
    if lengths.windows(2).any(|w| w[1] != w[0] + 1) {
        return None;
    }
    match (lengths.first(), lengths.last()) {
        (Some(&lo), Some(&hi)) if lo < hi => Some((lo, hi)),
        _ => None,
    }
}

/// Recognizes the nested optional chain the converter builds for a run of
/// accept-and-continue any-digit states: a group matching 0..=n any digits.
/// Returns that `n`.
fn optional_any_extent(edge: &Edge) -> Option<usize> {
    let Edge::Group { alternatives, optional: true } = edge else { return None };
    let [alt] = alternatives.as_slice() else { return None };
    match alt {
        Edge::Simple(mask) if *mask == ALL_DIGITS_MASK => Some(1),
        Edge::Sequence(elems) => match elems.as_slice() {
            [Edge::Simple(mask), rest] if *mask == ALL_DIGITS_MASK => {
                optional_any_extent(rest).map(|extent| extent + 1)
            }
            _ => None,
        },
        _ => None,
    }
}

fn any_digit_len(edge: &Edge) -> Option<usize> {
    match edge {
        Edge::Simple(mask) if *mask == ALL_DIGITS_MASK => Some(1),
        Edge::Sequence(elems) => elems
            .iter()
            .map(|e| match e {
                Edge::Simple(mask) if *mask == ALL_DIGITS_MASK => Some(1),
                _ => None,
            })
            .sum(),
        _ => None,
    }
}

fn digit_char(digit: u32) -> char {
    char::from_digit(digit, 10).unwrap_or('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_render_with_ranges() {
        let writer = EdgeWriter::new(false);
        assert_eq!(writer.write(&Edge::Simple(0b0000_0000_0110)), "[12]");
        assert_eq!(writer.write(&Edge::Simple(0b0000_0011_1100)), "[2-5]");
        assert_eq!(writer.write(&Edge::Simple(0b0010_0011_1101)), "[02-59]");
        assert_eq!(writer.write(&Edge::Simple(ALL_DIGITS_MASK)), "\\d");
        assert_eq!(writer.write(&Edge::Simple(0b0001_0000)), "4");
    }

    #[test]
    fn any_runs_are_quantified() {
        let writer = EdgeWriter::new(false);
        let edge = Edge::Sequence(vec![
            Edge::Simple(0b0010),
            Edge::Simple(ALL_DIGITS_MASK),
            Edge::Simple(ALL_DIGITS_MASK),
            Edge::Simple(ALL_DIGITS_MASK),
        ]);
        assert_eq!(writer.write(&edge), "1\\d{3}");
        assert_eq!(EdgeWriter::new(true).write(&edge), "1.{3}");
    }

    #[test]
    fn contiguous_any_alternation_renders_as_a_span() {
        let writer = EdgeWriter::new(false);
        let edge = Edge::Group {
            alternatives: vec![
                Edge::Sequence(vec![Edge::Simple(ALL_DIGITS_MASK); 2]),
                Edge::Sequence(vec![Edge::Simple(ALL_DIGITS_MASK); 3]),
                Edge::Sequence(vec![Edge::Simple(ALL_DIGITS_MASK); 4]),
            ],
            optional: false,
        };
        assert_eq!(writer.write(&edge), "\\d{2,4}");
    }

    #[test]
    fn trailing_optional_chain_renders_as_a_span() {
        let writer = EdgeWriter::new(false);
        // The flattened form of two any digits followed by up to two more.
        let chain = Edge::Group {
            alternatives: vec![Edge::Sequence(vec![
                Edge::Simple(ALL_DIGITS_MASK),
                Edge::Group {
                    alternatives: vec![Edge::Simple(ALL_DIGITS_MASK)],
                    optional: true,
                },
            ])],
            optional: true,
        };
        let edge = Edge::Sequence(vec![
            Edge::Simple(0b0010),
            Edge::Simple(ALL_DIGITS_MASK),
            Edge::Simple(ALL_DIGITS_MASK),
            chain.clone(),
        ]);
        assert_eq!(writer.write(&edge), "1\\d{2,4}");
        assert_eq!(writer.write(&chain), "\\d{0,2}");
    }

    #[test]
    fn optional_groups_always_take_parentheses() {
        let writer = EdgeWriter::new(false);
        let edge = Edge::Group {
            alternatives: vec![Edge::Sequence(vec![Edge::Simple(0b0010), Edge::Simple(0b0100)])],
            optional: true,
        };
        assert_eq!(writer.write(&edge), "(?:12)?");
    }

    #[test]
    fn top_level_alternation_needs_no_group() {
        let writer = EdgeWriter::new(false);
        let edge = Edge::Group {
            alternatives: vec![Edge::Simple(0b0010), Edge::Sequence(vec![Edge::Simple(0b0100); 2])],
            optional: false,
        };
        assert_eq!(writer.write(&edge), "1|22");
        assert_eq!(writer.write_nested(&edge), "(?:1|22)");
    }
}
