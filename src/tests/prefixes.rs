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

use crate::prefix_tree::PrefixTree;
use crate::rangetree::RangeTree;

use super::tree;

#[test]
fn from_ranges_strips_trailing_any_digits() {
    let p = PrefixTree::from_ranges(&tree(&["12xxx", "1[3-5]xx", "9"]));
    assert_eq!(p.as_range_tree(), &tree(&["12", "1[3-5]", "9"]));
}

#[test]
fn minimal_prefers_the_shortest_deciding_prefix() {
    // "12" already separates 123x from everything excluded; 456x needs all
    // three digits because 459x contests the first two.
    let include = tree(&["123x", "456x"]);
    let exclude = tree(&["13xx", "459x"]);
    let p = PrefixTree::minimal(&include, &exclude, 0);
    assert_eq!(p.as_range_tree(), &tree(&["12", "456"]));
}

#[test]
fn minimal_ignores_excludes_inside_the_include_region() {
    // The exclude is wholly contained, so splitting further could never
    // carve it out; the prefix stops immediately.
    let include = tree(&["1xxx"]);
    let exclude = tree(&["12xx"]);
    let p = PrefixTree::minimal(&include, &exclude, 0);
    assert_eq!(p.as_range_tree(), &tree(&["1"]));
}

#[test]
fn minimal_honors_the_length_floor() {
    let include = tree(&["123x"]);
    let p = PrefixTree::minimal(&include, &RangeTree::empty(), 2);
    assert_eq!(p.as_range_tree(), &tree(&["12"]));
    // The floor never pushes past a complete include sequence.
    let short = tree(&["1", "29x"]);
    let floored = PrefixTree::minimal(&short, &RangeTree::empty(), 3);
    assert_eq!(floored.as_range_tree(), &tree(&["1", "29x"]));
}

#[test]
fn retain_keeps_ranges_under_the_prefixes() {
    let p = PrefixTree::from_ranges(&tree(&["12", "9"]));
    let t = tree(&["12xxx", "13xxx", "9", "98x"]);
    assert_eq!(p.retain_from(&t), tree(&["12xxx", "9", "98x"]));
}

#[test]
fn empty_prefix_tree_retains_nothing() {
    let p = PrefixTree::from_ranges(&RangeTree::empty());
    assert!(p.is_empty());
    assert!(p.retain_from(&tree(&["12x"])).is_empty());
}
