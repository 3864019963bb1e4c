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

use std::collections::BTreeSet;

use crate::errors::MetadataError;
use crate::range_key::{RangeKey, check_disjoint};
use crate::range_specification::RangeSpecification;
use crate::rangetree::RangeTree;

use super::tree;

fn key(prefix: &str, lengths: &[usize]) -> RangeKey {
    RangeKey::new(
        RangeSpecification::parse(prefix).unwrap(),
        lengths.iter().copied().collect(),
    )
    .unwrap()
}

#[test]
fn decomposition_reproduces_the_tree() {
    let trees = [
        tree(&["12xxx", "1[3-5]xx", "13", "9xx"]),
        tree(&["1xx", "13"]),
        RangeTree::any(3),
        tree(&["0800xxx", "0800xxxxx"]),
    ];
    for t in &trees {
        let keys = RangeKey::decompose(t);
        let rebuilt = keys
            .iter()
            .map(RangeKey::as_range_tree)
            .fold(RangeTree::empty(), |acc, k| acc.union(&k));
        assert_eq!(rebuilt, *t);
        check_disjoint(&keys).expect("decomposed keys must not overlap");
        // Ordered by prefix, then lengths.
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn any_digit_core_is_extracted_at_the_shortest_prefix() {
    // The digit-3 branch of the any-digit edge carries an extra length-2
    // range; the uniform core stays one key at prefix "1".
    let t = tree(&["1xx", "13"]);
    assert_eq!(RangeKey::decompose(&t), vec![key("1", &[3]), key("13", &[2])]);
}

#[test]
fn pure_any_tree_is_a_single_empty_prefix_key() {
    let t = RangeTree::any_of_lengths([2, 4]);
    assert_eq!(RangeKey::decompose(&t), vec![key("", &[2, 4])]);
}

#[test]
fn length_variants_share_a_key() {
    let t = tree(&["0800xxx", "0800xxxxx"]);
    assert_eq!(RangeKey::decompose(&t), vec![key("0800", &[7, 9])]);
}

#[test]
fn key_expansion() {
    let k = key("123", &[3, 4, 5]);
    let expanded: Vec<String> = k.as_specifications().iter().map(|s| s.to_string()).collect();
    assert_eq!(expanded, vec!["123", "123x", "123xx"]);
    assert_eq!(k.as_range_tree(), tree(&["123", "123x", "123xx"]));
}

#[test]
fn key_validation() {
    assert!(RangeKey::new(RangeSpecification::parse("12x").unwrap(), BTreeSet::from([4])).is_err());
    assert!(RangeKey::new(RangeSpecification::parse("12").unwrap(), BTreeSet::from([1])).is_err());
    assert!(RangeKey::new(RangeSpecification::parse("12").unwrap(), BTreeSet::new()).is_err());
    assert!(RangeKey::new(RangeSpecification::parse("12").unwrap(), BTreeSet::from([19])).is_err());
}

#[test]
fn key_rendering() {
    let k = key("0[2-4]", &[4, 7, 9, 10, 11, 12]);
    assert_eq!(k.format_lengths(), "4,7,9-12");
    assert_eq!(k.to_string(), "\"0[2-4]\",\"4,7,9-12\"");
}

#[test]
fn key_parsing_round_trips() {
    let k = key("0[2-4]", &[4, 7, 9, 10, 11, 12]);
    assert_eq!(k.to_string().parse::<RangeKey>().unwrap(), k);
    assert_eq!("\"123\",\"5\"".parse::<RangeKey>().unwrap(), key("123", &[5]));
    assert!("0[2-4],4".parse::<RangeKey>().is_err());
    assert!("\"12\",\"4-3\"".parse::<RangeKey>().is_err());
    assert!("\"12\",\"three\"".parse::<RangeKey>().is_err());
    assert!("\"1y\",\"4\"".parse::<RangeKey>().is_err());
}

#[test]
fn metadata_checks_flag_bad_rows() {
    use crate::errors::{check_example_number, check_lengths};

    let t = tree(&["0800xxx", "0800xxxxx"]);
    check_example_number(&t, &"0800123".parse().unwrap()).unwrap();
    assert!(matches!(
        check_example_number(&t, &"08001234".parse().unwrap()),
        Err(MetadataError::ExampleNumberOutOfRange { .. })
    ));

    check_lengths(&t, &BTreeSet::from([7, 9])).unwrap();
    assert!(matches!(
        check_lengths(&t, &BTreeSet::from([7, 8, 9])),
        Err(MetadataError::LengthMismatch { .. })
    ));
}

#[test]
fn overlapping_keys_are_reported() {
    let keys = vec![key("1", &[3]), key("1[2-4]", &[3])];
    match check_disjoint(&keys) {
        Err(MetadataError::OverlappingRanges { first, second }) => {
            assert!(first.contains("\"1\""));
            assert!(second.contains("1[2-4]"));
        }
        other => panic!("expected an overlap, got {:?}", other),
    }
}
