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

//! Representation and matching of phone-number digit ranges.
//!
//! Ranges are held as canonical interned DFAs ([`RangeTree`]) closed under
//! set algebra, decomposed into table row keys ([`RangeKey`]), compiled to a
//! compact matcher bytecode ([`DigitSequenceMatcher`]) or rendered back into
//! regular expressions ([`RegexGenerator`]).

pub mod digit_sequence;
pub mod errors;
pub mod factorizer;
pub mod matcher;
pub mod prefix_tree;
pub mod range_key;
pub mod range_specification;
pub mod rangetree;
pub mod regexgen;
mod regex_based_matcher;
mod regexp_cache;
pub(crate) mod regex_util;

pub use digit_sequence::{DigitSequence, DigitSequenceError};
pub use errors::MetadataError;
pub use factorizer::{MergeStrategy, RangeTreeFactorizer};
pub use matcher::{DigitSequenceMatcher, MatchResult, MatcherCompiler};
pub use prefix_tree::PrefixTree;
pub use range_key::{RangeKey, RangeKeyError};
pub use range_specification::{RangeSpecification, RangeSpecificationError};
pub use rangetree::{DfaVisitor, RangeTree, RangeTreeError};
pub use regex_based_matcher::RegexBasedMatcher;
pub use regexgen::RegexGenerator;
pub use regexp_cache::{InvalidRegexError, RegexCache};

#[cfg(test)]
mod tests;
