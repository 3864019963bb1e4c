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

use thiserror::Error;

/// Errors signalling inconsistent metadata rather than a bug: the fix is to
/// correct the input data, so each variant carries enough context to locate
/// the offending rows. Contrast with the construction-time domain errors of
/// the individual value types (malformed text, out-of-range masks), which
/// callers hit immediately, and with internal invariant violations, which
/// panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Two range rows overlap but are supposed to partition the number space
    /// (e.g. both claim the same prefix and length for different categories).
    #[error("overlapping ranges in metadata: {first} and {second}")]
    OverlappingRanges { first: String, second: String },

    /// An example number does not belong to the range it is given for.
    #[error("example number '{number}' is outside its claimed range")]
    ExampleNumberOutOfRange { number: String },

    /// A declared length set does not match the lengths actually present in
    /// the ranges it describes.
    #[error("declared lengths {declared:?} do not match range lengths {actual:?}")]
    LengthMismatch {
        declared: BTreeSet<usize>,
        actual: BTreeSet<usize>,
    },
}

/// Validates that `number` is inside `range`, as example-number table checks
/// require.
pub fn check_example_number(
    range: &crate::rangetree::RangeTree,
    number: &crate::digit_sequence::DigitSequence,
) -> Result<(), MetadataError> {
    if !range.contains(number) {
        return Err(MetadataError::ExampleNumberOutOfRange { number: number.to_string() });
    }
    Ok(())
}

/// Validates that `range` contains sequences of exactly the declared lengths.
pub fn check_lengths(
    range: &crate::rangetree::RangeTree,
    declared: &BTreeSet<usize>,
) -> Result<(), MetadataError> {
    let actual = range.lengths();
    if actual != *declared {
        return Err(MetadataError::LengthMismatch { declared: declared.clone(), actual });
    }
    Ok(())
}
