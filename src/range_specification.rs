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

use std::fmt;

use thiserror::Error;

use crate::digit_sequence::{DigitSequence, MAX_DIGITS};

/// Bitmask accepting every decimal digit at one position.
pub const ALL_DIGITS_MASK: u16 = 0x3FF;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeSpecificationError {
    #[error("invalid character '{0}' in range specification")]
    InvalidCharacter(char),
    #[error("unterminated digit class in range specification")]
    UnterminatedClass,
    #[error("empty digit class in range specification")]
    EmptyClass,
    #[error("invalid digit range {0}-{1} in range specification")]
    InvalidDigitRange(u32, u32),
    #[error("bitmask {0:#x} is not a valid digit class (expected 1..=0x3ff)")]
    MaskOutOfRange(u16),
    #[error("range specification of length {0} exceeds the maximum of {max} positions", max = MAX_DIGITS)]
    TooLong(usize),
}

/// A pattern describing a set of same-structured digit sequences as one digit
/// class per position, e.g. `"1[2-5]x"` for sequences starting `1`, followed
/// by `2..5`, followed by any digit. Each position is a 10-bit mask with bit
/// `i` set when digit `i` is allowed; masks are never zero.
///
/// Specifications are immutable values ordered by their mask sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeSpecification {
    masks: Vec<u16>,
}

impl RangeSpecification {
    /// The empty specification, matching only the empty digit sequence.
    pub fn empty() -> Self {
        RangeSpecification { masks: Vec::new() }
    }

    /// A specification of `n` any-digit positions, matching every sequence of
    /// length `n`.
    pub fn any(n: usize) -> Self {
        assert!(n <= MAX_DIGITS, "specification length {} out of range", n);
        RangeSpecification { masks: vec![ALL_DIGITS_MASK; n] }
    }

    /// The specification matching exactly one digit sequence.
    pub fn from_sequence(seq: &DigitSequence) -> Self {
        let masks = (0..seq.len()).map(|i| 1u16 << seq.digit(i)).collect();
        RangeSpecification { masks }
    }

    /// Builds a specification from already-validated masks. Internal; the
    /// tree decomposition paths construct masks that are valid by invariant.
    pub(crate) fn from_masks(masks: Vec<u16>) -> Self {
        debug_assert!(masks.len() <= MAX_DIGITS);
        debug_assert!(masks.iter().all(|&m| m != 0 && m <= ALL_DIGITS_MASK));
        RangeSpecification { masks }
    }

    /// A single-position specification from a raw digit class mask.
    pub fn from_mask(mask: u16) -> Result<Self, RangeSpecificationError> {
        check_mask(mask)?;
        Ok(RangeSpecification { masks: vec![mask] })
    }

    /// Parses the textual form: a bare digit matches itself, `x` matches any
    /// digit and `[...]` contains digits and inclusive digit ranges, e.g.
    /// `"12x[0-46-8]"`.
    pub fn parse(text: &str) -> Result<Self, RangeSpecificationError> {
        let mut masks = Vec::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            let mask = match c {
                '0'..='9' => 1u16 << (c as u32 - '0' as u32),
                'x' | 'X' => ALL_DIGITS_MASK,
                '[' => parse_class(&mut chars)?,
                other => return Err(RangeSpecificationError::InvalidCharacter(other)),
            };
            masks.push(mask);
        }
        if masks.len() > MAX_DIGITS {
            return Err(RangeSpecificationError::TooLong(masks.len()));
        }
        Ok(RangeSpecification { masks })
    }

    /// Number of digit positions.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// The digit class mask at position `i`. Panics if out of bounds.
    pub fn bitmask(&self, i: usize) -> u16 {
        self.masks[i]
    }

    /// Iterates the per-position masks in order.
    pub fn masks(&self) -> impl Iterator<Item = u16> + '_ {
        self.masks.iter().copied()
    }

    /// This specification extended by one digit class.
    pub fn extend_by_mask(&self, mask: u16) -> Result<Self, RangeSpecificationError> {
        check_mask(mask)?;
        if self.len() >= MAX_DIGITS {
            return Err(RangeSpecificationError::TooLong(self.len() + 1));
        }
        let mut masks = self.masks.clone();
        masks.push(mask);
        Ok(RangeSpecification { masks })
    }

    /// This specification extended by `n` any-digit positions.
    pub fn extend_by_length(&self, n: usize) -> Result<Self, RangeSpecificationError> {
        let total = self.len() + n;
        if total > MAX_DIGITS {
            return Err(RangeSpecificationError::TooLong(total));
        }
        let mut masks = self.masks.clone();
        masks.extend(std::iter::repeat(ALL_DIGITS_MASK).take(n));
        Ok(RangeSpecification { masks })
    }

    /// This specification with all trailing any-digit positions removed,
    /// e.g. the prefix of `"1[2-5]xx"` is `"1[2-5]"`.
    pub fn prefix(&self) -> Self {
        let end = self
            .masks
            .iter()
            .rposition(|&m| m != ALL_DIGITS_MASK)
            .map_or(0, |i| i + 1);
        RangeSpecification { masks: self.masks[..end].to_vec() }
    }

    /// True when `seq` has the same length and each of its digits is in the
    /// class at its position.
    pub fn matches(&self, seq: &DigitSequence) -> bool {
        seq.len() == self.len()
            && (0..seq.len()).all(|i| self.masks[i] & (1 << seq.digit(i)) != 0)
    }

    /// The smallest digit sequence matched by this specification.
    pub fn min_sequence(&self) -> DigitSequence {
        self.bound_sequence(|mask| mask.trailing_zeros())
    }

    /// The largest digit sequence matched by this specification.
    pub fn max_sequence(&self) -> DigitSequence {
        self.bound_sequence(|mask| 15 - mask.leading_zeros())
    }

    fn bound_sequence(&self, pick: impl Fn(u16) -> u32) -> DigitSequence {
        let mut seq = DigitSequence::empty();
        for &mask in &self.masks {
            // Masks are never zero, so pick() always yields a digit and the
            // length bound was checked at construction.
            seq = seq.extend_by(pick(mask)).expect("specification within digit bounds");
        }
        seq
    }
}

fn check_mask(mask: u16) -> Result<(), RangeSpecificationError> {
    if mask == 0 || mask > ALL_DIGITS_MASK {
        return Err(RangeSpecificationError::MaskOutOfRange(mask));
    }
    Ok(())
}

fn parse_class(chars: &mut std::str::Chars<'_>) -> Result<u16, RangeSpecificationError> {
    let mut mask = 0u16;
    let mut previous: Option<u32> = None;
    let mut pending_range = false;
    while let Some(c) = chars.next() {
        match c {
            ']' => {
                if pending_range {
                    return Err(RangeSpecificationError::UnterminatedClass);
                }
                if mask == 0 {
                    return Err(RangeSpecificationError::EmptyClass);
                }
                return Ok(mask);
            }
            '-' => {
                if previous.is_none() || pending_range {
                    return Err(RangeSpecificationError::InvalidCharacter('-'));
                }
                pending_range = true;
            }
            '0'..='9' => {
                let digit = c as u32 - '0' as u32;
                if pending_range {
                    let lo = previous.expect("range start present");
                    if digit < lo {
                        return Err(RangeSpecificationError::InvalidDigitRange(lo, digit));
                    }
                    for d in lo..=digit {
                        mask |= 1 << d;
                    }
                    pending_range = false;
                    previous = None;
                } else {
                    mask |= 1 << digit;
                    previous = Some(digit);
                }
            }
            other => return Err(RangeSpecificationError::InvalidCharacter(other)),
        }
    }
    Err(RangeSpecificationError::UnterminatedClass)
}

impl fmt::Display for RangeSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &mask in &self.masks {
            write_mask(f, mask)?;
        }
        Ok(())
    }
}

/// Writes one digit class in canonical form: `x` for any digit, a bare digit
/// for singletons, otherwise a bracket class with `a-b` for runs of three or
/// more consecutive digits.
fn write_mask(f: &mut fmt::Formatter<'_>, mask: u16) -> fmt::Result {
    if mask == ALL_DIGITS_MASK {
        return f.write_str("x");
    }
    if mask.count_ones() == 1 {
        return write!(f, "{}", mask.trailing_zeros());
    }
    f.write_str("[")?;
    let mut d = 0u32;
    while d <= 9 {
        if mask & (1 << d) == 0 {
            d += 1;
            continue;
        }
        let start = d;
        while d <= 9 && mask & (1 << d) != 0 {
            d += 1;
        }
        let end = d - 1;
        match end - start {
            0 => write!(f, "{}", start)?,
            1 => write!(f, "{}{}", start, end)?,
            _ => write!(f, "{}-{}", start, end)?,
        }
    }
    f.write_str("]")
}

impl std::str::FromStr for RangeSpecification {
    type Err = RangeSpecificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeSpecification::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> RangeSpecification {
        RangeSpecification::parse(s).unwrap()
    }

    fn seq(s: &str) -> DigitSequence {
        DigitSequence::parse(s).unwrap()
    }

    #[test]
    fn parse_masks() {
        let s = spec("1[2-5]x");
        assert_eq!(s.len(), 3);
        assert_eq!(s.bitmask(0), 0b0000000010);
        assert_eq!(s.bitmask(1), 0b0000111100);
        assert_eq!(s.bitmask(2), ALL_DIGITS_MASK);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!(
            RangeSpecification::parse("1y"),
            Err(RangeSpecificationError::InvalidCharacter('y'))
        ));
        assert!(matches!(
            RangeSpecification::parse("[12"),
            Err(RangeSpecificationError::UnterminatedClass)
        ));
        assert!(matches!(
            RangeSpecification::parse("[]"),
            Err(RangeSpecificationError::EmptyClass)
        ));
        assert!(matches!(
            RangeSpecification::parse("[5-2]"),
            Err(RangeSpecificationError::InvalidDigitRange(5, 2))
        ));
        assert!(RangeSpecification::parse("xxxxxxxxxxxxxxxxxxx").is_err());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(spec("1[2-5]x").to_string(), "1[2-5]x");
        assert_eq!(spec("[23]").to_string(), "[23]");
        assert_eq!(spec("[2-3]").to_string(), "[23]");
        assert_eq!(spec("[0-9]").to_string(), "x");
        assert_eq!(spec("[1357-9]").to_string(), "[1357-9]");
        assert_eq!(RangeSpecification::empty().to_string(), "");
    }

    #[test]
    fn matches_sequences() {
        let s = spec("1[2-5]x");
        assert!(s.matches(&seq("120")));
        assert!(s.matches(&seq("159")));
        assert!(!s.matches(&seq("169")));
        assert!(!s.matches(&seq("12")));
        assert!(!s.matches(&seq("1200")));
    }

    #[test]
    fn prefix_strips_trailing_any() {
        assert_eq!(spec("12xx").prefix(), spec("12"));
        assert_eq!(spec("1x2x").prefix(), spec("1x2"));
        assert_eq!(spec("xxx").prefix(), RangeSpecification::empty());
        assert_eq!(spec("12").prefix(), spec("12"));
    }

    #[test]
    fn extend() {
        assert_eq!(spec("12").extend_by_length(2).unwrap(), spec("12xx"));
        assert_eq!(spec("12").extend_by_mask(0b1100).unwrap(), spec("12[23]"));
        assert!(spec("12").extend_by_mask(0).is_err());
        assert!(RangeSpecification::any(MAX_DIGITS).extend_by_length(1).is_err());
    }

    #[test]
    fn bounds() {
        assert_eq!(spec("1[2-5]x").min_sequence(), seq("120"));
        assert_eq!(spec("1[2-5]x").max_sequence(), seq("159"));
        assert_eq!(RangeSpecification::empty().min_sequence(), DigitSequence::empty());
    }

    #[test]
    fn ordering_by_mask_sequence() {
        assert!(spec("1") < spec("2"));
        assert!(spec("1") < spec("12"));
        assert!(spec("12") < spec("1x"));
    }
}
