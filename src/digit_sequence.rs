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

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// The maximum number of digits in any sequence handled by this library.
/// Eighteen digits is enough for every national significant number and still
/// lets a whole sequence live in a single `u64`.
pub const MAX_DIGITS: usize = 18;

/// Powers of ten up to `10^18`.
const POWERS: [u64; MAX_DIGITS + 1] = {
    let mut powers = [1u64; MAX_DIGITS + 1];
    let mut i = 1;
    while i <= MAX_DIGITS {
        powers[i] = powers[i - 1] * 10;
        i += 1;
    }
    powers
};

/// `SUB_DOMAIN[m]` is the number of digit sequences of length at most `m`,
/// including the empty sequence (i.e. `1 + 10 + 100 + ...`). Used to compute
/// the absolute index of a sequence in the ordered domain of all sequences.
const SUB_DOMAIN: [u64; MAX_DIGITS + 1] = {
    let mut sizes = [1u64; MAX_DIGITS + 1];
    let mut i = 1;
    while i <= MAX_DIGITS {
        sizes[i] = sizes[i - 1] + POWERS[i];
        i += 1;
    }
    sizes
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitSequenceError {
    /// The input contained something other than an ASCII digit.
    #[error("invalid character '{0}' in digit sequence")]
    InvalidCharacter(char),
    /// A sequence would exceed the 18 digit maximum.
    #[error("digit sequence of length {0} exceeds the maximum of {max} digits", max = MAX_DIGITS)]
    TooLong(usize),
    /// A digit outside `0..=9` was supplied programmatically.
    #[error("{0} is not a decimal digit")]
    InvalidDigit(u32),
}

/// An immutable sequence of up to 18 decimal digits, such as the significant
/// digits of a phone number. Unlike a plain integer it preserves leading
/// zeros, so `"047"` and `"47"` are different sequences.
///
/// The total order over sequences is lexicographic string order, so
/// `"0" < "00" < "1"`, which keeps sequences of mixed lengths in the order a
/// range table lists them. Within a single length this coincides with numeric
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSequence {
    length: u8,
    value: u64,
}

impl DigitSequence {
    /// The empty sequence (zero digits).
    pub fn empty() -> Self {
        DigitSequence { length: 0, value: 0 }
    }

    /// A sequence of `n` zeros, e.g. `zeros(3) == "000"`.
    pub fn zeros(n: usize) -> Self {
        assert!(n <= MAX_DIGITS, "sequence length {} out of range", n);
        DigitSequence { length: n as u8, value: 0 }
    }

    /// A sequence of `n` nines, e.g. `nines(3) == "999"`.
    pub fn nines(n: usize) -> Self {
        assert!(n <= MAX_DIGITS, "sequence length {} out of range", n);
        DigitSequence { length: n as u8, value: POWERS[n] - 1 }
    }

    /// The one-digit sequence holding `digit`.
    pub fn singleton(digit: u32) -> Result<Self, DigitSequenceError> {
        if digit > 9 {
            return Err(DigitSequenceError::InvalidDigit(digit));
        }
        Ok(DigitSequence { length: 1, value: digit as u64 })
    }

    /// Parses a string of ASCII digits. The empty string parses to the empty
    /// sequence. Anything that is not an ASCII digit is rejected rather than
    /// normalized; mapping other numbering systems to ASCII is the caller's
    /// business.
    pub fn parse(text: &str) -> Result<Self, DigitSequenceError> {
        let mut value = 0u64;
        let mut length = 0u8;
        for c in text.chars() {
            // Character validation first: byte length says nothing about the
            // digit count for non-ASCII input.
            if !c.is_ascii_digit() {
                return Err(DigitSequenceError::InvalidCharacter(c));
            }
            if length as usize == MAX_DIGITS {
                return Err(DigitSequenceError::TooLong(text.chars().count()));
            }
            value = value * 10 + (c as u64 - '0' as u64);
            length += 1;
        }
        Ok(DigitSequence { length, value })
    }

    /// Number of digits in this sequence.
    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The `i`-th digit (zero based, from the most significant end).
    ///
    /// Panics if `i` is out of bounds; like slice indexing this is a caller
    /// contract, not a recoverable condition.
    pub fn digit(&self, i: usize) -> u32 {
        assert!(i < self.len(), "digit index {} out of bounds for length {}", i, self.len());
        ((self.value / POWERS[self.len() - 1 - i]) % 10) as u32
    }

    /// The first `n` digits of this sequence. Panics if `n > len()`.
    pub fn first(&self, n: usize) -> Self {
        assert!(n <= self.len(), "cannot take first {} digits of {}", n, self);
        DigitSequence { length: n as u8, value: self.value / POWERS[self.len() - n] }
    }

    /// The last `n` digits of this sequence. Panics if `n > len()`.
    pub fn last(&self, n: usize) -> Self {
        assert!(n <= self.len(), "cannot take last {} digits of {}", n, self);
        DigitSequence { length: n as u8, value: self.value % POWERS[n] }
    }

    /// This sequence with one digit appended.
    pub fn extend_by(&self, digit: u32) -> Result<Self, DigitSequenceError> {
        if digit > 9 {
            return Err(DigitSequenceError::InvalidDigit(digit));
        }
        if self.len() >= MAX_DIGITS {
            return Err(DigitSequenceError::TooLong(self.len() + 1));
        }
        Ok(DigitSequence { length: self.length + 1, value: self.value * 10 + digit as u64 })
    }

    /// This sequence with another sequence appended.
    pub fn extend_by_sequence(&self, other: &DigitSequence) -> Result<Self, DigitSequenceError> {
        let total = self.len() + other.len();
        if total > MAX_DIGITS {
            return Err(DigitSequenceError::TooLong(total));
        }
        Ok(DigitSequence {
            length: total as u8,
            value: self.value * POWERS[other.len()] + other.value,
        })
    }

    /// The absolute index of this sequence in the ordered domain of all
    /// sequences of up to 18 digits. The index of a sequence counts every
    /// sequence ordered before it, including all shorter ones, so comparing
    /// indices compares sequences.
    fn domain_index(&self) -> u64 {
        let mut index = 0u64;
        for i in 0..self.len() {
            // Everything strictly before the sub-domain this digit selects,
            // plus one for the prefix ending here.
            index += 1 + self.digit(i) as u64 * SUB_DOMAIN[MAX_DIGITS - 1 - i];
        }
        index
    }

    /// The successor of this sequence in the domain order, or `None` if this
    /// is the greatest sequence (eighteen nines).
    pub fn next(&self) -> Option<Self> {
        if self.len() < MAX_DIGITS {
            // The next sequence after any non-maximal-length sequence is
            // itself with a zero appended ("12" -> "120").
            return Some(DigitSequence { length: self.length + 1, value: self.value * 10 });
        }
        // At maximal length, strip trailing nines and increment.
        let mut length = self.length;
        let mut value = self.value;
        while length > 0 && value % 10 == 9 {
            value /= 10;
            length -= 1;
        }
        if length == 0 {
            return None;
        }
        Some(DigitSequence { length, value: value + 1 })
    }

    /// The predecessor of this sequence in the domain order, or `None` for
    /// the empty sequence.
    pub fn previous(&self) -> Option<Self> {
        if self.length == 0 {
            return None;
        }
        if self.value % 10 == 0 {
            // "120" -> "12".
            return Some(DigitSequence { length: self.length - 1, value: self.value / 10 });
        }
        // Decrement the last digit, then pad with nines out to the maximal
        // length ("13" -> "129999...").
        let mut length = self.len();
        let mut value = self.value - 1;
        while length < MAX_DIGITS {
            value = value * 10 + 9;
            length += 1;
        }
        Some(DigitSequence { length: length as u8, value })
    }
}

impl Ord for DigitSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain_index().cmp(&other.domain_index())
    }
}

impl PartialOrd for DigitSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(self.value);
        for _ in digits.len()..self.len() {
            f.write_str("0")?;
        }
        if self.length > 0 {
            f.write_str(digits)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DigitSequence {
    type Err = DigitSequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DigitSequence::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> DigitSequence {
        DigitSequence::parse(s).unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(seq("").to_string(), "");
        assert_eq!(seq("0").to_string(), "0");
        assert_eq!(seq("0047").to_string(), "0047");
        assert_eq!(seq("123456789012345678").to_string(), "123456789012345678");
        assert!(matches!(
            DigitSequence::parse("12a"),
            Err(DigitSequenceError::InvalidCharacter('a'))
        ));
        assert!(matches!(
            DigitSequence::parse("1234567890123456789"),
            Err(DigitSequenceError::TooLong(19))
        ));
        // Unicode digits are deliberately rejected, including when their
        // UTF-8 encoding runs past the digit limit in bytes.
        assert!(DigitSequence::parse("６").is_err());
        assert!(matches!(
            DigitSequence::parse("１２３４５６７"),
            Err(DigitSequenceError::InvalidCharacter('１'))
        ));
    }

    #[test]
    fn leading_zeros_are_significant() {
        assert_ne!(seq("047"), seq("47"));
        assert_eq!(seq("047").len(), 3);
        assert_eq!(seq("047").digit(0), 0);
        assert_eq!(seq("047").digit(2), 7);
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(seq("0") < seq("00"));
        assert!(seq("00") < seq("1"));
        assert!(seq("") < seq("0"));
        assert!(seq("12") < seq("123"));
        assert!(seq("123") < seq("13"));
        assert!(seq("9") < seq("90"));
        // Same length, numeric order.
        assert!(seq("1000") < seq("4999"));
    }

    #[test]
    fn first_and_last() {
        assert_eq!(seq("1234").first(2), seq("12"));
        assert_eq!(seq("1234").last(2), seq("34"));
        assert_eq!(seq("1234").first(0), DigitSequence::empty());
        assert_eq!(seq("0012").first(3), seq("001"));
    }

    #[test]
    fn extend() {
        assert_eq!(seq("12").extend_by(3).unwrap(), seq("123"));
        assert_eq!(seq("12").extend_by_sequence(&seq("034")).unwrap(), seq("12034"));
        assert!(DigitSequence::nines(MAX_DIGITS).extend_by(1).is_err());
        assert!(seq("1234567890").extend_by_sequence(&seq("123456789")).is_err());
    }

    #[test]
    fn next_and_previous() {
        assert_eq!(DigitSequence::empty().next(), Some(seq("0")));
        assert_eq!(seq("0").next(), Some(seq("00")));
        assert_eq!(seq("12").next(), Some(seq("120")));
        assert_eq!(DigitSequence::nines(MAX_DIGITS).next(), None);
        assert_eq!(DigitSequence::empty().previous(), None);
        assert_eq!(seq("00").previous(), Some(seq("0")));
        assert_eq!(seq("120").previous(), Some(seq("12")));

        // next() and previous() are inverse wherever both are defined.
        for s in ["", "0", "5", "99", "120", "999"] {
            let s = seq(s);
            assert_eq!(s.next().unwrap().previous(), Some(s));
        }
        // And they respect the total order.
        let s = seq("13");
        assert!(s.previous().unwrap() < s);
        assert!(s < s.next().unwrap());
    }

    #[test]
    fn zeros_nines_singleton() {
        assert_eq!(DigitSequence::zeros(3), seq("000"));
        assert_eq!(DigitSequence::nines(2), seq("99"));
        assert_eq!(DigitSequence::singleton(7).unwrap(), seq("7"));
        assert!(DigitSequence::singleton(10).is_err());
    }
}
