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

use crate::digit_sequence::DigitSequence;
use crate::rangetree::RangeTree;

use super::bytecode::{MAPPING_NO_ENTRY, OpCode, RANGE_CHAIN_BIT, TERM_BIT};
use super::compiler::MatcherCompiler;

/// Outcome of matching a digit sequence against a compiled range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum MatchResult {
    /// The sequence is in the range.
    Matched,
    /// The sequence is a proper prefix of sequences in the range; more
    /// digits could still make a match.
    TooShort,
    /// A strict prefix of the sequence is in the range, but the range has no
    /// continuation for the rest.
    TooLong,
    /// The sequence left the range at some digit; no extension can match.
    Invalid,
}

/// Matches digit sequences against a range compiled to bytecode. A fraction
/// of the size of the equivalent regex automaton and cheap enough to build
/// eagerly for every range in a metadata table.
#[derive(Debug, Clone)]
pub struct DigitSequenceMatcher {
    code: Vec<u8>,
}

impl DigitSequenceMatcher {
    /// Compiles `tree` into a matcher.
    pub fn for_tree(tree: &RangeTree) -> Self {
        DigitSequenceMatcher { code: MatcherCompiler::compile(tree) }
    }

    /// Wraps already-compiled bytecode, e.g. loaded from a build artifact.
    pub fn from_bytes(code: Vec<u8>) -> Self {
        DigitSequenceMatcher { code }
    }

    /// The underlying bytecode.
    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    /// True exactly when the compiled tree contains `seq`.
    pub fn matches(&self, seq: &DigitSequence) -> bool {
        self.classify(seq) == MatchResult::Matched
    }

    /// Runs the bytecode over `seq` and classifies the outcome. Panics on
    /// corrupt bytecode.
    pub fn classify(&self, seq: &DigitSequence) -> MatchResult {
        let code = &self.code;
        let mut pc = 0usize;
        let mut i = 0usize;
        loop {
            let byte = code[pc];
            let op = OpCode::from_byte(byte).expect("corrupt matcher bytecode");
            // Trampolines route control flow and consume nothing.
            if op == OpCode::Branch {
                let offset = u16::from_be_bytes([code[pc + 1], code[pc + 2]]);
                pc += 3 + offset as usize;
                continue;
            }
            if i == seq.len() {
                return if byte & TERM_BIT != 0 { MatchResult::Matched } else { MatchResult::TooShort };
            }
            let digit = seq.digit(i);
            match op {
                OpCode::Terminal => return MatchResult::TooLong,
                OpCode::Single => {
                    if digit != (byte & 0x0F) as u32 {
                        return MatchResult::Invalid;
                    }
                    i += 1;
                    pc += 2 + code[pc + 1] as usize;
                }
                OpCode::Any => {
                    let run = (byte & 0x0F) as usize + 1;
                    if seq.len() - i < run {
                        return MatchResult::TooShort;
                    }
                    i += run;
                    pc += 2 + code[pc + 1] as usize;
                }
                OpCode::Range => {
                    let mask = u16::from_be_bytes([code[pc + 1], code[pc + 2]]);
                    if mask & (1 << digit) != 0 {
                        i += 1;
                        pc += 4 + code[pc + 3] as usize;
                    } else if byte & RANGE_CHAIN_BIT != 0 {
                        // The state's next transition follows immediately.
                        pc += 4;
                    } else {
                        return MatchResult::Invalid;
                    }
                }
                OpCode::Mapping => {
                    let entries = (byte & 0x0F) as usize;
                    let packed = code[pc + 1 + digit as usize / 2];
                    let entry = if digit % 2 == 0 { packed >> 4 } else { packed & 0x0F };
                    if entry == MAPPING_NO_ENTRY {
                        return MatchResult::Invalid;
                    }
                    i += 1;
                    pc += 6 + entries + code[pc + 6 + entry as usize] as usize;
                }
                OpCode::Branch => unreachable!(),
            }
        }
    }
}
