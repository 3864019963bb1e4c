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

//! The compact matcher bytecode format.
//!
//! A compiled matcher is a flat byte array of instructions, one or two per
//! DFA state, executed from offset zero, one input digit at a time. The
//! layout is fixed and must stay bit-exact if matchers are persisted or
//! shared between implementations.
//!
//! Every instruction starts with a common byte:
//!
//! ```text
//! bit  7 6 5   4      3 2 1 0
//!      opcode  term   payload
//! ```
//!
//! The `term` bit is set when reaching this instruction with no input left
//! means the sequence is complete. Per opcode:
//!
//! * `Terminal` (0): one byte, no transitions; `term` is always set and the
//!   payload is zero. Input left over here means the sequence is too long.
//! * `Single` (1): payload holds the one accepted digit; one jump offset
//!   byte follows.
//! * `Any` (2): payload holds `run length - 1`; consumes 1..=16 digits of a
//!   merged run of any-digit states (the merged-over states never
//!   terminate); one jump offset byte follows.
//! * `Range` (3): payload bit 3 is the *chained* flag, bits 2..0 are zero.
//!   Two mask bytes follow (big endian, low ten bits used), then one jump
//!   offset byte. A digit in the mask consumes and jumps; otherwise, if
//!   chained, execution falls through to the immediately following
//!   instruction, which holds the same state's next transition (and repeats
//!   its `term` bit); if not chained the digit has no transition.
//! * `Mapping` (4): payload holds the jump table entry count `K` (3..=10).
//!   Five nibble-table bytes follow, mapping each digit to a table entry
//!   (digit 0 is the high nibble of the first byte, digit 1 its low nibble,
//!   and so on; `0xF` means no transition), then `K` jump offset bytes.
//!   Entries are numbered in order of first appearance scanning digits 0..9.
//! * `Branch` (5): an unconditional trampoline jump; `term` and payload are
//!   zero and a two byte big-endian offset follows. Consumes no digit.
//!
//! All jump offsets are unsigned and relative to the end of the instruction
//! that holds them (offset 0 is the next instruction). States are laid out
//! so that every jump is forward; when a one-byte offset cannot reach its
//! target the compiler plants a `Branch` after the referencing state's
//! instructions and points the short offset at it.
//!
//! The empty set compiles to a single `Range` with an empty mask: every
//! digit is invalid and no input is too short.

use strum::EnumIter;

/// Shift of the opcode in the instruction's first byte.
pub(crate) const OPCODE_SHIFT: u32 = 5;
/// Termination bit in the instruction's first byte.
pub(crate) const TERM_BIT: u8 = 0x10;
/// Chained-transition flag of a `Range` instruction.
pub(crate) const RANGE_CHAIN_BIT: u8 = 0x08;
/// "No transition" marker in a `Mapping` nibble table.
pub(crate) const MAPPING_NO_ENTRY: u8 = 0xF;

/// Instruction opcodes of the matcher bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[repr(u8)]
pub enum OpCode {
    Terminal = 0,
    Single = 1,
    Any = 2,
    Range = 3,
    Mapping = 4,
    Branch = 5,
}

impl OpCode {
    /// Decodes the opcode from an instruction's first byte. `None` only for
    /// corrupt bytecode; the compiler never emits the spare opcode values.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        Some(match byte >> OPCODE_SHIFT {
            0 => OpCode::Terminal,
            1 => OpCode::Single,
            2 => OpCode::Any,
            3 => OpCode::Range,
            4 => OpCode::Mapping,
            5 => OpCode::Branch,
            _ => return None,
        })
    }

    pub(crate) fn first_byte(self, term: bool, payload: u8) -> u8 {
        debug_assert!(payload <= 0xF);
        ((self as u8) << OPCODE_SHIFT) | if term { TERM_BIT } else { 0 } | payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn opcode_round_trip() {
        for op in OpCode::iter() {
            assert_eq!(OpCode::from_byte(op.first_byte(false, 0)), Some(op));
            assert_eq!(OpCode::from_byte(op.first_byte(true, 0xF)), Some(op));
        }
        assert_eq!(OpCode::from_byte(0b1110_0000), None);
    }
}
