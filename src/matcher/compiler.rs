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

use std::collections::HashMap;

use log::debug;

use crate::range_specification::ALL_DIGITS_MASK;
use crate::rangetree::{NodeRef, RangeTree, node_id};

use super::bytecode::{MAPPING_NO_ENTRY, OpCode, RANGE_CHAIN_BIT};

/// Longest any-digit run a single `Any` instruction can encode.
const MAX_ANY_RUN: u8 = 16;
/// Size of a trampoline `Branch` instruction.
const BRANCH_SIZE: usize = 3;

/// Compiles a range tree into the flat bytecode executed by
/// [`super::DigitSequenceMatcher`]. The output depends only on the tree's
/// structure, so equal trees compile to identical bytes.
pub struct MatcherCompiler;

impl MatcherCompiler {
    pub fn compile(tree: &RangeTree) -> Vec<u8> {
        let Some(root) = tree.root() else {
            // An empty digit class: no digit ever matches and no prefix is a
            // complete sequence. The offset byte is never consulted.
            return vec![OpCode::Range.first_byte(false, 0), 0, 0, 0];
        };
        let blocks = collect_blocks(root);
        let code = layout(&blocks);
        debug!("compiled matcher: {} state(s), {} byte(s)", blocks.len(), code.len());
        code
    }
}

/// All instructions for one DFA state, in execution order (a two-transition
/// state is a chained pair). `target` fields index into the block list.
struct Block {
    instrs: Vec<Instr>,
}

enum Instr {
    Terminal,
    Single { term: bool, digit: u8, target: usize },
    Any { term: bool, count: u8, target: usize },
    Range { term: bool, mask: u16, chained: bool, target: usize },
    Mapping { term: bool, nibbles: [u8; 10], targets: Vec<usize> },
}

impl Instr {
    fn size(&self) -> usize {
        match self {
            Instr::Terminal => 1,
            Instr::Single { .. } | Instr::Any { .. } => 2,
            Instr::Range { .. } => 4,
            Instr::Mapping { targets, .. } => 6 + targets.len(),
        }
    }

    fn targets(&self) -> &[usize] {
        match self {
            Instr::Terminal => &[],
            Instr::Single { target, .. }
            | Instr::Any { target, .. }
            | Instr::Range { target, .. } => std::slice::from_ref(target),
            Instr::Mapping { targets, .. } => targets,
        }
    }
}

/// Builds one block per reachable state in reverse postorder, so that every
/// jump lands on a later block. States skipped by any-digit run merging get
/// no block of their own.
fn collect_blocks(root: &NodeRef) -> Vec<Block> {
    let mut postorder = Vec::new();
    let mut index = HashMap::new();
    assign(root, &mut postorder, &mut index);
    let last = postorder.len() - 1;
    // Reverse the postorder and remap the recorded child indices with it.
    postorder.reverse();
    for block in &mut postorder {
        for instr in &mut block.instrs {
            match instr {
                Instr::Terminal => {}
                Instr::Single { target, .. }
                | Instr::Any { target, .. }
                | Instr::Range { target, .. } => *target = last - *target,
                Instr::Mapping { targets, .. } => {
                    for target in targets {
                        *target = last - *target;
                    }
                }
            }
        }
    }
    postorder
}

/// Emits `node`'s block after all blocks it references (postorder) and
/// returns its postorder index. The DFA is acyclic, so recursion terminates.
fn assign(node: &NodeRef, out: &mut Vec<Block>, index: &mut HashMap<usize, usize>) -> usize {
    if let Some(&found) = index.get(&node_id(node)) {
        return found;
    }
    let term = node.can_terminate();
    let edges = node.edges();
    let instrs = if edges.is_empty() {
        vec![Instr::Terminal]
    } else if edges.len() == 1 {
        let mask = edges[0].mask();
        if mask == ALL_DIGITS_MASK {
            let (count, run_target) = merge_any_run(edges[0].target());
            vec![Instr::Any { term, count, target: assign(&run_target, out, index) }]
        } else {
            vec![transition(term, mask, assign(edges[0].target(), out, index))]
        }
    } else if edges.len() == 2 {
        // First transition chains into the second on a digit outside its
        // mask; the second repeats the state's termination bit.
        vec![
            Instr::Range {
                term,
                mask: edges[0].mask(),
                chained: true,
                target: assign(edges[0].target(), out, index),
            },
            transition(term, edges[1].mask(), assign(edges[1].target(), out, index)),
        ]
    } else {
        let mut nibbles = [MAPPING_NO_ENTRY; 10];
        for (entry, edge) in edges.iter().enumerate() {
            for digit in 0..10 {
                if edge.mask() & (1 << digit) != 0 {
                    nibbles[digit] = entry as u8;
                }
            }
        }
        let targets = edges
            .iter()
            .map(|e| assign(e.target(), out, index))
            .collect();
        vec![Instr::Mapping { term, nibbles, targets }]
    };
    out.push(Block { instrs });
    let ix = out.len() - 1;
    index.insert(node_id(node), ix);
    ix
}

/// A lone transition over `mask`, encoded as the smallest instruction that
/// fits it.
fn transition(term: bool, mask: u16, target: usize) -> Instr {
    if mask.count_ones() == 1 {
        Instr::Single { term, digit: mask.trailing_zeros() as u8, target }
    } else {
        Instr::Range { term, mask, chained: false, target }
    }
}

/// Follows a chain of states that each have a sole any-digit edge and cannot
/// terminate, returning the run length starting at the current state's edge
/// and the state the run lands on.
fn merge_any_run(first_target: &NodeRef) -> (u8, NodeRef) {
    let mut count = 1u8;
    let mut cur = first_target.clone();
    while count < MAX_ANY_RUN && !cur.can_terminate() {
        let edges = cur.edges();
        let [only] = edges else { break };
        if only.mask() != ALL_DIGITS_MASK {
            break;
        }
        cur = only.target().clone();
        count += 1;
    }
    (count, cur)
}

/// Lays the blocks out and resolves jump offsets.
///
/// Short (one byte) offsets may not reach a far target, in which case a
/// trampoline `Branch` is appended after the owning block's instructions.
/// Which jumps need one depends on the final positions, which depend on the
/// trampolines; rather than iterate to a fixed point, the first pass decides
/// pessimistically, comparing each target's worst-case position (every jump
/// trampolined) against the owning instruction's best-case position (no
/// trampolines at all). A jump that fits under those assumptions fits in the
/// final layout too, since trampolines only ever shrink from the worst case.
fn layout(blocks: &[Block]) -> Vec<u8> {
    let n = blocks.len();
    let mut min_start = vec![0usize; n];
    let mut worst_start = vec![0usize; n];
    let mut min_pos = 0;
    let mut worst_pos = 0;
    for (i, block) in blocks.iter().enumerate() {
        min_start[i] = min_pos;
        worst_start[i] = worst_pos;
        let instrs: usize = block.instrs.iter().map(Instr::size).sum();
        let jumps: usize = block.instrs.iter().map(|ins| ins.targets().len()).sum();
        min_pos += instrs;
        worst_pos += instrs + jumps * BRANCH_SIZE;
    }

    // Pessimistic pass: per block, the distinct far targets needing a
    // trampoline, in first-use order.
    let mut trampolines: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, block) in blocks.iter().enumerate() {
        let mut end = 0;
        for instr in &block.instrs {
            end += instr.size();
            for &target in instr.targets() {
                let delta = worst_start[target] - (min_start[i] + end);
                if delta > u8::MAX as usize && !trampolines[i].contains(&target) {
                    trampolines[i].push(target);
                }
            }
        }
    }

    // Exact pass: final positions with only the allocated trampolines.
    let mut start = vec![0usize; n];
    let mut pos = 0;
    for (i, block) in blocks.iter().enumerate() {
        start[i] = pos;
        let instrs: usize = block.instrs.iter().map(Instr::size).sum();
        pos += instrs + trampolines[i].len() * BRANCH_SIZE;
    }

    let mut code = Vec::with_capacity(pos);
    for (i, block) in blocks.iter().enumerate() {
        let instrs_size: usize = block.instrs.iter().map(Instr::size).sum();
        let trampoline_base = start[i] + instrs_size;
        // Offset from the end of an instruction at `end` to its target,
        // through the block's trampoline when one was allocated.
        let jump = |end: usize, target: usize| -> u8 {
            let to = match trampolines[i].iter().position(|&t| t == target) {
                Some(slot) => trampoline_base + slot * BRANCH_SIZE,
                None => start[target],
            };
            u8::try_from(to - end).expect("short jump reaches its target")
        };
        let mut end = start[i];
        for instr in &block.instrs {
            end += instr.size();
            match instr {
                Instr::Terminal => code.push(OpCode::Terminal.first_byte(true, 0)),
                Instr::Single { term, digit, target } => {
                    code.push(OpCode::Single.first_byte(*term, *digit));
                    code.push(jump(end, *target));
                }
                Instr::Any { term, count, target } => {
                    code.push(OpCode::Any.first_byte(*term, count - 1));
                    code.push(jump(end, *target));
                }
                Instr::Range { term, mask, chained, target } => {
                    let payload = if *chained { RANGE_CHAIN_BIT } else { 0 };
                    code.push(OpCode::Range.first_byte(*term, payload));
                    code.extend_from_slice(&mask.to_be_bytes());
                    code.push(jump(end, *target));
                }
                Instr::Mapping { term, nibbles, targets } => {
                    code.push(OpCode::Mapping.first_byte(*term, targets.len() as u8));
                    for pair in nibbles.chunks(2) {
                        code.push((pair[0] << 4) | pair[1]);
                    }
                    for &target in targets {
                        code.push(jump(end, target));
                    }
                }
            }
        }
        for (slot, &target) in trampolines[i].iter().enumerate() {
            let pc = trampoline_base + slot * BRANCH_SIZE;
            let offset = u16::try_from(start[target] - (pc + BRANCH_SIZE))
                .expect("matcher bytecode exceeds the 16-bit jump range");
            code.push(OpCode::Branch.first_byte(false, 0));
            code.extend_from_slice(&offset.to_be_bytes());
        }
    }
    code
}
