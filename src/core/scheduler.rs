// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Chunked scheduling driver shared by size-constrained backends.
//!
//! A backend whose target cannot hold an arbitrarily large dispatch unit
//! (a bound on case count, function size, or nesting depth) partitions
//! the `pc` address space into fixed-size chunks and emits a two-level
//! dispatcher: `pc / chunk_size` selects the chunk, `pc` selects the
//! block within it. The driver walks the instruction sequence once and
//! announces every boundary; it never reorders, drops, or duplicates an
//! instruction.

use crate::core::inst::Inst;

/// Backend callbacks invoked by [`run_chunked`].
pub trait ChunkSink {
    fn chunk_begin(&mut self, chunk_id: u32);
    fn chunk_end(&mut self);
    fn block_begin(&mut self, pc: u32);
    fn inst(&mut self, inst: &Inst);
}

/// Drive `sink` over `insts`, which must be sorted by non-decreasing `pc`
/// (the parser produces them that way). Returns the chunk count,
/// `last_chunk_id + 1`, or 0 for an empty sequence. `chunk_size` must be
/// positive.
pub fn run_chunked(insts: &[Inst], chunk_size: u32, sink: &mut dyn ChunkSink) -> u32 {
    debug_assert!(chunk_size > 0, "chunk_size must be positive");
    let chunk_size = chunk_size.max(1);

    let mut current_chunk: Option<u32> = None;
    let mut current_pc: Option<u32> = None;
    for inst in insts {
        let chunk_id = inst.pc / chunk_size;
        if current_chunk != Some(chunk_id) {
            if current_chunk.is_some() {
                sink.chunk_end();
            }
            sink.chunk_begin(chunk_id);
            current_chunk = Some(chunk_id);
        }
        if current_pc != Some(inst.pc) {
            sink.block_begin(inst.pc);
            current_pc = Some(inst.pc);
        }
        sink.inst(inst);
    }
    if current_chunk.is_some() {
        sink.chunk_end();
    }
    current_chunk.map_or(0, |chunk_id| chunk_id + 1)
}
