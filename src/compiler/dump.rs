// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Resolved-module listing output.

use std::io::{self, Write};

use crate::core::inst::Inst;
use crate::core::module::Module;
use crate::core::scheduler::{run_chunked, ChunkSink};

// ChunkSink callbacks cannot return errors; the first write failure is
// parked and re-raised after the walk.
struct ListingSink<'a, W: Write> {
    out: &'a mut W,
    show_chunks: bool,
    error: Option<io::Error>,
}

impl<W: Write> ListingSink<'_, W> {
    fn emit(&mut self, line: String) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            self.error = Some(err);
        }
    }
}

impl<W: Write> ChunkSink for ListingSink<'_, W> {
    fn chunk_begin(&mut self, chunk_id: u32) {
        if self.show_chunks {
            self.emit(format!("chunk {chunk_id}:"));
        }
    }

    fn chunk_end(&mut self) {}

    fn block_begin(&mut self, pc: u32) {
        self.emit(format!("  block {pc}:"));
    }

    fn inst(&mut self, inst: &Inst) {
        self.emit(format!("    {inst}"));
    }
}

/// Write a text listing of the resolved module: the instruction stream
/// grouped by basic block (and by scheduler chunk when `chunk_size` is
/// given), then the data image one word per line.
pub fn write_listing<W: Write>(
    out: &mut W,
    module: &Module,
    chunk_size: Option<u32>,
) -> io::Result<()> {
    writeln!(out, ".text")?;
    let mut sink = ListingSink {
        out,
        show_chunks: chunk_size.is_some(),
        error: None,
    };
    run_chunked(module.text(), chunk_size.unwrap_or(u32::MAX), &mut sink);
    if let Some(err) = sink.error {
        return Err(err);
    }
    writeln!(out, ".data")?;
    for (addr, word) in module.data().iter().enumerate() {
        writeln!(out, "  {:06x}: {:06x} ({})", addr, word, word)?;
    }
    Ok(())
}
