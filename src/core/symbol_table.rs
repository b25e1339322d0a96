// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Symbol table for label addresses.

use std::collections::HashMap;
use std::io::{self, Write};

/// Name to 24-bit address map.
///
/// Insertion overwrites on duplicate. The parser relies on this to seed a
/// placeholder for `main` and let a real `main:` label replace it later.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, addr: u32) {
        self.entries.insert(name.to_string(), addr);
    }

    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all symbols, sorted by name, as `name: hex (decimal)` lines.
    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        for name in names {
            let val = self.entries[name];
            writeln!(out, "{:<16}: {:06x} ({})", name, val, val)?;
        }
        Ok(())
    }
}
