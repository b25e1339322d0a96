// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::IrError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Front end for a retargetable 24-bit word VM compiler.

Parses EIR source into a fully resolved module: all labels bound, all
symbolic operands rewritten to concrete addresses, data subsections merged
into one linear memory image. On success nothing is printed; use -d/--dump
to write a listing of the resolved module and --symbols to write the final
symbol table. Reads standard input when INPUT is omitted.";

#[derive(Parser, Debug)]
#[command(
    name = "irForge",
    version = VERSION,
    about = "EIR front end: parse, resolve, and schedule a 24-bit VM program",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select diagnostics output format. text is default; json emits one machine-readable object per diagnostic."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'm',
        long = "split-mem-blocks",
        action = ArgAction::SetTrue,
        long_help = "Give every load/store instruction its own basic block. Must be decided before parsing; backends that trap on memory access rely on it."
    )]
    pub split_mem_blocks: bool,
    #[arg(
        short = 'd',
        long = "dump",
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "",
        long_help = "Write a listing of the resolved module. FILE is optional; when omitted, the listing goes to standard output."
    )]
    pub dump: Option<String>,
    #[arg(
        long = "chunk-size",
        value_name = "N",
        requires = "dump",
        long_help = "Group the --dump listing into scheduler chunks of N pc values each. N must be positive."
    )]
    pub chunk_size: Option<u32>,
    #[arg(
        long = "symbols",
        value_name = "FILE",
        long_help = "Write the final symbol table to FILE, one `name: hex (decimal)` line per symbol."
    )]
    pub symbols_file: Option<PathBuf>,
    #[arg(
        value_name = "INPUT",
        long_help = "EIR source file. Reads standard input when omitted."
    )]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn validate_cli(cli: &Cli) -> Result<(), IrError> {
    if let Some(chunk_size) = cli.chunk_size {
        if chunk_size == 0 {
            return Err(IrError::io("--chunk-size must be positive"));
        }
    }
    Ok(())
}
