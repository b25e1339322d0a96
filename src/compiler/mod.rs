// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Compilation driver - ties the front-end passes together.
//!
//! Source text flows through the lexer and parser, the data serializer
//! merges subsections into one memory image, and the resolver rewrites
//! every symbolic operand. The result is a [`Module`] plus the final
//! symbol table. Any fatal error aborts the whole compilation; no partial
//! module is ever returned.

pub mod cli;
mod dump;
#[cfg(test)]
mod tests;

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use log::debug;

use crate::core::data;
use crate::core::error::IrError;
use crate::core::lexer::Lexer;
use crate::core::module::Module;
use crate::core::parser::{ParseConfig, ParsedProgram, Parser};
use crate::core::resolver;
use crate::core::symbol_table::SymbolTable;

use cli::{validate_cli, Cli};

pub use cli::VERSION;
pub use dump::write_listing;

/// A finished compilation: the resolved module and the symbol table that
/// produced it.
#[derive(Debug)]
pub struct CompileOutput {
    pub module: Module,
    pub symbols: SymbolTable,
}

/// Run the full front-end pipeline over one source text.
pub fn compile_source(
    file: &str,
    source: &str,
    config: ParseConfig,
) -> Result<CompileOutput, IrError> {
    let parser = Parser::new(Lexer::new(file, source), config);
    let parsed = parser.parse()?;
    debug!(
        "parsed {}: {} instructions, {} data cells, {} symbols",
        file,
        parsed.text.len(),
        parsed.data.len(),
        parsed.symbols.len()
    );

    let ParsedProgram {
        text,
        data: cells,
        mut symbols,
    } = parsed;
    let image = data::serialize(&cells, &mut symbols);
    let module = resolver::resolve(text, image, &symbols)?;
    debug!(
        "resolved {}: max pc {}, {} data words",
        file,
        module.max_pc(),
        module.data().len()
    );
    Ok(CompileOutput { module, symbols })
}

/// Entry point for the binary: validate arguments, read the input, run
/// the pipeline, and write any requested outputs.
pub fn run_with_cli(cli: &Cli) -> Result<(), IrError> {
    validate_cli(cli)?;
    let (file, source) = read_input(cli.input.as_deref())?;
    let config = ParseConfig {
        split_mem_blocks: cli.split_mem_blocks,
    };
    let output = compile_source(&file, &source, config)?;

    if let Some(target) = cli.dump.as_deref() {
        emit_dump(target, &output.module, cli.chunk_size)?;
    }
    if let Some(path) = cli.symbols_file.as_deref() {
        emit_symbols(path, &output.symbols)?;
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<(String, String), IrError> {
    match path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .map_err(|err| IrError::io(format!("cannot read {}: {err}", path.display())))?;
            Ok((path.display().to_string(), source))
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|err| IrError::io(format!("cannot read standard input: {err}")))?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

fn emit_dump(target: &str, module: &Module, chunk_size: Option<u32>) -> Result<(), IrError> {
    if target.is_empty() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        dump::write_listing(&mut out, module, chunk_size)
            .map_err(|err| IrError::io(format!("cannot write listing: {err}")))
    } else {
        let mut file = File::create(target)
            .map_err(|err| IrError::io(format!("cannot create {target}: {err}")))?;
        dump::write_listing(&mut file, module, chunk_size)
            .map_err(|err| IrError::io(format!("cannot write {target}: {err}")))
    }
}

fn emit_symbols(path: &Path, symbols: &SymbolTable) -> Result<(), IrError> {
    let mut file = File::create(path)
        .map_err(|err| IrError::io(format!("cannot create {}: {err}", path.display())))?;
    symbols
        .dump(&mut file)
        .and_then(|()| file.flush())
        .map_err(|err| IrError::io(format!("cannot write {}: {err}", path.display())))
}
