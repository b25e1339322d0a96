// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Single-pass parser for EIR source.
//!
//! The parser is a state machine over two modes, text and data. Text mode
//! appends instructions grouped into basic blocks by `pc`; data mode
//! appends cells tagged with the current subsection. Label addresses are
//! recorded in the symbol table as they are discovered; symbolic operands
//! stay unresolved until the resolver pass.
//!
//! All parser state lives in this struct. Nothing is process-global, so
//! independent compilations can run side by side.

use crate::core::data::{CellKind, DataCell};
use crate::core::error::{IrError, SourceLoc};
use crate::core::inst::{lookup_mnemonic, Inst, Op, OperandShape, Reg, Value};
use crate::core::lexer::{Lexer, Token, TokenKind};
use crate::core::symbol_table::SymbolTable;

/// Configuration fixed before parsing begins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseConfig {
    /// Give every load/store its own basic block.
    pub split_mem_blocks: bool,
}

/// The unresolved output of one parse: instruction list, data cells in
/// declaration order, and the symbol table with all text labels bound.
#[derive(Debug)]
pub struct ParsedProgram {
    pub text: Vec<Inst>,
    pub data: Vec<DataCell>,
    pub symbols: SymbolTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Data,
}

pub struct Parser {
    lexer: Lexer,
    lookahead: Option<Token>,
    split_mem_blocks: bool,
    mode: Mode,
    subsection: u32,
    pc: u32,
    at_boundary: bool,
    text: Vec<Inst>,
    data: Vec<DataCell>,
    symbols: SymbolTable,
}

impl Parser {
    pub fn new(lexer: Lexer, config: ParseConfig) -> Self {
        let mut parser = Self {
            lexer,
            lookahead: None,
            split_mem_blocks: config.split_mem_blocks,
            mode: Mode::Text,
            subsection: 0,
            pc: 0,
            at_boundary: false,
            text: Vec::new(),
            data: Vec::new(),
            symbols: SymbolTable::new(),
        };
        // Execution always starts by jumping to main, wherever it is
        // declared. The placeholder address is overwritten by a real
        // `main:` label.
        let mut entry = Inst::new(Op::Jmp, 0, 0);
        entry.jmp = Value::Sym("main".to_string());
        parser.text.push(entry);
        parser.pc = 1;
        parser.at_boundary = true;
        parser.symbols.insert("main", 1);
        parser
    }

    pub fn parse(mut self) -> Result<ParsedProgram, IrError> {
        loop {
            let Token { kind, line, col } = self.next_token()?;
            match kind {
                TokenKind::Eof => break,
                TokenKind::Label(name) => self.handle_label(name),
                TokenKind::Ident(name) if name.starts_with('.') => {
                    self.handle_directive(&name, line, col)?
                }
                TokenKind::Ident(name) => self.handle_statement(&name, line, col)?,
                _ => {
                    return Err(self.err_loc(line, col, "expected label, directive, or mnemonic"));
                }
            }
        }
        Ok(ParsedProgram {
            text: self.text,
            data: self.data,
            symbols: self.symbols,
        })
    }

    fn next_token(&mut self) -> Result<Token, IrError> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn err_loc(&self, line: u32, col: u32, message: impl Into<String>) -> IrError {
        IrError::parse(
            SourceLoc {
                file: self.lexer.file().to_string(),
                line,
                col,
            },
            message,
        )
    }

    fn err_at(&self, token: &Token, message: impl Into<String>) -> IrError {
        self.err_loc(token.line, token.col, message)
    }

    fn handle_label(&mut self, name: String) {
        match self.mode {
            Mode::Text => {
                // A label opens a new block unless the previous
                // instruction already closed one.
                if !self.at_boundary {
                    self.pc += 1;
                }
                self.symbols.insert(&name, self.pc);
                self.at_boundary = true;
            }
            Mode::Data => {
                self.data.push(DataCell {
                    subsection: self.subsection,
                    kind: CellKind::Label(name),
                });
            }
        }
    }

    fn handle_directive(&mut self, name: &str, line: u32, col: u32) -> Result<(), IrError> {
        match name {
            ".text" => {
                self.mode = Mode::Text;
                Ok(())
            }
            ".data" => {
                self.mode = Mode::Data;
                let next = self.next_token()?;
                if let TokenKind::Int(subsection) = next.kind {
                    self.subsection = subsection;
                } else {
                    self.lookahead = Some(next);
                    self.subsection = 0;
                }
                Ok(())
            }
            ".long" => {
                if self.mode != Mode::Data {
                    return Err(self.err_loc(line, col, ".long outside .data section"));
                }
                let operand = self.next_token()?;
                let value = match operand.kind {
                    TokenKind::Int(word) => Value::Imm(word),
                    TokenKind::Ident(sym) => Value::Sym(sym),
                    _ => return Err(self.err_at(&operand, "expected value after .long")),
                };
                self.data.push(DataCell {
                    subsection: self.subsection,
                    kind: CellKind::Value(value),
                });
                Ok(())
            }
            ".string" => {
                if self.mode != Mode::Data {
                    return Err(self.err_loc(line, col, ".string outside .data section"));
                }
                let operand = self.next_token()?;
                let bytes = match operand.kind {
                    TokenKind::Str(bytes) => bytes,
                    _ => return Err(self.err_at(&operand, "expected string after .string")),
                };
                for byte in bytes {
                    self.data.push(DataCell {
                        subsection: self.subsection,
                        kind: CellKind::Value(Value::Imm(byte as u32)),
                    });
                }
                // NUL terminator cell.
                self.data.push(DataCell {
                    subsection: self.subsection,
                    kind: CellKind::Value(Value::Imm(0)),
                });
                Ok(())
            }
            ".file" | ".loc" => {
                self.lexer.skip_line();
                Ok(())
            }
            _ => Err(self.err_loc(line, col, format!("unknown directive: {name}"))),
        }
    }

    fn handle_statement(&mut self, name: &str, line: u32, col: u32) -> Result<(), IrError> {
        let entry = match lookup_mnemonic(name) {
            Some(entry) => entry,
            None => return Err(self.err_loc(line, col, format!("unknown opcode: {name}"))),
        };

        let mut inst = Inst::new(entry.op, self.pc, line as i32);
        match entry.shape {
            OperandShape::None => {}
            OperandShape::SrcOnly => {
                inst.src = self.operand()?;
            }
            OperandShape::DstOnly => {
                inst.dst = self.operand()?;
            }
            OperandShape::DstSrc => {
                inst.dst = self.operand()?;
                self.expect_comma()?;
                inst.src = self.operand()?;
            }
            OperandShape::JmpOnly => {
                inst.jmp = self.operand()?;
            }
            OperandShape::JmpDstSrc => {
                inst.jmp = self.operand()?;
                self.expect_comma()?;
                inst.dst = self.operand()?;
                self.expect_comma()?;
                inst.src = self.operand()?;
            }
        }

        let closes_block =
            entry.op.is_jump() || (self.split_mem_blocks && entry.op.is_mem());
        self.text.push(inst);
        if closes_block {
            self.pc += 1;
            self.at_boundary = true;
        } else {
            self.at_boundary = false;
        }
        Ok(())
    }

    fn operand(&mut self) -> Result<Value, IrError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Int(word) => Ok(Value::Imm(word)),
            TokenKind::Ident(name) => match Reg::from_name(&name) {
                Some(reg) => Ok(Value::Reg(reg)),
                None => Ok(Value::Sym(name)),
            },
            _ => Err(self.err_at(&token, "expected operand")),
        }
    }

    fn expect_comma(&mut self) -> Result<(), IrError> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Comma {
            Ok(())
        } else {
            Err(self.err_at(&token, "expected ','"))
        }
    }
}
