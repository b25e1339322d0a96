// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Second pass: rewrite every symbolic operand to a concrete address.
//!
//! Resolution is total or fatal. There is no retry and no partial
//! [`Module`]; a single undefined symbol aborts the compilation.

use crate::core::error::IrError;
use crate::core::inst::{Inst, Value};
use crate::core::module::Module;
use crate::core::symbol_table::SymbolTable;

/// Resolve the instruction list and serialized data image into a [`Module`].
pub fn resolve(
    mut text: Vec<Inst>,
    image: Vec<Value>,
    symbols: &SymbolTable,
) -> Result<Module, IrError> {
    for inst in &mut text {
        resolve_value(&mut inst.dst, symbols)?;
        resolve_value(&mut inst.src, symbols)?;
        resolve_value(&mut inst.jmp, symbols)?;
    }

    let mut data = Vec::with_capacity(image.len());
    for value in image {
        match value {
            Value::Imm(word) => data.push(word),
            Value::Sym(name) => data.push(lookup(symbols, &name)?),
            Value::Reg(reg) => {
                return Err(IrError::resolve(format!(
                    "register {} in data image",
                    reg.name()
                )));
            }
        }
    }

    Ok(Module::new(text, data))
}

fn resolve_value(value: &mut Value, symbols: &SymbolTable) -> Result<(), IrError> {
    if let Value::Sym(name) = value {
        let addr = lookup(symbols, name)?;
        *value = Value::Imm(addr);
    }
    Ok(())
}

fn lookup(symbols: &SymbolTable, name: &str) -> Result<u32, IrError> {
    symbols
        .lookup(name)
        .ok_or_else(|| IrError::resolve(format!("undefined symbol: {name}")))
}
