// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types and diagnostic positions for the compiler front end.

use std::fmt;

/// Categories of front-end errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrErrorKind {
    Lex,
    Parse,
    Resolve,
    Io,
}

impl IrErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IrErrorKind::Lex => "lex",
            IrErrorKind::Parse => "parse",
            IrErrorKind::Resolve => "resolve",
            IrErrorKind::Io => "io",
        }
    }
}

/// A position in the source text. Columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    pub file: String,
    pub line: u32,
    pub col: u32,
}

/// A fatal front-end error.
///
/// Lexical and parse errors carry a [`SourceLoc`]; resolution and host
/// errors do not, since those passes run after source positions are lost.
#[derive(Debug, Clone)]
pub struct IrError {
    kind: IrErrorKind,
    message: String,
    loc: Option<SourceLoc>,
}

impl IrError {
    pub fn lex(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            kind: IrErrorKind::Lex,
            message: message.into(),
            loc: Some(loc),
        }
    }

    pub fn parse(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            kind: IrErrorKind::Parse,
            message: message.into(),
            loc: Some(loc),
        }
    }

    pub fn resolve(message: impl Into<String>) -> Self {
        Self {
            kind: IrErrorKind::Resolve,
            message: message.into(),
            loc: None,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: IrErrorKind::Io,
            message: message.into(),
            loc: None,
        }
    }

    pub fn kind(&self) -> IrErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn loc(&self) -> Option<&SourceLoc> {
        self.loc.as_ref()
    }
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loc {
            Some(loc) => write!(
                f,
                "{}:{}:{}: {}",
                loc.file, loc.line, loc.col, self.message
            ),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for IrError {}

#[cfg(test)]
mod tests {
    use super::{IrError, SourceLoc};

    #[test]
    fn positioned_errors_render_file_line_col() {
        let err = IrError::parse(
            SourceLoc {
                file: "prog.eir".to_string(),
                line: 4,
                col: 9,
            },
            "unknown opcode: frob",
        );
        assert_eq!(err.to_string(), "prog.eir:4:9: unknown opcode: frob");
    }

    #[test]
    fn bare_errors_render_message_only() {
        let err = IrError::resolve("undefined symbol: loop_top");
        assert_eq!(err.to_string(), "undefined symbol: loop_top");
    }
}
