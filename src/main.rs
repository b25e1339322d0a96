// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for irForge.

use std::process;

use clap::Parser;
use serde_json::json;

use irforge::compiler::cli::{Cli, OutputFormat};
use irforge::core::error::IrError;

fn format_diagnostic(err: &IrError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => json!({
            "severity": "error",
            "kind": err.kind().as_str(),
            "message": err.message(),
            "file": err.loc().map(|loc| loc.file.clone()),
            "line": err.loc().map(|loc| loc.line),
            "col": err.loc().map(|loc| loc.col),
        })
        .to_string(),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = irforge::compiler::run_with_cli(&cli) {
        eprintln!("{}", format_diagnostic(&err, cli.format));
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{format_diagnostic, OutputFormat};
    use irforge::core::error::{IrError, SourceLoc};

    #[test]
    fn json_diagnostics_carry_position_keys() {
        let err = IrError::parse(
            SourceLoc {
                file: "prog.eir".to_string(),
                line: 3,
                col: 7,
            },
            "expected ','",
        );
        let line = format_diagnostic(&err, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["kind"], "parse");
        assert_eq!(value["message"], "expected ','");
        assert_eq!(value["file"], "prog.eir");
        assert_eq!(value["line"], 3);
        assert_eq!(value["col"], 7);
    }

    #[test]
    fn json_diagnostics_null_position_for_resolve_errors() {
        let err = IrError::resolve("undefined symbol: loop");
        let line = format_diagnostic(&err, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["kind"], "resolve");
        assert!(value["file"].is_null());
        assert!(value["line"].is_null());
    }
}
