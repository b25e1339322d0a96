use super::{compile_source, run_with_cli, CompileOutput};
use crate::compiler::cli::Cli;
use crate::core::data::EDATA_SYMBOL;
use crate::core::inst::{Inst, Op, Reg, Value};
use crate::core::parser::ParseConfig;
use crate::core::scheduler::{run_chunked, ChunkSink};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn compile(src: &str) -> CompileOutput {
    compile_source("test.eir", src, ParseConfig::default()).expect("compile")
}

fn temp_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("irForge-test-{}-{}-{}", std::process::id(), tag, nanos));
    path
}

#[test]
fn canonical_program_resolves_to_expected_sequence() {
    let output = compile("main:\n mov A, 1\n add A, 2\n putc A\n exit");
    let text = output.module.text();
    assert_eq!(text.len(), 5);

    assert_eq!(text[0].op, Op::Jmp);
    assert_eq!(text[0].jmp, Value::Imm(1));
    assert_eq!(text[0].pc, 0);

    assert_eq!(text[1].op, Op::Mov);
    assert_eq!(text[1].dst, Value::Reg(Reg::A));
    assert_eq!(text[1].src, Value::Imm(1));
    assert_eq!(text[1].pc, 1);

    assert_eq!(text[2].op, Op::Add);
    assert_eq!(text[2].dst, Value::Reg(Reg::A));
    assert_eq!(text[2].src, Value::Imm(2));
    assert_eq!(text[2].pc, 1);

    assert_eq!(text[3].op, Op::Putc);
    assert_eq!(text[3].src, Value::Reg(Reg::A));
    assert_eq!(text[3].pc, 1);

    assert_eq!(text[4].op, Op::Exit);
    assert_eq!(text[4].pc, 1);

    assert_eq!(output.symbols.lookup("main"), Some(1));
}

#[test]
fn data_subsections_merge_by_ascending_id() {
    let output = compile(
        "main:\n exit\n.data 1\n .long 10\n.data 0\nlabel1:\n .long 20\n.data 1\n .long 30\n",
    );
    assert_eq!(output.module.data(), &[20, 10, 30, 4]);
    assert_eq!(output.symbols.lookup("label1"), Some(0));
    assert_eq!(output.symbols.lookup(EDATA_SYMBOL), Some(3));
}

#[test]
fn undefined_symbol_aborts_with_no_module() {
    let err = compile_source(
        "test.eir",
        "main:\n jmp nowhere\n",
        ParseConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "undefined symbol: nowhere");
}

#[test]
fn no_symbol_value_survives_resolution() {
    let output = compile(
        "main:\n mov A, msg\n jne loop, A, 0\nloop:\n load B, SP\n jmp main\n\
         .data\nmsg:\n .string \"hi\"\n .long loop\n",
    );
    for inst in output.module.text() {
        assert!(!inst.dst.is_sym(), "unresolved dst in {inst}");
        assert!(!inst.src.is_sym(), "unresolved src in {inst}");
        assert!(!inst.jmp.is_sym(), "unresolved jmp in {inst}");
    }
}

#[test]
fn negative_literals_wrap_through_the_pipeline() {
    let output = compile("main:\n mov A, -1\n sub A, -16777215\n exit\n");
    let text = output.module.text();
    assert_eq!(text[1].src, Value::Imm(0xff_ffff));
    assert_eq!(text[2].src, Value::Imm(1));
}

#[test]
fn blocks_are_contiguous_and_jumps_close_them() {
    let output = compile(
        "main:\n mov A, 1\n jeq done, A, 1\n add A, 1\n jmp main\ndone:\n getc B\n exit\n",
    );
    let text = output.module.text();

    // Instructions sharing a pc are contiguous.
    let mut seen = Vec::new();
    let mut prev_pc = None;
    for inst in text {
        if Some(inst.pc) != prev_pc {
            assert!(!seen.contains(&inst.pc), "pc {} split across runs", inst.pc);
            seen.push(inst.pc);
            prev_pc = Some(inst.pc);
        }
    }

    // Only the last instruction of a block may be jump-class.
    for pair in text.windows(2) {
        if pair[0].pc == pair[1].pc {
            assert!(!pair[0].op.is_jump(), "jump mid-block at pc {}", pair[0].pc);
        }
    }
}

struct CollectSink {
    insts: Vec<Inst>,
    chunks: Vec<u32>,
}

impl ChunkSink for CollectSink {
    fn chunk_begin(&mut self, chunk_id: u32) {
        self.chunks.push(chunk_id);
    }
    fn chunk_end(&mut self) {}
    fn block_begin(&mut self, _pc: u32) {}
    fn inst(&mut self, inst: &Inst) {
        self.insts.push(inst.clone());
    }
}

#[test]
fn scheduler_reproduces_compiled_programs_exactly() {
    let output = compile(
        "main:\n mov A, 1\nl1:\n add A, 1\n jlt l1, A, 10\nl2:\n putc A\n jmp l2\n exit\n",
    );
    let text = output.module.text();
    let max_pc = output.module.max_pc();
    for chunk_size in [1, 2, 3, 7, 100] {
        let mut sink = CollectSink {
            insts: Vec::new(),
            chunks: Vec::new(),
        };
        let count = run_chunked(text, chunk_size, &mut sink);
        assert_eq!(sink.insts, text);
        assert_eq!(count, (max_pc + 1).div_ceil(chunk_size));
        assert_eq!(sink.chunks.len() as u32, count);
    }
}

#[test]
fn missing_input_file_is_a_host_error() {
    let cli = Cli::parse_from(["irForge", "/nonexistent/prog.eir"]);
    let err = run_with_cli(&cli).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/prog.eir"));
}

#[test]
fn cli_run_writes_requested_outputs() {
    let input = temp_path("input.eir");
    let listing = temp_path("out.lst");
    let symbols = temp_path("out.sym");
    fs::write(&input, "main:\n putc 72\n exit\n.data\nmsg:\n .long 1\n").expect("write input");

    let cli = Cli::parse_from([
        "irForge",
        "--dump",
        listing.to_str().expect("path"),
        "--chunk-size",
        "4",
        "--symbols",
        symbols.to_str().expect("path"),
        input.to_str().expect("path"),
    ]);
    run_with_cli(&cli).expect("run");

    let listing_text = fs::read_to_string(&listing).expect("listing");
    assert!(listing_text.starts_with(".text\nchunk 0:\n  block 0:\n    jmp 1\n"));
    assert!(listing_text.contains(".data\n"));

    let symbols_text = fs::read_to_string(&symbols).expect("symbols");
    assert!(symbols_text.contains("main"));
    assert!(symbols_text.contains("_edata"));
    assert!(symbols_text.contains("msg"));

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&listing);
    let _ = fs::remove_file(&symbols);
}

#[test]
fn split_mem_blocks_is_fixed_before_parsing() {
    let src = "main:\n load A, B\n store B, A\n exit\n";
    let plain = compile_source("test.eir", src, ParseConfig::default()).expect("compile");
    assert_eq!(plain.module.max_pc(), 1);
    let split = compile_source(
        "test.eir",
        src,
        ParseConfig {
            split_mem_blocks: true,
        },
    )
    .expect("compile");
    assert_eq!(split.module.max_pc(), 3);
}

#[test]
fn guard_cell_follows_edata() {
    let output = compile("main:\n exit\n.data\n .long 7\n .long 8\n");
    let edata = output.symbols.lookup(EDATA_SYMBOL).expect("_edata");
    assert_eq!(edata, 2);
    assert_eq!(output.module.data().len() as u32, edata + 1);
    assert_eq!(output.module.data()[edata as usize], edata + 1);
}
