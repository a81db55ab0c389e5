//! A lexer, a register-allocating single-pass code generator, and a
//! register/stack virtual machine for a small PL/0-family teaching
//! language.

pub mod error;
pub mod instruction;
pub mod lexer;
pub mod listing;
pub mod parser;
pub mod symbol;
pub mod token;
pub mod vm;

use std::io::{BufRead, Write};

use error::Diagnostic;
use instruction::Instruction;
use lexer::Lexer;
use parser::Generator;
use token::Token;
use vm::{TraceRow, Vm};

/// Everything a caller (CLI or test) needs to render the listing and
/// decide whether the virtual machine ran.
pub struct PipelineOutput {
    pub tokens: Vec<Token>,
    pub lex_diagnostics: Vec<Diagnostic>,
    pub code: Vec<Instruction>,
    pub parse_diagnostics: Vec<Diagnostic>,
    pub syntax_correct: bool,
    pub trace: Option<Vec<TraceRow>>,
}

/// Runs the full lexer -> generator -> (optional) VM pipeline against
/// `source`, exactly as the CLI does. The VM only runs if generation
/// reported no errors.
pub fn run_pipeline(source: &str, stdin: impl BufRead, stdout: impl Write) -> PipelineOutput {
    let (tokens, lex_diagnostics, lex_ok) = Lexer::new(source).lex();
    let (code, parse_diagnostics, parse_ok) = Generator::new(&tokens).generate();
    let syntax_correct = lex_ok && parse_ok;

    let trace = if syntax_correct {
        let mut vm = Vm::new();
        Some(vm.run(&code, stdin, stdout))
    } else {
        None
    };

    PipelineOutput {
        tokens,
        lex_diagnostics,
        code,
        parse_diagnostics,
        syntax_correct,
        trace,
    }
}
