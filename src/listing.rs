//! Renders the three-section `outputFile.txt`: source + lexeme listing,
//! generated code listing, and VM execution trace.

use std::fmt::Write as _;

use crate::instruction::Instruction;
use crate::token::{Token, TokenKind};
use crate::vm::TraceRow;

/// Section 1: source echo, lexeme table, and flat lexeme list.
pub fn render_lexer_listing(source: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Source Program: \n{source}\n");

    let _ = writeln!(out, "Lexeme Table:");
    let _ = writeln!(out, "{:<10}{:<10}", "lexeme", "token type");
    for token in tokens {
        let _ = writeln!(out, "{:<10}{:<10}", token.lexeme, token.kind.ordinal());
    }

    let _ = writeln!(out, "\nLexeme List:");
    for token in tokens {
        let _ = write!(out, "{} ", token.kind.ordinal());
        if matches!(token.kind, TokenKind::Ident | TokenKind::Number) {
            let _ = write!(out, "{} ", token.lexeme);
        }
    }
    out.push('\n');
    out
}

/// Section 2: the generated code listing, columns `Line OP R L M`.
pub fn render_code_listing(code: &[Instruction]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated Code:");
    let _ = writeln!(out, "Line       OP        R    L    M");
    for (i, instr) in code.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<11}{:<10}{}    {}    {}",
            i, instr.op, instr.r, instr.l, instr.m
        );
    }
    out
}

/// Section 3: the VM execution trace, columns
/// `InstrNum OP R L M PC BP SP Stack Registers`.
pub fn render_vm_trace(rows: &[TraceRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "InstrNum   OP        R    L    M        PC    BP    SP        {:<50}Registers",
        "Stack "
    );
    for row in rows {
        let mut line = format!(
            "{:<11}{:<10}{:<5}{:<5}{:<9}{:<6}{:<6}{:<10}",
            row.instr_num, row.op, row.r, row.l, row.m, row.pc, row.bp, row.sp
        );
        for (i, (value, separator_before)) in row.stack.iter().enumerate() {
            if *separator_before {
                line.push_str("| ");
            }
            let _ = write!(line, "{value} ");
            if *value < 10 {
                line.push(' ');
            }
            let _ = i;
        }
        let padded = format!("{line:<112}");
        let mut regs = String::new();
        for r in row.registers {
            let _ = write!(regs, "{r:<3}");
        }
        let _ = writeln!(out, "{padded}{regs}");
    }
    out
}
