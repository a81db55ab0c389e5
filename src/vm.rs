//! The register/stack virtual machine: a fetch/execute interpreter over the
//! instruction array produced by the [`crate::parser::Generator`].

use std::io::{BufRead, Write};

use log::trace;

use crate::instruction::{Instruction, Op};

const STACK_SIZE: usize = 2000;
const REGISTER_COUNT: usize = 16;

/// One row of the execution trace, pre-formatted the way
/// [`crate::listing`] expects to print it.
pub struct TraceRow {
    /// The fetch address of this instruction, i.e. `PC` as it was *before*
    /// the fetch/execute cycle advanced it. Not a running count: a loop
    /// body re-fetches the same addresses on each iteration, so this
    /// column repeats/decreases across rows exactly as the reference's
    /// trace does.
    pub instr_num: usize,
    pub op: Op,
    pub r: i64,
    pub l: i64,
    pub m: i64,
    pub pc: i64,
    pub bp: i64,
    pub sp: i64,
    /// The stack slots `1..=sp`, with `|` inserted ahead of the slot that
    /// begins a new activation record (as seen from the current `bp`).
    pub stack: Vec<(i64, bool)>,
    pub registers: [i64; 8],
}

pub struct Vm {
    pc: i64,
    bp: i64,
    sp: i64,
    halted: bool,
    registers: [i64; REGISTER_COUNT],
    stack: [i64; STACK_SIZE],
}

impl Vm {
    pub fn new() -> Self {
        Self {
            pc: 0,
            bp: 1,
            sp: 0,
            halted: false,
            registers: [0; REGISTER_COUNT],
            stack: [0; STACK_SIZE],
        }
    }

    /// Walks the static-link chain `L` levels down from `bp`.
    /// `base(0, bp) == bp`.
    fn base(&self, mut lex_levels: i64, mut bp: i64) -> i64 {
        while lex_levels > 0 {
            bp = self.stack[(bp + 1) as usize];
            lex_levels -= 1;
        }
        bp
    }

    fn trace_row(&self, fetch_pc: usize, instr: &Instruction) -> TraceRow {
        let mut stack = Vec::with_capacity(self.sp.max(0) as usize);
        let mut next_lex_lvl = self.stack[(self.bp + 1) as usize];
        let mut next_bp = self.base(next_lex_lvl, self.bp);
        for i in 1..=self.sp {
            let mut separator_before = false;
            if i == next_bp {
                next_lex_lvl -= 1;
                next_bp = self.base(next_lex_lvl, self.bp);
                if i > 1 {
                    separator_before = true;
                }
            }
            stack.push((self.stack[i as usize], separator_before));
        }
        let mut registers = [0i64; 8];
        registers.copy_from_slice(&self.registers[..8]);
        TraceRow {
            instr_num: fetch_pc,
            op: instr.op,
            r: instr.r,
            l: instr.l,
            m: instr.m,
            pc: self.pc,
            bp: self.bp,
            sp: self.sp,
            stack,
            registers,
        }
    }

    /// Runs `code` to completion (i.e. until `SIO3`). `stdin`/`stdout`
    /// back the `SIO2`/`SIO1` instructions; the returned trace rows mirror
    /// the VM-trace section of the generated listing.
    pub fn run(
        &mut self,
        code: &[Instruction],
        mut stdin: impl BufRead,
        mut stdout: impl Write,
    ) -> Vec<TraceRow> {
        let mut rows = Vec::new();
        while !self.halted {
            let fetch_pc = self.pc;
            let instr = code[self.pc as usize];
            self.pc += 1;
            trace!("vm: fetch {:?} at pc={}", instr.op, fetch_pc);

            match instr.op {
                Op::Lit => self.registers[instr.r as usize] = instr.m,
                Op::Rtn => {
                    self.sp = self.bp - 1;
                    self.bp = self.stack[(self.sp + 3) as usize];
                    self.pc = self.stack[(self.sp + 4) as usize];
                }
                Op::Lod => {
                    let addr = self.base(instr.l, self.bp) + instr.m;
                    self.registers[instr.r as usize] = self.stack[addr as usize];
                }
                Op::Sto => {
                    let addr = self.base(instr.l, self.bp) + instr.m;
                    self.stack[addr as usize] = self.registers[instr.r as usize];
                }
                Op::Cal => {
                    let sl = self.base(instr.l, self.bp);
                    self.stack[(self.sp + 1) as usize] = 0;
                    self.stack[(self.sp + 2) as usize] = sl;
                    self.stack[(self.sp + 3) as usize] = self.bp;
                    self.stack[(self.sp + 4) as usize] = self.pc;
                    self.bp = self.sp + 1;
                    self.pc = instr.m;
                }
                Op::Inc => self.sp += instr.m,
                Op::Jmp => self.pc = instr.m,
                Op::Jpc => {
                    if self.registers[instr.r as usize] == 0 {
                        self.pc = instr.m;
                    }
                }
                Op::Sio1 => {
                    let _ = writeln!(stdout, "{}", self.registers[instr.r as usize]);
                }
                Op::Sio2 => {
                    // Token-based, like `std::cin >> RF[r]`: skips leading
                    // whitespace (including newlines) and stops at the
                    // first non-digit, so multiple integers on one line or
                    // split across lines are both read correctly.
                    let mut bytes = stdin.by_ref().bytes().filter_map(Result::ok);
                    let mut byte = bytes.find(|b| !(*b as char).is_whitespace());

                    let negative = byte == Some(b'-');
                    if negative {
                        byte = bytes.next();
                    }

                    let mut value: i64 = 0;
                    while let Some(b) = byte {
                        if !b.is_ascii_digit() {
                            break;
                        }
                        value = value * 10 + (b - b'0') as i64;
                        byte = bytes.next();
                    }

                    self.registers[instr.r as usize] = if negative { -value } else { value };
                }
                Op::Sio3 => self.halted = true,
                Op::Neg => self.registers[instr.r as usize] = -self.registers[instr.l as usize],
                Op::Add => {
                    self.registers[instr.r as usize] =
                        self.registers[instr.l as usize] + self.registers[instr.m as usize]
                }
                Op::Sub => {
                    self.registers[instr.r as usize] =
                        self.registers[instr.l as usize] - self.registers[instr.m as usize]
                }
                Op::Mul => {
                    self.registers[instr.r as usize] =
                        self.registers[instr.l as usize] * self.registers[instr.m as usize]
                }
                Op::Div => {
                    self.registers[instr.r as usize] =
                        self.registers[instr.l as usize] / self.registers[instr.m as usize]
                }
                Op::Odd => self.registers[instr.r as usize] = self.registers[instr.r as usize] % 2,
                Op::Mod => {
                    self.registers[instr.r as usize] =
                        self.registers[instr.l as usize] % self.registers[instr.m as usize]
                }
                Op::Eql => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] == self.registers[instr.m as usize]) as i64
                }
                Op::Neq => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] != self.registers[instr.m as usize]) as i64
                }
                Op::Lss => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] < self.registers[instr.m as usize]) as i64
                }
                Op::Leq => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] <= self.registers[instr.m as usize]) as i64
                }
                Op::Gtr => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] > self.registers[instr.m as usize]) as i64
                }
                Op::Geq => {
                    self.registers[instr.r as usize] =
                        (self.registers[instr.l as usize] >= self.registers[instr.m as usize]) as i64
                }
            }

            rows.push(self.trace_row(fetch_pc as usize, &instr));
        }
        rows
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
