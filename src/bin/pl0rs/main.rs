//! # pl0rs
//!
//! The command-line front end for the `pl0rs` toolchain: lexer, code
//! generator, and virtual machine for a small PL/0-family teaching
//! language. Reads `inputFile.txt` from the working directory, writes
//! `outputFile.txt`, and optionally echoes any of the three listing
//! sections to standard output.
extern crate pl0rs;

mod cli;

use std::error::Error;
use std::fs;
use std::io::{self, Write};

use cli::Cli;
use log::info;
use pl0rs::listing::{render_code_listing, render_lexer_listing, render_vm_trace};
use pl0rs::run_pipeline;

const INPUT_FILE: &str = "inputFile.txt";
const OUTPUT_FILE: &str = "outputFile.txt";

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::init();

    simple_logger::init_with_level((&args.log_level).into()).unwrap();

    let source = fs::read_to_string(INPUT_FILE)?;

    info!("read {} bytes from {INPUT_FILE}", source.len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let output = run_pipeline(&source, stdin.lock(), stdout.lock());

    for diagnostic in output.lex_diagnostics.iter() {
        eprintln!("{diagnostic}");
    }
    for diagnostic in output.parse_diagnostics.iter() {
        eprintln!("{diagnostic}");
    }

    let mut listing = String::new();
    let lexer_listing = render_lexer_listing(&source, &output.tokens);
    if args.echo_lexer_listing {
        print!("{lexer_listing}");
    }
    listing.push_str(&lexer_listing);

    let code_listing = render_code_listing(&output.code);
    if args.echo_code_listing {
        print!("{code_listing}");
    }
    listing.push_str(&code_listing);

    if let Some(trace) = &output.trace {
        let vm_trace = render_vm_trace(trace);
        if args.echo_vm_trace {
            print!("{vm_trace}");
        }
        listing.push_str(&vm_trace);
    }

    fs::write(OUTPUT_FILE, &listing)?;

    if output.syntax_correct && !args.echo_code_listing {
        println!("No errors, program is syntactically correct.");
    }

    io::stdout().flush().ok();

    if !output.syntax_correct {
        std::process::exit(1);
    }

    Ok(())
}
