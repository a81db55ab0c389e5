//! Exceeding the generator's 500-entry code-array capacity is diagnosed
//! rather than panicking or silently truncating mid-instruction.

use pl0rs::run_pipeline;

#[test]
fn very_long_program_is_diagnosed_not_panicked() {
    let mut body = String::from("var x; begin ");
    for _ in 0..400 {
        body.push_str("x := x + 1; ");
    }
    body.push_str("write x end.");

    let mut stdout = Vec::new();
    let output = run_pipeline(&body, std::io::empty(), &mut stdout);

    assert!(!output.syntax_correct);
    assert!(output
        .parse_diagnostics
        .iter()
        .any(|d| d.message.contains("too large")));
    assert!(output.trace.is_none());
}
