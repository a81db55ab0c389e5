//! S4: multiplication binds tighter than addition; parens override it.

use pl0rs::run_pipeline;

#[test]
fn multiplication_before_addition() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "var x; begin x := 2 + 3 * 4; write x end.",
        std::io::empty(),
        &mut stdout,
    );
    assert!(output.syntax_correct);
    assert_eq!(String::from_utf8(stdout).unwrap(), "14\n");
}

#[test]
fn parens_override_precedence() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "var x; begin x := (2+3)*4; write x end.",
        std::io::empty(),
        &mut stdout,
    );
    assert!(output.syntax_correct);
    assert_eq!(String::from_utf8(stdout).unwrap(), "20\n");
}
