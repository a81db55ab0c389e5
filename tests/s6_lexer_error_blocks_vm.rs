//! S6: a lexical error (number immediately followed by a letter) is
//! diagnosed and the VM never runs.

use pl0rs::run_pipeline;

#[test]
fn number_starting_an_identifier_prevents_execution() {
    let mut stdout = Vec::new();
    let output = run_pipeline("var x; begin x := 12abc end.", std::io::empty(), &mut stdout);

    assert!(!output.syntax_correct);
    assert!(!output.lex_diagnostics.is_empty());
    assert!(output.trace.is_none());
    assert_eq!(stdout, Vec::<u8>::new());
}
