//! const declarations populate the symbol table without emitting code, and
//! `read` works on a var initialized from a const's value.

use pl0rs::run_pipeline;

#[test]
fn const_declaration_emits_no_instructions_of_its_own() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "const ten = 10; var x; begin x := ten; write x end.",
        std::io::empty(),
        &mut stdout,
    );
    assert!(output.syntax_correct);
    assert_eq!(String::from_utf8(stdout).unwrap(), "10\n");
}

#[test]
fn read_then_write_round_trips_through_the_vm() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "var x; begin read x; write x end.",
        "123\n".as_bytes(),
        &mut stdout,
    );
    assert!(output.syntax_correct);
    assert_eq!(String::from_utf8(stdout).unwrap(), "123\n");
}

#[test]
fn assignment_to_a_const_is_rejected() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "const ten = 10; begin ten := 1 end.",
        std::io::empty(),
        &mut stdout,
    );
    assert!(!output.syntax_correct);
    assert!(output
        .parse_diagnostics
        .iter()
        .any(|d| d.message.contains("constant")));
    assert!(output.trace.is_none());
    assert_eq!(stdout, Vec::<u8>::new());
}
