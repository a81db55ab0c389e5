//! S7: assigning to an undeclared identifier is diagnosed and the VM
//! never runs.

use pl0rs::run_pipeline;

#[test]
fn undeclared_assignment_target_prevents_execution() {
    let mut stdout = Vec::new();
    let output = run_pipeline("begin x := 1 end.", std::io::empty(), &mut stdout);

    assert!(!output.syntax_correct);
    assert!(output
        .parse_diagnostics
        .iter()
        .any(|d| d.message.contains("Undeclared")));
    assert!(output.trace.is_none());
    assert_eq!(stdout, Vec::<u8>::new());
}
