//! S3: a while loop sums a countdown.

use pl0rs::run_pipeline;

#[test]
fn while_loop_sums_three_two_one() {
    let mut stdout = Vec::new();
    let output = run_pipeline(
        "var i, s; begin i := 3; s := 0; while i > 0 do begin s := s + i; i := i - 1 end; write s end.",
        std::io::empty(),
        &mut stdout,
    );
    assert!(output.syntax_correct);
    assert_eq!(String::from_utf8(stdout).unwrap(), "6\n");
}
