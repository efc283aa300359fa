//! Whole-program runs with scripted input and in-memory output.

use aal_core::{
    AalError, EngineConfig, ErrorKind, Machine, Program, RunOutcome, ScriptedInput, Termination,
    Word,
};
use log as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const FACTORIAL: &str = "\
READ N
LOAD =1
STORE F
TOP LOAD N
BE DONE
LOAD F
MULT N
STORE F
LOAD N
SUB =1
STORE N
BU TOP
DONE PRINT F
FIN END
";

fn run(
    source: &str,
    config: EngineConfig,
    input: &[Word],
) -> (Machine, Result<RunOutcome, AalError>, String) {
    let program = Program::from_source(source).expect("program builds");
    let mut machine = Machine::new(config);
    let mut out = Vec::new();
    let result = machine.run(&program, &mut ScriptedInput::from_values(input), &mut out);
    (machine, result, String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn store_then_end_writes_only_blank_line() {
    let (machine, result, out) = run(
        "LOOP LOAD =5\nSTORE X\nFIN END\n",
        EngineConfig::default(),
        &[],
    );
    assert_eq!(result.expect("run succeeds").termination, Termination::End);
    assert_eq!(machine.state().variable("X"), Some(5));
    assert_eq!(out, "\n");
}

#[test]
fn countdown_prints_three_two_one() {
    let source = "\
LOAD =3
TOP STORE N
PRINT N
SUB =1
BE DONE
BU TOP
DONE END
";
    let (_, result, out) = run(source, EngineConfig::default(), &[]);
    let outcome = result.expect("run succeeds");
    assert_eq!(outcome.termination, Termination::End);
    assert_eq!(out, "3\n2\n1\n\n");
}

#[test]
fn division_by_zero_variable_names_line_and_variable() {
    let source = "Z DC 0\nLOAD =9\nDIV Z\nPRINT Z\nF END\n";
    let (machine, result, out) = run(source, EngineConfig::default(), &[]);
    let err = result.expect_err("division by zero");
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.program_index(), Some(2));
    assert!(err.to_string().contains('Z'));
    assert!(err.to_string().contains("DIV Z"));
    assert_eq!(machine.state().accumulator(), 9);
    assert_eq!(out, "");
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(5, 120)]
#[case(10, 628_800)]
fn factorial_is_reduced(#[case] n: Word, #[case] expected: Word) {
    let (_, result, out) = run(FACTORIAL, EngineConfig::default(), &[n]);
    result.expect("run succeeds");
    // The READ prompt and the printed result share a line.
    assert_eq!(out, format!("1:        READ N {expected}\n\n"));
}

#[test]
fn same_program_twice_gives_identical_output() {
    let program = Program::from_source(FACTORIAL).expect("program builds");
    let mut machine = Machine::new(EngineConfig::with_verbose(true));
    let mut first = Vec::new();
    let mut second = Vec::new();
    machine
        .run(&program, &mut ScriptedInput::from_values(&[4]), &mut first)
        .expect("first run");
    machine
        .run(&program, &mut ScriptedInput::from_values(&[4]), &mut second)
        .expect("second run");
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn branch_to_declaration_never_builds() {
    let err = Program::from_source("N DC 1\nBU N\nF END\n").expect_err("dc label is not a target");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.is_static());
    assert_eq!(err.program_index(), Some(1));
}

#[test]
fn runaway_loop_is_cut_by_step_limit() {
    let (_, result, _) = run(
        "TOP BU TOP\n",
        EngineConfig::default().with_step_limit(1_000),
        &[],
    );
    let err = result.expect_err("step limit");
    assert!(matches!(err, AalError::StepLimitExceeded { limit: 1_000, .. }));
}

#[test]
fn verbose_mode_does_not_change_results() {
    let (quiet, quiet_result, _) = run(FACTORIAL, EngineConfig::default(), &[6]);
    let (loud, loud_result, loud_out) = run(FACTORIAL, EngineConfig::with_verbose(true), &[6]);
    assert_eq!(
        quiet_result.expect("quiet run"),
        loud_result.expect("verbose run")
    );
    assert_eq!(quiet.state(), loud.state());
    assert!(loud_out.contains("(Branch? YES)"));
    assert!(loud_out.contains("(F = 720)"));
}
