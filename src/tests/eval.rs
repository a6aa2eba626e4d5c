use std::time::{Duration, Instant};

use nix::errno::Errno;
use pretty_assertions::assert_eq;

use super::*;
use crate::{
	capture::Fault,
	config::EvalConfig,
	eval::{evaluate, EvalFlags, Evaluator},
	expr::Expression,
	jobs::ExitStatus,
	libsh::error::ShErrKind,
	relay::RelayStore,
	value::{Arg, ArgList},
};

fn bytes_of(evaluator: &Evaluator, expr: &Expression) -> Vec<u8> {
	evaluator.evaluate(expr).unwrap().into_bytes()
}

#[test]
fn simple_returns_program_stdout() {
	let dir = relay_dir();
	let out = quiet_in(&dir).evaluate(&Expression::bare("pwd")).unwrap();
	assert!(out.as_bytes().ends_with(b"\n"));
	assert_eq!(out.status(), Some(ExitStatus::Exited(0)));
	assert!(out.faults().is_empty());
}

#[test]
fn typed_arguments_reach_the_program() {
	let dir = relay_dir();
	let args = ArgList::new().with(42i64).with(1.5f64).with(true).with(b'c').with("str");
	let expr = Expression::Simple(crate::expr::SimpleCommand::new("echo", args));
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"42 1.500000 true c str\n");
}

#[test]
fn pipe_feeds_left_into_right() {
	let dir = relay_dir();
	let expr = Expression::pipe(echo("hi"), Expression::bare("cat"));
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"hi\n");
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn left_leaning_pipeline() {
	let dir = relay_dir();
	let expr = Expression::pipe(
		Expression::pipe(
			Expression::simple("printf", ["a\nb\nc\n"]),
			Expression::simple("grep", ["b"]),
		),
		Expression::simple("wc", ["-l"]),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"1\n");
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn right_leaning_pipeline() {
	let dir = relay_dir();
	let expr = Expression::pipe(
		Expression::simple("printf", ["a\nb\nc\n"]),
		Expression::pipe(
			Expression::simple("grep", ["-v", "b"]),
			Expression::simple("wc", ["-l"]),
		),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"2\n");
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn relay_reaches_leftmost_through_concat() {
	let dir = relay_dir();
	let expr = Expression::pipe(
		echo("piped"),
		Expression::concat(Expression::bare("cat"), echo("tail")),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"piped\ntail\n");
}

#[test]
fn relay_reaches_leftmost_through_sequence() {
	let dir = relay_dir();
	let expr = Expression::pipe(
		echo("piped"),
		Expression::seq(Expression::simple("grep", ["-c", "piped"]), echo("after")),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"after\n");
}

#[test]
fn concat_is_left_then_right() {
	let dir = relay_dir();
	let evaluator = quiet_in(&dir);
	let expr = Expression::concat(echo("one"), echo("two"));
	assert_eq!(bytes_of(&evaluator, &expr), b"one\ntwo\n");

	let left_empty = Expression::concat(Expression::bare("true"), echo("x"));
	let right_empty = Expression::concat(echo("x"), Expression::bare("true"));
	assert_eq!(bytes_of(&evaluator, &left_empty), b"x\n");
	assert_eq!(bytes_of(&evaluator, &right_empty), b"x\n");
}

#[test]
fn concat_does_not_add_separators() {
	let dir = relay_dir();
	let expr = Expression::concat(
		Expression::simple("printf", ["ab"]),
		Expression::simple("printf", ["\\000cd"]),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"ab\0cd");
}

#[test]
fn concat_truncates_to_capacity() {
	let dir = relay_dir();
	let evaluator = Evaluator::quiet(EvalConfig::default().with_relay_dir(dir.path()).with_capture_cap(8));
	let expr = Expression::concat(
		Expression::simple("printf", ["12345"]),
		Expression::simple("printf", ["67890"]),
	);
	let out = evaluator.evaluate(&expr).unwrap();
	assert_eq!(out.as_bytes(), b"12345678");
	assert!(out.is_truncated());
}

#[test]
fn sequence_returns_right_but_runs_left() {
	let dir = relay_dir();
	let marker = dir.path().join("marker");
	let expr = Expression::seq(
		sh(&format!("echo ignored; touch '{}'", marker.display())),
		echo("kept"),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"kept\n");
	assert!(marker.exists());
}

#[test]
fn nonzero_exit_is_attached_not_raised() {
	let dir = relay_dir();
	let out = quiet_in(&dir).evaluate(&sh("echo partial; exit 4")).unwrap();
	assert_eq!(out.as_bytes(), b"partial\n");
	assert_eq!(out.status(), Some(ExitStatus::Exited(4)));
	assert_eq!(
		out.faults(),
		&[Fault::NonzeroExit { cmd: "sh".into(), status: ExitStatus::Exited(4) }]
	);
}

#[test]
fn sequence_keeps_faults_of_discarded_side() {
	let dir = relay_dir();
	let out = quiet_in(&dir).evaluate(&Expression::seq(Expression::bare("false"), echo("ok"))).unwrap();
	assert_eq!(out.as_bytes(), b"ok\n");
	assert_eq!(out.status(), Some(ExitStatus::Exited(0)));
	assert_eq!(
		out.faults(),
		&[Fault::NonzeroExit { cmd: "false".into(), status: ExitStatus::Exited(1) }]
	);
}

#[test]
fn spawn_failure_does_not_stop_evaluation() {
	let dir = relay_dir();
	let expr = Expression::concat(Expression::bare("shexpr-test-no-such-program"), echo("still here"));
	let out = quiet_in(&dir).evaluate(&expr).unwrap();
	assert_eq!(out.as_bytes(), b"still here\n");
	assert_eq!(
		out.faults(),
		&[Fault::SpawnFailed { cmd: "shexpr-test-no-such-program".into(), errno: Errno::ENOENT }]
	);
}

#[test]
fn spawn_failure_upstream_pipes_nothing() {
	let dir = relay_dir();
	let expr = Expression::pipe(Expression::bare("shexpr-test-no-such-program"), Expression::simple("wc", ["-c"]));
	let out = quiet_in(&dir).evaluate(&expr).unwrap();
	assert_eq!(out.as_bytes(), b"0\n");
	assert_eq!(out.status(), Some(ExitStatus::Exited(0)));
	assert_eq!(out.faults().len(), 1);
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn spawn_failure_has_no_status() {
	let dir = relay_dir();
	let out = quiet_in(&dir).evaluate(&Expression::bare("shexpr-test-no-such-program")).unwrap();
	assert!(out.is_empty());
	assert_eq!(out.status(), None);
}

#[test]
fn unrecognized_arg_aborts_before_later_stages() {
	let dir = relay_dir();
	let before = dir.path().join("before");
	let after = dir.path().join("after");
	let bad = Expression::simple("echo", [Arg::Unrecognized { tag: 42 }]);
	let expr = Expression::seq(
		sh(&format!("touch '{}'", before.display())),
		Expression::seq(bad, sh(&format!("touch '{}'", after.display()))),
	);

	let err = quiet_in(&dir).evaluate(&expr).unwrap_err();
	assert_eq!(*err.kind(), ShErrKind::ConfigErr);
	assert!(before.exists());
	assert!(!after.exists());
}

#[test]
fn fatal_error_inside_pipe_cleans_relay() {
	let dir = relay_dir();
	let bad = Expression::simple("cat", [Arg::Unrecognized { tag: 7 }]);
	let expr = Expression::pipe(echo("hi"), bad);

	let err = quiet_in(&dir).evaluate(&expr).unwrap_err();
	assert_eq!(*err.kind(), ShErrKind::ConfigErr);
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn nested_pipes_clean_every_relay() {
	let dir = relay_dir();
	let expr = Expression::pipe(
		Expression::pipe(echo("x"), Expression::bare("cat")),
		Expression::pipe(Expression::bare("cat"), Expression::pipe(Expression::bare("cat"), Expression::bare("cat"))),
	);
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"x\n");
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn repeat_evaluation_is_identical() {
	let dir = relay_dir();
	let evaluator = quiet_in(&dir);
	let expr = Expression::pipe(
		Expression::concat(echo("a"), echo("b")),
		Expression::simple("sort", ["-r"]),
	);
	let first = evaluator.evaluate(&expr).unwrap();
	let second = evaluator.evaluate(&expr).unwrap();
	assert_eq!(first.as_bytes(), b"b\na\n");
	assert_eq!(first, second);
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn timeout_aborts_and_cleans_up() {
	let dir = relay_dir();
	let config = EvalConfig::default()
		.with_relay_dir(dir.path())
		.with_timeout(Some(Duration::from_millis(300)));
	let expr = Expression::pipe(echo("hi"), Expression::simple("sleep", ["5"]));

	let start = Instant::now();
	let err = Evaluator::quiet(config).evaluate(&expr).unwrap_err();
	assert_eq!(*err.kind(), ShErrKind::Timeout);
	assert!(start.elapsed() < Duration::from_secs(4));
	assert!(leftovers(&dir).is_empty());
}

#[test]
fn quiet_clears_echo_flag() {
	let dir = relay_dir();
	assert!(quiet_in(&dir).flags().is_empty());
	let loud = Evaluator::new(EvalConfig::default());
	assert!(loud.flags().contains(EvalFlags::ECHO));
}

#[test]
fn top_level_evaluate_returns_output() {
	let out = evaluate(&Expression::bare("true")).unwrap();
	assert!(out.is_empty());
	assert_eq!(out.status(), Some(ExitStatus::Exited(0)));
}

#[test]
fn pipe_skips_stale_relay_files() {
	let dir = relay_dir();
	let store = RelayStore::new(dir.path());
	let next_id = store.create().unwrap().id() + 1;
	for id in next_id..next_id + 512 {
		std::fs::write(store.path_for(id), b"stale").unwrap();
	}

	let expr = Expression::pipe(echo("hi"), Expression::bare("cat"));
	assert_eq!(bytes_of(&quiet_in(&dir), &expr), b"hi\n");
	assert_eq!(leftovers(&dir).len(), 512);
	assert_eq!(std::fs::read(store.path_for(next_id)).unwrap(), b"stale");
}

#[test]
fn relay_error_in_pipe_is_fatal() {
	let dir = relay_dir();
	let marks = relay_dir();
	let marker = marks.path().join("left-ran");
	let config = EvalConfig::default().with_relay_dir(dir.path().join("missing"));
	let expr = Expression::pipe(
		sh(&format!("touch '{}'; echo hi", marker.display())),
		Expression::bare("cat"),
	);

	let err = Evaluator::quiet(config).evaluate(&expr).unwrap_err();
	assert_eq!(*err.kind(), ShErrKind::RelayErr);
	assert!(err.is_fatal());
	assert!(marker.exists());
	assert!(leftovers(&dir).is_empty());
}
