// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::error::ProcessError;
use procsim_capture::StdioMode;
use rstest::rstest;

fn launch(sim: &Simulator, args: &[&str]) -> SimulatedProcess {
    sim.launch(args, LaunchOptions::default()).unwrap()
}

#[test]
fn test_help_scenario() {
    let sim = Simulator::new();
    sim.register(
        ["myapp", "--help"],
        Behavior::new().returncode(0).stdout("usage: myapp"),
    );

    let mut process = launch(&sim, &["myapp", "--help"]);
    let (stdout, stderr) = process.communicate(None, None).unwrap();

    assert_eq!(stdout, b"usage: myapp");
    assert_eq!(stderr, b"");
    assert_eq!(process.returncode(), Some(0));
}

#[test]
fn test_poll_scenario() {
    let sim = Simulator::new();
    sim.register(["myapp"], Behavior::new().poll_count(2).returncode(1));

    let mut process = launch(&sim, &["myapp"]);
    let polls: Vec<Option<i32>> = (0..3).map(|_| process.poll().unwrap()).collect();

    assert_eq!(polls, vec![None, None, Some(1)]);
}

#[test]
fn test_unregistered_scenario() {
    let sim = Simulator::new();

    match sim.launch(["unregistered"], LaunchOptions::default()) {
        Err(LaunchError::UnexpectedInvocation { command, .. }) => {
            assert_eq!(command, CommandSignature::from(["unregistered"]));
        }
        Err(other) => panic!("Expected unexpected invocation, got {:?}", other),
        Ok(_) => panic!("Unregistered command must not launch"),
    }
}

#[test]
fn test_failed_dispatch_leaves_log_unchanged() {
    let sim = Simulator::new();
    sim.register(["ok"], Behavior::new());
    launch(&sim, &["ok"]);

    assert!(sim.launch(["nope"], LaunchOptions::default()).is_err());
    assert!(sim.launch(["ok"], LaunchOptions::default()).is_err());

    assert_eq!(sim.call_count(), 1);
    assert_eq!(sim.capture().len(), 1);
}

#[test]
fn test_exhausted_is_distinct_from_unexpected() {
    let sim = Simulator::new();
    sim.register(["once"], Behavior::new());
    launch(&sim, &["once"]);

    let err = sim.launch(["once"], LaunchOptions::default()).unwrap_err();
    assert!(matches!(err, LaunchError::ExhaustedBehavior { consumed: 1, .. }));
    assert_eq!(err.command(), Some(&CommandSignature::from(["once"])));
}

#[test]
fn test_fifo_with_independent_state() {
    let sim = Simulator::new();
    sim.register(["job"], Behavior::new().stdout("first").poll_count(1).returncode(1));
    sim.register(["job"], Behavior::new().stdout("second").returncode(2));

    let mut a = launch(&sim, &["job"]);
    let mut b = launch(&sim, &["job"]);

    let mut out = String::new();
    b.stdout().unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "second");

    // Reading b's stream left a's cursor untouched
    let mut out = String::new();
    a.stdout().unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "first");

    assert_eq!(a.poll().unwrap(), None);
    assert_eq!(b.poll().unwrap(), Some(2));
    assert_eq!(a.poll().unwrap(), Some(1));

    assert_eq!(a.id(), 0);
    assert_eq!(b.id(), 1);
}

#[test]
fn test_call_log_entries() {
    let sim = Simulator::new();
    sim.register(["a"], Behavior::new().pid(10));
    sim.register(["b"], Behavior::new().returncode(5));

    let options = LaunchOptions::default().cwd("/tmp").stdin(StdioMode::Null);
    let mut a = sim.launch(["a"], options.clone()).unwrap();
    let mut b = launch(&sim, &["b"]);
    a.poll().unwrap();
    b.kill().unwrap();

    let calls = sim.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].index, 0);
    assert_eq!(calls[0].command, CommandSignature::from(["a"]));
    assert_eq!(calls[0].options, options);
    assert_eq!(calls[0].process.pid(), 10);
    assert_eq!(calls[0].process.calls(), vec![MethodCall::Poll]);
    assert_eq!(calls[0].process.returncode(), Some(0));
    assert_eq!(calls[1].process.calls(), vec![MethodCall::Kill]);
    assert_eq!(calls[1].process.returncode(), None);
}

#[test]
fn test_log_sees_calls_after_process_dropped() {
    let sim = Simulator::new();
    sim.register(["a"], Behavior::new());
    {
        let mut process = launch(&sim, &["a"]);
        process.wait(None).unwrap();
    }
    assert_eq!(
        sim.calls()[0].process.calls(),
        vec![MethodCall::Wait { timeout: None }]
    );
}

#[test]
fn test_capture_interleaves_processes() {
    let sim = Simulator::new();
    sim.register(["a"], Behavior::new());
    sim.register(["b"], Behavior::new());

    let mut a = launch(&sim, &["a"]);
    let mut b = launch(&sim, &["b"]);
    b.terminate().unwrap();
    a.send_signal(2).unwrap();

    assert_eq!(
        sim.capture().replay(),
        "#0 spawn [\"a\"]\n#1 spawn [\"b\"]\n#1 terminate()\n#0 send_signal(2)\n"
    );
}

#[test]
fn test_replay_grouped_by_launch() {
    let sim = Simulator::new();
    sim.register(["a"], Behavior::new());
    sim.register(["b"], Behavior::new());

    let mut a = launch(&sim, &["a"]);
    let mut b = launch(&sim, &["b"]);
    b.terminate().unwrap();
    a.communicate(Some(b"in"), None).unwrap();

    assert_eq!(
        sim.replay(),
        "spawn [\"a\"]\n    communicate(input=b\"in\")\nspawn [\"b\"]\n    terminate()\n"
    );
}

#[test]
fn test_assert_calls() {
    let sim = Simulator::new();
    sim.register(["svc", "start"], Behavior::new().poll_count(1));

    let mut process = launch(&sim, &["svc", "start"]);
    process.poll().unwrap();
    process.send_signal(15).unwrap();
    process.wait(None).unwrap();

    sim.assert_calls(&[ExpectedCall::new(["svc", "start"])
        .poll()
        .send_signal(15)
        .wait(None)])
        .unwrap();

    let err = sim
        .assert_calls(&[ExpectedCall::new(["svc", "start"]).poll().wait(None)])
        .unwrap_err();
    assert_eq!(err.kind, crate::MismatchKind::MethodMismatch { position: 1 });
}

#[test]
fn test_assert_all_consumed() {
    let sim = Simulator::new();
    sim.register(["a"], Behavior::new());
    sim.register(["a"], Behavior::new());
    launch(&sim, &["a"]);

    let err = sim.assert_all_consumed().unwrap_err();
    assert_eq!(err.remaining, vec![(CommandSignature::from(["a"]), 1)]);
    assert_eq!(err.to_string(), r#"Unconsumed behaviors: ["a"] x1"#);

    launch(&sim, &["a"]);
    sim.assert_all_consumed().unwrap();
}

#[test]
fn test_dynamic_behavior() {
    let sim = Simulator::new();
    sim.register_dynamic(["echo", "hello"], |command, _| {
        Behavior::new().stdout(format!("{}\n", command.args()[1..].join(" ")))
    });

    let mut process = launch(&sim, &["echo", "hello"]);
    let (stdout, _) = process.communicate(None, None).unwrap();
    assert_eq!(stdout, b"hello\n");
}

#[test]
fn test_stdin_access_fails_distinctly() {
    let sim = Simulator::new();
    sim.register(["cat"], Behavior::new());
    let mut process = launch(&sim, &["cat"]);

    assert!(matches!(
        process.stdin(),
        Err(ProcessError::Unsupported { operation: "stdin" })
    ));
}

#[rstest]
#[case("git status", &["git", "status"])]
#[case("  ls  ", &["ls"])]
fn test_command_line_registration(#[case] line: &str, #[case] args: &[&str]) {
    let sim = Simulator::new();
    sim.register(line, Behavior::new());
    assert!(sim.launch(args, LaunchOptions::default()).is_ok());
}

#[test]
fn test_launch_through_reference() {
    fn run<L: Launcher>(launcher: L) -> i32 {
        let mut process = launcher.launch(["tool"], LaunchOptions::default()).unwrap();
        process.wait(None).unwrap()
    }

    let sim = Simulator::new();
    sim.register(["tool"], Behavior::new().returncode(9));
    assert_eq!(run(&sim), 9);
    assert_eq!(sim.call_count(), 1);
}

#[test]
fn test_simulators_sharing_capture_keep_distinct_process_ids() {
    let capture = CaptureLog::new();
    let a = Simulator::with_capture(capture.clone());
    let b = Simulator::with_capture(capture.clone());
    a.register(["one"], Behavior::new().poll_count(1));
    b.register(["two"], Behavior::new());

    let mut one = launch(&a, &["one"]);
    let two = launch(&b, &["two"]);
    one.poll().unwrap();

    assert_eq!(one.id(), 0);
    assert_eq!(two.id(), 1);
    assert_eq!(a.calls()[0].index, 0);
    assert_eq!(b.calls()[0].index, 0);
    assert_eq!(b.calls()[0].process_id, 1);
    assert_eq!(
        capture.replay(),
        "#0 spawn [\"one\"]\n#1 spawn [\"two\"]\n#0 poll()\n"
    );

    let recorded = RecordedInvocation::from_capture(&capture);
    assert_eq!(recorded[0].methods, vec![MethodCall::Poll]);
    assert!(recorded[1].methods.is_empty());
}

#[test]
fn test_prefilled_capture_is_not_reused() {
    let earlier = CaptureLog::new();
    earlier.record(0, procsim_capture::CapturedEvent::Spawn {
        args: vec!["old".to_string()],
        options: LaunchOptions::default(),
    });
    let sim = Simulator::with_capture(CaptureLog::from_calls(earlier.calls()));
    sim.register(["new"], Behavior::new());

    let mut process = launch(&sim, &["new"]);
    process.kill().unwrap();

    assert_eq!(process.id(), 1);
    let recorded = RecordedInvocation::from_capture(sim.capture());
    assert!(recorded[0].methods.is_empty());
    assert_eq!(recorded[1].methods, vec![MethodCall::Kill]);
}

#[test]
fn test_file_capture_matches_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.jsonl");
    let sim = Simulator::with_capture(CaptureLog::with_file(&path).unwrap());
    sim.register(["a"], Behavior::new());
    launch(&sim, &["a"]).poll().unwrap();

    let loaded = CaptureLog::load(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(RecordedInvocation::from_capture(&loaded), sim.recorded());
}
