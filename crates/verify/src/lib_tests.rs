// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use procsim::{Behavior, LaunchOptions, Launcher, MismatchKind, ProcessHandle, Simulator};
use std::io::Write;

fn record_run(path: &Path) {
    let sim = Simulator::with_capture(CaptureLog::with_file(path).unwrap());
    sim.register(["build"], Behavior::new().poll_count(1));
    sim.register(["test", "--all"], Behavior::new().returncode(1));

    let mut build = sim.launch(["build"], LaunchOptions::default()).unwrap();
    let mut test = sim.launch(["test", "--all"], LaunchOptions::default()).unwrap();
    test.wait(None).unwrap();
    build.poll().unwrap();
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_replay_layouts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.jsonl");
    record_run(&path);

    let capture = load_capture(&path).await.unwrap();
    assert_eq!(
        replay(&capture, ReplayLayout::Timeline),
        "#0 spawn [\"build\"]\n#1 spawn [\"test\", \"--all\"]\n#1 wait()\n#0 poll()\n"
    );
    assert_eq!(
        replay(&capture, ReplayLayout::Grouped),
        "spawn [\"build\"]\n    poll()\nspawn [\"test\", \"--all\"]\n    wait()\n"
    );
}

#[tokio::test]
async fn test_check_match_and_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let capture_path = dir.path().join("capture.jsonl");
    record_run(&capture_path);
    let capture = load_capture(&capture_path).await.unwrap();

    let matching = write_file(
        dir.path(),
        "ok.toml",
        r#"
        [[expect]]
        command = "build"
        methods = [{ method = "poll" }]

        [[expect]]
        command = "test --all"
        methods = [{ method = "wait" }]
        "#,
    );
    let scenario = load_scenario(&matching).await.unwrap();
    check(&capture, &scenario).unwrap();

    let missing = write_file(
        dir.path(),
        "missing.json",
        r#"{"expect": [{"command": "build", "methods": [{"method": "poll"}]}]}"#,
    );
    let scenario = load_scenario(&missing).await.unwrap();
    let err = check(&capture, &scenario).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.kind, MismatchKind::UnexpectedCall);
    assert!(err.diff.contains("+spawn [\"test\", \"--all\"]"), "{}", err.diff);
}

#[tokio::test]
async fn test_missing_capture_file() {
    let err = load_capture(Path::new("/nonexistent/capture.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/capture.jsonl"));
}

#[tokio::test]
async fn test_corrupt_capture_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "bad.jsonl", "\n{not json}\n");

    let err = load_capture(&path).await.unwrap_err();
    match err {
        VerifyError::Capture {
            source: LoadError::Parse { line, .. },
            ..
        } => assert_eq!(line, 2),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "bad.toml",
        r#"
        [[expect]]
        command = "ls"
        metods = []
        "#,
    );

    let err = load_scenario(&path).await.unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Scenario {
            source: ScenarioError::Toml(_),
            ..
        }
    ));
}
