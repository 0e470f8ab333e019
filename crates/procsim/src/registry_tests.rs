// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;

fn sig(args: &[&str]) -> CommandSignature {
    CommandSignature::from(args)
}

fn fixed(source: BehaviorSource) -> Behavior {
    match source {
        BehaviorSource::Fixed(behavior) => behavior,
        other => panic!("Expected fixed behavior, got {:?}", other),
    }
}

#[test]
fn test_register_and_consume() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["ls"]), Behavior::new().stdout("a\nb\n"));

    let behavior = fixed(registry.consume(&sig(&["ls"])).unwrap());
    assert_eq!(behavior.stdout, b"a\nb\n");
    assert!(registry.is_empty());
}

#[test]
fn test_consume_is_fifo() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["job"]), Behavior::new().returncode(1));
    registry.register(sig(&["job"]), Behavior::new().returncode(2));
    registry.register(sig(&["job"]), Behavior::new().returncode(3));

    let codes: Vec<i32> = (0..3)
        .map(|_| fixed(registry.consume(&sig(&["job"])).unwrap()).returncode)
        .collect();
    assert_eq!(codes, vec![1, 2, 3]);
}

#[test]
fn test_unregistered_is_unexpected() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["git", "push"]), Behavior::new());

    match registry.consume(&sig(&["git", "pull"])) {
        Err(LaunchError::UnexpectedInvocation {
            command,
            registered,
        }) => {
            assert_eq!(command, sig(&["git", "pull"]));
            assert_eq!(registered, vec![sig(&["git", "push"])]);
        }
        other => panic!("Expected unexpected invocation, got {:?}", other),
    }

    // A failed lookup does not disturb the queued behavior
    assert_eq!(registry.remaining(&sig(&["git", "push"])), 1);
}

#[test]
fn test_exhausted_after_all_consumed() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["make"]), Behavior::new());
    registry.register(sig(&["make"]), Behavior::new());
    registry.consume(&sig(&["make"])).unwrap();
    registry.consume(&sig(&["make"])).unwrap();

    match registry.consume(&sig(&["make"])) {
        Err(LaunchError::ExhaustedBehavior { command, consumed }) => {
            assert_eq!(command, sig(&["make"]));
            assert_eq!(consumed, 2);
        }
        other => panic!("Expected exhausted behavior, got {:?}", other),
    }
}

#[test]
fn test_prefix_does_not_match() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["git"]), Behavior::new());

    assert!(matches!(
        registry.consume(&sig(&["git", "status"])),
        Err(LaunchError::UnexpectedInvocation { .. })
    ));
}

#[test]
fn test_pending_in_registration_order() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["b"]), Behavior::new());
    registry.register(sig(&["a"]), Behavior::new());
    registry.register(sig(&["c"]), Behavior::new());
    registry.consume(&sig(&["a"])).unwrap();

    assert_eq!(registry.pending(), vec![sig(&["b"]), sig(&["c"])]);
}

#[test]
fn test_unconsumed_counts() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["x"]), Behavior::new());
    registry.register(sig(&["x"]), Behavior::new());
    registry.register(sig(&["y"]), Behavior::new());
    registry.consume(&sig(&["y"])).unwrap();

    assert_eq!(registry.unconsumed(), vec![(sig(&["x"]), 2)]);
}

#[test]
fn test_dynamic_behavior_sees_invocation() {
    let mut registry = BehaviorRegistry::new();
    registry.register_dynamic(sig(&["echo", "hi"]), |command, options| {
        Behavior::new()
            .stdout(command.args()[1..].join(" "))
            .returncode(options.env.len() as i32)
    });

    let source = registry.consume(&sig(&["echo", "hi"])).unwrap();
    let options = LaunchOptions::default().env("A", "1");
    let behavior = source.resolve(&sig(&["echo", "hi"]), &options);
    assert_eq!(behavior.stdout, b"hi");
    assert_eq!(behavior.returncode, 1);
}

#[test]
fn test_unexpected_message_lists_registered() {
    let mut registry = BehaviorRegistry::new();
    registry.register(sig(&["a", "1"]), Behavior::new());

    let err = registry.consume(&sig(&["b"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Unexpected invocation: ["b"] (registered: ["a", "1"])"#
    );
}

#[test]
fn test_unexpected_message_empty_registry() {
    let mut registry = BehaviorRegistry::new();
    let err = registry.consume(&sig(&["unregistered"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Unexpected invocation: ["unregistered"] (no commands registered)"#
    );
}

proptest! {
    #[test]
    fn consumes_exactly_registered_count(count in 0usize..20) {
        let mut registry = BehaviorRegistry::new();
        for i in 0..count {
            registry.register(sig(&["cmd"]), Behavior::new().returncode(i as i32));
        }
        for i in 0..count {
            let behavior = fixed(registry.consume(&sig(&["cmd"])).unwrap());
            prop_assert_eq!(behavior.returncode, i as i32);
        }
        let exhausted = matches!(
            registry.consume(&sig(&["cmd"])),
            Err(LaunchError::ExhaustedBehavior { .. })
        );
        let unexpected = matches!(
            registry.consume(&sig(&["cmd"])),
            Err(LaunchError::UnexpectedInvocation { .. })
        );
        let distinct_error = if count == 0 { unexpected } else { exhausted };
        prop_assert!(distinct_error);
    }
}
