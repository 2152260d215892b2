//! Process context lifecycle: start, input, completion, reset

use cryypt_smime::{LoggingTransformer, ProcessContext, SmimeError, TerminalStatus, ToolArgs};
use std::time::{Duration, Instant};

fn shell(script: &str) -> ToolArgs {
    ToolArgs::new().option("-c", script)
}

#[tokio::test]
async fn test_second_start_while_running_fails_until_reset() {
    let mut context = ProcessContext::new("sh");
    context.start(&shell("sleep 5")).expect("first start");
    assert!(context.is_running());

    let second = context.start(&shell("true"));
    assert!(matches!(second, Err(SmimeError::AlreadyRunning)));

    context.reset();
    assert!(!context.is_running());

    context.start(&shell("printf reused")).expect("start after reset");
    let status = context
        .wait_for_completion(Some(Duration::from_secs(10)))
        .await
        .expect("wait");
    assert!(status.success());
    assert_eq!(context.output(), b"reused");
}

#[tokio::test]
async fn test_restart_after_completed_run_without_reset() {
    let mut context = ProcessContext::new("sh");
    context.start(&shell("printf first")).expect("start");
    context.wait_for_completion(None).await.expect("wait");
    assert_eq!(context.output(), b"first");

    context.start(&shell("printf second")).expect("restart");
    context.wait_for_completion(None).await.expect("wait");
    assert_eq!(context.output(), b"second");
}

#[test]
fn test_reset_on_fresh_context_is_noop() {
    let mut context = ProcessContext::new("sh");
    context.reset();
    context.reset();
    assert!(context.output().is_empty());
    assert!(context.diagnostic().is_empty());
    assert_eq!(context.status(), None);
}

#[tokio::test]
async fn test_input_is_echoed_to_output() {
    let mut context = ProcessContext::new("cat");
    context.start(&ToolArgs::new()).expect("start");
    context.write_input(b"binary\0safe\xff").await.expect("write");
    context.close_input();

    let status = context.wait_for_completion(None).await.expect("wait");
    assert_eq!(status, TerminalStatus::Exited(0));
    assert_eq!(context.take_output(), b"binary\0safe\xff".to_vec());
    assert!(context.output().is_empty());
}

#[tokio::test]
async fn test_large_input_does_not_deadlock() {
    let payload: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();

    let mut context = ProcessContext::new("cat");
    context.start(&ToolArgs::new()).expect("start");
    context.write_input(&payload).await.expect("write");

    let status = context
        .wait_for_completion(Some(Duration::from_secs(30)))
        .await
        .expect("wait");
    assert!(status.success());
    assert_eq!(context.output().len(), payload.len());
    assert_eq!(context.output(), payload.as_slice());
}

#[tokio::test]
async fn test_nonzero_exit_captures_diagnostic() {
    let mut context = ProcessContext::new("sh");
    context
        .start(&shell("printf partial; echo 'something broke' >&2; exit 3"))
        .expect("start");

    let status = context.wait_for_completion(None).await.expect("wait");
    assert_eq!(status, TerminalStatus::Exited(3));
    assert!(!status.success());
    assert_eq!(context.diagnostic(), "something broke\n");

    context.reset();
    assert!(context.output().is_empty());
    assert!(context.diagnostic().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_signal_termination_is_not_success() {
    let mut context = ProcessContext::new("sh");
    context.start(&shell("kill -KILL $$")).expect("start");

    let status = context.wait_for_completion(None).await.expect("wait");
    assert_eq!(status, TerminalStatus::Signaled(9));
    assert!(!status.success());
}

#[tokio::test]
async fn test_timeout_kills_process() {
    let mut context = ProcessContext::new("sh");
    context.start(&shell("sleep 30")).expect("start");

    let result = context
        .wait_for_completion(Some(Duration::from_millis(200)))
        .await;
    match result {
        Err(SmimeError::Timeout(limit)) => assert_eq!(limit, Duration::from_millis(200)),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(!context.is_running());

    // The context is usable again after a timeout
    context.start(&shell("true")).expect("start after timeout");
    assert!(context.wait_for_completion(None).await.expect("wait").success());
}

#[tokio::test]
async fn test_run_limit_bounds_blocked_input() {
    LoggingTransformer::init_test();
    let limit = Duration::from_millis(500);
    let mut context = ProcessContext::new("sh").with_timeout(Some(limit));
    context.start(&shell("exec sleep 30")).expect("start");

    // Far larger than a pipe buffer and never read by the child
    let payload = vec![b'a'; 4 * 1024 * 1024];
    let started = Instant::now();
    let result = context.write_input(&payload).await;

    match result {
        Err(SmimeError::Timeout(expired)) => assert_eq!(expired, limit),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(!context.is_running());
    assert_eq!(context.status(), None);
}

#[tokio::test]
async fn test_run_limit_covers_output_drain() {
    LoggingTransformer::init_test();
    let limit = Duration::from_millis(500);
    let mut context = ProcessContext::new("sh").with_timeout(Some(limit));
    // The shell exits at once but a background child keeps stdout open
    context.start(&shell("sleep 5 & exit 0")).expect("start");

    let result = context.wait_for_completion(None).await;
    match result {
        Err(SmimeError::Timeout(expired)) => assert_eq!(expired, limit),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(context.status(), None);
    assert!(context.output().is_empty());
}

#[tokio::test]
async fn test_wait_without_start_fails() {
    let mut context = ProcessContext::new("sh");
    let result = context.wait_for_completion(None).await;
    assert!(matches!(result, Err(SmimeError::NotStarted)));

    let write = context.write_input(b"data").await;
    assert!(matches!(write, Err(SmimeError::NotStarted)));
}

#[tokio::test]
async fn test_missing_program_reports_spawn_error() {
    let mut context = ProcessContext::new("/nonexistent/cmsutil-for-tests");
    match context.start(&ToolArgs::new()) {
        Err(SmimeError::Spawn { program, .. }) => {
            assert_eq!(program, std::path::PathBuf::from("/nonexistent/cmsutil-for-tests"))
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
    assert!(!context.is_running());
}

#[tokio::test]
async fn test_leading_args_precede_invocation_args() {
    let mut context = ProcessContext::new("sh")
        .with_leading_args(vec!["-c".to_string(), "printf '%s,%s' \"$0\" \"$1\"".to_string()]);
    context
        .start(&ToolArgs::new().flag("zero").flag("one"))
        .expect("start");
    context.wait_for_completion(None).await.expect("wait");
    assert_eq!(context.output(), b"zero,one");
}
