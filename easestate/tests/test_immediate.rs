use crate::common::{init_tracing, NetworkError};
use easestate::mock::MockOperation;
use easestate::{create_async_state, try_create_async_state, AsyncStateOptions};
use std::time::Duration;

mod common;

#[tokio::test]
async fn test_immediate_runs_once_without_arguments() {
    init_tracing();
    let mock: MockOperation<(), String, NetworkError> = MockOperation::new();
    mock.push_ok("ok".to_string());

    let state = create_async_state(mock.operation(), AsyncStateOptions::new().immediate(true));

    // Started, but the factory did not wait for it
    assert!(state.loading());
    assert_eq!(state.invocations(), 1);

    let settled = state.settled().await;
    assert_eq!(settled.data.as_deref(), Some("ok"));
    assert!(settled.error.is_none());
    assert_eq!(mock.calls(), vec![()]);
}

#[tokio::test]
async fn test_immediate_does_not_block_construction() {
    init_tracing();
    let mock: MockOperation<(), u8, NetworkError> = MockOperation::new();
    mock.push_ok(7).set_delay(Duration::from_millis(20));

    let state = create_async_state(mock.operation(), AsyncStateOptions::new().immediate(true));
    assert!(state.data().is_none());
    assert!(state.loading());

    assert_eq!(state.settled().await.data, Some(7));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_immediate_failure_is_captured() {
    init_tracing();
    let mock: MockOperation<(), u8, NetworkError> = MockOperation::new();
    mock.push_err(NetworkError("Network failure".to_string()));

    let state = create_async_state(mock.operation(), AsyncStateOptions::new().immediate(true));
    let settled = state.settled().await;

    assert!(settled.data.is_none());
    assert_eq!(*settled.error.unwrap(), NetworkError("Network failure".to_string()));
}

#[tokio::test]
async fn test_lazy_options_never_call_operation() {
    init_tracing();
    let mock: MockOperation<(), u8, NetworkError> = MockOperation::new();

    let state = create_async_state(mock.operation(), AsyncStateOptions::default());
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(mock.call_count(), 0);
    assert_eq!(state.invocations(), 0);
    assert!(!state.loading());
}

#[test]
fn test_immediate_without_runtime_is_reported() {
    let mock: MockOperation<(), u8, NetworkError> = MockOperation::new();
    mock.push_ok(1);

    let created = try_create_async_state(mock.operation(), AsyncStateOptions::new().immediate(true));

    assert!(created.is_err_and(|e| e.is_no_runtime()));
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_lazy_construction_needs_no_runtime() {
    let mock: MockOperation<(), u8, NetworkError> = MockOperation::new();

    let state = try_create_async_state(mock.operation(), AsyncStateOptions::default()).unwrap();

    assert!(!state.loading());
    assert!(state.data().is_none());
}
