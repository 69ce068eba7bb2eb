//! # Lifecycle Tests
//!
//! Verifies the `Unopened -> Open -> Closed` state machine, use after close, and
//! that failed opens leave nothing mapped.

use jetmmio_core::mem::{SimPage, SimulatedMemory};
use jetmmio_core::{FieldError, OpenError, PhysAddr, RegisterWindow, WindowState};

use crate::common::harness::{TestContext, init_tracing};
use crate::common::mocks::MockMemory;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// 1. State machine
// ══════════════════════════════════════════════════════════

#[test]
fn new_window_is_unopened() {
    let window = RegisterWindow::<SimPage>::new(0x1000);
    assert_eq!(window.state(), WindowState::Unopened);
    assert!(!window.is_open());
    assert_eq!(window.get_field(0, 0, 1), Err(FieldError::Closed));
}

#[test]
fn map_opens_window() {
    init_tracing();
    let memory = SimulatedMemory::new();
    let mut window = RegisterWindow::new(0x1000);
    window.map(&memory).unwrap();
    assert_eq!(window.state(), WindowState::Open);
    assert_eq!(memory.mapped_pages(), 1);
}

#[test]
fn close_transitions_to_closed_and_unmaps() {
    let mut ctx = TestContext::new(0x1000);
    assert_eq!(ctx.memory.mapped_pages(), 1);

    ctx.window.close().unwrap();

    assert_eq!(ctx.window.state(), WindowState::Closed);
    assert_eq!(ctx.memory.mapped_pages(), 0);
}

#[test]
fn close_twice_is_an_error() {
    let mut ctx = TestContext::new(0x1000);
    ctx.window.close().unwrap();
    assert_eq!(ctx.window.close(), Err(FieldError::Closed));
    assert_eq!(ctx.window.state(), WindowState::Closed);
}

#[test]
fn close_unopened_is_an_error() {
    let mut window = RegisterWindow::<SimPage>::new(0x1000);
    assert_eq!(window.close(), Err(FieldError::Closed));
    assert_eq!(window.state(), WindowState::Unopened);
}

#[test]
fn accessors_after_close_report_closed() {
    let mut ctx = TestContext::new(0x1000);
    ctx.window.close().unwrap();

    assert_eq!(ctx.window.set_field(4, 1, 0, 1), Err(FieldError::Closed));
    assert_eq!(ctx.window.get_field(4, 0, 1), Err(FieldError::Closed));
    assert_eq!(ctx.window.read_word(0), Err(FieldError::Closed));
    assert_eq!(ctx.window.write_word(0, 0), Err(FieldError::Closed));
}

/// Closed is checked before the parameters are.
#[test]
fn closed_takes_precedence_over_range() {
    let mut ctx = TestContext::new(0x1000);
    ctx.window.close().unwrap();
    assert_eq!(ctx.window.get_field(0, 40, 1), Err(FieldError::Closed));
}

#[test]
fn closed_window_cannot_be_remapped() {
    let mut ctx = TestContext::new(0x1000);
    ctx.window.close().unwrap();
    assert!(matches!(
        ctx.window.map(&ctx.memory),
        Err(OpenError::InvalidState(WindowState::Closed))
    ));
}

#[test]
fn open_window_cannot_be_mapped_again() {
    let mut ctx = TestContext::new(0x1000);
    assert!(matches!(
        ctx.window.map(&ctx.memory),
        Err(OpenError::InvalidState(WindowState::Open))
    ));
    assert_eq!(ctx.memory.mapped_pages(), 1);
}

#[test]
fn drop_releases_mapping() {
    let ctx = TestContext::new(0x1000);
    let extra = ctx.open(0x1004);
    assert_eq!(ctx.memory.mapped_pages(), 2);
    drop(extra);
    assert_eq!(ctx.memory.mapped_pages(), 1);
}

/// Register contents outlive the window that wrote them.
#[test]
fn writes_persist_after_close() {
    let mut ctx = TestContext::new(0x1000);
    ctx.window.set_field(0x10, 0xbeef, 0, 16).unwrap();
    ctx.window.close().unwrap();
    assert_eq!(ctx.peek(0x1010), 0xbeef);

    let reopened = ctx.open(0x1000);
    assert_eq!(reopened.get_field(0x10, 0, 16).unwrap(), 0xbeef);
}

// ══════════════════════════════════════════════════════════
// 2. Open failures
// ══════════════════════════════════════════════════════════

#[test]
fn denied_device_reports_permission_denied() {
    init_tracing();
    let memory = SimulatedMemory::new();
    memory.deny_access();

    let result = RegisterWindow::open_in(&memory, 0x6000_d000);

    assert!(matches!(result, Err(OpenError::PermissionDenied { .. })));
    assert_eq!(memory.mapped_pages(), 0);
}

#[test]
fn refused_mapping_reports_map_failed() {
    let memory = SimulatedMemory::new();
    memory.fail_mappings();

    let result = RegisterWindow::open_in(&memory, 0x6000_d004);

    match result {
        Err(OpenError::MapFailed { page_base, .. }) => {
            assert_eq!(page_base, PhysAddr::new(0x6000_d000));
        }
        other => panic!("expected MapFailed, got {other:?}"),
    }
    assert_eq!(memory.mapped_pages(), 0);
}

#[test]
fn failed_map_leaves_window_unopened() {
    let memory = SimulatedMemory::new();
    memory.deny_access();
    let mut window = RegisterWindow::new(0x1000);

    assert!(window.map(&memory).is_err());
    assert_eq!(window.state(), WindowState::Unopened);

    memory.allow_access();
    window.map(&memory).unwrap();
    assert!(window.is_open());
}

#[test]
fn backend_receives_page_base() {
    let mut memory = MockMemory::new();
    let _ = memory
        .expect_map_page()
        .withf(|base| *base == PhysAddr::new(0x7000_3000))
        .times(1)
        .returning(|base| {
            Err(OpenError::PermissionDenied {
                path: format!("mock:{base}").into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

    let result = RegisterWindow::open_in(&memory, 0x7000_3014);

    assert!(matches!(result, Err(OpenError::PermissionDenied { .. })));
}
