//! # Registry Tests
//!
//! Verifies window caching, failure handling, and that concurrent field updates
//! through the registry never lose each other's bits.

use std::thread;

use jetmmio_core::mem::SimulatedMemory;
use jetmmio_core::{Field, FieldError, PhysAddr, WindowRegistry};
use pretty_assertions::assert_eq;

use crate::common::harness::init_tracing;

const UPDATES: u32 = 200;

fn registry() -> WindowRegistry<SimulatedMemory> {
    init_tracing();
    WindowRegistry::new(SimulatedMemory::new())
}

// ══════════════════════════════════════════════════════════
// 1. Caching
// ══════════════════════════════════════════════════════════

#[test]
fn same_base_returns_same_window() {
    let registry = registry();
    let first = registry.window(0x6000_d000).unwrap();
    let second = registry.window(0x6000_d000).unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.memory().mapped_pages(), 1);
}

#[test]
fn aliasing_bases_share_registers() {
    let registry = registry();
    let page = registry.window(0x1000).unwrap();
    let inner = registry.window(0x1020).unwrap();

    inner.set_field(0x4, 0x3c, 8, 8).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(page.get_field(0x24, 8, 8).unwrap(), 0x3c);
    assert_eq!(page.physical_base(), PhysAddr::new(0x1000));
}

#[test]
fn failed_open_is_not_cached() {
    let registry = registry();
    registry.memory().deny_access();
    assert!(registry.window(0x1000).is_err());
    assert!(registry.is_empty());

    registry.memory().allow_access();
    assert!(registry.window(0x1000).is_ok());
    assert_eq!(registry.len(), 1);
}

#[test]
fn close_all_closes_outstanding_handles() {
    let registry = registry();
    let gpio = registry.window(0x6000_d000).unwrap();
    let _pinmux = registry.window(0x7000_3000).unwrap();

    assert_eq!(registry.close_all(), 2);

    assert!(registry.is_empty());
    assert_eq!(gpio.get_field(0, 0, 1), Err(FieldError::Closed));
    assert_eq!(registry.memory().mapped_pages(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Updates
// ══════════════════════════════════════════════════════════

#[test]
fn update_masks_and_returns_written_value() {
    let registry = registry();
    let window = registry.window(0x1000).unwrap();
    let field = Field::new(0x10, 4, 4);
    window.write(field, 0xe).unwrap();

    assert_eq!(window.update(field, |v| v + 3).unwrap(), 0x1);
    assert_eq!(window.read(field).unwrap(), 0x1);
    assert_eq!(window.get_field(0x10, 0, 32).unwrap(), 0x10);
}

#[test]
fn update_reports_field_errors() {
    let registry = registry();
    let window = registry.window(0x1000).unwrap();
    assert_eq!(
        window.update(Field::new(0x2, 0, 1), |v| v),
        Err(FieldError::OutOfRange {
            offset: 0x2,
            base_bit: 0,
            width: 1,
        })
    );
}

/// Four threads each own one byte of the same register and increment it.
#[test]
fn concurrent_updates_to_one_word_are_not_lost() {
    let registry = registry();
    let window = registry.window(0x1000).unwrap();

    thread::scope(|s| {
        for lane in 0..4 {
            let window = &window;
            let _ = s.spawn(move || {
                let field = Field::new(0x40, lane * 8, 8);
                for _ in 0..UPDATES {
                    let _ = window.update(field, |v| v + 1).unwrap();
                }
            });
        }
    });

    assert_eq!(window.get_field(0x40, 0, 32).unwrap(), UPDATES * 0x0101_0101);
}

/// Windows at different bases on one page serialise on the same lock.
#[test]
fn concurrent_updates_through_aliasing_windows() {
    let registry = registry();
    let low = registry.window(0x1000).unwrap();
    let high = registry.window(0x1800).unwrap();

    thread::scope(|s| {
        let _ = s.spawn(|| {
            for _ in 0..UPDATES {
                let _ = low.update(Field::new(0x800, 0, 16), |v| v + 1).unwrap();
            }
        });
        let _ = s.spawn(|| {
            for _ in 0..UPDATES {
                let _ = high.update(Field::new(0, 16, 16), |v| v + 1).unwrap();
            }
        });
    });

    assert_eq!(low.get_field(0x800, 0, 32).unwrap(), (UPDATES << 16) | UPDATES);
    assert_eq!(registry.memory().peek_word(PhysAddr::new(0x1800)), (UPDATES << 16) | UPDATES);
}
