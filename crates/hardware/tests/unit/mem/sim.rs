//! # Simulated Memory Tests

use jetmmio_core::mem::{MappedPage, PhysMemory, SimulatedMemory};
use jetmmio_core::{OpenError, PhysAddr};
use pretty_assertions::assert_eq;

#[test]
fn pages_start_zeroed() {
    let memory = SimulatedMemory::new();
    assert_eq!(memory.peek_word(PhysAddr::new(0x6000_d024)), 0);
}

#[test]
fn poke_then_peek() {
    let memory = SimulatedMemory::new();
    memory.poke_word(PhysAddr::new(0x1008), 0xcafe_f00d);
    assert_eq!(memory.peek_word(PhysAddr::new(0x1008)), 0xcafe_f00d);
    // Sub-word addresses select the containing word.
    assert_eq!(memory.peek_word(PhysAddr::new(0x100b)), 0xcafe_f00d);
    assert_eq!(memory.peek_word(PhysAddr::new(0x100c)), 0);
}

#[test]
fn pages_are_created_lazily() {
    let memory = SimulatedMemory::new();
    assert_eq!(memory.page_count(), 0);
    let _ = memory.peek_word(PhysAddr::new(0x1000));
    let _ = memory.peek_word(PhysAddr::new(0x1ffc));
    assert_eq!(memory.page_count(), 1);
    let _ = memory.peek_word(PhysAddr::new(0x2000));
    assert_eq!(memory.page_count(), 2);
}

#[test]
fn mappings_share_the_page() {
    let memory = SimulatedMemory::new();
    let first = memory.map_page(PhysAddr::new(0x3000)).unwrap();
    let second = memory.map_page(PhysAddr::new(0x3000)).unwrap();

    assert_eq!(first.as_ptr(), second.as_ptr());
    assert_eq!(first.page_base(), PhysAddr::new(0x3000));
    assert_eq!(memory.mapped_pages(), 2);

    drop(first);
    assert_eq!(memory.mapped_pages(), 1);
    drop(second);
    assert_eq!(memory.mapped_pages(), 0);
}

#[test]
fn distinct_pages_are_distinct() {
    let memory = SimulatedMemory::new();
    let low = memory.map_page(PhysAddr::new(0x3000)).unwrap();
    let high = memory.map_page(PhysAddr::new(0x4000)).unwrap();
    assert_ne!(low.as_ptr(), high.as_ptr());
}

#[test]
fn injected_failures_and_recovery() {
    let memory = SimulatedMemory::new();

    memory.deny_access();
    assert!(matches!(
        memory.map_page(PhysAddr::new(0x1000)),
        Err(OpenError::PermissionDenied { .. })
    ));

    memory.allow_access();
    memory.fail_mappings();
    assert!(matches!(
        memory.map_page(PhysAddr::new(0x1000)),
        Err(OpenError::MapFailed { .. })
    ));

    memory.allow_access();
    assert!(memory.map_page(PhysAddr::new(0x1000)).is_ok());
    assert_eq!(memory.mapped_pages(), 0);
}

#[test]
fn backend_usable_through_reference() {
    let memory = SimulatedMemory::new();
    let by_ref = &memory;
    let page = by_ref.map_page(PhysAddr::new(0x5000)).unwrap();
    assert_eq!(page.page_base(), PhysAddr::new(0x5000));
    assert_eq!(memory.mapped_pages(), 1);
}
