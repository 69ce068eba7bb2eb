use jetmmio_core::mem::{SimPage, SimulatedMemory};
use jetmmio_core::{PhysAddr, RegisterWindow};

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A simulated address space with one window opened on it.
pub struct TestContext {
    pub memory: SimulatedMemory,
    pub window: RegisterWindow<SimPage>,
}

impl TestContext {
    /// Opens a window at `base` over fresh simulated memory.
    pub fn new(base: u32) -> Self {
        init_tracing();
        let memory = SimulatedMemory::new();
        let window = RegisterWindow::open_in(&memory, base).unwrap();
        Self { memory, window }
    }

    /// Opens a second window at `base` over the same memory.
    pub fn open(&self, base: u32) -> RegisterWindow<SimPage> {
        RegisterWindow::open_in(&self.memory, base).unwrap()
    }

    /// Word at physical address `addr`, bypassing the window.
    pub fn peek(&self, addr: u32) -> u32 {
        self.memory.peek_word(PhysAddr::new(addr))
    }

    /// Stores `val` at physical address `addr`, bypassing the window.
    pub fn poke(&self, addr: u32, val: u32) {
        self.memory.poke_word(PhysAddr::new(addr), val);
    }
}
