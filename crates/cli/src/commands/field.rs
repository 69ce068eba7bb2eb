//! Raw and named field access.

use jetmmio_core::config::Config;
use jetmmio_core::mem::PhysMemory;
use jetmmio_core::{Field, RegisterWindow};

use crate::error::CliError;

pub fn get<M: PhysMemory>(
    memory: &M,
    base: u32,
    offset: u32,
    base_bit: u32,
    width: u32,
) -> Result<(), CliError> {
    let mut window = RegisterWindow::open_in(memory, base)?;
    let value = window.get_field(offset, base_bit, width)?;
    window.close()?;
    println!("{value:#x} ({value})");
    Ok(())
}

pub fn set<M: PhysMemory>(
    memory: &M,
    base: u32,
    offset: u32,
    value: u32,
    base_bit: u32,
    width: u32,
) -> Result<(), CliError> {
    let mut window = RegisterWindow::open_in(memory, base)?;
    window.set_field(offset, value, base_bit, width)?;
    let readback = window.get_field(offset, base_bit, width)?;
    window.close()?;
    println!("{readback:#x} ({readback})");
    Ok(())
}

pub fn named<M: PhysMemory>(
    memory: &M,
    config: &Config,
    name: &str,
    value: Option<u32>,
) -> Result<(), CliError> {
    let named = config.field(name)?;
    let Field {
        offset,
        base_bit,
        width,
    } = named.field;
    match value {
        Some(value) => set(memory, named.base, offset, value, base_bit, width),
        None => get(memory, named.base, offset, base_bit, width),
    }
}
