//! Register descriptor tables.
//!
//! Hardware field locations are data, not types. Each controller contributes a base
//! address, a table of register offsets keyed by TRM name, and one field layout shared
//! by all of its registers. This module provides:
//! 1. **GPIO:** Computed per-pin fields for the 32 GPIO ports.
//! 2. **Pinmux:** `PINMUX_AUX_*` registers and their common field layout.
//! 3. **Pad groups:** `*_CFG` drive-strength registers and their field layout.
//! 4. **Symbolic lookup:** `gpio:PB4:OUT`, `pinmux:SDMMC1_CLK:PM`, `pad:SDMMC1:DRVDN`.

/// GPIO controller register map.
pub mod gpio;

/// Pad-group control register map.
pub mod pad;

/// Pinmux register map.
pub mod pinmux;

use std::str::FromStr;

use crate::field::Field;

pub use gpio::{GPIO_BASE, GpioPin, GpioRegister};
pub use pad::{PAD_BASE, PadField};
pub use pinmux::{PINMUX_BASE, PinmuxField};

/// A field together with the physical base its offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NamedField {
    /// Physical base to open the window at.
    pub base: u32,
    /// Field relative to `base`.
    pub field: Field,
}

/// Finds `name` in `table`, with or without `prefix`, ignoring case.
pub(crate) fn lookup(table: &[(&str, u32)], prefix: &str, name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(entry, _)| {
            entry.eq_ignore_ascii_case(name)
                || entry
                    .strip_prefix(prefix)
                    .is_some_and(|short| short.eq_ignore_ascii_case(name))
        })
        .map(|&(_, offset)| offset)
}

/// Resolves a symbolic `table:register:field` name against the built-in tables.
///
/// * `gpio:<pin>:<register>` with register `CNF`, `OE`, `OUT`, `IN`, `INT_STA`, ...
/// * `pinmux:<register>:<field>` with field `PM`, `PUPD`, `TRISTATE`, `E_INPUT`, ...
/// * `pad:<group>:<field>` with field `DRVDN`, `DRVUP`, `SLWR`, `SLWF`, ...
pub fn resolve(name: &str) -> Option<NamedField> {
    let mut parts = name.splitn(3, ':');
    let (table, register, field) = (parts.next()?, parts.next()?, parts.next()?);

    if table.eq_ignore_ascii_case("gpio") {
        let pin = GpioPin::from_str(register).ok()?;
        let reg = GpioRegister::ALL.into_iter().find(|r| {
            r.name()
                .strip_prefix("GPIO_")
                .is_some_and(|short| short.eq_ignore_ascii_case(field))
        })?;
        Some(NamedField {
            base: GPIO_BASE,
            field: pin.field(reg),
        })
    } else if table.eq_ignore_ascii_case("pinmux") {
        let field = pinmux::pinmux_field(register, PinmuxField::from_name(field)?)?;
        Some(NamedField {
            base: PINMUX_BASE,
            field,
        })
    } else if table.eq_ignore_ascii_case("pad") {
        let field = pad::pad_field(register, PadField::from_name(field)?)?;
        Some(NamedField {
            base: PAD_BASE,
            field,
        })
    } else {
        None
    }
}
