//! GPIO controller register map.
//!
//! The Tegra X1 GPIO block holds 8 controllers of 4 ports each (ports A..Z, AA..FF),
//! 8 pins per port. Every register kind exists once per port: port `p` of controller
//! `c` lives at `c * 0x100 + kind + p * 4`, and pin `n` is bit `n` of that word.
//!
//! The `MSK_*` registers are write-only: bits 15..8 select which pins change and bits
//! 7..0 carry their new levels, so a single store updates a pin without a
//! read-modify-write.

use std::fmt;
use std::str::FromStr;

use crate::common::error::ConfigError;
use crate::field::Field;

/// Physical base of the GPIO controllers.
pub const GPIO_BASE: u32 = 0x6000_d000;

/// Byte distance between consecutive controllers.
pub const CONTROLLER_STRIDE: u32 = 0x100;

/// Number of controllers.
pub const CONTROLLERS: u8 = 8;

/// Ports per controller.
pub const PORTS_PER_CONTROLLER: u8 = 4;

/// Total number of ports (A..FF).
pub const PORTS: u8 = CONTROLLERS * PORTS_PER_CONTROLLER;

/// Pins per port.
pub const PINS_PER_PORT: u8 = 8;

/// Per-port GPIO register kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GpioRegister {
    /// `GPIO_CNF`: 1 selects GPIO mode, 0 hands the pin to its special function.
    Cnf,
    /// `GPIO_OE`: 1 drives the pin as output.
    Oe,
    /// `GPIO_OUT`: output level.
    Out,
    /// `GPIO_IN`: sampled input level (read-only).
    In,
    /// `GPIO_INT_STA`: interrupt status.
    IntSta,
    /// `GPIO_INT_ENB`: interrupt enable.
    IntEnb,
    /// `GPIO_INT_LVL`: interrupt trigger type.
    IntLvl,
    /// `GPIO_INT_CLR`: write 1 to clear status (write-only).
    IntClr,
    /// `GPIO_MSK_CNF`
    MskCnf,
    /// `GPIO_MSK_OE`
    MskOe,
    /// `GPIO_MSK_OUT`
    MskOut,
    /// `GPIO_MSK_INT_STA`
    MskIntSta,
    /// `GPIO_MSK_INT_ENB`
    MskIntEnb,
    /// `GPIO_MSK_INT_LVL`
    MskIntLvl,
}

impl GpioRegister {
    /// Every register kind, in address order.
    pub const ALL: [Self; 14] = [
        Self::Cnf,
        Self::Oe,
        Self::Out,
        Self::In,
        Self::IntSta,
        Self::IntEnb,
        Self::IntLvl,
        Self::IntClr,
        Self::MskCnf,
        Self::MskOe,
        Self::MskOut,
        Self::MskIntSta,
        Self::MskIntEnb,
        Self::MskIntLvl,
    ];

    /// Offset of port 0's register of this kind within a controller.
    pub const fn offset(self) -> u32 {
        match self {
            Self::Cnf => 0x00,
            Self::Oe => 0x10,
            Self::Out => 0x20,
            Self::In => 0x30,
            Self::IntSta => 0x40,
            Self::IntEnb => 0x50,
            Self::IntLvl => 0x60,
            Self::IntClr => 0x70,
            Self::MskCnf => 0x80,
            Self::MskOe => 0x90,
            Self::MskOut => 0xa0,
            Self::MskIntSta => 0xc0,
            Self::MskIntEnb => 0xd0,
            Self::MskIntLvl => 0xe0,
        }
    }

    /// Returns `true` for the write-only masked registers.
    pub const fn is_masked(self) -> bool {
        matches!(
            self,
            Self::MskCnf
                | Self::MskOe
                | Self::MskOut
                | Self::MskIntSta
                | Self::MskIntEnb
                | Self::MskIntLvl
        )
    }

    /// TRM-style register name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cnf => "GPIO_CNF",
            Self::Oe => "GPIO_OE",
            Self::Out => "GPIO_OUT",
            Self::In => "GPIO_IN",
            Self::IntSta => "GPIO_INT_STA",
            Self::IntEnb => "GPIO_INT_ENB",
            Self::IntLvl => "GPIO_INT_LVL",
            Self::IntClr => "GPIO_INT_CLR",
            Self::MskCnf => "GPIO_MSK_CNF",
            Self::MskOe => "GPIO_MSK_OE",
            Self::MskOut => "GPIO_MSK_OUT",
            Self::MskIntSta => "GPIO_MSK_INT_STA",
            Self::MskIntEnb => "GPIO_MSK_INT_ENB",
            Self::MskIntLvl => "GPIO_MSK_INT_LVL",
        }
    }
}

/// One GPIO pin, addressed by port index (0 = A, 26 = AA) and pin number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpioPin {
    port: u8,
    pin: u8,
}

impl GpioPin {
    /// Returns the pin, or `None` if either index is out of range.
    pub const fn new(port: u8, pin: u8) -> Option<Self> {
        if port < PORTS && pin < PINS_PER_PORT {
            Some(Self { port, pin })
        } else {
            None
        }
    }

    /// Port index (0 = A).
    pub const fn port(&self) -> u8 {
        self.port
    }

    /// Pin number within the port.
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// Controller owning this pin's port.
    pub const fn controller(&self) -> u8 {
        self.port / PORTS_PER_CONTROLLER
    }

    /// Byte offset from [`GPIO_BASE`] of this pin's register of kind `reg`.
    pub const fn register_offset(&self, reg: GpioRegister) -> u32 {
        self.controller() as u32 * CONTROLLER_STRIDE
            + reg.offset()
            + (self.port % PORTS_PER_CONTROLLER) as u32 * 4
    }

    /// This pin's bit in register `reg`, relative to [`GPIO_BASE`].
    pub const fn field(&self, reg: GpioRegister) -> Field {
        Field::bit(self.register_offset(reg), self.pin as u32)
    }

    /// Word to store into one of the `MSK_*` registers to set this pin to `level`
    /// while leaving the other pins of the port untouched.
    pub const fn masked_word(&self, level: bool) -> u32 {
        (1 << (self.pin as u32 + 8)) | ((level as u32) << self.pin)
    }

    /// Port letters: `A`..`Z`, then `AA`..`FF`.
    pub fn port_name(&self) -> String {
        let letter = |i: u8| char::from(b'A' + i);
        if self.port < 26 {
            letter(self.port).to_string()
        } else {
            let c = letter(self.port - 26);
            format!("{c}{c}")
        }
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{:02}", self.port_name(), self.pin)
    }
}

impl FromStr for GpioPin {
    type Err = ConfigError;

    /// Accepts `B4`, `PB4`, `PB.04`, `BB.1`, `pbb1` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownPin(s.to_string());
        let upper = s.trim().to_ascii_uppercase();

        let split = upper.find(|c: char| c.is_ascii_digit()).ok_or_else(unknown)?;
        let (letters, digits) = upper.split_at(split);
        let letters = letters.trim_end_matches('.');
        let pin: u8 = digits.parse().map_err(|_| unknown())?;

        let port = match letters.as_bytes() {
            // A bare "P" is port P; longer names may carry a "P" prefix.
            [l] => port_index(*l, 1),
            [b'P', l] => port_index(*l, 1),
            [a, b] if a == b => port_index(*a, 2),
            [b'P', a, b] if a == b => port_index(*a, 2),
            _ => None,
        }
        .ok_or_else(unknown)?;

        Self::new(port, pin).ok_or_else(unknown)
    }
}

/// Port index of a letter repeated `count` times.
fn port_index(letter: u8, count: u8) -> Option<u8> {
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let index = letter - b'A';
    match count {
        1 => Some(index),
        2 if index < PORTS - 26 => Some(26 + index),
        _ => None,
    }
}
