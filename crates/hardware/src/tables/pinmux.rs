//! Pinmux register map.
//!
//! Each `PINMUX_AUX_*` register configures one ball: which special function drives it,
//! its pull, tristate and input buffers, and its electrical options. All of them share
//! one field layout, so the table only records register offsets and [`PinmuxField`]
//! supplies the bit positions.

use crate::field::Field;

/// Physical base of the pinmux registers.
pub const PINMUX_BASE: u32 = 0x7000_3000;

/// `PINMUX_AUX_*` register offsets from [`PINMUX_BASE`].
pub const PINMUX_REGISTERS: &[(&str, u32)] = &[
    ("PINMUX_AUX_SDMMC1_CLK", 0x000),
    ("PINMUX_AUX_SDMMC1_CMD", 0x004),
    ("PINMUX_AUX_SDMMC1_DAT3", 0x008),
    ("PINMUX_AUX_SDMMC1_DAT2", 0x00c),
    ("PINMUX_AUX_SDMMC1_DAT1", 0x010),
    ("PINMUX_AUX_SDMMC1_DAT0", 0x014),
    ("PINMUX_AUX_SDMMC3_CLK", 0x01c),
    ("PINMUX_AUX_SDMMC3_CMD", 0x020),
    ("PINMUX_AUX_SDMMC3_DAT0", 0x024),
    ("PINMUX_AUX_SDMMC3_DAT1", 0x028),
    ("PINMUX_AUX_SDMMC3_DAT2", 0x02c),
    ("PINMUX_AUX_SDMMC3_DAT3", 0x030),
    ("PINMUX_AUX_PEX_L0_RST_N", 0x038),
    ("PINMUX_AUX_PEX_L0_CLKREQ_N", 0x03c),
    ("PINMUX_AUX_PEX_WAKE_N", 0x040),
    ("PINMUX_AUX_PEX_L1_RST_N", 0x044),
    ("PINMUX_AUX_PEX_L1_CLKREQ_N", 0x048),
    ("PINMUX_AUX_SATA_LED_ACTIVE", 0x04c),
    ("PINMUX_AUX_SPI1_MOSI", 0x050),
    ("PINMUX_AUX_SPI1_MISO", 0x054),
    ("PINMUX_AUX_SPI1_SCK", 0x058),
    ("PINMUX_AUX_SPI1_CS0", 0x05c),
    ("PINMUX_AUX_SPI1_CS1", 0x060),
    ("PINMUX_AUX_SPI2_MOSI", 0x064),
    ("PINMUX_AUX_SPI2_MISO", 0x068),
    ("PINMUX_AUX_SPI2_SCK", 0x06c),
    ("PINMUX_AUX_SPI2_CS0", 0x070),
    ("PINMUX_AUX_SPI2_CS1", 0x074),
    ("PINMUX_AUX_SPI4_MOSI", 0x078),
    ("PINMUX_AUX_SPI4_MISO", 0x07c),
    ("PINMUX_AUX_SPI4_SCK", 0x080),
    ("PINMUX_AUX_SPI4_CS0", 0x084),
];

/// Fields common to every `PINMUX_AUX_*` register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinmuxField {
    /// Special-function select (0..=3).
    Pm,
    /// Pull: 0 none, 1 down, 2 up.
    Pupd,
    /// Output driver disabled.
    Tristate,
    /// Keep the pad in its reset state.
    Park,
    /// Input buffer enabled.
    EInput,
    /// Lock the register until reset.
    Lock,
    /// Low-power drive.
    ELpdr,
    /// High-speed mode.
    EHsm,
    /// High-voltage tolerant IO.
    EIoHv,
    /// Open-drain output.
    EOd,
    /// Schmitt-trigger input.
    ESchmt,
    /// Drive type.
    DrvType,
    /// Pre-emphasis.
    EPreemp,
}

impl PinmuxField {
    /// `(base_bit, width)` of the field.
    pub const fn bits(self) -> (u32, u32) {
        match self {
            Self::Pm => (0, 2),
            Self::Pupd => (2, 2),
            Self::Tristate => (4, 1),
            Self::Park => (5, 1),
            Self::EInput => (6, 1),
            Self::Lock => (7, 1),
            Self::ELpdr => (8, 1),
            Self::EHsm => (9, 1),
            Self::EIoHv => (10, 1),
            Self::EOd => (11, 1),
            Self::ESchmt => (12, 1),
            Self::DrvType => (13, 2),
            Self::EPreemp => (15, 1),
        }
    }

    /// Field name as it appears after the register name, e.g. `E_INPUT`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pm => "PM",
            Self::Pupd => "PUPD",
            Self::Tristate => "TRISTATE",
            Self::Park => "PARK",
            Self::EInput => "E_INPUT",
            Self::Lock => "LOCK",
            Self::ELpdr => "E_LPDR",
            Self::EHsm => "E_HSM",
            Self::EIoHv => "E_IO_HV",
            Self::EOd => "E_OD",
            Self::ESchmt => "E_SCHMT",
            Self::DrvType => "DRV_TYPE",
            Self::EPreemp => "E_PREEMP",
        }
    }

    /// Every field, lowest bit first.
    pub const ALL: [Self; 13] = [
        Self::Pm,
        Self::Pupd,
        Self::Tristate,
        Self::Park,
        Self::EInput,
        Self::Lock,
        Self::ELpdr,
        Self::EHsm,
        Self::EIoHv,
        Self::EOd,
        Self::ESchmt,
        Self::DrvType,
        Self::EPreemp,
    ];

    /// Looks a field up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// `field` of the pinmux register `register`, relative to [`PINMUX_BASE`].
///
/// The `PINMUX_AUX_` prefix may be omitted.
pub fn pinmux_field(register: &str, field: PinmuxField) -> Option<Field> {
    let offset = super::lookup(PINMUX_REGISTERS, "PINMUX_AUX_", register)?;
    let (base_bit, width) = field.bits();
    Some(Field::new(offset, base_bit, width))
}
