//! Pad-group control register map.
//!
//! Pad groups set drive strength and slew rate for a bundle of balls. Every `*_CFG`
//! register shares the [`PadField`] layout.

use crate::field::Field;

/// Physical base the pad-control offsets are measured from (APB_MISC).
pub const PAD_BASE: u32 = 0x7000_0000;

/// `*_CFG` pad-control register offsets from [`PAD_BASE`].
pub const PAD_REGISTERS: &[(&str, u32)] = &[
    ("ALS_PROX_INT_CFG", 0x8e4),
    ("AP_READY_CFG", 0x8e8),
    ("AP_WAKE_BT_CFG", 0x8ec),
    ("AP_WAKE_NFC_CFG", 0x8f0),
    ("AUD_MCLK_CFG", 0x8f4),
    ("BATT_BCL_CFG", 0x8f8),
    ("BT_RST_CFG", 0x8fc),
    ("BT_WAKE_AP_CFG", 0x900),
    ("BUTTON_HOME_CFG", 0x904),
    ("BUTTON_POWER_ON_CFG", 0x908),
    ("BUTTON_SLIDE_SW_CFG", 0x90c),
    ("BUTTON_VOL_DOWN_CFG", 0x910),
    ("BUTTON_VOL_UP_CFG", 0x914),
    ("SDMMC1_CFG", 0xa98),
    ("SDMMC2_CFG", 0xa9c),
    ("SDMMC3_CFG", 0xab0),
    ("SDMMC4_CFG", 0xab4),
];

/// Fields common to every pad-control register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadField {
    /// High-speed mode.
    Hsm,
    /// Schmitt trigger.
    Schmt,
    /// Pull-down drive strength.
    Drvdn,
    /// Pull-up drive strength.
    Drvup,
    /// Rising slew rate.
    Slwr,
    /// Falling slew rate.
    Slwf,
}

impl PadField {
    /// `(base_bit, width)` of the field.
    pub const fn bits(self) -> (u32, u32) {
        match self {
            Self::Hsm => (2, 1),
            Self::Schmt => (3, 1),
            Self::Drvdn => (12, 5),
            Self::Drvup => (20, 5),
            Self::Slwr => (28, 2),
            Self::Slwf => (30, 2),
        }
    }

    /// Field name, e.g. `DRVDN`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hsm => "HSM",
            Self::Schmt => "SCHMT",
            Self::Drvdn => "DRVDN",
            Self::Drvup => "DRVUP",
            Self::Slwr => "SLWR",
            Self::Slwf => "SLWF",
        }
    }

    /// Every field, lowest bit first.
    pub const ALL: [Self; 6] = [
        Self::Hsm,
        Self::Schmt,
        Self::Drvdn,
        Self::Drvup,
        Self::Slwr,
        Self::Slwf,
    ];

    /// Looks a field up by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// `field` of the pad group `group`, relative to [`PAD_BASE`].
///
/// The `_CFG` suffix may be omitted.
pub fn pad_field(group: &str, field: PadField) -> Option<Field> {
    let offset = PAD_REGISTERS
        .iter()
        .find(|(name, _)| {
            name.eq_ignore_ascii_case(group)
                || name
                    .strip_suffix("_CFG")
                    .is_some_and(|short| short.eq_ignore_ascii_case(group))
        })
        .map(|&(_, offset)| offset)?;
    let (base_bit, width) = field.bits();
    Some(Field::new(offset, base_bit, width))
}
