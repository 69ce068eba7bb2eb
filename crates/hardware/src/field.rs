//! Bit-field descriptors.
//!
//! A [`Field`] is the `(byte offset, base bit, width)` triple that locates one named
//! group of bits inside a 32-bit register. All mask arithmetic in the crate lives here:
//! the register window only loads a word, runs it through [`Field::insert`] or
//! [`Field::extract`], and stores it back.

use serde::Deserialize;

use crate::common::constants::{REGISTER_BITS, WORD_SIZE};
use crate::common::error::FieldError;

/// Location of a bit-field relative to a register window origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Field {
    /// Byte offset of the containing register from the window origin.
    pub offset: u32,
    /// Position of the least significant bit of the field.
    pub base_bit: u32,
    /// Number of bits in the field.
    pub width: u32,
}

impl Field {
    /// Creates a field descriptor. No validation happens until the field is used.
    pub const fn new(offset: u32, base_bit: u32, width: u32) -> Self {
        Self {
            offset,
            base_bit,
            width,
        }
    }

    /// Single-bit field.
    pub const fn bit(offset: u32, bit: u32) -> Self {
        Self::new(offset, bit, 1)
    }

    /// Mask applied to a value before it is shifted into place (`0b111` for width 3).
    pub const fn value_mask(&self) -> u32 {
        if self.width >= REGISTER_BITS {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Mask of the field's bits in register position.
    pub const fn mask(&self) -> u32 {
        match self.value_mask().checked_shl(self.base_bit) {
            Some(mask) => mask,
            None => 0,
        }
    }

    /// Returns `word` with the field replaced by `value`.
    ///
    /// `value` is truncated to the field width first, so bits outside the field are
    /// never disturbed regardless of what the caller passes.
    pub const fn insert(&self, word: u32, value: u32) -> u32 {
        let shifted = match (value & self.value_mask()).checked_shl(self.base_bit) {
            Some(v) => v,
            None => 0,
        };
        (word & !self.mask()) | shifted
    }

    /// Returns the field value of `word`, shifted down to bit 0.
    pub const fn extract(&self, word: u32) -> u32 {
        match (word & self.mask()).checked_shr(self.base_bit) {
            Some(v) => v,
            None => 0,
        }
    }

    /// Checks that the field names whole bits of one aligned register lying within
    /// `span` bytes of the window origin.
    ///
    /// # Errors
    ///
    /// [`FieldError::OutOfRange`] when the width is zero, the bits run past bit 31,
    /// the offset is not word-aligned, or the register does not fit in `span`.
    pub fn validate(&self, span: u32) -> Result<(), FieldError> {
        let bits_ok = self.width > 0
            && self
                .base_bit
                .checked_add(self.width)
                .is_some_and(|end| end <= REGISTER_BITS);
        let offset_ok = self.offset % WORD_SIZE == 0
            && self
                .offset
                .checked_add(WORD_SIZE)
                .is_some_and(|end| end <= span);

        if bits_ok && offset_ok {
            Ok(())
        } else {
            Err(FieldError::OutOfRange {
                offset: self.offset,
                base_bit: self.base_bit,
                width: self.width,
            })
        }
    }
}
