//! Bit layout of the 128-bit order appendix.
//!
//! ```text
//! | value   | reserved | trigger | reduce only | order type | isolated | version |
//! | 96 bits | 18 bits  | 2 bits  | 1 bit       | 2 bits     | 1 bit    | 8 bits  |
//! | 127..32 | 31..14   | 13..12  | 11          | 10..9      | 8        | 7..0    |
//! ```

pub const VERSION_BITS: u32 = 8;
pub const ISOLATED_BITS: u32 = 1;
pub const ORDER_TYPE_BITS: u32 = 2;
pub const REDUCE_ONLY_BITS: u32 = 1;
pub const TRIGGER_TYPE_BITS: u32 = 2;
pub const RESERVED_BITS: u32 = 18;
pub const VALUE_BITS: u32 = 96;

pub const VERSION_SHIFT: u32 = 0;
pub const ISOLATED_SHIFT: u32 = 8;
pub const ORDER_TYPE_SHIFT: u32 = 9;
pub const REDUCE_ONLY_SHIFT: u32 = 11;
pub const TRIGGER_TYPE_SHIFT: u32 = 12;
pub const RESERVED_SHIFT: u32 = 14;
pub const VALUE_SHIFT: u32 = 32;

pub const VERSION_MASK: u128 = mask(VERSION_BITS);
pub const ISOLATED_MASK: u128 = mask(ISOLATED_BITS);
pub const ORDER_TYPE_MASK: u128 = mask(ORDER_TYPE_BITS);
pub const REDUCE_ONLY_MASK: u128 = mask(REDUCE_ONLY_BITS);
pub const TRIGGER_TYPE_MASK: u128 = mask(TRIGGER_TYPE_BITS);
pub const RESERVED_MASK: u128 = mask(RESERVED_BITS);
pub const VALUE_MASK: u128 = mask(VALUE_BITS);

/// TWAP packing inside the 96-bit value field (LSB first):
/// reserved `31..0`, slippage x 1e6 `63..32`, times `95..64`.
pub mod twap {
    use super::mask;

    pub const RESERVED_BITS: u32 = 32;
    pub const SLIPPAGE_BITS: u32 = 32;
    pub const TIMES_BITS: u32 = 32;

    pub const RESERVED_SHIFT: u32 = 0;
    pub const SLIPPAGE_SHIFT: u32 = 32;
    pub const TIMES_SHIFT: u32 = 64;

    pub const RESERVED_MASK: u128 = mask(RESERVED_BITS);
    pub const SLIPPAGE_MASK: u128 = mask(SLIPPAGE_BITS);
    pub const TIMES_MASK: u128 = mask(TIMES_BITS);

    /// Slippage is stored with six decimal places.
    pub const SLIPPAGE_SCALE: u32 = 1_000_000;
    pub const SLIPPAGE_DECIMALS: u32 = 6;
}

/// All-ones mask of `width` bits.
pub const fn mask(width: u32) -> u128 {
    if width >= 128 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_widths_cover_128_bits() {
        let total = VERSION_BITS
            + ISOLATED_BITS
            + ORDER_TYPE_BITS
            + REDUCE_ONLY_BITS
            + TRIGGER_TYPE_BITS
            + RESERVED_BITS
            + VALUE_BITS;
        assert_eq!(total, 128);
        assert_eq!(twap::RESERVED_BITS + twap::SLIPPAGE_BITS + twap::TIMES_BITS, VALUE_BITS);
    }

    #[test]
    fn test_shifts_are_contiguous() {
        assert_eq!(ISOLATED_SHIFT, VERSION_SHIFT + VERSION_BITS);
        assert_eq!(ORDER_TYPE_SHIFT, ISOLATED_SHIFT + ISOLATED_BITS);
        assert_eq!(REDUCE_ONLY_SHIFT, ORDER_TYPE_SHIFT + ORDER_TYPE_BITS);
        assert_eq!(TRIGGER_TYPE_SHIFT, REDUCE_ONLY_SHIFT + REDUCE_ONLY_BITS);
        assert_eq!(RESERVED_SHIFT, TRIGGER_TYPE_SHIFT + TRIGGER_TYPE_BITS);
        assert_eq!(VALUE_SHIFT, RESERVED_SHIFT + RESERVED_BITS);
    }

    #[test]
    fn test_masks() {
        assert_eq!(VERSION_MASK, 255);
        assert_eq!(ISOLATED_MASK, 1);
        assert_eq!(ORDER_TYPE_MASK, 3);
        assert_eq!(REDUCE_ONLY_MASK, 1);
        assert_eq!(TRIGGER_TYPE_MASK, 3);
        assert_eq!(RESERVED_MASK, (1 << 18) - 1);
        assert_eq!(VALUE_MASK, (1u128 << 96) - 1);
        assert_eq!(mask(128), u128::MAX);
    }
}
