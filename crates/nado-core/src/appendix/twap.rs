//! TWAP sub-encoding of the appendix value field.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bits::twap::*;
use crate::{Error, Result};

/// Execution count and slippage tolerance of a TWAP order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwapData {
    pub times: u32,
    /// Slippage as a fraction, e.g. `0.01` for 1%.
    pub slippage_frac: Decimal,
}

/// Scale a slippage fraction to its 6-decimal integer form.
///
/// Digits past the sixth decimal are truncated, not rounded.
pub fn slippage_to_x6(slippage_frac: Decimal) -> Result<u32> {
    if slippage_frac.is_sign_negative() && !slippage_frac.is_zero() {
        return Err(Error::encoding(format!(
            "Slippage fraction must not be negative, got {slippage_frac}"
        )));
    }
    let too_wide = || {
        Error::encoding(format!(
            "Slippage fraction {slippage_frac} does not fit in {SLIPPAGE_BITS} bits"
        ))
    };
    slippage_frac
        .checked_mul(Decimal::from(SLIPPAGE_SCALE))
        .ok_or_else(too_wide)?
        .trunc()
        .to_u32()
        .ok_or_else(too_wide)
}

/// Pack TWAP fields into the 96-bit appendix value.
pub fn pack_twap(times: u32, slippage_frac: Decimal) -> Result<u128> {
    let slippage_x6 = slippage_to_x6(slippage_frac)?;
    let reserved: u128 = 0;

    Ok(((u128::from(times) & TIMES_MASK) << TIMES_SHIFT)
        | ((u128::from(slippage_x6) & SLIPPAGE_MASK) << SLIPPAGE_SHIFT)
        | ((reserved & RESERVED_MASK) << RESERVED_SHIFT))
}

/// Unpack a 96-bit appendix value into TWAP fields.
///
/// The reserved low 32 bits are ignored.
pub fn unpack_twap(value: u128) -> TwapData {
    let times = ((value >> TIMES_SHIFT) & TIMES_MASK) as u32;
    let slippage_x6 = ((value >> SLIPPAGE_SHIFT) & SLIPPAGE_MASK) as i64;

    TwapData {
        times,
        slippage_frac: Decimal::new(slippage_x6, SLIPPAGE_DECIMALS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_basic_packing() {
        let packed = pack_twap(5, dec("0.01")).unwrap();
        let data = unpack_twap(packed);
        assert_eq!(data.times, 5);
        assert_eq!(data.slippage_frac, dec("0.01"));
    }

    #[test]
    fn test_bit_layout() {
        let packed = pack_twap(10, dec("0.005")).unwrap();

        assert_eq!((packed >> TIMES_SHIFT) & TIMES_MASK, 10);
        assert_eq!((packed >> SLIPPAGE_SHIFT) & SLIPPAGE_MASK, 5_000);
        assert_eq!(packed & RESERVED_MASK, 0);
    }

    #[test]
    fn test_edge_values() {
        let data = unpack_twap(pack_twap(1, dec("0.000001")).unwrap());
        assert_eq!(data.times, 1);
        assert_eq!(data.slippage_frac, dec("0.000001"));

        let data = unpack_twap(pack_twap(u32::MAX, dec("4.294967295")).unwrap());
        assert_eq!(data.times, u32::MAX);
        assert_eq!(data.slippage_frac, dec("4.294967"));
    }

    #[test]
    fn test_slippage_truncates_not_rounds() {
        assert_eq!(slippage_to_x6(dec("0.0000019")).unwrap(), 1);
        assert_eq!(slippage_to_x6(dec("0.1234569")).unwrap(), 123_456);
    }

    #[test]
    fn test_precision_boundary_over_grid() {
        for times in [1u32, 2, 17, 250, 499, 500] {
            for micros in (0..=1_000_000i64).step_by(12_347) {
                let slippage = Decimal::new(micros, 6);
                let data = unpack_twap(pack_twap(times, slippage).unwrap());
                assert_eq!(data.times, times);
                assert!((data.slippage_frac - slippage).abs() < dec("0.000001"));
            }
        }
    }

    #[test]
    fn test_rejects_negative_and_oversized_slippage() {
        assert!(pack_twap(1, dec("-0.01")).is_err());
        assert!(pack_twap(1, dec("5000")).is_err());
        assert!(pack_twap(1, Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_huge_slippage_is_encoding_error() {
        assert!(matches!(
            pack_twap(1, Decimal::MAX),
            Err(Error::Encoding { .. })
        ));
        assert!(matches!(
            slippage_to_x6(Decimal::from_i128_with_scale(10i128.pow(24), 0)),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn test_unpack_ignores_reserved_bits() {
        let packed = pack_twap(3, dec("0.02")).unwrap() | 0xdead_beef;
        let data = unpack_twap(packed);
        assert_eq!(data.times, 3);
        assert_eq!(data.slippage_frac, dec("0.02"));
    }
}
