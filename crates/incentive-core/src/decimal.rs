//! Fixed-point decimal arithmetic
//!
//! Reward factors, source shares and prices are all carried as [`Dec`], an
//! unsigned decimal with exactly 18 fractional digits stored in a 256-bit
//! integer. Every node must compute bit-identical results, so no floating
//! point is used anywhere in accrual or synchronization.
//!
//! ## Range
//!
//! | Quantity | Limit |
//! |----------|-------|
//! | Whole part | about 1.15e59 |
//! | Integer inputs | any `u128` |
//! | `a * b / c` intermediate | 512 bits |
//!
//! ## Rounding
//!
//! Any operation that drops digits beyond the 18th rounds half-up:
//!
//! ```text
//! 0.0000000000000000004  -> 0.000000000000000000
//! 0.0000000000000000005  -> 0.000000000000000001
//! ```

use crate::error::{IncentiveError, Result};
use primitive_types::{U256, U512};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits
pub const PRECISION: u32 = 18;

/// Raw value of `1.0`
const ONE_RAW: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Unsigned 18-digit fixed-point decimal
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dec(U256);

impl Dec {
    /// Zero
    pub const ZERO: Self = Self(U256([0, 0, 0, 0]));

    /// One
    pub const ONE: Self = Self(ONE_RAW);

    /// Wrap a raw value (units of 10^-18)
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Raw value (units of 10^-18)
    pub const fn raw(&self) -> U256 {
        self.0
    }

    /// Decimal from an integer amount
    pub fn from_int(amount: u128) -> Self {
        // u128::MAX * 10^18 < 2^188
        Self(U256::from(amount) * ONE_RAW)
    }

    /// Decimal `numerator / denominator`, rounded half-up
    pub fn from_ratio(numerator: u128, denominator: u128) -> Option<Self> {
        mul_div_round(U256::from(numerator), ONE_RAW, U256::from(denominator)).map(Self)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtraction; `None` when `rhs > self`
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        mul_div_round(self.0, rhs.0, ONE_RAW).map(Self)
    }

    /// Division; `None` on a zero divisor or overflow
    pub fn checked_quo(self, rhs: Self) -> Option<Self> {
        mul_div_round(self.0, ONE_RAW, rhs.0).map(Self)
    }

    /// Multiply by an integer without rounding
    pub fn checked_mul_int(self, rhs: u128) -> Option<Self> {
        self.0.checked_mul(U256::from(rhs)).map(Self)
    }

    /// Product of two decimals rounded half-up to an integer amount.
    ///
    /// `None` when the amount does not fit in a `u128`.
    pub fn mul_round_to_int(self, rhs: Self) -> Option<u128> {
        let scale = ONE_RAW * ONE_RAW;
        mul_div_round(self.0, rhs.0, scale).and_then(narrow)
    }

    /// Round to an integer amount, half-up
    pub fn round_to_int(&self) -> Option<u128> {
        mul_div_round(self.0, U256::one(), ONE_RAW).and_then(narrow)
    }

    /// Drop the fractional part
    pub fn truncate_to_int(&self) -> Option<u128> {
        narrow(self.0 / ONE_RAW)
    }
}

/// `a * b / c` with a 512-bit intermediate, rounded half-up.
///
/// Returns `None` when `c` is zero or the quotient does not fit in 256 bits.
pub fn mul_div_round(a: U256, b: U256, c: U256) -> Option<U256> {
    if c.is_zero() {
        return None;
    }
    let divisor = U512::from(c);
    let (quot, rem) = a.full_mul(b).div_mod(divisor);
    // rem < divisor, so the subtraction cannot underflow
    let rounded = if rem >= divisor - rem {
        quot.checked_add(U512::one())?
    } else {
        quot
    };
    U256::try_from(rounded).ok()
}

fn narrow(value: U256) -> Option<u128> {
    (value.bits() <= 128).then(|| value.low_u128())
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.0.div_mod(ONE_RAW);
        write!(f, "{}.{:018}", whole, frac.low_u64())
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl FromStr for Dec {
    type Err = IncentiveError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || IncentiveError::InvalidDecimal(s.to_string());

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > PRECISION as usize || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if s.contains('.') && frac_part.is_empty() {
            return Err(invalid());
        }

        let whole = U256::from_dec_str(int_part).map_err(|_| invalid())?;
        let mut frac: u64 = 0;
        if !frac_part.is_empty() {
            frac = frac_part.parse().map_err(|_| invalid())?;
            frac *= 10u64.pow(PRECISION - frac_part.len() as u32);
        }

        whole
            .checked_mul(ONE_RAW)
            .and_then(|w| w.checked_add(U256::from(frac)))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Dec {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(dec("1").to_string(), "1.000000000000000000");
        assert_eq!(dec("0.5").raw(), ONE_RAW / 2);
        assert_eq!(dec("12.000000000000000001").raw(), ONE_RAW * U256::from(12u64) + U256::one());
        assert_eq!(dec("0.010571385600000000"), dec("0.0105713856"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<Dec>().is_err());
        assert!("-1".parse::<Dec>().is_err());
        assert!("1.".parse::<Dec>().is_err());
        assert!(".5".parse::<Dec>().is_err());
        assert!("1.0000000000000000001".parse::<Dec>().is_err());
        assert!("1e5".parse::<Dec>().is_err());
    }

    #[test]
    fn test_accrual_scenario_exact() {
        // 122354 per second for a day over 1e12 shares
        let increase = Dec::from_ratio(122_354 * 86_400, 1_000_000_000_000).expect("ratio");
        assert_eq!(increase, dec("0.0105713856"));
    }

    #[test]
    fn test_mul_rounds_half_up() {
        let tiny = Dec::from_raw(U256::one());
        let half = dec("0.5");
        // 1e-18 * 0.5 = 0.5e-18 rounds up to 1e-18
        assert_eq!(tiny.checked_mul(half), Some(tiny));
        // 1e-18 * 0.4 = 0.4e-18 rounds down to zero
        assert_eq!(tiny.checked_mul(dec("0.4")), Some(Dec::ZERO));
    }

    #[test]
    fn test_quo() {
        assert_eq!(dec("1").checked_quo(dec("3")), Some(dec("0.333333333333333333")));
        assert_eq!(dec("2").checked_quo(dec("3")), Some(dec("0.666666666666666667")));
        assert_eq!(dec("1").checked_quo(Dec::ZERO), None);
    }

    #[test]
    fn test_large_products_use_wide_intermediate() {
        // raw operands 1e56 x 1e24 overflow 256 bits before the rescale
        let big = Dec::from_int(100_000_000_000_000_000_000_000_000_000_000_000_000);
        let product = big.checked_mul(Dec::from_int(1_000_000)).expect("fits");
        assert_eq!(product.to_string(), format!("1{}.{}", "0".repeat(44), "0".repeat(18)));
        assert_eq!(product.truncate_to_int(), None);
        // but a result above the 256-bit range is rejected
        assert_eq!(product.checked_mul(product), None);
    }

    #[test]
    fn test_eighteen_decimal_token_amounts() {
        // 1000 tokens of an asset with 18 decimals
        let shares = Dec::from_int(1_000_000_000_000_000_000_000);
        assert_eq!(shares.truncate_to_int(), Some(1_000_000_000_000_000_000_000));
        assert_eq!(
            shares.to_string().parse::<Dec>().expect("parse"),
            shares
        );
        assert_eq!(Dec::from_int(u128::MAX).round_to_int(), Some(u128::MAX));
    }

    #[test]
    fn test_mul_round_to_int() {
        assert_eq!(dec("0.5").mul_round_to_int(Dec::ONE), Some(1));
        assert_eq!(dec("0.4999").mul_round_to_int(Dec::ONE), Some(0));
        assert_eq!(dec("0.2").mul_round_to_int(Dec::from_int(12_235_400)), Some(2_447_080));
        assert_eq!(Dec::from_int(u128::MAX).mul_round_to_int(dec("2")), None);
    }

    #[test]
    fn test_round_to_int() {
        assert_eq!(dec("1.5").round_to_int(), Some(2));
        assert_eq!(dec("1.499999999999999999").round_to_int(), Some(1));
        assert_eq!(dec("2.5").round_to_int(), Some(3));
        assert_eq!(dec("2.5").truncate_to_int(), Some(2));
    }

    #[test]
    fn test_checked_sub_underflow() {
        assert_eq!(dec("1").checked_sub(dec("2")), None);
        assert_eq!(dec("2").checked_sub(dec("0.5")), Some(dec("1.5")));
    }

    #[test]
    fn test_serde_text_form() {
        let json = serde_json::to_string(&dec("0.25")).expect("serialize");
        assert_eq!(json, "\"0.250000000000000000\"");
        let back: Dec = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, dec("0.25"));
    }

    proptest! {
        #[test]
        fn prop_mul_div_matches_native(a in 0u64..u64::MAX, b in 0u64..u64::MAX, c in 1u64..u64::MAX) {
            let (a, b, c) = (a as u128, b as u128, c as u128);
            let product = a * b;
            let mut expected = product / c;
            if product % c >= c - product % c {
                expected += 1;
            }
            let wide = mul_div_round(U256::from(a), U256::from(b), U256::from(c));
            prop_assert_eq!(wide, Some(U256::from(expected)));
        }

        #[test]
        fn prop_display_parse(limbs in any::<[u64; 4]>()) {
            let d = Dec::from_raw(U256(limbs));
            prop_assert_eq!(d.to_string().parse::<Dec>(), Ok(d));
        }
    }
}
