//! Display-unit and base-unit conversion
//!
//! A token amount typed by a user ("10.5 tokens") is a display amount. The
//! ledger only accepts integer base units, related by
//! `base = display × 10^decimals`. HBAR is the native currency with a fixed
//! 8 decimals (1 HBAR = 100 000 000 tinybar).
//!
//! # Example
//!
//! ```
//! use hedera_agent_core::units::{base_units, to_display_unit, Hbar};
//!
//! assert_eq!(base_units(10.0, 2).unwrap(), 1000);
//! assert_eq!(to_display_unit(1000.0, 2), 10.0);
//!
//! let amount: Hbar = "1.5".parse().unwrap();
//! assert_eq!(amount.to_tinybars(), 150_000_000);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Decimals of the native currency
pub const HBAR_DECIMALS: u32 = 8;

/// Tinybars per HBAR
pub const TINYBARS_PER_HBAR: u64 = 100_000_000;

fn scale(decimals: u32) -> f64 {
    10f64.powi(decimals as i32)
}

/// Scale a display amount up to base units without rounding
pub fn to_base_unit(display_amount: f64, decimals: u32) -> f64 {
    display_amount * scale(decimals)
}

/// Scale a base-unit amount down to display units
pub fn to_display_unit(base_amount: f64, decimals: u32) -> f64 {
    base_amount / scale(decimals)
}

/// Convert a display amount to the integer amount the ledger accepts
///
/// The scaled value is rounded to the nearest integer so that inputs like
/// `0.1` with 2 decimals give `10` rather than `10.000000000000002`
/// truncated. Negative, non-finite and out-of-range amounts are rejected.
pub fn base_units(display_amount: f64, decimals: u32) -> Result<u64> {
    if !display_amount.is_finite() {
        return Err(Error::invalid_amount(format!(
            "{} is not a finite number",
            display_amount
        )));
    }
    if display_amount < 0.0 {
        return Err(Error::invalid_amount(format!(
            "{} is negative",
            display_amount
        )));
    }

    let scaled = to_base_unit(display_amount, decimals).round();
    if scaled > u64::MAX as f64 {
        return Err(Error::invalid_amount(format!(
            "{} with {} decimals exceeds the maximum base-unit amount",
            display_amount, decimals
        )));
    }
    Ok(scaled as u64)
}

/// Convert a base-unit amount reported by the mirror node to display units
pub fn display_units(base_amount: u64, decimals: u32) -> f64 {
    to_display_unit(base_amount as f64, decimals)
}

/// An amount of the native currency, stored in tinybars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(u64);

impl Hbar {
    /// Zero HBAR
    pub const ZERO: Hbar = Hbar(0);

    /// Amount from tinybars
    pub const fn from_tinybars(tinybars: u64) -> Self {
        Self(tinybars)
    }

    /// Amount from a display value in HBAR
    pub fn from_hbar(hbar: f64) -> Result<Self> {
        base_units(hbar, HBAR_DECIMALS).map(Self)
    }

    /// Amount in tinybars
    pub fn to_tinybars(&self) -> u64 {
        self.0
    }

    /// Amount in HBAR
    pub fn to_hbar(&self) -> f64 {
        display_units(self.0, HBAR_DECIMALS)
    }
}

impl FromStr for Hbar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_amount(format!("'{}' is not a number", s)))?;
        Self::from_hbar(value)
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hbar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        for decimals in [0u32, 2, 6, 8, 12] {
            for value in [0u64, 1, 7, 1000, 123_456_789, 9_007_199_254] {
                let display = to_display_unit(value as f64, decimals);
                let back = to_base_unit(display, decimals);
                let tolerance = (value as f64).abs() * 1e-12 + 1e-9;
                assert!(
                    (back - value as f64).abs() <= tolerance,
                    "{} with {} decimals came back as {}",
                    value,
                    decimals,
                    back
                );
            }
        }
    }

    #[test]
    fn test_base_units_rounding() -> Result<()> {
        assert_eq!(base_units(10.0, 2)?, 1000);
        assert_eq!(base_units(0.1, 2)?, 10);
        assert_eq!(base_units(3.75, 4)?, 37_500);
        assert_eq!(base_units(1000.0, 0)?, 1000);
        Ok(())
    }

    #[test]
    fn test_base_units_rejects_bad_amounts() {
        assert!(base_units(-1.0, 2).is_err());
        assert!(base_units(f64::NAN, 2).is_err());
        assert!(base_units(f64::INFINITY, 0).is_err());
        assert!(base_units(1e30, 8).is_err());
    }

    #[test]
    fn test_hbar_conversion() -> Result<()> {
        let amount: Hbar = "2.5".parse()?;
        assert_eq!(amount.to_tinybars(), 250_000_000);
        assert_eq!(amount.to_string(), "2.5");
        assert_eq!(Hbar::from_tinybars(TINYBARS_PER_HBAR).to_hbar(), 1.0);
        assert!("ten".parse::<Hbar>().is_err());
        Ok(())
    }
}
