//! 1e18 fixed-point helpers.
//!
//! Products that do not fit in `u128` are carried out in 256 bits on the host,
//! so `amount * price` never overflows before the division.

use soroban_sdk::{Env, U256};

use crate::constants::WAD;
use crate::errors::PoolError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rounding {
    Down,
    Up,
}

/// `a * b / denominator` with the requested rounding.
pub fn mul_div(
    env: &Env,
    a: u128,
    b: u128,
    denominator: u128,
    rounding: Rounding,
) -> Result<u128, PoolError> {
    if denominator == 0 {
        return Err(PoolError::MathOverflow);
    }
    if a == 0 || b == 0 {
        return Ok(0);
    }
    if let Some(product) = a.checked_mul(b) {
        let quotient = product / denominator;
        if rounding == Rounding::Up && product % denominator != 0 {
            return quotient.checked_add(1).ok_or(PoolError::MathOverflow);
        }
        return Ok(quotient);
    }

    let d = U256::from_u128(env, denominator);
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let mut quotient = product.div(&d);
    if rounding == Rounding::Up && product.rem_euclid(&d) != U256::from_u32(env, 0) {
        quotient = quotient.add(&U256::from_u32(env, 1));
    }
    quotient.to_u128().ok_or(PoolError::MathOverflow)
}

pub fn mul_wad(env: &Env, a: u128, b: u128, rounding: Rounding) -> Result<u128, PoolError> {
    mul_div(env, a, b, WAD, rounding)
}

pub fn div_wad(env: &Env, a: u128, b: u128, rounding: Rounding) -> Result<u128, PoolError> {
    mul_div(env, a, WAD, b, rounding)
}

pub fn pow10(exponent: u32) -> Result<u128, PoolError> {
    10u128.checked_pow(exponent).ok_or(PoolError::MathOverflow)
}

/// Token units with `decimals` places to 18-decimal units.
pub fn to_wad(amount: u128, decimals: u32, rounding: Rounding) -> Result<u128, PoolError> {
    if decimals <= 18 {
        amount
            .checked_mul(pow10(18 - decimals)?)
            .ok_or(PoolError::MathOverflow)
    } else {
        Ok(div_round(amount, pow10(decimals - 18)?, rounding))
    }
}

/// 18-decimal units back to token units with `decimals` places.
pub fn from_wad(amount: u128, decimals: u32, rounding: Rounding) -> Result<u128, PoolError> {
    if decimals <= 18 {
        Ok(div_round(amount, pow10(18 - decimals)?, rounding))
    } else {
        amount
            .checked_mul(pow10(decimals - 18)?)
            .ok_or(PoolError::MathOverflow)
    }
}

fn div_round(amount: u128, divisor: u128, rounding: Rounding) -> u128 {
    let quotient = amount / divisor;
    if rounding == Rounding::Up && amount % divisor != 0 {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mul_div_rounds_in_requested_direction() {
        let env = Env::default();
        assert_eq!(mul_div(&env, 10, 10, 3, Rounding::Down), Ok(33));
        assert_eq!(mul_div(&env, 10, 10, 3, Rounding::Up), Ok(34));
        assert_eq!(mul_div(&env, 9, 10, 3, Rounding::Up), Ok(30));
        assert_eq!(mul_div(&env, 0, 10, 3, Rounding::Up), Ok(0));
        assert_eq!(mul_div(&env, 1, 1, 0, Rounding::Down), Err(PoolError::MathOverflow));
    }

    #[test]
    fn mul_div_widens_past_u128() {
        let env = Env::default();
        // 1e30 * 1e20 overflows u128 but the quotient fits.
        let a = 1_000_000_000_000_000_000_000_000_000_000u128;
        let b = 100_000_000_000_000_000_000u128;
        assert_eq!(mul_wad(&env, a, b, Rounding::Down), Ok(a * 100));
        assert_eq!(div_wad(&env, a, 3 * WAD, Rounding::Down), Ok(a / 3));
        assert_eq!(
            div_wad(&env, a, 3 * WAD, Rounding::Up),
            Ok(a / 3 + 1)
        );
        // Quotient itself too large.
        assert_eq!(
            mul_div(&env, u128::MAX, u128::MAX, 1, Rounding::Down),
            Err(PoolError::MathOverflow)
        );
    }

    #[test]
    fn leverage_division_rounds_debt_up() {
        let env = Env::default();
        let leverage = 50 * WAD;
        assert_eq!(div_wad(&env, 100_000_000, leverage, Rounding::Up), Ok(2_000_000));
        assert_eq!(div_wad(&env, 101, leverage, Rounding::Up), Ok(3));
        assert_eq!(div_wad(&env, 101, leverage, Rounding::Down), Ok(2));
    }

    #[test]
    fn decimal_scaling() {
        assert_eq!(to_wad(1_000_000, 6, Rounding::Down), Ok(WAD));
        assert_eq!(to_wad(11_000_000_000, 8, Rounding::Down), Ok(110 * WAD));
        assert_eq!(to_wad(WAD, 18, Rounding::Down), Ok(WAD));
        assert_eq!(to_wad(1_999, 21, Rounding::Down), Ok(1));
        assert_eq!(to_wad(1_999, 21, Rounding::Up), Ok(2));
        assert_eq!(from_wad(WAD + 1, 6, Rounding::Down), Ok(1_000_000));
        assert_eq!(from_wad(WAD + 1, 6, Rounding::Up), Ok(1_000_001));
        assert_eq!(from_wad(7, 20, Rounding::Down), Ok(700));
        assert_eq!(to_wad(u128::MAX, 0, Rounding::Down), Err(PoolError::MathOverflow));
    }
}
