//! Market-maker swaps, the TBY accrual rate and redemption.

use soroban_sdk::{Address, Env, Vec};

use crate::access;
use crate::constants::{SWAP_IN_WINDOW, WAD};
use crate::errors::PoolError;
use crate::events::*;
use crate::helpers::{asset_client, pull, push, rwa_client};
use crate::ledger;
use crate::math::{self, Rounding};
use crate::oracle;
use crate::storage::{self, RwaPrice, TbyMaturity};

/// Id that swap-ins made now accrue into, opening a new one when the current
/// id's batching window has closed or it has already matured.
fn active_id(env: &Env) -> Result<u64, PoolError> {
    let now = env.ledger().timestamp();
    let last = ledger::last_minted_id(env);
    if let Some(maturity) = ledger::maturity(env, last) {
        if now <= maturity.start.saturating_add(SWAP_IN_WINDOW) && now < maturity.end {
            return Ok(last);
        }
    }

    let id = last.checked_add(1).ok_or(PoolError::MathOverflow)?;
    let maturity = TbyMaturity {
        start: now,
        end: now.saturating_add(storage::maturity_length(env)),
    };
    ledger::set_maturity(env, id, &maturity);
    ledger::set_last_minted_id(env, id);
    TbyCreated {
        id,
        start: maturity.start,
        end: maturity.end,
    }
    .publish(env);
    Ok(id)
}

pub fn swap_in(
    env: &Env,
    market_maker: &Address,
    lenders: &Vec<Address>,
    asset_amount: u128,
) -> Result<(u64, u128), PoolError> {
    access::require_market_maker(env, market_maker)?;
    if asset_amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let id = active_id(env)?;

    let mut remaining = asset_amount;
    for lender in lenders.iter() {
        if remaining == 0 {
            break;
        }
        remaining -= convert_match_orders(env, id, &lender, remaining)?;
    }
    let amount_swapped = asset_amount - remaining;
    if amount_swapped == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let price = oracle::rwa_price(env)?;
    let value_wad = math::to_wad(amount_swapped, storage::asset_decimals(env)?, Rounding::Down)?;
    let rwa_wad = math::div_wad(env, value_wad, price, Rounding::Up)?;
    let rwa_amount = math::from_wad(rwa_wad, storage::rwa_decimals(env)?, Rounding::Up)?;

    let mut collateral = ledger::collateral(env, id);
    let mut prices = ledger::rwa_price(env, id);
    prices.start_price = weighted_start_price(
        env,
        prices.start_price,
        collateral.current_rwa_amount,
        price,
        rwa_amount,
    )?;
    collateral.current_rwa_amount = collateral
        .current_rwa_amount
        .checked_add(rwa_amount)
        .ok_or(PoolError::MathOverflow)?;
    collateral.original_rwa_amount = collateral
        .original_rwa_amount
        .checked_add(rwa_amount)
        .ok_or(PoolError::MathOverflow)?;
    ledger::set_collateral(env, id, &collateral);
    ledger::set_rwa_price(env, id, &prices);

    pull(env, &rwa_client(env)?, market_maker, rwa_amount)?;
    push(env, &asset_client(env)?, market_maker, amount_swapped)?;

    MarketMakerSwappedIn {
        market_maker: market_maker.clone(),
        id,
        asset_amount: amount_swapped,
        rwa_amount,
        price,
    }
    .publish(env);
    Ok((id, amount_swapped))
}

/// RWA-weighted running average of the start price.
fn weighted_start_price(
    env: &Env,
    old_price: u128,
    old_rwa: u128,
    price: u128,
    new_rwa: u128,
) -> Result<u128, PoolError> {
    if old_price == 0 || old_rwa == 0 {
        return Ok(price);
    }
    let total = old_rwa.checked_add(new_rwa).ok_or(PoolError::MathOverflow)?;
    let old_part = math::mul_div(env, old_price, old_rwa, total, Rounding::Down)?;
    let new_part = math::mul_div(env, price, new_rwa, total, Rounding::Down)?;
    old_part.checked_add(new_part).ok_or(PoolError::MathOverflow)
}

/// Converts up to `budget` of stable funds (lender plus borrower collateral)
/// from the lender's matches into position `id`, newest match first. Partial
/// entries split the budget in the entry's own collateral ratio.
/// Returns the amount of the budget used.
fn convert_match_orders(
    env: &Env,
    id: u64,
    lender: &Address,
    budget: u128,
) -> Result<u128, PoolError> {
    let mut orders = ledger::match_orders(env, lender);
    let mut remaining = budget;
    let mut lender_total = 0u128;
    let mut borrower_total = 0u128;

    let mut index = orders.len();
    while index > 0 && remaining > 0 {
        index -= 1;
        let mut order = orders.get_unchecked(index);
        let entry_total = order
            .lender_collateral
            .checked_add(order.borrower_collateral)
            .ok_or(PoolError::MathOverflow)?;
        let (lender_funds, borrower_funds) = if remaining >= entry_total {
            (order.lender_collateral, order.borrower_collateral)
        } else {
            // Split at the entry's own lender:borrower ratio.
            let lender_funds = math::mul_div(
                env,
                remaining,
                order.lender_collateral,
                entry_total,
                Rounding::Down,
            )?
            .min(order.lender_collateral);
            let borrower_funds = (remaining - lender_funds).min(order.borrower_collateral);
            (lender_funds, borrower_funds)
        };
        if lender_funds == 0 {
            // Budget too small to move any lender principal.
            break;
        }

        order.lender_collateral -= lender_funds;
        order.borrower_collateral -= borrower_funds;
        if order.lender_collateral == 0 {
            // Leftover borrower collateral with no lender side goes back as idle capital.
            ledger::add_idle_capital(env, &order.borrower, order.borrower_collateral)?;
            orders.remove(index);
        } else {
            orders.set(index, order.clone());
        }
        ledger::record_borrow(env, &order.borrower, id, borrower_funds)?;

        remaining -= lender_funds + borrower_funds;
        lender_total += lender_funds;
        borrower_total += borrower_funds;
    }
    ledger::set_match_orders(env, lender, &orders);

    let used = lender_total + borrower_total;
    if used == 0 {
        return Ok(0);
    }
    ledger::remove_matched_depth(env, lender_total)?;
    ledger::mint_tby(env, lender, id, lender_total)?;
    LenderConverted {
        lender: lender.clone(),
        id,
        lender_amount: lender_total,
        borrower_amount: borrower_total,
    }
    .publish(env);
    Ok(used)
}

pub fn swap_out(
    env: &Env,
    market_maker: &Address,
    id: u64,
    rwa_amount: u128,
) -> Result<u128, PoolError> {
    access::require_market_maker(env, market_maker)?;
    if rwa_amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let maturity = ledger::maturity(env, id).ok_or(PoolError::InvalidTby)?;
    if env.ledger().timestamp() < maturity.end {
        return Err(PoolError::TbyNotMatured);
    }
    let mut collateral = ledger::collateral(env, id);
    let rwa_amount = rwa_amount.min(collateral.current_rwa_amount);
    if rwa_amount == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let price = oracle::rwa_price(env)?;
    let mut prices = ledger::rwa_price(env, id);
    if prices.end_price == 0 {
        prices.end_price = price;
        ledger::set_rwa_price(env, id, &prices);
    }

    let rwa_wad = math::to_wad(rwa_amount, storage::rwa_decimals(env)?, Rounding::Down)?;
    let value_wad = math::mul_wad(env, rwa_wad, price, Rounding::Up)?;
    let asset_amount = math::from_wad(value_wad, storage::asset_decimals(env)?, Rounding::Up)?;

    let rate = rate_at(env, &maturity, &prices)?;
    let tby_share = math::mul_div(
        env,
        ledger::tby_total_supply(env, id),
        rwa_amount,
        collateral.original_rwa_amount,
        Rounding::Down,
    )?;
    let lender_return = math::mul_wad(env, tby_share, rate, Rounding::Down)?.min(asset_amount);
    let borrower_return = asset_amount - lender_return;
    ledger::add_returns(env, id, lender_return, borrower_return)?;

    collateral.current_rwa_amount -= rwa_amount;
    collateral.asset_amount = collateral
        .asset_amount
        .checked_add(asset_amount)
        .ok_or(PoolError::MathOverflow)?;
    ledger::set_collateral(env, id, &collateral);

    pull(env, &asset_client(env)?, market_maker, asset_amount)?;
    push(env, &rwa_client(env)?, market_maker, rwa_amount)?;

    MarketMakerSwappedOut {
        market_maker: market_maker.clone(),
        id,
        rwa_amount,
        asset_amount,
        lender_return,
        borrower_return,
    }
    .publish(env);

    if collateral.current_rwa_amount == 0 {
        ledger::set_redeemable(env, id);
        TbyRedeemable {
            id,
            lender_returns: ledger::lender_returns(env, id),
            borrower_returns: ledger::borrower_returns(env, id),
        }
        .publish(env);
    }
    Ok(asset_amount)
}

/// Lender accrual rate for `id`, scaled 1e18.
///
/// Par until the id starts. Afterwards the RWA price ratio against the start
/// price, with gains above par scaled by the spread. Before the end price is
/// frozen at the first swap-out the live oracle price is used, so the value is
/// an estimate until then.
pub fn get_rate(env: &Env, id: u64) -> Result<u128, PoolError> {
    let maturity = ledger::maturity(env, id).ok_or(PoolError::InvalidTby)?;
    rate_at(env, &maturity, &ledger::rwa_price(env, id))
}

fn rate_at(env: &Env, maturity: &TbyMaturity, prices: &RwaPrice) -> Result<u128, PoolError> {
    if prices.start_price == 0 {
        return Err(PoolError::InvalidTby);
    }
    if env.ledger().timestamp() <= maturity.start {
        return Ok(WAD);
    }
    let price = if prices.end_price != 0 {
        prices.end_price
    } else {
        oracle::rwa_price(env)?
    };
    let ratio = math::div_wad(env, price, prices.start_price, Rounding::Down)?;
    take_spread(env, ratio)
}

fn take_spread(env: &Env, ratio: u128) -> Result<u128, PoolError> {
    if ratio <= WAD {
        return Ok(WAD);
    }
    let lender_yield = math::mul_wad(env, ratio - WAD, storage::spread(env)?, Rounding::Down)?;
    Ok(WAD + lender_yield)
}

pub fn redeem_lender(env: &Env, lender: &Address, id: u64, amount: u128) -> Result<u128, PoolError> {
    let returns = ledger::lender_returns(env, id);
    if !ledger::is_redeemable(env, id) || returns == 0 {
        return Err(PoolError::TbyNotRedeemable);
    }
    let balance = ledger::tby_balance(env, lender, id);
    if balance == 0 {
        return Err(PoolError::ZeroShares);
    }
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if amount > balance {
        return Err(PoolError::InsufficientBalance);
    }

    let reward = math::mul_div(env, returns, amount, ledger::tby_total_supply(env, id), Rounding::Down)?;
    ledger::burn_tby(env, lender, id, amount)?;
    ledger::take_lender_returns(env, id, reward)?;
    ledger::release_asset_collateral(env, id, reward)?;
    push(env, &asset_client(env)?, lender, reward)?;

    LenderRedeemed {
        lender: lender.clone(),
        id,
        shares: amount,
        reward,
    }
    .publish(env);
    Ok(reward)
}

pub fn redeem_borrower(env: &Env, borrower: &Address, id: u64) -> Result<u128, PoolError> {
    if !ledger::is_redeemable(env, id) {
        return Err(PoolError::TbyNotRedeemable);
    }
    let total = ledger::total_borrowed(env, id);
    let borrowed = ledger::borrower_amount(env, borrower, id);
    if total == 0 || borrowed == 0 {
        return Err(PoolError::TotalBorrowedZero);
    }

    let reward = math::mul_div(env, ledger::borrower_returns(env, id), borrowed, total, Rounding::Down)?;
    ledger::clear_borrow(env, borrower, id)?;
    ledger::take_borrower_returns(env, id, reward)?;
    ledger::release_asset_collateral(env, id, reward)?;
    push(env, &asset_client(env)?, borrower, reward)?;

    BorrowerRedeemed {
        borrower: borrower.clone(),
        id,
        borrowed,
        reward,
    }
    .publish(env);
    Ok(reward)
}
