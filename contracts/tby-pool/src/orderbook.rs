//! Order lifecycle: lend, fill, cancel, and borrower idle capital.
//!
//! Lender funds move OPEN -> MATCHED through fills. From MATCHED they either
//! go back to OPEN (borrower cancels), leave the pool (lender cancels), or are
//! converted into a TBY position by a swap-in.

use soroban_sdk::{Address, Env, Vec};

use crate::access;
use crate::errors::PoolError;
use crate::events::*;
use crate::helpers::{asset_client, balance_of, pull, push};
use crate::ledger;
use crate::math::{self, Rounding};
use crate::storage::{self, MatchOrder};

pub fn lend_order(env: &Env, lender: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    pull(env, &asset_client(env)?, lender, amount)?;
    open_order(env, lender, amount)
}

/// Credits `amount` to the lender's open order without moving tokens.
fn open_order(env: &Env, lender: &Address, amount: u128) -> Result<(), PoolError> {
    ledger::add_open(env, lender, amount)?;
    OrderCreated {
        lender: lender.clone(),
        amount,
    }
    .publish(env);
    Ok(())
}

pub fn fill_orders(
    env: &Env,
    borrower: &Address,
    lenders: &Vec<Address>,
    amount: u128,
) -> Result<u128, PoolError> {
    access::require_borrower(env, borrower)?;
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let leverage = storage::leverage(env)?;

    let mut remaining = amount;
    let mut filled = 0u128;
    let mut collateral_required = 0u128;
    for lender in lenders.iter() {
        if lender == env.current_contract_address() || lender == *borrower {
            return Err(PoolError::InvalidAddress);
        }
        let (lender_amount, borrower_amount) = fill_order(env, &lender, borrower, remaining, leverage)?;
        remaining -= lender_amount;
        filled += lender_amount;
        collateral_required += borrower_amount;
        if remaining == 0 {
            break;
        }
    }

    deposit_borrower(env, borrower, collateral_required)?;
    Ok(filled)
}

/// Matches up to `amount` of the lender's open order against `borrower`.
/// Returns the lender amount filled and the borrower collateral it requires.
fn fill_order(
    env: &Env,
    lender: &Address,
    borrower: &Address,
    amount: u128,
    leverage: u128,
) -> Result<(u128, u128), PoolError> {
    let filled = ledger::open_order(env, lender).min(amount);
    if filled == 0 {
        return Ok((0, 0));
    }
    let borrower_amount = math::div_wad(env, filled, leverage, Rounding::Up)?;

    ledger::remove_open(env, lender, filled)?;
    ledger::add_matched_depth(env, filled)?;
    let mut orders = ledger::match_orders(env, lender);
    orders.push_back(MatchOrder {
        lender_collateral: filled,
        borrower_collateral: borrower_amount,
        borrower: borrower.clone(),
    });
    ledger::set_match_orders(env, lender, &orders);

    OrderFilled {
        lender: lender.clone(),
        borrower: borrower.clone(),
        leverage,
        lender_amount: filled,
        borrower_amount,
    }
    .publish(env);
    Ok((filled, borrower_amount))
}

/// Covers `amount` of borrower collateral, idle capital first.
fn deposit_borrower(env: &Env, borrower: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    let idle_used = ledger::idle_capital(env, borrower).min(amount);
    ledger::remove_idle_capital(env, borrower, idle_used)?;

    let shortfall = amount - idle_used;
    if shortfall > 0 {
        let asset = asset_client(env)?;
        if balance_of(&asset, borrower) < shortfall {
            return Err(PoolError::InsufficientBalance);
        }
        pull(env, &asset, borrower, shortfall)?;
    }
    Ok(())
}

pub fn kill_open_order(env: &Env, lender: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if amount > ledger::open_order(env, lender) {
        return Err(PoolError::InsufficientDepth);
    }
    ledger::remove_open(env, lender, amount)?;
    push(env, &asset_client(env)?, lender, amount)?;
    OpenOrderKilled {
        lender: lender.clone(),
        amount,
    }
    .publish(env);
    Ok(())
}

/// Unwinds the lender's matches newest-first, crediting each borrower's share
/// as idle capital, and pays the lender the unwound principal. A partially
/// unwound entry keeps its collateral ratio.
pub fn kill_match_order(env: &Env, lender: &Address, amount: u128) -> Result<u128, PoolError> {
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if amount > ledger::matched_amount(env, lender) {
        return Err(PoolError::InsufficientDepth);
    }
    let mut orders = ledger::match_orders(env, lender);
    let mut remaining = amount;
    let mut index = orders.len();
    while index > 0 && remaining > 0 {
        index -= 1;
        let mut order = orders.get_unchecked(index);
        let (lender_amount, borrower_amount) = if order.lender_collateral <= remaining {
            orders.remove(index);
            (order.lender_collateral, order.borrower_collateral)
        } else {
            // Entry's own ratio, not the current leverage.
            let refund = math::mul_div(
                env,
                order.borrower_collateral,
                remaining,
                order.lender_collateral,
                Rounding::Down,
            )?;
            order.lender_collateral -= remaining;
            order.borrower_collateral -= refund;
            orders.set(index, order.clone());
            (remaining, refund)
        };
        remaining -= lender_amount;
        ledger::add_idle_capital(env, &order.borrower, borrower_amount)?;
        MatchOrderKilled {
            lender: lender.clone(),
            borrower: order.borrower.clone(),
            lender_amount,
            borrower_amount,
        }
        .publish(env);
    }
    ledger::set_match_orders(env, lender, &orders);

    let unwound = amount - remaining;
    ledger::remove_matched_depth(env, unwound)?;
    push(env, &asset_client(env)?, lender, unwound)?;
    Ok(unwound)
}

/// Removes the borrower's oldest match against `lender` in full. The lender's
/// side re-enters the book as an open order; the borrower is paid directly.
pub fn kill_borrower_match(
    env: &Env,
    borrower: &Address,
    lender: &Address,
) -> Result<(u128, u128), PoolError> {
    let mut orders = ledger::match_orders(env, lender);
    let index = orders
        .iter()
        .position(|order| order.borrower == *borrower)
        .ok_or(PoolError::MatchOrderNotFound)? as u32;
    let order = orders.get_unchecked(index);
    orders.remove(index);
    ledger::set_match_orders(env, lender, &orders);

    ledger::remove_matched_depth(env, order.lender_collateral)?;
    open_order(env, lender, order.lender_collateral)?;
    push(env, &asset_client(env)?, borrower, order.borrower_collateral)?;

    BorrowerMatchKilled {
        borrower: borrower.clone(),
        lender: lender.clone(),
        lender_amount: order.lender_collateral,
        borrower_amount: order.borrower_collateral,
    }
    .publish(env);
    Ok((order.lender_collateral, order.borrower_collateral))
}

/// `u128::MAX` withdraws the whole idle balance.
pub fn withdraw_idle_capital(env: &Env, borrower: &Address, amount: u128) -> Result<u128, PoolError> {
    let idle = ledger::idle_capital(env, borrower);
    let amount = if amount == u128::MAX { idle } else { amount };
    if amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if amount > idle {
        return Err(PoolError::InsufficientBalance);
    }
    ledger::remove_idle_capital(env, borrower, amount)?;
    push(env, &asset_client(env)?, borrower, amount)?;
    IdleCapitalWithdrawn {
        borrower: borrower.clone(),
        amount,
    }
    .publish(env);
    Ok(amount)
}
