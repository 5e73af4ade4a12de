//! Per-account and per-id balances: open orders, match lists, idle capital,
//! lender TBY shares and borrower amounts.

use soroban_sdk::{Address, Env, Vec};

use crate::errors::PoolError;
use crate::events::{IdleCapitalDecreased, IdleCapitalIncreased};
use crate::storage::*;

fn add(value: u128, delta: u128) -> Result<u128, PoolError> {
    value.checked_add(delta).ok_or(PoolError::MathOverflow)
}

fn sub(value: u128, delta: u128) -> Result<u128, PoolError> {
    value.checked_sub(delta).ok_or(PoolError::MathOverflow)
}

fn increase(env: &Env, key: &DataKey, delta: u128) -> Result<u128, PoolError> {
    let value = add(read_amount(env, key), delta)?;
    write_amount(env, key, value);
    Ok(value)
}

fn decrease(env: &Env, key: &DataKey, delta: u128) -> Result<u128, PoolError> {
    let value = sub(read_amount(env, key), delta)?;
    write_amount(env, key, value);
    Ok(value)
}

// Order book depth

pub fn open_depth(env: &Env) -> u128 {
    read_amount(env, &DataKey::OpenDepth)
}

pub fn matched_depth(env: &Env) -> u128 {
    read_amount(env, &DataKey::MatchedDepth)
}

pub fn open_order(env: &Env, lender: &Address) -> u128 {
    read_amount(env, &DataKey::OpenOrder(lender.clone()))
}

pub fn add_open(env: &Env, lender: &Address, amount: u128) -> Result<(), PoolError> {
    increase(env, &DataKey::OpenOrder(lender.clone()), amount)?;
    increase(env, &DataKey::OpenDepth, amount)?;
    Ok(())
}

pub fn remove_open(env: &Env, lender: &Address, amount: u128) -> Result<(), PoolError> {
    decrease(env, &DataKey::OpenOrder(lender.clone()), amount)?;
    decrease(env, &DataKey::OpenDepth, amount)?;
    Ok(())
}

pub fn add_matched_depth(env: &Env, amount: u128) -> Result<(), PoolError> {
    increase(env, &DataKey::MatchedDepth, amount).map(|_| ())
}

pub fn remove_matched_depth(env: &Env, amount: u128) -> Result<(), PoolError> {
    decrease(env, &DataKey::MatchedDepth, amount).map(|_| ())
}

// Match lists

pub fn match_orders(env: &Env, lender: &Address) -> Vec<MatchOrder> {
    read(env, &DataKey::MatchOrders(lender.clone())).unwrap_or(Vec::new(env))
}

pub fn set_match_orders(env: &Env, lender: &Address, orders: &Vec<MatchOrder>) {
    let key = DataKey::MatchOrders(lender.clone());
    if orders.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        write(env, &key, orders);
    }
}

/// Sum of lender collateral across the lender's live match entries.
pub fn matched_amount(env: &Env, lender: &Address) -> u128 {
    match_orders(env, lender)
        .iter()
        .fold(0u128, |acc, order| acc.saturating_add(order.lender_collateral))
}

// Idle capital

pub fn idle_capital(env: &Env, borrower: &Address) -> u128 {
    read_amount(env, &DataKey::IdleCapital(borrower.clone()))
}

pub fn add_idle_capital(env: &Env, borrower: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    increase(env, &DataKey::IdleCapital(borrower.clone()), amount)?;
    IdleCapitalIncreased {
        borrower: borrower.clone(),
        amount,
    }
    .publish(env);
    Ok(())
}

pub fn remove_idle_capital(env: &Env, borrower: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    let key = DataKey::IdleCapital(borrower.clone());
    if read_amount(env, &key) < amount {
        return Err(PoolError::InsufficientBalance);
    }
    decrease(env, &key, amount)?;
    IdleCapitalDecreased {
        borrower: borrower.clone(),
        amount,
    }
    .publish(env);
    Ok(())
}

// Lender TBY shares

pub fn tby_balance(env: &Env, account: &Address, id: u64) -> u128 {
    read_amount(env, &DataKey::TbyBalance(account.clone(), id))
}

pub fn tby_total_supply(env: &Env, id: u64) -> u128 {
    read_amount(env, &DataKey::TbySupply(id))
}

pub fn mint_tby(env: &Env, account: &Address, id: u64, amount: u128) -> Result<(), PoolError> {
    increase(env, &DataKey::TbyBalance(account.clone(), id), amount)?;
    increase(env, &DataKey::TbySupply(id), amount)?;
    Ok(())
}

pub fn burn_tby(env: &Env, account: &Address, id: u64, amount: u128) -> Result<(), PoolError> {
    let key = DataKey::TbyBalance(account.clone(), id);
    if read_amount(env, &key) < amount {
        return Err(PoolError::InsufficientBalance);
    }
    decrease(env, &key, amount)?;
    decrease(env, &DataKey::TbySupply(id), amount)?;
    Ok(())
}

// Borrower positions

pub fn borrower_amount(env: &Env, borrower: &Address, id: u64) -> u128 {
    read_amount(env, &DataKey::BorrowerAmount(borrower.clone(), id))
}

pub fn total_borrowed(env: &Env, id: u64) -> u128 {
    read_amount(env, &DataKey::TotalBorrowed(id))
}

pub fn record_borrow(env: &Env, borrower: &Address, id: u64, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    increase(env, &DataKey::BorrowerAmount(borrower.clone(), id), amount)?;
    increase(env, &DataKey::TotalBorrowed(id), amount)?;
    Ok(())
}

/// Clears the borrower's entry for `id`, returning what it held.
pub fn clear_borrow(env: &Env, borrower: &Address, id: u64) -> Result<u128, PoolError> {
    let key = DataKey::BorrowerAmount(borrower.clone(), id);
    let amount = read_amount(env, &key);
    write_amount(env, &key, 0);
    decrease(env, &DataKey::TotalBorrowed(id), amount)?;
    Ok(amount)
}

// Per-id records

pub fn last_minted_id(env: &Env) -> u64 {
    read(env, &DataKey::LastMintedId).unwrap_or(0u64)
}

pub fn set_last_minted_id(env: &Env, id: u64) {
    write(env, &DataKey::LastMintedId, &id);
}

pub fn maturity(env: &Env, id: u64) -> Option<TbyMaturity> {
    read(env, &DataKey::Maturity(id))
}

pub fn set_maturity(env: &Env, id: u64, maturity: &TbyMaturity) {
    write(env, &DataKey::Maturity(id), maturity);
}

pub fn collateral(env: &Env, id: u64) -> TbyCollateral {
    read(env, &DataKey::Collateral(id)).unwrap_or_default()
}

pub fn set_collateral(env: &Env, id: u64, collateral: &TbyCollateral) {
    write(env, &DataKey::Collateral(id), collateral);
}

pub fn rwa_price(env: &Env, id: u64) -> RwaPrice {
    read(env, &DataKey::RwaPrice(id)).unwrap_or_default()
}

pub fn set_rwa_price(env: &Env, id: u64, price: &RwaPrice) {
    write(env, &DataKey::RwaPrice(id), price);
}

pub fn is_redeemable(env: &Env, id: u64) -> bool {
    read(env, &DataKey::Redeemable(id)).unwrap_or(false)
}

pub fn set_redeemable(env: &Env, id: u64) {
    write(env, &DataKey::Redeemable(id), &true);
}

pub fn lender_returns(env: &Env, id: u64) -> u128 {
    read_amount(env, &DataKey::LenderReturns(id))
}

pub fn borrower_returns(env: &Env, id: u64) -> u128 {
    read_amount(env, &DataKey::BorrowerReturns(id))
}

pub fn add_returns(env: &Env, id: u64, lender: u128, borrower: u128) -> Result<(), PoolError> {
    increase(env, &DataKey::LenderReturns(id), lender)?;
    increase(env, &DataKey::BorrowerReturns(id), borrower)?;
    Ok(())
}

pub fn take_lender_returns(env: &Env, id: u64, amount: u128) -> Result<(), PoolError> {
    decrease(env, &DataKey::LenderReturns(id), amount).map(|_| ())
}

pub fn take_borrower_returns(env: &Env, id: u64, amount: u128) -> Result<(), PoolError> {
    decrease(env, &DataKey::BorrowerReturns(id), amount).map(|_| ())
}

/// Pays `amount` out of the id's stable collateral.
pub fn release_asset_collateral(env: &Env, id: u64, amount: u128) -> Result<(), PoolError> {
    let mut record = collateral(env, id);
    record.asset_amount = sub(record.asset_amount, amount)?;
    set_collateral(env, id, &record);
    Ok(())
}
