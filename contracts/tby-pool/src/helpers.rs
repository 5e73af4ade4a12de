use soroban_sdk::{token, Address, Env};

use crate::errors::PoolError;
use crate::storage;

pub fn to_i128(amount: u128) -> Result<i128, PoolError> {
    i128::try_from(amount).map_err(|_| PoolError::MathOverflow)
}

pub fn asset_client(env: &Env) -> Result<token::Client<'_>, PoolError> {
    Ok(token::Client::new(env, &storage::asset(env)?))
}

pub fn rwa_client(env: &Env) -> Result<token::Client<'_>, PoolError> {
    Ok(token::Client::new(env, &storage::rwa(env)?))
}

/// Moves `amount` of `token` from `from` into the pool.
pub fn pull(env: &Env, token: &token::Client, from: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    token.transfer(from, &env.current_contract_address(), &to_i128(amount)?);
    Ok(())
}

/// Moves `amount` of `token` from the pool to `to`.
pub fn push(env: &Env, token: &token::Client, to: &Address, amount: u128) -> Result<(), PoolError> {
    if amount == 0 {
        return Ok(());
    }
    token.transfer(&env.current_contract_address(), to, &to_i128(amount)?);
    Ok(())
}

/// Liquid token balance of `account`, negative balances read as zero.
pub fn balance_of(token: &token::Client, account: &Address) -> u128 {
    let balance = token.balance(account);
    if balance < 0 {
        0
    } else {
        balance as u128
    }
}
