use soroban_sdk::{contracttype, Address, Env, IntoVal, TryFromVal, Val};

use crate::constants::*;
use crate::errors::PoolError;

// Storage key types for the contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Asset,           // Address, stable asset
    Rwa,             // Address, RWA token
    AssetDecimals,   // u32, cached at initialize
    RwaDecimals,     // u32, cached at initialize
    Kyc,             // Address of the KYC / admin authority
    PriceFeed,       // Address
    StalenessWindow, // u64 seconds
    Leverage,        // u128, scaled 1e18
    Spread,          // u128, scaled 1e18
    MaturityLength,  // u64 seconds, applies to newly opened ids
    // Order book
    OpenDepth,
    MatchedDepth,
    OpenOrder(Address),   // u128
    MatchOrders(Address), // Vec<MatchOrder>, oldest first
    IdleCapital(Address), // u128
    // TBY ids
    LastMintedId,                // u64, 0 = none
    Maturity(u64),               // TbyMaturity
    Collateral(u64),             // TbyCollateral
    RwaPrice(u64),               // RwaPrice
    Redeemable(u64),             // bool
    TbyBalance(Address, u64),    // u128 lender shares
    TbySupply(u64),              // u128
    BorrowerAmount(Address, u64), // u128
    TotalBorrowed(u64),          // u128
    LenderReturns(u64),          // u128
    BorrowerReturns(u64),        // u128
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchOrder {
    pub lender_collateral: u128,
    pub borrower_collateral: u128,
    pub borrower: Address,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TbyMaturity {
    pub start: u64,
    pub end: u64,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TbyCollateral {
    pub asset_amount: u128,
    pub current_rwa_amount: u128,
    pub original_rwa_amount: u128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RwaPrice {
    pub start_price: u128,
    pub end_price: u128,
}

pub fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn read<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
{
    bump(env, key);
    env.storage().persistent().get(key)
}

pub fn write<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    bump(env, key);
}

pub fn read_amount(env: &Env, key: &DataKey) -> u128 {
    read(env, key).unwrap_or(0u128)
}

/// Zero balances are deleted rather than stored.
pub fn write_amount(env: &Env, key: &DataKey, value: u128) {
    if value == 0 {
        env.storage().persistent().remove(key);
    } else {
        write(env, key, &value);
    }
}

pub fn ensure_initialized(env: &Env) -> Result<(), PoolError> {
    if read::<bool>(env, &DataKey::Initialized).unwrap_or(false) {
        bump_core_ttl(env);
        Ok(())
    } else {
        Err(PoolError::NotInitialized)
    }
}

pub fn bump_core_ttl(env: &Env) {
    for key in [
        DataKey::Asset,
        DataKey::Rwa,
        DataKey::AssetDecimals,
        DataKey::RwaDecimals,
        DataKey::Kyc,
        DataKey::PriceFeed,
        DataKey::StalenessWindow,
        DataKey::Leverage,
        DataKey::Spread,
        DataKey::MaturityLength,
        DataKey::OpenDepth,
        DataKey::MatchedDepth,
        DataKey::LastMintedId,
    ] {
        bump(env, &key);
    }
}

fn required<V>(env: &Env, key: &DataKey) -> Result<V, PoolError>
where
    V: TryFromVal<Env, Val>,
{
    env.storage()
        .persistent()
        .get(key)
        .ok_or(PoolError::NotInitialized)
}

pub fn asset(env: &Env) -> Result<Address, PoolError> {
    required(env, &DataKey::Asset)
}

pub fn rwa(env: &Env) -> Result<Address, PoolError> {
    required(env, &DataKey::Rwa)
}

pub fn asset_decimals(env: &Env) -> Result<u32, PoolError> {
    required(env, &DataKey::AssetDecimals)
}

pub fn rwa_decimals(env: &Env) -> Result<u32, PoolError> {
    required(env, &DataKey::RwaDecimals)
}

pub fn kyc(env: &Env) -> Result<Address, PoolError> {
    required(env, &DataKey::Kyc)
}

pub fn price_feed(env: &Env) -> Result<Address, PoolError> {
    required(env, &DataKey::PriceFeed)
}

pub fn staleness_window(env: &Env) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::StalenessWindow)
        .unwrap_or(DEFAULT_STALENESS_WINDOW)
}

pub fn leverage(env: &Env) -> Result<u128, PoolError> {
    required(env, &DataKey::Leverage)
}

pub fn spread(env: &Env) -> Result<u128, PoolError> {
    required(env, &DataKey::Spread)
}

pub fn maturity_length(env: &Env) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::MaturityLength)
        .unwrap_or(DEFAULT_MATURITY_LENGTH)
}
