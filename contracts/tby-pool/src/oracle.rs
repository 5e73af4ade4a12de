use soroban_sdk::{contracttype, Env};

use crate::errors::PoolError;
use crate::math::{self, Rounding};
use crate::storage;

// Chainlink-style aggregator interface
#[soroban_sdk::contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn latest_round_data(env: Env) -> RoundData;
    fn decimals(env: Env) -> u32;
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u128,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u128,
}

/// Current RWA price in stable-asset terms, scaled to 1e18.
///
/// Rejects answers older than the configured staleness window and
/// non-positive answers.
pub fn rwa_price(env: &Env) -> Result<u128, PoolError> {
    let feed = PriceFeedClient::new(env, &storage::price_feed(env)?);
    let round = feed.latest_round_data();
    let now = env.ledger().timestamp();
    if round.updated_at < now.saturating_sub(storage::staleness_window(env)) {
        return Err(PoolError::OutOfDate);
    }
    if round.answer <= 0 {
        return Err(PoolError::InvalidPrice);
    }
    let price = math::to_wad(round.answer as u128, feed.decimals(), Rounding::Down)?;
    if price == 0 {
        return Err(PoolError::InvalidPrice);
    }
    Ok(price)
}
