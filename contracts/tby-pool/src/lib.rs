#![no_std]

mod access;
mod constants;
mod contract;
mod errors;
mod events;
mod helpers;
mod ledger;
mod math;
mod oracle;
mod orderbook;
mod settlement;
mod storage;

pub use access::KycAuthority;
pub use constants::WAD;
pub use contract::*;
pub use errors::PoolError;
pub use oracle::{PriceFeed, RoundData};
pub use storage::{MatchOrder, RwaPrice, TbyCollateral, TbyMaturity};
