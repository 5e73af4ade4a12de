use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

use crate::access;
use crate::constants::*;
use crate::errors::PoolError;
use crate::events::*;
use crate::ledger;
use crate::oracle;
use crate::orderbook;
use crate::settlement;
use crate::storage::{self, DataKey, MatchOrder, RwaPrice, TbyCollateral, TbyMaturity};

#[contract]
pub struct TbyPool;

#[contractimpl]
impl TbyPool {
    /// Wires the pool to its tokens, price feed and KYC authority.
    /// Leverage and spread are scaled 1e18 (50x = 50e18, 99.5% = 0.995e18).
    /// Unauthenticated and callable once; deploy and initialize in the same
    /// transaction. Admin rights come from the KYC registry owner.
    pub fn initialize(
        env: Env,
        asset: Address,
        rwa: Address,
        price_feed: Address,
        kyc: Address,
        leverage: u128,
        spread: u128,
    ) -> Result<(), PoolError> {
        if storage::read::<bool>(&env, &DataKey::Initialized).unwrap_or(false) {
            return Err(PoolError::AlreadyInitialized);
        }
        let this = env.current_contract_address();
        if asset == rwa || asset == this || rwa == this || kyc == this || price_feed == this {
            return Err(PoolError::InvalidAddress);
        }
        validate_leverage(leverage)?;
        validate_spread(spread)?;

        let asset_decimals = token::Client::new(&env, &asset).decimals();
        let rwa_decimals = token::Client::new(&env, &rwa).decimals();
        if asset_decimals > MAX_TOKEN_DECIMALS || rwa_decimals > MAX_TOKEN_DECIMALS {
            return Err(PoolError::MathOverflow);
        }

        storage::write(&env, &DataKey::Asset, &asset);
        storage::write(&env, &DataKey::Rwa, &rwa);
        storage::write(&env, &DataKey::AssetDecimals, &asset_decimals);
        storage::write(&env, &DataKey::RwaDecimals, &rwa_decimals);
        storage::write(&env, &DataKey::PriceFeed, &price_feed);
        storage::write(&env, &DataKey::StalenessWindow, &DEFAULT_STALENESS_WINDOW);
        storage::write(&env, &DataKey::Kyc, &kyc);
        storage::write(&env, &DataKey::Leverage, &leverage);
        storage::write(&env, &DataKey::Spread, &spread);
        storage::write(&env, &DataKey::MaturityLength, &DEFAULT_MATURITY_LENGTH);
        storage::write(&env, &DataKey::Initialized, &true);
        Ok(())
    }

    // Admin

    pub fn set_leverage(env: Env, caller: Address, leverage: u128) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        validate_leverage(leverage)?;
        storage::write(&env, &DataKey::Leverage, &leverage);
        LeverageSet { leverage }.publish(&env);
        Ok(())
    }

    pub fn set_spread(env: Env, caller: Address, spread: u128) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        validate_spread(spread)?;
        storage::write(&env, &DataKey::Spread, &spread);
        SpreadSet { spread }.publish(&env);
        Ok(())
    }

    /// Only ids opened after this call use the new length.
    pub fn set_maturity_length(
        env: Env,
        caller: Address,
        maturity_length: u64,
    ) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        if maturity_length == 0 || maturity_length > MAX_MATURITY_LENGTH {
            return Err(PoolError::InvalidMaturity);
        }
        storage::write(&env, &DataKey::MaturityLength, &maturity_length);
        MaturityLengthSet { maturity_length }.publish(&env);
        Ok(())
    }

    pub fn set_price_feed(
        env: Env,
        caller: Address,
        price_feed: Address,
        staleness_window: u64,
    ) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        access::require_owner(&env, &caller)?;
        if price_feed == env.current_contract_address() {
            return Err(PoolError::InvalidAddress);
        }
        if staleness_window == 0 {
            return Err(PoolError::ZeroAmount);
        }
        storage::write(&env, &DataKey::PriceFeed, &price_feed);
        storage::write(&env, &DataKey::StalenessWindow, &staleness_window);
        PriceFeedSet {
            price_feed,
            staleness_window,
        }
        .publish(&env);
        Ok(())
    }

    // Order book

    pub fn lend_order(env: Env, lender: Address, amount: u128) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        lender.require_auth();
        orderbook::lend_order(&env, &lender, amount)
    }

    pub fn fill_order(
        env: Env,
        borrower: Address,
        lender: Address,
        amount: u128,
    ) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        borrower.require_auth();
        let lenders = Vec::from_array(&env, [lender]);
        orderbook::fill_orders(&env, &borrower, &lenders, amount)
    }

    /// Fills lenders in the given order until `amount` is matched.
    pub fn fill_orders(
        env: Env,
        borrower: Address,
        lenders: Vec<Address>,
        amount: u128,
    ) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        borrower.require_auth();
        orderbook::fill_orders(&env, &borrower, &lenders, amount)
    }

    pub fn kill_open_order(env: Env, lender: Address, amount: u128) -> Result<(), PoolError> {
        storage::ensure_initialized(&env)?;
        lender.require_auth();
        orderbook::kill_open_order(&env, &lender, amount)
    }

    pub fn kill_match_order(env: Env, lender: Address, amount: u128) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        lender.require_auth();
        orderbook::kill_match_order(&env, &lender, amount)
    }

    /// Returns `(lender_amount_reopened, borrower_refund)`.
    pub fn kill_borrower_match(
        env: Env,
        borrower: Address,
        lender: Address,
    ) -> Result<(u128, u128), PoolError> {
        storage::ensure_initialized(&env)?;
        borrower.require_auth();
        orderbook::kill_borrower_match(&env, &borrower, &lender)
    }

    pub fn withdraw_idle_capital(
        env: Env,
        borrower: Address,
        amount: u128,
    ) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        borrower.require_auth();
        orderbook::withdraw_idle_capital(&env, &borrower, amount)
    }

    // Settlement

    /// Returns `(id, stable_amount_swapped)`.
    pub fn swap_in(
        env: Env,
        market_maker: Address,
        lenders: Vec<Address>,
        asset_amount: u128,
    ) -> Result<(u64, u128), PoolError> {
        storage::ensure_initialized(&env)?;
        market_maker.require_auth();
        settlement::swap_in(&env, &market_maker, &lenders, asset_amount)
    }

    pub fn swap_out(
        env: Env,
        market_maker: Address,
        id: u64,
        rwa_amount: u128,
    ) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        market_maker.require_auth();
        settlement::swap_out(&env, &market_maker, id, rwa_amount)
    }

    pub fn redeem_lender(env: Env, lender: Address, id: u64, amount: u128) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        lender.require_auth();
        settlement::redeem_lender(&env, &lender, id, amount)
    }

    pub fn redeem_borrower(env: Env, borrower: Address, id: u64) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        borrower.require_auth();
        settlement::redeem_borrower(&env, &borrower, id)
    }

    pub fn get_rate(env: Env, id: u64) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        settlement::get_rate(&env, id)
    }

    // Views

    pub fn asset(env: Env) -> Result<Address, PoolError> {
        storage::asset(&env)
    }

    pub fn rwa(env: Env) -> Result<Address, PoolError> {
        storage::rwa(&env)
    }

    pub fn asset_decimals(env: Env) -> Result<u32, PoolError> {
        storage::asset_decimals(&env)
    }

    pub fn rwa_decimals(env: Env) -> Result<u32, PoolError> {
        storage::rwa_decimals(&env)
    }

    pub fn kyc(env: Env) -> Result<Address, PoolError> {
        storage::kyc(&env)
    }

    pub fn price_feed(env: Env) -> Result<Address, PoolError> {
        storage::price_feed(&env)
    }

    pub fn staleness_window(env: Env) -> u64 {
        storage::staleness_window(&env)
    }

    pub fn leverage(env: Env) -> Result<u128, PoolError> {
        storage::leverage(&env)
    }

    pub fn spread(env: Env) -> Result<u128, PoolError> {
        storage::spread(&env)
    }

    pub fn maturity_length(env: Env) -> u64 {
        storage::maturity_length(&env)
    }

    /// Current RWA price from the feed, scaled 1e18.
    pub fn rwa_price(env: Env) -> Result<u128, PoolError> {
        storage::ensure_initialized(&env)?;
        oracle::rwa_price(&env)
    }

    pub fn open_depth(env: Env) -> u128 {
        ledger::open_depth(&env)
    }

    pub fn matched_depth(env: Env) -> u128 {
        ledger::matched_depth(&env)
    }

    pub fn amount_open(env: Env, account: Address) -> u128 {
        ledger::open_order(&env, &account)
    }

    pub fn amount_matched(env: Env, account: Address) -> u128 {
        ledger::matched_amount(&env, &account)
    }

    /// Match entries for `account`, oldest first.
    pub fn match_orders(env: Env, account: Address) -> Vec<MatchOrder> {
        ledger::match_orders(&env, &account)
    }

    pub fn match_order_count(env: Env, account: Address) -> u32 {
        ledger::match_orders(&env, &account).len()
    }

    pub fn idle_capital(env: Env, account: Address) -> u128 {
        ledger::idle_capital(&env, &account)
    }

    pub fn last_minted_id(env: Env) -> u64 {
        ledger::last_minted_id(&env)
    }

    pub fn tby_maturity(env: Env, id: u64) -> Option<TbyMaturity> {
        ledger::maturity(&env, id)
    }

    pub fn tby_collateral(env: Env, id: u64) -> TbyCollateral {
        ledger::collateral(&env, id)
    }

    pub fn tby_rwa_price(env: Env, id: u64) -> RwaPrice {
        ledger::rwa_price(&env, id)
    }

    pub fn tby_balance(env: Env, account: Address, id: u64) -> u128 {
        ledger::tby_balance(&env, &account, id)
    }

    pub fn tby_total_supply(env: Env, id: u64) -> u128 {
        ledger::tby_total_supply(&env, id)
    }

    pub fn borrower_amount(env: Env, account: Address, id: u64) -> u128 {
        ledger::borrower_amount(&env, &account, id)
    }

    pub fn total_borrowed(env: Env, id: u64) -> u128 {
        ledger::total_borrowed(&env, id)
    }

    pub fn lender_returns(env: Env, id: u64) -> u128 {
        ledger::lender_returns(&env, id)
    }

    pub fn borrower_returns(env: Env, id: u64) -> u128 {
        ledger::borrower_returns(&env, id)
    }

    pub fn is_tby_redeemable(env: Env, id: u64) -> bool {
        ledger::is_redeemable(&env, id)
    }
}

fn validate_leverage(leverage: u128) -> Result<(), PoolError> {
    if !(MIN_LEVERAGE..MAX_LEVERAGE).contains(&leverage) {
        return Err(PoolError::InvalidLeverage);
    }
    Ok(())
}

fn validate_spread(spread: u128) -> Result<(), PoolError> {
    if !(MIN_SPREAD..=MAX_SPREAD).contains(&spread) {
        return Err(PoolError::InvalidSpread);
    }
    Ok(())
}
