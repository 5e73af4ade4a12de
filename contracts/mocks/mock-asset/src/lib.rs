#![no_std]

//! Fungible token with configurable decimals, standing in for the stable
//! asset and the RWA token in tests.

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String};
use stellar_tokens::fungible::Base as TokenBase;

#[contracttype]
enum DataKey {
    Initialized,
}

#[contract]
pub struct MockAsset;

#[contractimpl]
impl MockAsset {
    pub fn initialize(env: Env, decimals: u32, name: String, symbol: String) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic!("already initialized");
        }
        TokenBase::set_metadata(&env, decimals, name, symbol);
        env.storage().instance().set(&DataKey::Initialized, &true);
    }

    pub fn decimals(env: Env) -> u32 {
        TokenBase::decimals(&env)
    }

    pub fn name(env: Env) -> String {
        TokenBase::name(&env)
    }

    pub fn symbol(env: Env) -> String {
        TokenBase::symbol(&env)
    }

    pub fn total_supply(env: Env) -> i128 {
        TokenBase::total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        TokenBase::balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        if amount < 0 {
            panic!("negative amount");
        }
        if TokenBase::balance(&env, &from) < amount {
            panic!("insufficient balance");
        }
        TokenBase::update(&env, Some(&from), Some(&to), amount);
    }

    /// Unrestricted mint; test fixtures only.
    pub fn mint(env: Env, to: Address, amount: i128) {
        if amount <= 0 {
            panic!("bad amount");
        }
        TokenBase::mint(&env, &to, amount);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;

    #[test]
    fn test_mint_and_transfer_respect_decimals_metadata() {
        let env = Env::default();
        env.mock_all_auths();

        let id = env.register(MockAsset, ());
        let client = MockAssetClient::new(&env, &id);
        client.initialize(
            &6u32,
            &String::from_str(&env, "Mock USD"),
            &String::from_str(&env, "mUSD"),
        );
        assert_eq!(client.decimals(), 6u32);

        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.mint(&alice, &1_000_000i128);
        client.transfer(&alice, &bob, &250_000i128);

        assert_eq!(client.balance(&alice), 750_000i128);
        assert_eq!(client.balance(&bob), 250_000i128);
        assert_eq!(client.total_supply(), 1_000_000i128);
    }

    #[test]
    #[should_panic(expected = "insufficient balance")]
    fn test_transfer_over_balance_panics() {
        let env = Env::default();
        env.mock_all_auths();

        let id = env.register(MockAsset, ());
        let client = MockAssetClient::new(&env, &id);
        client.initialize(
            &18u32,
            &String::from_str(&env, "Mock RWA"),
            &String::from_str(&env, "mRWA"),
        );
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);
        client.mint(&alice, &10i128);
        client.transfer(&alice, &bob, &11i128);
    }
}
