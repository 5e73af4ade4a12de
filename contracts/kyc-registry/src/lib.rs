#![no_std]
use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, Address, Env, Vec,
};

#[contracttype]
pub enum DataKey {
    Owner,
    Borrower(Address),    // bool
    MarketMaker(Address), // bool
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ArrayMismatch = 4,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowerKycSet {
    #[topic]
    pub account: Address,
    pub approved: bool,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketMakerKycSet {
    #[topic]
    pub account: Address,
    pub approved: bool,
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

#[contract]
pub struct KycRegistry;

#[contractimpl]
impl KycRegistry {
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        if env.storage().persistent().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        env.storage().persistent().set(&DataKey::Owner, &owner);
        bump(&env, &DataKey::Owner);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        stored_owner(&env)
    }

    pub fn set_borrower(
        env: Env,
        caller: Address,
        account: Address,
        approved: bool,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        write_borrower(&env, account, approved);
        Ok(())
    }

    /// Batch variant of `set_borrower`; `accounts` and `approvals` pair up by index.
    pub fn set_borrowers(
        env: Env,
        caller: Address,
        accounts: Vec<Address>,
        approvals: Vec<bool>,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        if accounts.len() != approvals.len() {
            return Err(Error::ArrayMismatch);
        }
        for (account, approved) in accounts.iter().zip(approvals.iter()) {
            write_borrower(&env, account, approved);
        }
        Ok(())
    }

    pub fn set_market_maker(
        env: Env,
        caller: Address,
        account: Address,
        approved: bool,
    ) -> Result<(), Error> {
        require_owner(&env, &caller)?;
        let key = DataKey::MarketMaker(account.clone());
        env.storage().persistent().set(&key, &approved);
        bump(&env, &key);
        MarketMakerKycSet { account, approved }.publish(&env);
        Ok(())
    }

    pub fn is_approved_borrower(env: Env, account: Address) -> bool {
        read_flag(&env, &DataKey::Borrower(account))
    }

    pub fn is_approved_market_maker(env: Env, account: Address) -> bool {
        read_flag(&env, &DataKey::MarketMaker(account))
    }

    pub fn is_owner(env: Env, account: Address) -> bool {
        match stored_owner(&env) {
            Ok(owner) => owner == account,
            Err(_) => false,
        }
    }
}

fn stored_owner(env: &Env) -> Result<Address, Error> {
    let owner = env
        .storage()
        .persistent()
        .get::<_, Address>(&DataKey::Owner)
        .ok_or(Error::NotInitialized)?;
    bump(env, &DataKey::Owner);
    Ok(owner)
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if stored_owner(env)? != *caller {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

fn write_borrower(env: &Env, account: Address, approved: bool) {
    let key = DataKey::Borrower(account.clone());
    env.storage().persistent().set(&key, &approved);
    bump(env, &key);
    BorrowerKycSet { account, approved }.publish(env);
}

fn read_flag(env: &Env, key: &DataKey) -> bool {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    persistent.get(key).unwrap_or(false)
}

fn bump(env: &Env, key: &DataKey) {
    let persistent = env.storage().persistent();
    if persistent.has(key) {
        persistent.extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::vec;

    fn setup(env: &Env) -> (KycRegistryClient<'_>, Address) {
        let owner = Address::generate(env);
        let id = env.register(KycRegistry, ());
        let client = KycRegistryClient::new(env, &id);
        client.initialize(&owner);
        (client, owner)
    }

    #[test]
    fn test_owner_whitelists_borrower_and_market_maker() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, owner) = setup(&env);

        let borrower = Address::generate(&env);
        let market_maker = Address::generate(&env);
        assert!(!client.is_approved_borrower(&borrower));

        client.set_borrower(&owner, &borrower, &true);
        client.set_market_maker(&owner, &market_maker, &true);

        assert!(client.is_approved_borrower(&borrower));
        assert!(client.is_approved_market_maker(&market_maker));
        assert!(!client.is_approved_market_maker(&borrower));
        assert!(client.is_owner(&owner));
        assert!(!client.is_owner(&borrower));
        assert_eq!(client.owner(), owner);

        client.set_borrower(&owner, &borrower, &false);
        assert!(!client.is_approved_borrower(&borrower));
    }

    #[test]
    fn test_non_owner_cannot_whitelist() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, _owner) = setup(&env);

        let intruder = Address::generate(&env);
        let res = client.try_set_borrower(&intruder, &intruder, &true);
        assert_eq!(res, Err(Ok(Error::Unauthorized)));
        assert!(!client.is_approved_borrower(&intruder));
    }

    #[test]
    fn test_batch_whitelist_requires_matching_lengths() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, owner) = setup(&env);

        let a = Address::generate(&env);
        let b = Address::generate(&env);
        let res = client.try_set_borrowers(&owner, &vec![&env, a.clone(), b.clone()], &vec![&env, true]);
        assert_eq!(res, Err(Ok(Error::ArrayMismatch)));

        client.set_borrowers(&owner, &vec![&env, a.clone(), b.clone()], &vec![&env, true, false]);
        assert!(client.is_approved_borrower(&a));
        assert!(!client.is_approved_borrower(&b));
    }

    #[test]
    fn test_initialize_twice_fails() {
        let env = Env::default();
        env.mock_all_auths();
        let (client, owner) = setup(&env);
        assert_eq!(client.try_initialize(&owner), Err(Ok(Error::AlreadyInitialized)));
    }
}
