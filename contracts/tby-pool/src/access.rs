use soroban_sdk::{Address, Env};

use crate::errors::PoolError;
use crate::storage;

// Narrow read-only view of the KYC / admin authority.
#[soroban_sdk::contractclient(name = "KycAuthorityClient")]
pub trait KycAuthority {
    fn is_approved_borrower(env: Env, account: Address) -> bool;
    fn is_approved_market_maker(env: Env, account: Address) -> bool;
    fn is_owner(env: Env, account: Address) -> bool;
}

fn authority(env: &Env) -> Result<KycAuthorityClient<'_>, PoolError> {
    Ok(KycAuthorityClient::new(env, &storage::kyc(env)?))
}

pub fn require_borrower(env: &Env, account: &Address) -> Result<(), PoolError> {
    if !authority(env)?.is_approved_borrower(account) {
        return Err(PoolError::KycFailed);
    }
    Ok(())
}

pub fn require_market_maker(env: &Env, account: &Address) -> Result<(), PoolError> {
    if !authority(env)?.is_approved_market_maker(account) {
        return Err(PoolError::KycFailed);
    }
    Ok(())
}

pub fn require_owner(env: &Env, account: &Address) -> Result<(), PoolError> {
    account.require_auth();
    if !authority(env)?.is_owner(account) {
        return Err(PoolError::Unauthorized);
    }
    Ok(())
}
