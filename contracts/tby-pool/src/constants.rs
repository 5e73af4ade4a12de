pub const WAD: u128 = 1_000_000_000_000_000_000u128; // 1e18

pub const ONE_DAY: u64 = 24 * 60 * 60;
/// Swap-ins landing within this window after an id's start share that id.
pub const SWAP_IN_WINDOW: u64 = 2 * ONE_DAY;
pub const DEFAULT_MATURITY_LENGTH: u64 = 180 * ONE_DAY;
pub const MAX_MATURITY_LENGTH: u64 = 3_650 * ONE_DAY;
pub const DEFAULT_STALENESS_WINDOW: u64 = ONE_DAY;

pub const MIN_LEVERAGE: u128 = WAD;
pub const MAX_LEVERAGE: u128 = 100 * WAD; // exclusive
pub const MIN_SPREAD: u128 = 850_000_000_000_000_000u128; // 0.85e18
pub const MAX_SPREAD: u128 = WAD;

/// Upper bound on stored decimals for either token; keeps 10^(decimals) in u128.
pub const MAX_TOKEN_DECIMALS: u32 = 36;

pub const TTL_THRESHOLD: u32 = 100_000;
pub const TTL_EXTEND_TO: u32 = 200_000;
