use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    // Input validation
    ZeroAmount = 10,
    InvalidAddress = 11,
    InvalidLeverage = 12,
    InvalidSpread = 13,
    InvalidMaturity = 14,
    // Authorization
    Unauthorized = 20,
    KycFailed = 21,
    // State / timing
    TbyNotMatured = 30,
    TbyNotRedeemable = 31,
    OutOfDate = 32,
    InvalidPrice = 33,
    MatchOrderNotFound = 34,
    TotalBorrowedZero = 35,
    InvalidTby = 36,
    // Resource sufficiency
    InsufficientDepth = 40,
    InsufficientBalance = 41,
    ZeroShares = 42,
    MathOverflow = 50,
}
