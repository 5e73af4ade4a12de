use soroban_sdk::{contractevent, Address};

/// Stable asset entered the book as an open order, either from a fresh deposit
/// or from a borrower cancelling a match.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderCreated {
    #[topic]
    pub lender: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderFilled {
    #[topic]
    pub lender: Address,
    #[topic]
    pub borrower: Address,
    pub leverage: u128,
    pub lender_amount: u128,
    pub borrower_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenOrderKilled {
    #[topic]
    pub lender: Address,
    pub amount: u128,
}

/// One event per match entry touched by a lender-initiated unwind.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchOrderKilled {
    #[topic]
    pub lender: Address,
    #[topic]
    pub borrower: Address,
    pub lender_amount: u128,
    pub borrower_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowerMatchKilled {
    #[topic]
    pub borrower: Address,
    #[topic]
    pub lender: Address,
    pub lender_amount: u128,
    pub borrower_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdleCapitalIncreased {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdleCapitalDecreased {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdleCapitalWithdrawn {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TbyCreated {
    #[topic]
    pub id: u64,
    pub start: u64,
    pub end: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LenderConverted {
    #[topic]
    pub lender: Address,
    #[topic]
    pub id: u64,
    pub lender_amount: u128,
    pub borrower_amount: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketMakerSwappedIn {
    #[topic]
    pub market_maker: Address,
    #[topic]
    pub id: u64,
    pub asset_amount: u128,
    pub rwa_amount: u128,
    pub price: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketMakerSwappedOut {
    #[topic]
    pub market_maker: Address,
    #[topic]
    pub id: u64,
    pub rwa_amount: u128,
    pub asset_amount: u128,
    pub lender_return: u128,
    pub borrower_return: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TbyRedeemable {
    #[topic]
    pub id: u64,
    pub lender_returns: u128,
    pub borrower_returns: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LenderRedeemed {
    #[topic]
    pub lender: Address,
    #[topic]
    pub id: u64,
    pub shares: u128,
    pub reward: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BorrowerRedeemed {
    #[topic]
    pub borrower: Address,
    #[topic]
    pub id: u64,
    pub borrowed: u128,
    pub reward: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LeverageSet {
    pub leverage: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpreadSet {
    pub spread: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaturityLengthSet {
    pub maturity_length: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceFeedSet {
    #[topic]
    pub price_feed: Address,
    pub staleness_window: u64,
}
