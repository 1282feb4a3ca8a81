use crate::state::{Bid, LotState};
use concordium_std::*;

/// Static terms of the auction: the lot as it was locked and the bidding
/// deadline. The terms parameterize the validator; every per-action record
/// carries the snapshot it acts on.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct AuctionParams {
    /// Opening lot state the item was locked with.
    pub lot: LotState,
    /// No bids are admissible once the transaction window passes this point.
    pub deadline: Timestamp,
}

/// Inputs for validating a bid attempt.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct BidParams {
    /// Lot snapshot the bid is placed against.
    pub lot: LotState,
    /// Bidding deadline as the caller recorded it. Must match the terms.
    pub deadline: Timestamp,
    /// The candidate bid.
    pub bid: Bid,
}

/// Inputs for validating the auction-closing action.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct CloseParams {
    /// Lot snapshot being settled.
    pub lot: LotState,
    /// Evidence bid. Must exactly match the recorded winner.
    pub bid: Bid,
}

/// Inputs for validating the proceeds collection by the owner.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct CollectParams {
    /// Lot snapshot being settled.
    pub lot: LotState,
    /// Evidence bid naming the recorded winner.
    pub bid: Bid,
}

/// Externally invocable auction actions.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub enum AuctionAction {
    /// Lock the item with the auction. Carries no parameters and no checks.
    Lock,
    /// Place a bid.
    Bid(BidParams),
    /// Close the auction in favour of the recorded winner.
    Close(CloseParams),
    /// Collect the proceeds of a finished auction.
    Collect(CollectParams),
}

/// Time window within which the proposed transaction may be committed.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy)]
pub struct TimeWindow {
    /// Earliest commit time.
    pub start: Timestamp,
    /// Latest commit time.
    pub end: Timestamp,
}

/// Destination of a declared payout.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub enum PayoutTarget {
    /// The auction's own custody.
    Custody,
    /// An account.
    Account(AccountAddress),
}

/// A payout the proposed transaction declares it will make.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Payout {
    /// Where the funds go.
    pub target: PayoutTarget,
    /// Paid amount.
    pub amount: Amount,
    /// Lot state the payout carries forward. Only custody payouts carry one.
    pub state: Option<LotState>,
}

/// Facts about the proposed transaction, assembled by the hosting ledger
/// layer. Read-only input to the validator.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct TransactionContext {
    /// Accounts that signed the transaction.
    pub signers: Vec<AccountAddress>,
    /// Validity window declared by the transaction.
    pub validity: TimeWindow,
    /// Payouts declared by the transaction.
    pub payouts: Vec<Payout>,
}

impl TransactionContext {
    /// Whether `account` is among the transaction signers.
    pub fn signed_by(&self, account: &AccountAddress) -> bool {
        self.signers.contains(account)
    }

    /// Whether some declared payout locks exactly `amount` in custody,
    /// carrying `next` as the lot state going forward.
    pub fn locks_in_custody(&self, amount: Amount, next: &LotState) -> bool {
        self.payouts.iter().any(|payout| {
            payout.target == PayoutTarget::Custody
                && payout.amount == amount
                && payout.state.as_ref() == Some(next)
        })
    }
}
