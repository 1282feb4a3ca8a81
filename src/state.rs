use concordium_cis1::TokenIdVec;
use concordium_std::*;

/// Token ID type shared with the NFT contract that minted the item.
pub type ContractTokenId = TokenIdVec;

/// The auctioned NFT.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Token {
    /// NFT contract address.
    pub contract: ContractAddress,
    /// NFT token identifier.
    pub id: ContractTokenId,
}

/// A single auction lot: the item together with its recorded bidding
/// progress.
///
/// Lot values are never mutated. Every admitted bid produces a fresh value
/// via [`LotState::with_bid`], and the hosting ledger decides which version
/// is canonical.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct LotState {
    /// Account that locked the item and collects the proceeds.
    pub owner: AccountAddress,
    /// Recorded highest bidder. `None` until the first bid is admitted.
    pub highest_bidder: Option<AccountAddress>,
    /// Recorded highest bid.
    pub highest_bid: Amount,
    /// The item under auction.
    pub item: Token,
}

impl LotState {
    /// Opening state of a lot: no bidder, zero highest bid.
    pub fn fresh(owner: AccountAddress, item: Token) -> Self {
        LotState {
            owner,
            highest_bidder: None,
            highest_bid: Amount::zero(),
            item,
        }
    }

    /// A lot snapshot is well formed when a recorded bidder and a non-zero
    /// highest bid appear together or not at all.
    pub fn well_formed(&self) -> bool {
        self.highest_bidder.is_none() == (self.highest_bid == Amount::zero())
    }

    /// Next lot state after a winning bid. Owner and item carry over
    /// unchanged. Only meaningful once [`Bid::raises`] has accepted the
    /// same pair.
    pub fn with_bid(&self, bid: &Bid) -> LotState {
        LotState {
            highest_bidder: Some(bid.bidder),
            highest_bid: bid.amount,
            ..self.clone()
        }
    }
}

/// A candidate bid. Ephemeral: absorbed into [`LotState`] only if it wins.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone, Copy)]
pub struct Bid {
    /// Bidder account address.
    pub bidder: AccountAddress,
    /// Offered amount.
    pub amount: Amount,
}

impl Bid {
    /// Whether this bid strictly raises the lot's recorded highest bid.
    /// Ties lose; the first admitted improvement wins.
    pub fn raises(&self, lot: &LotState) -> bool {
        self.amount > lot.highest_bid
    }
}

/// Obligations of an admitted transaction. The validator moves no funds and
/// records no state itself; the committing transaction must settle these.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    /// Item locked with the auction; nothing to settle.
    Lock,
    /// Record `next` as the canonical lot and lock `lock` in custody.
    Bid {
        /// Lot state the transaction must carry forward.
        next: LotState,
        /// Amount the transaction must lock in custody.
        lock: Amount,
    },
    /// Winner certified; the item must be transferred to the winner.
    Close {
        /// The item to transfer.
        item: Token,
        /// Certified auction winner.
        winner: AccountAddress,
        /// Winning price.
        price: Amount,
    },
    /// Winner certified; the proceeds must be released to the lot owner.
    Collect {
        /// The settled item.
        item: Token,
        /// Certified auction winner.
        winner: AccountAddress,
        /// Recorded proceeds to release.
        proceeds: Amount,
    },
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);
    const BOB: AccountAddress = AccountAddress([2u8; 32]);

    fn dummy_token() -> Token {
        Token {
            contract: ContractAddress {
                index: 1,
                subindex: 0,
            },
            id: TokenIdVec(vec![0, 1]),
        }
    }

    #[concordium_test]
    fn test_fresh_lot_is_well_formed() {
        let lot = LotState::fresh(OWNER, dummy_token());
        assert!(lot.well_formed());
        assert_eq!(lot.highest_bidder, None);
        assert_eq!(lot.highest_bid, Amount::zero());
    }

    #[concordium_test]
    fn test_bid_raises_only_on_strict_improvement() {
        let opening = Bid {
            bidder: ALICE,
            amount: Amount::from_micro_ccd(100),
        };
        let lot = LotState::fresh(OWNER, dummy_token()).with_bid(&opening);

        let equal = Bid {
            bidder: BOB,
            amount: Amount::from_micro_ccd(100),
        };
        let lower = Bid {
            bidder: BOB,
            amount: Amount::from_micro_ccd(99),
        };
        let higher = Bid {
            bidder: BOB,
            amount: Amount::from_micro_ccd(101),
        };
        assert!(!equal.raises(&lot), "Equal bids must lose");
        assert!(!lower.raises(&lot), "Lower bids must lose");
        assert!(higher.raises(&lot), "Strictly higher bids must win");
    }

    #[concordium_test]
    fn test_with_bid_records_bidder_and_amount() {
        let lot = LotState::fresh(OWNER, dummy_token());
        let bid = Bid {
            bidder: ALICE,
            amount: Amount::from_micro_ccd(100),
        };

        let next = lot.with_bid(&bid);
        assert_eq!(next.highest_bidder, Some(ALICE));
        assert_eq!(next.highest_bid, bid.amount);
        assert_eq!(next.owner, lot.owner);
        assert_eq!(next.item, lot.item);
        assert!(next.well_formed());

        // The prior snapshot stays as it was.
        assert_eq!(lot.highest_bidder, None);
        assert_eq!(lot.highest_bid, Amount::zero());
    }

    #[concordium_test]
    fn test_successive_winning_bids_raise_the_record() {
        let lot = LotState::fresh(OWNER, dummy_token());
        let first = Bid {
            bidder: ALICE,
            amount: Amount::from_micro_ccd(100),
        };
        let second = Bid {
            bidder: BOB,
            amount: Amount::from_micro_ccd(300),
        };

        assert!(first.raises(&lot));
        let after_first = lot.with_bid(&first);

        assert!(second.raises(&after_first));
        let after_second = after_first.with_bid(&second);

        assert!(after_second.highest_bid > after_first.highest_bid);
        assert_eq!(after_second.highest_bidder, Some(BOB));
    }
}
