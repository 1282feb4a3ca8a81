use crate::errors::CustomContractError;
use crate::external::{
    AuctionAction, AuctionParams, BidParams, CloseParams, CollectParams, TransactionContext,
};
use crate::state::{Admission, Bid, LotState};
use concordium_std::*;

/// Outcome of validating a proposed transaction against the auction terms.
pub type ValidationResult = Result<Admission, CustomContractError>;

impl AuctionParams {
    /// Decides whether the proposed transaction may be committed.
    ///
    /// The decision is the conjunction of the checks below; the first failed
    /// check rejects the transaction outright. On admission the returned
    /// [`Admission`] describes the obligations the committing transaction
    /// must settle.
    pub fn validate(&self, action: &AuctionAction, ctx: &TransactionContext) -> ValidationResult {
        match action {
            AuctionAction::Lock => Ok(Admission::Lock),
            AuctionAction::Bid(params) => self.admit_bid(params, ctx),
            AuctionAction::Close(params) => self.admit_close(params, ctx),
            AuctionAction::Collect(params) => self.admit_collect(params, ctx),
        }
    }

    /// Checks shared by every bid-carrying action: the snapshot must be well
    /// formed, the bid non-empty, and the bid must raise the opening lot.
    fn admit_reference(&self, lot: &LotState, bid: &Bid) -> Result<(), CustomContractError> {
        ensure!(lot.well_formed(), CustomContractError::MalformedAction);
        ensure!(
            bid.amount > Amount::zero(),
            CustomContractError::MalformedAction
        );
        ensure!(bid.raises(&self.lot), CustomContractError::BidNotHigher);
        Ok(())
    }

    fn admit_bid(&self, params: &BidParams, ctx: &TransactionContext) -> ValidationResult {
        self.admit_reference(&params.lot, &params.bid)?;
        ensure!(
            params.deadline == self.deadline,
            CustomContractError::MalformedAction
        );

        // The bid must raise the very snapshot it advances.
        ensure!(
            params.bid.raises(&params.lot),
            CustomContractError::BidNotHigher
        );

        // Admissibility is judged on the declared window, not wall-clock
        // time: the transaction may not commit past the deadline.
        ensure!(
            ctx.validity.end <= self.deadline,
            CustomContractError::PastDeadline
        );

        let next = params.lot.with_bid(&params.bid);
        ensure!(
            ctx.locks_in_custody(params.bid.amount, &next),
            CustomContractError::AmountMismatch
        );

        Ok(Admission::Bid {
            next,
            lock: params.bid.amount,
        })
    }

    fn admit_close(&self, params: &CloseParams, ctx: &TransactionContext) -> ValidationResult {
        self.admit_reference(&params.lot, &params.bid)?;
        ensure!(
            ctx.signed_by(&params.lot.owner),
            CustomContractError::UnauthorizedSigner
        );

        let winner = match params.lot.highest_bidder {
            Some(winner) => winner,
            None => bail!(CustomContractError::MissingBid),
        };
        ensure!(
            winner == params.bid.bidder,
            CustomContractError::WinnerMismatch
        );
        ensure!(
            params.lot.highest_bid == params.bid.amount,
            CustomContractError::AmountMismatch
        );

        Ok(Admission::Close {
            item: params.lot.item.clone(),
            winner,
            price: params.lot.highest_bid,
        })
    }

    fn admit_collect(&self, params: &CollectParams, ctx: &TransactionContext) -> ValidationResult {
        self.admit_reference(&params.lot, &params.bid)?;
        ensure!(
            ctx.signed_by(&params.lot.owner),
            CustomContractError::UnauthorizedSigner
        );

        // The recorded amount is not re-checked here: the owner only
        // certifies who the winner is before the proceeds are released.
        let winner = match params.lot.highest_bidder {
            Some(winner) => winner,
            None => bail!(CustomContractError::MissingBid),
        };
        ensure!(
            winner == params.bid.bidder,
            CustomContractError::WinnerMismatch
        );

        Ok(Admission::Collect {
            item: params.lot.item.clone(),
            winner,
            proceeds: params.lot.highest_bid,
        })
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::external::{Payout, PayoutTarget, TimeWindow};
    use crate::state::{ContractTokenId, Token};
    use concordium_cis1::TokenIdVec;
    use core::fmt::Debug;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);
    const BOB: AccountAddress = AccountAddress([2u8; 32]);
    const EVE: AccountAddress = AccountAddress([3u8; 32]);

    const DEADLINE: u64 = 500;

    fn token_0() -> ContractTokenId {
        TokenIdVec(vec![0, 1])
    }

    fn dummy_token() -> Token {
        Token {
            contract: ContractAddress {
                index: 1,
                subindex: 0,
            },
            id: token_0(),
        }
    }

    fn fresh_lot() -> LotState {
        LotState::fresh(OWNER, dummy_token())
    }

    fn dummy_terms() -> AuctionParams {
        AuctionParams {
            lot: fresh_lot(),
            deadline: Timestamp::from_timestamp_millis(DEADLINE),
        }
    }

    fn micro(amount: u64) -> Amount {
        Amount::from_micro_ccd(amount)
    }

    fn window(end: u64) -> TimeWindow {
        TimeWindow {
            start: Timestamp::from_timestamp_millis(0),
            end: Timestamp::from_timestamp_millis(end),
        }
    }

    fn bid_params(lot: &LotState, bid: Bid) -> BidParams {
        BidParams {
            lot: lot.clone(),
            deadline: Timestamp::from_timestamp_millis(DEADLINE),
            bid,
        }
    }

    /// Context for a bid transaction: signed by the bidder, committing at
    /// `end` with the bid amount locked forward in custody.
    fn bid_ctx(lot: &LotState, bid: &Bid, end: u64) -> TransactionContext {
        TransactionContext {
            signers: vec![bid.bidder],
            validity: window(end),
            payouts: vec![Payout {
                target: PayoutTarget::Custody,
                amount: bid.amount,
                state: Some(lot.with_bid(bid)),
            }],
        }
    }

    /// Context for a close/collect transaction signed by `signer`.
    fn settle_ctx(signer: AccountAddress) -> TransactionContext {
        TransactionContext {
            signers: vec![signer],
            validity: window(DEADLINE + 100),
            payouts: Vec::new(),
        }
    }

    fn expect_error<E, T>(expr: Result<T, E>, err: E, msg: &str)
    where
        E: Eq + Debug,
        T: Debug,
    {
        let actual = expr.expect_err(msg);
        assert_eq!(actual, err);
    }

    #[concordium_test]
    fn test_lock_is_admitted_without_checks() {
        let terms = dummy_terms();
        let ctx = settle_ctx(EVE);

        let admission = terms
            .validate(&AuctionAction::Lock, &ctx)
            .expect("Locking carries no checks");
        assert_eq!(admission, Admission::Lock);
        assert!(admission.event().is_none());
    }

    #[concordium_test]
    fn test_bid_within_deadline_is_admitted() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let action = AuctionAction::Bid(bid_params(&terms.lot, bid));
        let ctx = bid_ctx(&terms.lot, &bid, 400);

        let admission = terms
            .validate(&action, &ctx)
            .expect("Bidding within the deadline should be admitted");
        match admission {
            Admission::Bid { next, lock } => {
                assert_eq!(lock, micro(100));
                assert_eq!(next.highest_bidder, Some(ALICE));
                assert_eq!(next.highest_bid, micro(100));
                assert_eq!(next.owner, OWNER);
            }
            other => panic!("Expected a bid admission, got {:?}", other),
        }
    }

    #[concordium_test]
    fn test_bid_past_deadline_is_rejected() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let action = AuctionAction::Bid(bid_params(&terms.lot, bid));

        // The amount is valid, only the window is late.
        let ctx = bid_ctx(&terms.lot, &bid, 600);
        expect_error(
            terms.validate(&action, &ctx),
            CustomContractError::PastDeadline,
            "Bidding past the deadline should fail",
        );
    }

    #[concordium_test]
    fn test_bid_at_deadline_is_admitted() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let action = AuctionAction::Bid(bid_params(&terms.lot, bid));

        let ctx = bid_ctx(&terms.lot, &bid, DEADLINE);
        let _ = terms
            .validate(&action, &ctx)
            .expect("A window ending exactly at the deadline is still admissible");
    }

    #[concordium_test]
    fn test_bid_not_raising_the_record_is_rejected() {
        let terms = dummy_terms();
        let first = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&first);

        // Equal bids lose, no tie wins.
        let equal = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        expect_error(
            terms.validate(
                &AuctionAction::Bid(bid_params(&lot, equal)),
                &bid_ctx(&lot, &equal, 400),
            ),
            CustomContractError::BidNotHigher,
            "An equal bid should fail",
        );

        let lower = Bid {
            bidder: BOB,
            amount: micro(99),
        };
        expect_error(
            terms.validate(
                &AuctionAction::Bid(bid_params(&lot, lower)),
                &bid_ctx(&lot, &lower, 400),
            ),
            CustomContractError::BidNotHigher,
            "A lower bid should fail",
        );
    }

    #[concordium_test]
    fn test_bid_without_matching_custody_payout_is_rejected() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let action = AuctionAction::Bid(bid_params(&terms.lot, bid));

        // No payouts at all.
        let mut ctx = bid_ctx(&terms.lot, &bid, 400);
        ctx.payouts.clear();
        expect_error(
            terms.validate(&action, &ctx),
            CustomContractError::AmountMismatch,
            "Bidding without locking funds forward should fail",
        );

        // Funds paid to the bidder instead of custody.
        let mut ctx = bid_ctx(&terms.lot, &bid, 400);
        ctx.payouts[0].target = PayoutTarget::Account(ALICE);
        expect_error(
            terms.validate(&action, &ctx),
            CustomContractError::AmountMismatch,
            "Paying the bidder instead of custody should fail",
        );

        // Custody payout short of the bid amount.
        let mut ctx = bid_ctx(&terms.lot, &bid, 400);
        ctx.payouts[0].amount = micro(99);
        expect_error(
            terms.validate(&action, &ctx),
            CustomContractError::AmountMismatch,
            "Locking less than the bid amount should fail",
        );

        // Custody payout carrying a stale lot state.
        let mut ctx = bid_ctx(&terms.lot, &bid, 400);
        ctx.payouts[0].state = Some(terms.lot.clone());
        expect_error(
            terms.validate(&action, &ctx),
            CustomContractError::AmountMismatch,
            "Carrying a state other than the updated lot should fail",
        );
    }

    #[concordium_test]
    fn test_bid_with_mismatched_deadline_is_rejected() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let mut params = bid_params(&terms.lot, bid);
        params.deadline = Timestamp::from_timestamp_millis(DEADLINE + 1);

        expect_error(
            terms.validate(&AuctionAction::Bid(params), &bid_ctx(&terms.lot, &bid, 400)),
            CustomContractError::MalformedAction,
            "A deadline disagreeing with the auction terms should fail",
        );
    }

    #[concordium_test]
    fn test_zero_bid_is_rejected() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: Amount::zero(),
        };

        expect_error(
            terms.validate(
                &AuctionAction::Bid(bid_params(&terms.lot, bid)),
                &bid_ctx(&terms.lot, &bid, 400),
            ),
            CustomContractError::MalformedAction,
            "Bidding zero should fail",
        );
    }

    #[concordium_test]
    fn test_incoherent_snapshot_is_rejected() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };

        // A recorded amount without a recorded bidder cannot be reached by
        // any valid transition.
        let mut lot = fresh_lot();
        lot.highest_bid = micro(50);
        expect_error(
            terms.validate(
                &AuctionAction::Bid(bid_params(&lot, bid)),
                &bid_ctx(&lot, &bid, 400),
            ),
            CustomContractError::MalformedAction,
            "A snapshot with an amount but no bidder should fail",
        );

        let mut lot = fresh_lot();
        lot.highest_bidder = Some(BOB);
        expect_error(
            terms.validate(
                &AuctionAction::Close(CloseParams {
                    lot,
                    bid: Bid {
                        bidder: BOB,
                        amount: micro(100),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::MalformedAction,
            "A snapshot with a bidder but no amount should fail",
        );
    }

    #[concordium_test]
    fn test_close_certifies_the_exact_winner() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        let admission = terms
            .validate(
                &AuctionAction::Close(CloseParams {
                    lot: lot.clone(),
                    bid: winning,
                }),
                &settle_ctx(OWNER),
            )
            .expect("Closing with the recorded winner should be admitted");
        assert_eq!(
            admission,
            Admission::Close {
                item: dummy_token(),
                winner: BOB,
                price: micro(100),
            }
        );
    }

    #[concordium_test]
    fn test_close_with_mismatched_amount_is_rejected() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        expect_error(
            terms.validate(
                &AuctionAction::Close(CloseParams {
                    lot,
                    bid: Bid {
                        bidder: BOB,
                        amount: micro(99),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::AmountMismatch,
            "Closing with a bid amount other than the record should fail",
        );
    }

    #[concordium_test]
    fn test_close_with_mismatched_bidder_is_rejected() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        expect_error(
            terms.validate(
                &AuctionAction::Close(CloseParams {
                    lot,
                    bid: Bid {
                        bidder: EVE,
                        amount: micro(100),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::WinnerMismatch,
            "Closing with a bidder other than the record should fail",
        );
    }

    #[concordium_test]
    fn test_close_requires_the_owner_signature() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);
        let action = AuctionAction::Close(CloseParams {
            lot,
            bid: winning,
        });

        expect_error(
            terms.validate(&action, &settle_ctx(BOB)),
            CustomContractError::UnauthorizedSigner,
            "Closing signed by the winner alone should fail",
        );

        let unsigned = TransactionContext {
            signers: Vec::new(),
            validity: window(DEADLINE + 100),
            payouts: Vec::new(),
        };
        expect_error(
            terms.validate(&action, &unsigned),
            CustomContractError::UnauthorizedSigner,
            "Closing without signatures should fail",
        );
    }

    #[concordium_test]
    fn test_close_without_any_recorded_bid_is_rejected() {
        let terms = dummy_terms();

        expect_error(
            terms.validate(
                &AuctionAction::Close(CloseParams {
                    lot: fresh_lot(),
                    bid: Bid {
                        bidder: BOB,
                        amount: micro(100),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::MissingBid,
            "An auction with no bids has no close path",
        );
    }

    #[concordium_test]
    fn test_collect_certifies_the_recorded_winner() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        let admission = terms
            .validate(
                &AuctionAction::Collect(CollectParams {
                    lot: lot.clone(),
                    bid: winning,
                }),
                &settle_ctx(OWNER),
            )
            .expect("Collecting with the recorded winner should be admitted");
        assert_eq!(
            admission,
            Admission::Collect {
                item: dummy_token(),
                winner: BOB,
                proceeds: micro(100),
            }
        );
    }

    #[concordium_test]
    fn test_collect_ignores_the_referenced_amount() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        // Amount disagrees with the record; only the bidder identity counts,
        // and the proceeds stay at the recorded amount.
        let admission = terms
            .validate(
                &AuctionAction::Collect(CollectParams {
                    lot,
                    bid: Bid {
                        bidder: BOB,
                        amount: micro(99),
                    },
                }),
                &settle_ctx(OWNER),
            )
            .expect("An amount mismatch alone should not block collection");
        assert_eq!(
            admission,
            Admission::Collect {
                item: dummy_token(),
                winner: BOB,
                proceeds: micro(100),
            }
        );
    }

    #[concordium_test]
    fn test_collect_rejections() {
        let terms = dummy_terms();
        let winning = Bid {
            bidder: BOB,
            amount: micro(100),
        };
        let lot = terms.lot.with_bid(&winning);

        expect_error(
            terms.validate(
                &AuctionAction::Collect(CollectParams {
                    lot: lot.clone(),
                    bid: Bid {
                        bidder: EVE,
                        amount: micro(100),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::WinnerMismatch,
            "Collecting against a bidder other than the record should fail",
        );

        expect_error(
            terms.validate(
                &AuctionAction::Collect(CollectParams {
                    lot,
                    bid: winning,
                }),
                &settle_ctx(EVE),
            ),
            CustomContractError::UnauthorizedSigner,
            "Collecting must be signed by the owner",
        );

        expect_error(
            terms.validate(
                &AuctionAction::Collect(CollectParams {
                    lot: fresh_lot(),
                    bid: winning,
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::MissingBid,
            "An auction with no bids has no collect path",
        );
    }

    #[concordium_test]
    fn test_revalidation_yields_the_same_decision() {
        let terms = dummy_terms();
        let bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let action = AuctionAction::Bid(bid_params(&terms.lot, bid));

        let ctx = bid_ctx(&terms.lot, &bid, 400);
        assert_eq!(terms.validate(&action, &ctx), terms.validate(&action, &ctx));

        let late = bid_ctx(&terms.lot, &bid, 600);
        assert_eq!(
            terms.validate(&action, &late),
            terms.validate(&action, &late)
        );
    }

    /// A whole auction run:
    /// 1. Alice opens the bidding with 100.
    /// 2. Bob outbids her with 300.
    /// 3. Alice fails to close in her own favour.
    /// 4. The owner closes in favour of Bob and collects the proceeds.
    #[concordium_test]
    fn test_bid_close_collect_sequence() {
        let terms = dummy_terms();
        let alice_bid = Bid {
            bidder: ALICE,
            amount: micro(100),
        };
        let bob_bid = Bid {
            bidder: BOB,
            amount: micro(300),
        };

        let action = AuctionAction::Bid(bid_params(&terms.lot, alice_bid));
        let after_alice = match terms.validate(&action, &bid_ctx(&terms.lot, &alice_bid, 100)) {
            Ok(Admission::Bid { next, .. }) => next,
            other => panic!("Alice's bid should be admitted, got {:?}", other),
        };

        let action = AuctionAction::Bid(bid_params(&after_alice, bob_bid));
        let after_bob = match terms.validate(&action, &bid_ctx(&after_alice, &bob_bid, 200)) {
            Ok(Admission::Bid { next, .. }) => next,
            other => panic!("Bob's bid should be admitted, got {:?}", other),
        };
        assert_eq!(after_bob.highest_bidder, Some(BOB));
        assert_eq!(after_bob.highest_bid, micro(300));

        // Alice cannot certify herself as the winner.
        expect_error(
            terms.validate(
                &AuctionAction::Close(CloseParams {
                    lot: after_bob.clone(),
                    bid: Bid {
                        bidder: ALICE,
                        amount: micro(300),
                    },
                }),
                &settle_ctx(OWNER),
            ),
            CustomContractError::WinnerMismatch,
            "Closing in favour of an outbid account should fail",
        );

        let close = terms
            .validate(
                &AuctionAction::Close(CloseParams {
                    lot: after_bob.clone(),
                    bid: bob_bid,
                }),
                &settle_ctx(OWNER),
            )
            .expect("The owner should close in favour of Bob");
        assert_eq!(
            close,
            Admission::Close {
                item: dummy_token(),
                winner: BOB,
                price: micro(300),
            }
        );

        let collect = terms
            .validate(
                &AuctionAction::Collect(CollectParams {
                    lot: after_bob,
                    bid: bob_bid,
                }),
                &settle_ctx(OWNER),
            )
            .expect("The owner should collect the proceeds");
        assert_eq!(
            collect,
            Admission::Collect {
                item: dummy_token(),
                winner: BOB,
                proceeds: micro(300),
            }
        );
    }
}
