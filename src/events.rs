use crate::state::{Admission, ContractTokenId};
use concordium_std::*;

/// Tag for the settlement Bid event.
pub const BID_TAG: u8 = u8::MAX;

/// Tag for the settlement Close event.
pub const CLOSE_TAG: u8 = u8::MAX - 1;

/// Tag for the settlement Collect event.
pub const COLLECT_TAG: u8 = u8::MAX - 2;

/// Admitted bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    /// NFT contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// Auction close event data.
#[derive(Debug, Serial)]
pub struct CloseEvent<'a> {
    /// NFT contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Address of the auction winner.
    pub winner: &'a AccountAddress,
    /// Winning auction bid.
    pub price: Amount,
}

/// Proceeds collection event data.
#[derive(Debug, Serial)]
pub struct CollectEvent<'a> {
    /// NFT contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Address of the auction winner.
    pub winner: &'a AccountAddress,
    /// Released proceeds.
    pub proceeds: Amount,
}

/// Tagged settlement event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent<'a> {
    Bid(BidEvent<'a>),
    Close(CloseEvent<'a>),
    Collect(CollectEvent<'a>),
}

impl<'a> AuctionEvent<'a> {
    pub fn bid(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        bidder: &'a AccountAddress,
        amount: Amount,
    ) -> Self {
        Self::Bid(BidEvent {
            contract,
            id,
            bidder,
            amount,
        })
    }

    pub fn close(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        winner: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::Close(CloseEvent {
            contract,
            id,
            winner,
            price,
        })
    }

    pub fn collect(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        winner: &'a AccountAddress,
        proceeds: Amount,
    ) -> Self {
        Self::Collect(CollectEvent {
            contract,
            id,
            winner,
            proceeds,
        })
    }
}

impl<'a> Serial for AuctionEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Close(event) => {
                out.write_u8(CLOSE_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Collect(event) => {
                out.write_u8(COLLECT_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Admission {
    /// Settlement event the host layer logs for this admission. Locking the
    /// item produces none.
    pub fn event(&self) -> Option<AuctionEvent<'_>> {
        match self {
            Admission::Lock => None,
            Admission::Bid { next, .. } => Some(AuctionEvent::bid(
                &next.item.contract,
                &next.item.id,
                next.highest_bidder.as_ref()?,
                next.highest_bid,
            )),
            Admission::Close {
                item,
                winner,
                price,
            } => Some(AuctionEvent::close(&item.contract, &item.id, winner, *price)),
            Admission::Collect {
                item,
                winner,
                proceeds,
            } => Some(AuctionEvent::collect(
                &item.contract,
                &item.id,
                winner,
                *proceeds,
            )),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::state::{Bid, LotState, Token};
    use concordium_cis1::TokenIdVec;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);

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
    fn test_admission_events_carry_their_tags() {
        let lot = LotState::fresh(OWNER, dummy_token());
        let bid = Bid {
            bidder: ALICE,
            amount: Amount::from_micro_ccd(100),
        };
        let next = lot.with_bid(&bid);

        let admission = Admission::Bid {
            next: next.clone(),
            lock: bid.amount,
        };
        let event = admission.event().expect("Bid admissions produce an event");
        assert_eq!(to_bytes(&event)[0], BID_TAG);

        let admission = Admission::Close {
            item: dummy_token(),
            winner: ALICE,
            price: bid.amount,
        };
        let event = admission.event().expect("Close admissions produce an event");
        assert_eq!(to_bytes(&event)[0], CLOSE_TAG);

        let admission = Admission::Collect {
            item: dummy_token(),
            winner: ALICE,
            proceeds: bid.amount,
        };
        let event = admission
            .event()
            .expect("Collect admissions produce an event");
        assert_eq!(to_bytes(&event)[0], COLLECT_TAG);

        assert!(Admission::Lock.event().is_none());
    }
}
