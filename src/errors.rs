use concordium_std::*;

/// The custom errors the validator can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Referenced bid does not raise the recorded highest bid (Error code: -2).
    BidNotHigher,
    /// Transaction validity window ends after the bidding deadline
    /// (Error code: -3).
    PastDeadline,
    /// Transaction is not signed by the lot owner (Error code: -4).
    UnauthorizedSigner,
    /// Referenced bidder is not the recorded winner (Error code: -5).
    WinnerMismatch,
    /// Referenced amount differs from the recorded or required amount
    /// (Error code: -6).
    AmountMismatch,
    /// Settlement references a winner but no bid was ever recorded
    /// (Error code: -7).
    MissingBid,
    /// Action parameters are inconsistent with the requested action or the
    /// auction terms (Error code: -8).
    MalformedAction,
}
