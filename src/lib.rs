//! # Sealed single-item NFT auction settlement
//!
//! A deterministic validator deciding whether a proposed transaction may
//! settle against a single-item NFT auction.
//!
//! To participate, accounts place bids against the current lot state.
//! Only bids that strictly raise the recorded highest bid are admissible,
//! and only while the proposed transaction commits within the bidding
//! deadline. An admitted bid obliges the transaction to lock the offered
//! amount in the auction's custody together with the updated lot state.
//!
//! After bidding ends, the lot owner closes the auction in favour of the
//! recorded winner and collects the proceeds. Closing and collecting move
//! no funds here: the validator certifies the winner, and the committing
//! transaction settles the transfers it is obliged to make.
//!
//! The validator is pure. It consults the facts the hosting ledger layer
//! supplies about the proposed transaction (signers, validity window,
//! declared payouts) and decides admissibility. Identical inputs always
//! yield identical decisions, so any decision can be replayed and
//! re-verified independently. The ledger layer serializes competing
//! transitions; every admitted one consumes its lot snapshot and records a
//! fresh value.
#![cfg_attr(not(feature = "std"), no_std)]

mod errors;
mod events;
mod external;
mod state;
mod validator;

pub use crate::{errors::*, events::*, external::*, state::*, validator::*};
