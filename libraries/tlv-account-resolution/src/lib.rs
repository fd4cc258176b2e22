//! Crate defining the published "extra account meta" lists used by gating
//! programs. A gating program writes one TLV entry per gated instruction into
//! a PDA it owns, and any offchain client can decode that entry and resolve
//! the additional accounts the instruction requires.

#![allow(clippy::arithmetic_side_effects)]
#![deny(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod error;
pub mod pubkey_data;
pub mod seeds;
pub mod state;

// Export current sdk types for downstream users building with a different sdk
// version
pub use {solana_program, spl_pod};
