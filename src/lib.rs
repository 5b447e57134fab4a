#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use monero_kit_io as io;
pub use monero_kit_primitives as primitives;
pub use monero_kit_ed25519 as ed25519;

/// RingCT structures and functionality.
pub mod ringct;

/// Transaction structures and functionality.
pub mod transaction;

#[cfg(test)]
mod tests;

/// The default amount of blocks an output is locked for after its creation.
///
/// Spending an output requires referencing it by its position on the blockchain, so outputs
/// too close to the tip would be unspendable under a reorganization.
pub const DEFAULT_LOCK_WINDOW: usize = 10;

/// The amount of blocks a coinbase output is locked for after its creation.
pub const COINBASE_LOCK_WINDOW: usize = 60;

/// The targeted amount of seconds between blocks.
pub const BLOCK_TIME: usize = 120;
