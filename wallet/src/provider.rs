//! The daemon interfaces the wallet consumes.
//!
//! The wallet core is synchronous and pure. These traits are its only suspension points: the
//! network collaborator implements them, handles retries/backoff, and drives the sync loop.
//! Implementations are expected to be cancellation-safe between calls.

use std_shims::{vec::Vec, string::String};

use monero_kit::{ed25519::Point, transaction::PrunedTransaction};

/// An error from a daemon provider.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ProviderError {
  /// The daemon could not be reached.
  #[error("daemon unavailable")]
  DaemonUnavailable,
  /// The daemon did not respond in time.
  #[error("daemon timeout")]
  DaemonTimeout,
  /// The daemon returned an RPC-level error.
  #[error("daemon RPC error {code} ({message})")]
  DaemonRpcError {
    /// The error code returned.
    code: i32,
    /// The error message returned.
    message: String,
  },
  /// The daemon returned a response inconsistent with the blockchain it claims to present.
  #[error("invalid daemon response ({0})")]
  InvalidNode(String),
  /// An internal error within the caller's usage of the provider.
  #[error("internal error ({0})")]
  InternalError(String),
}

/// A block, as the wallet scans it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Block {
  /// The block's height (its zero-indexed position on the blockchain).
  pub height: u64,
  /// The block's hash.
  pub hash: [u8; 32],
  /// The hash of the block this block builds upon.
  pub prev_hash: [u8; 32],
  /// The timestamp the block was mined with.
  pub timestamp: u64,
  /// The transactions within this block, with their hashes, pruned to the scannable parts.
  pub transactions: Vec<([u8; 32], PrunedTransaction)>,
  /// The on-chain index of the first RingCT output created within this block.
  ///
  /// This is `None` if the block creates no RingCT outputs.
  pub output_index_for_first_ringct_output: Option<u64>,
}

/// The fee estimate returned by the daemon.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FeeEstimate {
  /// The fee per byte of transaction weight, in atomic units.
  pub fee_per_byte: u64,
  /// The mask fees are quantized by.
  pub quantization_mask: u64,
}

/// The provider of blocks and chain state, as implemented by the network collaborator.
#[allow(async_fn_in_trait)]
pub trait BlockProvider: Sync {
  /// The current height of the blockchain (the amount of blocks within it).
  async fn get_height(&self) -> Result<u64, ProviderError>;
  /// The block at the specified height.
  async fn get_block(&self, height: u64) -> Result<Block, ProviderError>;
  /// The daemon's current fee estimate.
  async fn get_fee_estimate(&self) -> Result<FeeEstimate, ProviderError>;
  /// Publish a serialized transaction.
  async fn submit_tx(&self, tx_blob: &[u8]) -> Result<(), ProviderError>;
}

/// The provider of the global RingCT output set, as needed to select decoys.
#[allow(async_fn_in_trait)]
pub trait OutputProvider: Sync {
  /// The height the output distribution is available up to.
  async fn get_output_distribution_end_height(&self) -> Result<u64, ProviderError>;

  /// The cumulative amount of RingCT outputs created per block, for blocks `[0, to_height)`.
  async fn get_output_distribution(&self, to_height: u64) -> Result<Vec<u64>, ProviderError>;

  /// The (key, commitment) pairs for the outputs at the specified on-chain indexes.
  ///
  /// `height` is the chain height the unlock check is evaluated at. `None` is yielded for any
  /// output which isn't yet unlocked (and accordingly isn't usable as a ring member).
  async fn get_unlocked_outputs(
    &self,
    indexes: &[u64],
    height: u64,
  ) -> Result<Vec<Option<[Point; 2]>>, ProviderError>;
}
