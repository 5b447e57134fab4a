//! The persistence contract between the wallet core and its storage backend.
//!
//! The core only requires these operations; the actual backend (a database, the encrypted
//! wallet file, ...) is external. [`MemoryStorage`] is the in-memory reference implementation,
//! sufficient for tests and for assembling wallet files.

use core::ops::Deref;
use std_shims::{
  string::String,
  vec::Vec,
  collections::HashMap,
  io::{self, Read, Write},
};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;

use monero_kit::{
  io::*,
  ed25519::{CompressedPoint, Point},
  transaction::Timelock,
};

use crate::{address::SubaddressIndex, WalletOutput, KeyPair};

/// An error when working with storage.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum StorageError {
  /// The output, transaction, or key image wasn't present.
  #[error("not found")]
  NotFound,
  /// The value being saved was inconsistent with the wallet's keys.
  #[error("inconsistent value ({0})")]
  Inconsistent(&'static str),
  /// The backend failed.
  #[error("storage backend error ({0})")]
  Backend(String),
}

/// An owned output, as persisted: a scanned output annotated with its spend authority artifacts
/// and its lifecycle flags.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct OwnedOutput {
  output: WalletOutput,
  key_image: CompressedPoint,
  block_height: u64,
  spent: Option<[u8; 32]>,
  frozen: bool,
}

impl OwnedOutput {
  /// Annotate a scanned output with its key image, as derived with the wallet's spend key.
  ///
  /// The key image is a pure function of the output and the one-time key. Deriving it at save
  /// time lets the wallet detect its own spends while scanning.
  pub fn new(
    keys: &KeyPair,
    output: WalletOutput,
    block_height: u64,
  ) -> Result<OwnedOutput, StorageError> {
    let one_time_key = keys.one_time_key(output.key_offset());
    let dalek_key: Zeroizing<curve25519_dalek::Scalar> =
      Zeroizing::new((*one_time_key).into());
    if (dalek_key.deref() * ED25519_BASEPOINT_POINT) != output.key().into() {
      Err(StorageError::Inconsistent("output key offset doesn't match the wallet's spend key"))?;
    }

    let key_image = Point::from(
      dalek_key.deref() * Point::hash_to_point(output.key().compress().to_bytes()).into(),
    )
    .compress();

    Ok(OwnedOutput { output, key_image, block_height, spent: None, frozen: false })
  }

  /// The scanned output itself.
  pub fn output(&self) -> &WalletOutput {
    &self.output
  }

  /// The key image for this output, as published when it's spent.
  pub fn key_image(&self) -> CompressedPoint {
    self.key_image
  }

  /// The height of the block containing this output.
  pub fn block_height(&self) -> u64 {
    self.block_height
  }

  /// The amount of this output, in atomic units.
  pub fn amount(&self) -> u64 {
    self.output.commitment().amount
  }

  /// The hash of the transaction which spent this output, if it's spent.
  pub fn spent(&self) -> Option<[u8; 32]> {
    self.spent
  }

  /// Whether this output is frozen (excluded from spending by the user).
  pub fn frozen(&self) -> bool {
    self.frozen
  }

  /// Freeze or thaw this output.
  pub fn set_frozen(&mut self, frozen: bool) {
    self.frozen = frozen;
  }

  /// Whether this output is spendable at the specified chain height and time.
  ///
  /// An output is spendable once it has the required amount of confirmations, its additional
  /// timelock (if any) is satisfied, and it's neither spent nor frozen.
  pub fn unlocked(&self, height: u64, time: u64, confirmations: u64) -> bool {
    if self.spent.is_some() || self.frozen {
      return false;
    }
    if (self.block_height + confirmations) > height {
      return false;
    }
    match self.output.additional_timelock() {
      Timelock::None => true,
      Timelock::Block(block) => block <= height,
      Timelock::Time(lock_time) => lock_time <= time,
    }
  }

  /// Write the `OwnedOutput`.
  ///
  /// This is not a Monero protocol defined struct, and this is accordingly not a Monero protocol
  /// defined serialization. This may run in time variable to its value.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    self.output.write(w)?;
    self.key_image.write(w)?;
    write_varint(self.block_height, w)?;
    if let Some(spent) = self.spent {
      w.write_all(&[1])?;
      w.write_all(&spent)?;
    } else {
      w.write_all(&[0])?;
    }
    write_byte(&u8::from(self.frozen), w)
  }

  /// Read an `OwnedOutput`.
  ///
  /// This is not a Monero protocol defined struct, and this is accordingly not a Monero protocol
  /// defined serialization. This may run in time variable to its value.
  pub fn read<R: Read>(r: &mut R) -> io::Result<OwnedOutput> {
    Ok(OwnedOutput {
      output: WalletOutput::read(r)?,
      key_image: CompressedPoint::read(r)?,
      block_height: read_varint(r)?,
      spent: match read_byte(r)? {
        0 => None,
        1 => Some(read_bytes(r)?),
        _ => Err(io::Error::other("invalid spent boolean"))?,
      },
      frozen: match read_byte(r)? {
        0 => false,
        1 => true,
        _ => Err(io::Error::other("invalid frozen boolean"))?,
      },
    })
  }
}

/// The direction of a recorded transaction, from the wallet's perspective.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub enum TransferDirection {
  /// Funds received by this wallet.
  Incoming,
  /// Funds sent by this wallet.
  Outgoing,
}

/// A record of a transaction involving this wallet.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub struct TransactionRecord {
  /// The transaction's hash.
  pub hash: [u8; 32],
  /// The direction of the transfer.
  pub direction: TransferDirection,
  /// The net amount transferred, in atomic units.
  pub amount: u64,
  /// The fee the transaction paid.
  pub fee: u64,
  /// The height of the block containing the transaction, or `None` while unconfirmed.
  pub block_height: Option<u64>,
}

impl TransactionRecord {
  /// Write the `TransactionRecord`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.hash)?;
    write_byte(&u8::from(matches!(self.direction, TransferDirection::Outgoing)), w)?;
    w.write_all(&self.amount.to_le_bytes())?;
    w.write_all(&self.fee.to_le_bytes())?;
    match self.block_height {
      None => write_byte(&0, w),
      Some(height) => {
        write_byte(&1, w)?;
        write_varint(height, w)
      }
    }
  }

  /// Read a `TransactionRecord`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<TransactionRecord> {
    Ok(TransactionRecord {
      hash: read_bytes(r)?,
      direction: if read_byte(r)? == 1 {
        TransferDirection::Outgoing
      } else {
        TransferDirection::Incoming
      },
      amount: read_u64(r)?,
      fee: read_u64(r)?,
      block_height: match read_byte(r)? {
        0 => None,
        1 => Some(read_varint(r)?),
        _ => Err(io::Error::other("invalid block height boolean"))?,
      },
    })
  }
}

/// A filter over the outputs returned by [`WalletStorage::get_outputs`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct OutputFilter {
  /// Solely return outputs received by this account (the major subaddress index).
  pub account: Option<u32>,
  /// Include outputs which have already been spent.
  pub include_spent: bool,
  /// Include outputs frozen by the user.
  pub include_frozen: bool,
}

impl OutputFilter {
  fn matches(&self, output: &OwnedOutput) -> bool {
    if let Some(account) = self.account {
      let output_account =
        output.output().subaddress().as_ref().map_or(0, SubaddressIndex::account);
      if output_account != account {
        return false;
      }
    }
    if (!self.include_spent) && output.spent().is_some() {
      return false;
    }
    if (!self.include_frozen) && output.frozen() {
      return false;
    }
    true
  }
}

/// The operations the wallet core requires of its storage backend.
///
/// Writes for a single wallet are serialized by the caller: output observations are applied in
/// increasing block-height order, and key-image checks happen after block commit.
pub trait WalletStorage {
  /// Save an output, overwriting any prior save of the same output.
  fn save_output(&mut self, output: OwnedOutput) -> Result<(), StorageError>;
  /// Fetch the outputs matching the filter.
  fn get_outputs(&self, filter: &OutputFilter) -> Result<Vec<OwnedOutput>, StorageError>;
  /// Mark the output with the specified key image as spent by the specified transaction.
  fn mark_spent(
    &mut self,
    key_image: CompressedPoint,
    spending_tx_hash: [u8; 32],
  ) -> Result<(), StorageError>;
  /// Save a record of a transaction involving this wallet.
  fn save_transaction(&mut self, record: TransactionRecord) -> Result<(), StorageError>;
  /// The height the wallet has been synchronized through.
  fn get_sync_height(&self) -> Result<u64, StorageError>;
  /// Update the height the wallet has been synchronized through.
  fn set_sync_height(&mut self, height: u64) -> Result<(), StorageError>;
  /// The hash of the block at the specified height, if known.
  fn get_block_hash(&self, height: u64) -> Result<Option<[u8; 32]>, StorageError>;
  /// Record the hash of the block at the specified height.
  fn set_block_hash(&mut self, height: u64, hash: [u8; 32]) -> Result<(), StorageError>;
  /// Discard all state above the specified height, as under a reorganization.
  ///
  /// Outputs created past the fork are dropped, spends recorded past the fork are reverted,
  /// and the sync height is rewound.
  fn rollback_to_height(&mut self, height: u64) -> Result<(), StorageError>;
}

/// The in-memory reference implementation of [`WalletStorage`].
#[derive(Default)]
pub struct MemoryStorage {
  outputs: Vec<OwnedOutput>,
  // Key image -> (position in outputs, spending (tx hash, height))
  key_images: HashMap<[u8; 32], usize>,
  transactions: Vec<TransactionRecord>,
  block_hashes: HashMap<u64, [u8; 32]>,
  sync_height: u64,
}

impl MemoryStorage {
  /// Create a new, empty, `MemoryStorage`.
  pub fn new() -> MemoryStorage {
    MemoryStorage::default()
  }

  /// The recorded transactions.
  pub fn transactions(&self) -> &[TransactionRecord] {
    &self.transactions
  }
}

impl WalletStorage for MemoryStorage {
  fn save_output(&mut self, output: OwnedOutput) -> Result<(), StorageError> {
    let key_image = output.key_image().to_bytes();
    if let Some(existing) = self.key_images.get(&key_image) {
      self.outputs[*existing] = output;
    } else {
      self.key_images.insert(key_image, self.outputs.len());
      self.outputs.push(output);
    }
    Ok(())
  }

  fn get_outputs(&self, filter: &OutputFilter) -> Result<Vec<OwnedOutput>, StorageError> {
    Ok(self.outputs.iter().filter(|output| filter.matches(output)).cloned().collect())
  }

  fn mark_spent(
    &mut self,
    key_image: CompressedPoint,
    spending_tx_hash: [u8; 32],
  ) -> Result<(), StorageError> {
    let position =
      *self.key_images.get(&key_image.to_bytes()).ok_or(StorageError::NotFound)?;
    self.outputs[position].spent = Some(spending_tx_hash);
    Ok(())
  }

  fn save_transaction(&mut self, record: TransactionRecord) -> Result<(), StorageError> {
    if let Some(existing) =
      self.transactions.iter_mut().find(|existing| existing.hash == record.hash)
    {
      *existing = record;
    } else {
      self.transactions.push(record);
    }
    Ok(())
  }

  fn get_sync_height(&self) -> Result<u64, StorageError> {
    Ok(self.sync_height)
  }

  fn set_sync_height(&mut self, height: u64) -> Result<(), StorageError> {
    self.sync_height = height;
    Ok(())
  }

  fn get_block_hash(&self, height: u64) -> Result<Option<[u8; 32]>, StorageError> {
    Ok(self.block_hashes.get(&height).copied())
  }

  fn set_block_hash(&mut self, height: u64, hash: [u8; 32]) -> Result<(), StorageError> {
    self.block_hashes.insert(height, hash);
    Ok(())
  }

  fn rollback_to_height(&mut self, height: u64) -> Result<(), StorageError> {
    // Drop outputs created past the fork
    self.outputs.retain(|output| output.block_height() <= height);
    // Rebuild the key image index
    self.key_images = self
      .outputs
      .iter()
      .enumerate()
      .map(|(i, output)| (output.key_image().to_bytes(), i))
      .collect();

    // Transactions confirmed past the fork are no longer confirmed, and any spends they made
    // are reverted
    let mut dropped = Vec::new();
    self.transactions.retain(|record| {
      let keep = record.block_height.map_or(true, |h| h <= height);
      if !keep {
        dropped.push(record.hash);
      }
      keep
    });
    for output in &mut self.outputs {
      if let Some(spent) = output.spent {
        if dropped.contains(&spent) {
          output.spent = None;
        }
      }
    }

    // Forget the stale block hashes
    self.block_hashes.retain(|h, _| *h <= height);
    self.sync_height = self.sync_height.min(height);
    Ok(())
  }
}
