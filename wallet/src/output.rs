use std_shims::{
  vec::Vec,
  io::{self, Read, Write},
};

use zeroize::{Zeroize, ZeroizeOnDrop};
use subtle::ConstantTimeEq;

use crate::{
  io::*,
  ed25519::{Scalar, CompressedPoint, Point, Commitment},
  transaction::Timelock,
  address::SubaddressIndex,
  extra::{MAX_EXTRA_SIZE_BY_RELAY_RULE, PaymentId},
};

/// An output scanned as this wallet's, with everything needed to later spend it.
///
/// The on-chain index is only meaningful relative to a specific blockchain. Under a
/// reorganization, saved outputs past the fork point must be discarded and re-scanned.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletOutput {
  // The transaction which created this output, and the output's index within it.
  // Not the output key, as distinct outputs may share an output key.
  pub(crate) transaction: [u8; 32],
  pub(crate) index_in_transaction: u64,
  // The output's position within the global RingCT output set, as rings reference outputs
  pub(crate) index_on_blockchain: u64,
  // The one-time output key
  pub(crate) key: Point,
  // The scalar which, added to the wallet's spend key, is the output key's discrete logarithm
  pub(crate) key_offset: Scalar,
  // The opening of the output's amount commitment
  pub(crate) commitment: Commitment,
  pub(crate) additional_timelock: Timelock,
  pub(crate) subaddress: Option<SubaddressIndex>,
  pub(crate) payment_id: Option<PaymentId>,
  pub(crate) arbitrary_data: Vec<Vec<u8>>,
}

impl core::fmt::Debug for WalletOutput {
  /// This reveals the output's identifiers and amount, yet not its key material.
  fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
    fmt
      .debug_struct("WalletOutput")
      .field("transaction", &hex::encode(self.transaction))
      .field("index_in_transaction", &self.index_in_transaction)
      .field("index_on_blockchain", &self.index_on_blockchain)
      .field("commitment", &self.commitment)
      .field("subaddress", &self.subaddress)
      .finish_non_exhaustive()
  }
}

impl PartialEq for WalletOutput {
  /// The key-material fields are compared in constant time.
  fn eq(&self, other: &Self) -> bool {
    let ct = self.key.ct_eq(&other.key) &
      self.key_offset.ct_eq(&other.key_offset) &
      self.commitment.ct_eq(&other.commitment);
    let public = (self.transaction == other.transaction) &
      (self.index_in_transaction == other.index_in_transaction) &
      (self.index_on_blockchain == other.index_on_blockchain) &
      (self.additional_timelock == other.additional_timelock) &
      (self.subaddress == other.subaddress) &
      (self.payment_id == other.payment_id) &
      (self.arbitrary_data == other.arbitrary_data);
    bool::from(ct) & public
  }
}
impl Eq for WalletOutput {}

impl WalletOutput {
  /// The hash of the transaction which created this output.
  pub fn transaction(&self) -> [u8; 32] {
    self.transaction
  }

  /// The index of this output within its transaction.
  pub fn index_in_transaction(&self) -> u64 {
    self.index_in_transaction
  }

  /// The index of this output on the blockchain.
  pub fn index_on_blockchain(&self) -> u64 {
    self.index_on_blockchain
  }

  /// The one-time key which may spend this output.
  pub fn key(&self) -> Point {
    self.key
  }

  /// The scalar to add to the wallet's private spend key for it to be the discrete logarithm
  /// of this output's key.
  pub fn key_offset(&self) -> Scalar {
    self.key_offset
  }

  /// The opening of this output's amount commitment.
  pub fn commitment(&self) -> &Commitment {
    &self.commitment
  }

  /// The additional timelock this output is subject to, past the default 10-block lock.
  pub fn additional_timelock(&self) -> Timelock {
    self.additional_timelock
  }

  /// The subaddress which received this output, `None` for the primary address.
  pub fn subaddress(&self) -> Option<SubaddressIndex> {
    self.subaddress
  }

  /// The payment ID accompanying this output, decrypted if it was encrypted.
  pub fn payment_id(&self) -> Option<PaymentId> {
    self.payment_id
  }

  /// The arbitrary data within the transaction which created this output.
  pub fn arbitrary_data(&self) -> &[Vec<u8>] {
    &self.arbitrary_data
  }

  /// Write the `WalletOutput`.
  ///
  /// This layout is solely this library's, not a Monero protocol serialization, and may run in
  /// time variable to its value.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.transaction)?;
    write_varint(self.index_in_transaction, w)?;
    write_varint(self.index_on_blockchain, w)?;
    w.write_all(&self.key.compress().to_bytes())?;
    self.key_offset.write(w)?;
    self.commitment.write(w)?;
    self.additional_timelock.write(w)?;

    match self.subaddress {
      None => write_byte(&0, w)?,
      Some(subaddress) => {
        write_byte(&1, w)?;
        w.write_all(&subaddress.account().to_le_bytes())?;
        w.write_all(&subaddress.address().to_le_bytes())?;
      }
    }

    match self.payment_id {
      None => write_byte(&0, w)?,
      Some(id) => {
        write_byte(&1, w)?;
        id.write(w)?;
      }
    }

    write_list(|data, w| write_list(write_byte, data, w), &self.arbitrary_data, w)
  }

  /// Serialize the `WalletOutput` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(192);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `WalletOutput`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<WalletOutput> {
    Ok(WalletOutput {
      transaction: read_bytes(r)?,
      index_in_transaction: read_varint(r)?,
      index_on_blockchain: read_varint(r)?,
      key: CompressedPoint::read(r)?
        .decompress()
        .ok_or_else(|| io::Error::other("saved output had an invalid key"))?,
      key_offset: Scalar::read(r)?,
      commitment: Commitment::read(r)?,
      additional_timelock: Timelock::read(r)?,
      subaddress: match read_byte(r)? {
        0 => None,
        1 => Some(
          SubaddressIndex::new(read_u32(r)?, read_u32(r)?)
            .ok_or_else(|| io::Error::other("saved output claimed the (0, 0) subaddress"))?,
        ),
        _ => Err(io::Error::other("invalid subaddress flag"))?,
      },
      payment_id: match read_byte(r)? {
        0 => None,
        1 => Some(match read_byte(r)? {
          0 => PaymentId::Unencrypted(read_bytes(r)?),
          1 => PaymentId::Encrypted(read_bytes(r)?),
          _ => Err(io::Error::other("invalid payment ID kind"))?,
        }),
        _ => Err(io::Error::other("invalid payment ID flag"))?,
      },
      arbitrary_data: {
        let data: Vec<Vec<u8>> = read_list(
          |r| read_list(read_byte, MAX_EXTRA_SIZE_BY_RELAY_RULE, r),
          MAX_EXTRA_SIZE_BY_RELAY_RULE,
          r,
        )?;
        if data.iter().map(Vec::len).sum::<usize>() > MAX_EXTRA_SIZE_BY_RELAY_RULE {
          Err(io::Error::other("saved output's arbitrary data exceeded the extra bound"))?;
        }
        data
      },
    })
  }
}
