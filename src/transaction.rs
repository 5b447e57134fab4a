use core::cmp::Ordering;
#[allow(unused_imports)]
use std_shims::prelude::*;
use std_shims::io::{self, Read, Write};

use zeroize::Zeroize;

use monero_kit_io::*;
use monero_kit_ed25519::CompressedPoint;
use monero_kit_primitives::{UpperBound, keccak256};

use crate::ringct::{RctType, RctBase, RctProofs, PrunedRctProofs, bulletproofs::Bulletproof};

/// The version of the transactions this library works with: version 2, the RingCT era.
pub const VERSION: u64 = 2;

/// An input in the Monero protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Input {
  /// An input for a miner transaction, which is generating new coins.
  ///
  /// The contained value is the height of the block this transaction is for.
  Gen(u64),
  /// An input spending an output on-chain.
  ToKey {
    /// The pool this input spends an output of.
    ///
    /// `None` for RingCT inputs, which spend from the amount-hidden pool.
    amount: Option<u64>,
    /// The positions of the ring members, offset-encoded (each the distance from the prior).
    key_offsets: Vec<u64>,
    /// The key image (linking tag) for the spent output.
    key_image: CompressedPoint,
  },
}

impl Input {
  /// Write the `Input`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      Input::Gen(height) => {
        write_byte(&255, w)?;
        write_varint(*height, w)
      }

      Input::ToKey { amount, key_offsets, key_image } => {
        write_byte(&2, w)?;
        write_varint(amount.unwrap_or(0), w)?;
        write_list(|offset, w| write_varint(*offset, w), key_offsets, w)?;
        key_image.write(w)
      }
    }
  }

  /// Serialize the `Input` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read an `Input`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Input> {
    match read_byte(r)? {
      255 => Ok(Input::Gen(read_varint(r)?)),
      2 => {
        let amount = read_varint(r)?;
        // Only RingCT transactions may declare a zero amount, so zero collapses to the
        // amount-hidden pool without knowing whether this transaction is RingCT
        let amount = (amount != 0).then_some(amount);
        Ok(Input::ToKey {
          amount,
          key_offsets: read_list(read_varint, Transaction::SIZE_UPPER_BOUND.0, r)?,
          key_image: CompressedPoint::read(r)?,
        })
      }
      _ => Err(io::Error::other("unknown input type")),
    }
  }
}

/// An output in the Monero protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Output {
  /// The pool this output is created into.
  ///
  /// `None` for RingCT outputs, whose amounts are hidden.
  pub amount: Option<u64>,
  /// The one-time key which may spend this output.
  pub key: CompressedPoint,
  /// The view tag, a one-byte scan prefilter.
  ///
  /// Outputs predating view tags lack one; everything this library builds carries one.
  pub view_tag: Option<u8>,
}

impl Output {
  /// Write the `Output`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_varint(self.amount.unwrap_or(0), w)?;
    // 2 is `txout_to_key`, 3 its view-tagged successor
    write_byte(&(2 + u8::from(self.view_tag.is_some())), w)?;
    w.write_all(&self.key.to_bytes())?;
    match self.view_tag {
      Some(view_tag) => write_byte(&view_tag, w),
      None => Ok(()),
    }
  }

  /// Serialize the `Output` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 1 + 32 + 1);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read an `Output`.
  ///
  /// Both the plain (`txout_to_key`) and the view-tagged (`txout_to_tagged_key`) variants are
  /// accepted.
  pub fn read<R: Read>(rct: bool, r: &mut R) -> io::Result<Output> {
    let amount = read_varint(r)?;
    let amount = if rct {
      if amount != 0 {
        Err(io::Error::other("RingCT output declared an amount"))?;
      }
      None
    } else {
      Some(amount)
    };

    let tagged = match read_byte(r)? {
      2 => false,
      3 => true,
      _ => Err(io::Error::other("unknown output type"))?,
    };

    Ok(Output {
      amount,
      key: CompressedPoint::read(r)?,
      view_tag: if tagged { Some(read_byte(r)?) } else { None },
    })
  }
}

/// An additional timelock on a transaction's outputs.
///
/// Every output is subject to the default 10-block lock; an explicit timelock extends it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub enum Timelock {
  /// No additional timelock.
  None,
  /// Locked until the specified block.
  Block(u64),
  /// Locked until the specified time, in seconds since the epoch per the on-chain clock.
  Time(u64),
}

// Raw timelock values below this are block numbers, those at or above it timestamps
const TIMELOCK_BLOCK_THRESHOLD: u64 = 500_000_000;

impl Timelock {
  /// Write the `Timelock`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_varint(
      match self {
        Timelock::None => 0,
        Timelock::Block(block) => *block,
        Timelock::Time(time) => *time,
      },
      w,
    )
  }

  /// Serialize the `Timelock` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `Timelock`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
    Ok(match read_varint(r)? {
      0 => Timelock::None,
      block if block < TIMELOCK_BLOCK_THRESHOLD => Timelock::Block(block),
      time => Timelock::Time(time),
    })
  }
}

impl PartialOrd for Timelock {
  /// Timelocks of differing kinds are incomparable, except that `None` is before everything.
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self, other) {
      (Timelock::None, Timelock::None) => Some(Ordering::Equal),
      (Timelock::None, _) => Some(Ordering::Less),
      (_, Timelock::None) => Some(Ordering::Greater),
      (Timelock::Block(a), Timelock::Block(b)) => a.partial_cmp(b),
      (Timelock::Time(a), Timelock::Time(b)) => a.partial_cmp(b),
      _ => None,
    }
  }
}

/// The transaction prefix: everything the signatures commit to, excluding the proofs
/// themselves.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransactionPrefix {
  /// The additional timelock constraining this transaction's outputs.
  pub additional_timelock: Timelock,
  /// The inputs.
  pub inputs: Vec<Input>,
  /// The outputs.
  pub outputs: Vec<Output>,
  /// The extra field: arbitrary bytes, in practice a tag-prefixed stream of scan data.
  pub extra: Vec<u8>,
}

impl TransactionPrefix {
  /// The maximum amount of inputs within a non-miner transaction.
  pub const INPUTS_UPPER_BOUND: UpperBound<usize> = UpperBound(128);
  /// The maximum amount of outputs within a non-miner transaction.
  pub const OUTPUTS_UPPER_BOUND: UpperBound<usize> = UpperBound(16);

  pub(crate) fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    self.additional_timelock.write(w)?;
    write_list(Input::write, &self.inputs, w)?;
    write_list(Output::write, &self.outputs, w)?;
    write_varint(self.extra.len(), w)?;
    w.write_all(&self.extra)
  }

  // Reads the prefix, the version having already been read (and passed in).
  pub(crate) fn read<R: Read>(r: &mut R, version: u64) -> io::Result<TransactionPrefix> {
    let additional_timelock = Timelock::read(r)?;

    let inputs = read_list(Input::read, Self::INPUTS_UPPER_BOUND.0, r)?;
    let miner_tx = matches!(inputs.first(), Some(Input::Gen(_)));
    match inputs.len() {
      0 => Err(io::Error::other("transaction had no inputs"))?,
      1 => {}
      _ if miner_tx => Err(io::Error::other("miner transaction with multiple inputs"))?,
      _ => {}
    }

    let outputs = read_list(
      |r| Output::read((!miner_tx) && (version == VERSION), r),
      Self::OUTPUTS_UPPER_BOUND.0,
      r,
    )?;
    if outputs.is_empty() {
      Err(io::Error::other("transaction had no outputs"))?;
    }

    let extra = read_list(read_byte, Transaction::SIZE_UPPER_BOUND.0, r)?;

    Ok(TransactionPrefix { additional_timelock, inputs, outputs, extra })
  }

  pub(crate) fn hash(&self) -> [u8; 32] {
    let mut buf = Vec::with_capacity(256);
    write_varint(VERSION, &mut buf).expect("writing to a Vec cannot fail");
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    keccak256(buf)
  }
}

// The transaction hash is the hash of three hashes: the prefix's, the RingCT base's, and the
// prunable section's (the caller supplying the latter, as pruning discards its preimage).
fn three_part_hash(
  prefix: &TransactionPrefix,
  base: Option<(&RctBase, RctType)>,
  prunable_hash: [u8; 32],
) -> [u8; 32] {
  let mut hashes = Vec::with_capacity(96);
  hashes.extend(prefix.hash());
  match base {
    Some((base, rct_type)) => {
      let mut buf = Vec::with_capacity(512);
      base.write(&mut buf, rct_type).expect("writing to a Vec cannot fail");
      hashes.extend(keccak256(&buf));
    }
    // The serialization of a lack of proofs
    None => hashes.extend(keccak256([0])),
  }
  hashes.extend(prunable_hash);
  keccak256(hashes)
}

// Read the version and prefix shared by both transaction forms.
fn read_versioned_prefix<R: Read>(r: &mut R) -> io::Result<TransactionPrefix> {
  let version = read_varint(r)?;
  if version != VERSION {
    Err(io::Error::other("unsupported transaction version"))?;
  }
  TransactionPrefix::read(r, version)
}

/// A version 2 (RingCT) Monero transaction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Transaction {
  /// The transaction's prefix.
  pub prefix: TransactionPrefix,
  /// The transaction's RingCT proofs.
  ///
  /// Only miner transactions may omit their proofs.
  pub proofs: Option<RctProofs>,
}

impl Transaction {
  /// The maximum size for a non-miner transaction.
  pub const SIZE_UPPER_BOUND: UpperBound<usize> = UpperBound(1_000_000);

  /// Write the `Transaction`.
  ///
  /// A malformed transaction may be writable without being readable back.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_varint(VERSION, w)?;
    self.prefix.write(w)?;
    match &self.proofs {
      // The byte for `RctType` 0, no proofs
      None => write_byte(&0, w),
      Some(proofs) => proofs.write(w),
    }
  }

  /// Serialize the `Transaction` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2048);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `Transaction`.
  ///
  /// Only version 2 (RingCT) transactions, the sole version produced since 2016, are
  /// supported.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
    let prefix = read_versioned_prefix(r)?;

    let ring_length = match prefix.inputs.first() {
      Some(Input::ToKey { key_offsets, .. }) => key_offsets.len(),
      _ => 0,
    };
    let proofs = RctProofs::read(ring_length, prefix.inputs.len(), prefix.outputs.len(), r)?;

    if proofs.is_none() && (!matches!(prefix.inputs[0], Input::Gen(_))) {
      Err(io::Error::other("non-miner transaction without RingCT proofs"))?;
    }

    Ok(Transaction { prefix, proofs })
  }

  /// The hash of the transaction.
  pub fn hash(&self) -> [u8; 32] {
    match &self.proofs {
      Some(proofs) => {
        let mut buf = Vec::with_capacity(1024);
        proofs.prunable.write(&mut buf).expect("writing to a Vec cannot fail");
        three_part_hash(
          &self.prefix,
          Some((&proofs.base, proofs.rct_type())),
          keccak256(buf),
        )
      }
      None => three_part_hash(&self.prefix, None, [0; 32]),
    }
  }

  /// The hash the transaction's signatures sign, `None` for a miner transaction.
  ///
  /// This excludes the signatures themselves (and the pseudo-out commitments the base's
  /// balance equation covers).
  pub fn signature_hash(&self) -> Option<[u8; 32]> {
    let proofs = self.proofs.as_ref()?;
    let mut buf = Vec::with_capacity(1024);
    proofs
      .prunable
      .signature_write(&mut buf)
      .expect("writing to a Vec cannot fail");
    Some(three_part_hash(
      &self.prefix,
      Some((&proofs.base, proofs.rct_type())),
      keccak256(buf),
    ))
  }

  /// The transaction's weight: its serialized size, plus the range-proof aggregation
  /// clawback.
  pub fn weight(&self) -> usize {
    let blob_size = self.serialize().len();
    match &self.proofs {
      None => blob_size,
      Some(_) => blob_size + Bulletproof::calculate_clawback(self.prefix.outputs.len()).0,
    }
  }
}

/// A transaction with its prunable proofs discarded, as nodes store buried transactions and as
/// scanning requires.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PrunedTransaction {
  /// The transaction's prefix.
  pub prefix: TransactionPrefix,
  /// The unprunable remainder of the transaction's proofs.
  pub proofs: Option<PrunedRctProofs>,
}

impl PrunedTransaction {
  /// Write the `PrunedTransaction`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_varint(VERSION, w)?;
    self.prefix.write(w)?;
    match &self.proofs {
      None => write_byte(&0, w),
      Some(proofs) => proofs.base.write(w, proofs.rct_type),
    }
  }

  /// Serialize the `PrunedTransaction` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1024);
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read a `PrunedTransaction`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
    let prefix = read_versioned_prefix(r)?;
    let proofs = RctBase::read(prefix.outputs.len(), r)?
      .map(|(rct_type, base)| PrunedRctProofs { rct_type, base });
    Ok(PrunedTransaction { prefix, proofs })
  }
}

impl From<Transaction> for PrunedTransaction {
  fn from(tx: Transaction) -> PrunedTransaction {
    PrunedTransaction {
      prefix: tx.prefix,
      proofs: tx
        .proofs
        .map(|proofs| PrunedRctProofs { rct_type: proofs.rct_type(), base: proofs.base }),
    }
  }
}
