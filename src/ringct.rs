use std_shims::{
  vec,
  vec::Vec,
  io::{self, Read, Write},
};

use zeroize::Zeroize;

use monero_kit_io::*;
use monero_kit_ed25519::CompressedPoint;

pub use monero_kit_clsag as clsag;
use clsag::Clsag;

pub use monero_kit_bulletproofs as bulletproofs;
use bulletproofs::Bulletproof;

/// An encrypted amount, letting the recipient recover the amount committed to.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize)]
pub enum EncryptedAmount {
  /// The original format: the mask and amount, each masked by a hash-derived scalar.
  Original {
    /// The masked mask.
    mask: [u8; 32],
    /// The masked amount.
    amount: [u8; 32],
  },
  /// The compact format: solely the amount, as eight bytes XORed with a hash-derived pad.
  ///
  /// The mask is itself hash-derived, letting the recipient recompute it.
  Compact {
    /// The masked amount.
    amount: [u8; 8],
  },
}

impl EncryptedAmount {
  /// Read an `EncryptedAmount` of the specified format.
  pub fn read<R: Read>(compact: bool, r: &mut R) -> io::Result<EncryptedAmount> {
    Ok(if compact {
      EncryptedAmount::Compact { amount: read_bytes(r)? }
    } else {
      EncryptedAmount::Original { mask: read_bytes(r)?, amount: read_bytes(r)? }
    })
  }

  /// Write the `EncryptedAmount`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      EncryptedAmount::Original { mask, amount } => {
        w.write_all(mask)?;
        w.write_all(amount)
      }
      EncryptedAmount::Compact { amount } => w.write_all(amount),
    }
  }
}

/// The format of the RingCT proofs within a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub enum RctType {
  /// CLSAG ring signatures with an aggregated Bulletproof.
  ClsagBulletproof,
  /// CLSAG ring signatures with an aggregated Bulletproof+ and view-tagged outputs.
  ClsagBulletproofPlus,
}

impl From<RctType> for u8 {
  fn from(kind: RctType) -> u8 {
    match kind {
      RctType::ClsagBulletproof => 5,
      RctType::ClsagBulletproofPlus => 6,
    }
  }
}

impl TryFrom<u8> for RctType {
  type Error = ();
  fn try_from(byte: u8) -> Result<RctType, ()> {
    Ok(match byte {
      5 => RctType::ClsagBulletproof,
      6 => RctType::ClsagBulletproofPlus,
      _ => Err(())?,
    })
  }
}

impl RctType {
  /// Whether this format uses compact encrypted amounts.
  pub fn compact_encrypted_amounts(&self) -> bool {
    match self {
      RctType::ClsagBulletproof | RctType::ClsagBulletproofPlus => true,
    }
  }

  /// Whether this format uses Bulletproofs+.
  pub fn bulletproof_plus(&self) -> bool {
    match self {
      RctType::ClsagBulletproof => false,
      RctType::ClsagBulletproofPlus => true,
    }
  }
}

/// The part of the RingCT proofs which can't be pruned, needed to scan and spend outputs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RctBase {
  /// The fee explicitly paid by this transaction, in atomic units.
  pub fee: u64,
  /// The encrypted amount for each output.
  pub encrypted_amounts: Vec<EncryptedAmount>,
  /// The commitment for each output.
  pub commitments: Vec<CompressedPoint>,
}

impl RctBase {
  /// Write the `RctBase`, with the type byte.
  pub fn write<W: Write>(&self, w: &mut W, rct_type: RctType) -> io::Result<()> {
    w.write_all(&[u8::from(rct_type)])?;
    write_varint(self.fee, w)?;
    for encrypted_amount in &self.encrypted_amounts {
      encrypted_amount.write(w)?;
    }
    write_items(CompressedPoint::write, &self.commitments, w)
  }

  /// Read an `RctBase`, returning `None` if the transaction had no RingCT proofs.
  pub fn read<R: Read>(outputs: usize, r: &mut R) -> io::Result<Option<(RctType, RctBase)>> {
    let type_byte = read_byte(r)?;
    if type_byte == 0 {
      return Ok(None);
    }
    let rct_type = RctType::try_from(type_byte)
      .map_err(|()| io::Error::other("reading unknown/unsupported RctType"))?;

    Ok(Some((
      rct_type,
      RctBase {
        fee: read_varint(r)?,
        encrypted_amounts: read_items(
          |r| EncryptedAmount::read(rct_type.compact_encrypted_amounts(), r),
          outputs,
          r,
        )?,
        commitments: read_items(CompressedPoint::read, outputs, r)?,
      },
    )))
  }
}

/// The part of the RingCT proofs which may be pruned once the transaction is buried.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RctPrunable {
  /// The proofs for a CLSAG + Bulletproof+ transaction.
  Clsag {
    /// The aggregated range proof for every output commitment.
    bulletproof: Bulletproof,
    /// The CLSAG for each input.
    clsags: Vec<Clsag>,
    /// The pseudo-out commitment for each input.
    pseudo_outs: Vec<CompressedPoint>,
  },
}

impl RctPrunable {
  /// Write the `RctPrunable`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      RctPrunable::Clsag { bulletproof, clsags, pseudo_outs } => {
        // The amount of aggregated range proofs, always one here
        write_varint(1u64, w)?;
        bulletproof.write(w)?;
        write_items(Clsag::write, clsags, w)?;
        write_items(CompressedPoint::write, pseudo_outs, w)
      }
    }
  }

  /// Read an `RctPrunable`.
  pub fn read<R: Read>(
    rct_type: RctType,
    ring_length: usize,
    inputs: usize,
    r: &mut R,
  ) -> io::Result<RctPrunable> {
    if !rct_type.bulletproof_plus() {
      // This library only produces, and only deserializes, Bulletproof+ proof sections
      Err(io::Error::other("reading an unsupported RctPrunable format"))?;
    }

    if read_varint(r)? != 1 {
      Err(io::Error::other("expected one aggregated range proof"))?;
    }
    Ok(RctPrunable::Clsag {
      bulletproof: Bulletproof::read(r)?,
      clsags: read_items(|r| Clsag::read(ring_length, r), inputs, r)?,
      pseudo_outs: read_items(CompressedPoint::read, inputs, r)?,
    })
  }

  /// Write the parts of the `RctPrunable` hashed into the signature hash.
  ///
  /// The CLSAGs sign this hash, so the CLSAGs (and the pseudo-outs committed to by the base's
  /// balance equation) are excluded from it.
  pub fn signature_write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    match self {
      RctPrunable::Clsag { bulletproof, .. } => bulletproof.write(w),
    }
  }
}

/// The full set of RingCT proofs for a transaction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RctProofs {
  /// The unprunable portion.
  pub base: RctBase,
  /// The prunable portion.
  pub prunable: RctPrunable,
}

impl RctProofs {
  /// The format of these proofs.
  pub fn rct_type(&self) -> RctType {
    match self.prunable {
      RctPrunable::Clsag { .. } => RctType::ClsagBulletproofPlus,
    }
  }

  /// Write the `RctProofs`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    self.base.write(w, self.rct_type())?;
    self.prunable.write(w)
  }

  /// Serialize the `RctProofs` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut serialized = vec![];
    self.write(&mut serialized).expect("writing to a Vec cannot fail");
    serialized
  }

  /// Read a `RctProofs`, returning `None` if the transaction had no RingCT proofs.
  pub fn read<R: Read>(
    ring_length: usize,
    inputs: usize,
    outputs: usize,
    r: &mut R,
  ) -> io::Result<Option<RctProofs>> {
    let Some((rct_type, base)) = RctBase::read(outputs, r)? else { return Ok(None) };
    Ok(Some(RctProofs {
      base,
      prunable: RctPrunable::read(rct_type, ring_length, inputs, r)?,
    }))
  }
}

/// RingCT proofs with the prunable portion pruned, as stored by nodes once buried.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PrunedRctProofs {
  /// The format of the proofs this transaction carried.
  pub rct_type: RctType,
  /// The unprunable portion.
  pub base: RctBase,
}
