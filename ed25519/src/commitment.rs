use std_shims::{sync::LazyLock, io::{self, Read, Write}};

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use curve25519_dalek::traits::MultiscalarMul;

use monero_kit_io::{write_varint, read_varint};

use crate::{Scalar, CompressedPoint, Point};

// H decompressed once, as the decompression is expensive and commitments are calculated
// constantly.
static H: LazyLock<curve25519_dalek::EdwardsPoint> = LazyLock::new(|| {
  CompressedPoint::H
    .decompress()
    .expect("the H generator constant wasn't a canonical point")
    .into()
});

/// The opening of a Pedersen commitment to an amount: the blinding mask `x` and the amount `a`
/// within `x G + a H`.
///
/// Given a uniform mask, the commitment perfectly hides the amount.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Commitment {
  /// The mask blinding the amount.
  pub mask: Scalar,
  /// The amount committed to, in atomic units.
  pub amount: u64,
}

impl ConstantTimeEq for Commitment {
  fn ct_eq(&self, other: &Self) -> Choice {
    self.mask.ct_eq(&other.mask) & self.amount.ct_eq(&other.amount)
  }
}

impl core::fmt::Debug for Commitment {
  /// This implementation reveals the amount, yet not the mask.
  fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
    fmt.debug_struct("Commitment").field("amount", &self.amount).finish_non_exhaustive()
  }
}

impl Commitment {
  /// Create a new opening.
  pub fn new(mask: Scalar, amount: u64) -> Commitment {
    Commitment { mask, amount }
  }

  /// The opening of a commitment to zero.
  ///
  /// The mask is one, not zero, so the commitment isn't the identity point.
  pub fn zero() -> Commitment {
    Commitment { mask: Scalar::ONE, amount: 0 }
  }

  /// Calculate the commitment this opens: `mask G + amount H`.
  pub fn calculate(&self) -> Point {
    Point::from(curve25519_dalek::EdwardsPoint::multiscalar_mul(
      [self.mask.into(), curve25519_dalek::Scalar::from(self.amount)],
      [curve25519_dalek::constants::ED25519_BASEPOINT_POINT, *H],
    ))
  }

  /// Write the opening, as the mask's encoding then the amount as a VarInt.
  ///
  /// Openings never appear on-chain; this layout is solely this library's. It may run in time
  /// variable to its value.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    self.mask.write(w)?;
    write_varint(self.amount, w)
  }

  /// Read an opening.
  ///
  /// This may run in time variable to its value.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Commitment> {
    Ok(Commitment { mask: Scalar::read(r)?, amount: read_varint(r)? })
  }
}
