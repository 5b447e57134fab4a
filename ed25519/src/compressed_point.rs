use core::{cmp::Ordering, hash::{Hash, Hasher}};
use std_shims::io::{self, Read, Write};

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use monero_kit_io::read_bytes;

use crate::Point;

/// The 32-byte encoding of an Ed25519 point: its `y` coordinate, with the sign of `x` in the
/// top bit.
///
/// Decompression here is stricter than `curve25519_dalek`'s: an unreduced `y` coordinate, or a
/// negative zero `x`, is rejected, so no point has two accepted encodings. Whether the encoding
/// is of a point at all isn't checked until [`CompressedPoint::decompress`] is called, letting
/// arbitrary on-chain bytes be carried around losslessly.
///
/// [`Ord`] and [`Hash`] run in variable time, as encodings are treated as public data there.
#[derive(Clone, Copy, Eq, Debug, Zeroize)]
pub struct CompressedPoint([u8; 32]);

impl ConstantTimeEq for CompressedPoint {
  fn ct_eq(&self, other: &Self) -> Choice {
    self.0.ct_eq(&other.0)
  }
}
impl PartialEq for CompressedPoint {
  /// This defers to `ConstantTimeEq::ct_eq`.
  fn eq(&self, other: &Self) -> bool {
    bool::from(self.ct_eq(other))
  }
}

impl Ord for CompressedPoint {
  /// This runs in variable time.
  fn cmp(&self, other: &Self) -> Ordering {
    self.0.cmp(&other.0)
  }
}
impl PartialOrd for CompressedPoint {
  /// This runs in variable time.
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Hash for CompressedPoint {
  /// This runs in variable time.
  fn hash<H: Hasher>(&self, state: &mut H) {
    state.write(&self.0);
  }
}

impl CompressedPoint {
  /// The encoding of the identity point.
  #[rustfmt::skip]
  pub const IDENTITY: Self = Self([
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  ]);
  /// The `G` generator, the Ed25519 basepoint.
  pub const G: Self = Self(curve25519_dalek::constants::ED25519_BASEPOINT_COMPRESSED.to_bytes());
  /// The `H` generator, `8 * decompress(keccak256(G))`.
  ///
  /// `H` has no known discrete logarithm over `G`, as required of the amount generator within
  /// Pedersen commitments.
  #[rustfmt::skip]
  pub const H: Self = Self([
    139, 101,  89, 112,  21,  55, 153, 175,  42, 234, 220, 159, 241, 173, 208, 234,
    108, 114,  81, 213,  65,  84, 207, 169,  44,  23,  58,  13, 211, 156,  31, 148,
  ]);

  /// Wrap 32 bytes as a `CompressedPoint`, without validation.
  pub fn from_bytes(bytes: [u8; 32]) -> CompressedPoint {
    CompressedPoint(bytes)
  }

  /// The bytes of this encoding, valid point or not.
  pub fn to_bytes(&self) -> [u8; 32] {
    self.0
  }

  /// Decompress a canonically-encoded point.
  ///
  /// Membership in the prime-order subgroup is not checked here.
  pub fn decompress(&self) -> Option<Point> {
    let point = curve25519_dalek::edwards::CompressedEdwardsY(self.0).decompress()?;
    // Re-compression detects unreduced y coordinates and -0, which dalek accepts
    if point.compress().to_bytes() != self.0 {
      return None;
    }
    Some(Point::from(point))
  }

  /// Write the `CompressedPoint`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.0)
  }

  /// Read a `CompressedPoint`, without checking it decompresses.
  pub fn read<R: Read>(r: &mut R) -> io::Result<CompressedPoint> {
    read_bytes(r).map(CompressedPoint)
  }
}

impl From<[u8; 32]> for CompressedPoint {
  fn from(bytes: [u8; 32]) -> CompressedPoint {
    CompressedPoint::from_bytes(bytes)
  }
}
