use core::ops::DerefMut;

use std_shims::{sync::LazyLock, io::{self, Read, Write}};

use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

use rand_core::{RngCore, CryptoRng};

use monero_kit_io::read_bytes;
use monero_kit_primitives::keccak256;

// 8^-1 mod l, computed once. Multiplying by this undoes a multiplication by the cofactor.
static INV_EIGHT: LazyLock<curve25519_dalek::Scalar> =
  LazyLock::new(|| curve25519_dalek::Scalar::from(8u8).invert());

/// A scalar, always reduced modulo the order of the prime-order subgroup.
///
/// Reduction is performed on every constructor, so a `Scalar` existing means its encoding is
/// canonical.
#[derive(Clone, Copy, Eq, Debug, Zeroize)]
pub struct Scalar(curve25519_dalek::Scalar);

impl ConstantTimeEq for Scalar {
  fn ct_eq(&self, other: &Self) -> Choice {
    self.0.ct_eq(&other.0)
  }
}
impl PartialEq for Scalar {
  /// This defers to `ConstantTimeEq::ct_eq`.
  fn eq(&self, other: &Self) -> bool {
    bool::from(self.ct_eq(other))
  }
}

impl Scalar {
  /// The additive identity.
  pub const ZERO: Self = Self(curve25519_dalek::Scalar::ZERO);
  /// The multiplicative identity.
  pub const ONE: Self = Self(curve25519_dalek::Scalar::ONE);

  /// The inverse of eight modulo the group order.
  pub fn inv_eight() -> Self {
    Self(*INV_EIGHT)
  }

  /// Interpret 32 little-endian bytes as an integer and reduce it modulo the group order.
  pub fn reduce(bytes: [u8; 32]) -> Self {
    Self(curve25519_dalek::Scalar::from_bytes_mod_order(bytes))
  }

  /// Sample a uniform scalar, by wide reduction of 64 uniform bytes.
  ///
  /// This is hidden as it is not part of our API commitment. No guarantees are made for it.
  #[doc(hidden)]
  pub fn random(rng: &mut (impl RngCore + CryptoRng)) -> Self {
    let mut wide = Zeroizing::new([0; 64]);
    rng.fill_bytes(wide.deref_mut());
    Self(curve25519_dalek::Scalar::from_bytes_mod_order_wide(&wide))
  }

  /// Derive a scalar from a hash function, as `keccak256(data) mod l`.
  ///
  /// This is a narrow reduction, not a wide one. Should the hash be congruent to zero, of
  /// negligible probability, this panics: a proof whose transcript yields a zero challenge is
  /// never claimed valid, matching Monero's erroring on the same case.
  pub fn hash(data: impl AsRef<[u8]>) -> Self {
    let reduced = Self::reduce(keccak256(data.as_ref()));
    assert!(
      reduced != Self::ZERO,
      "keccak256 of the preimage was zero mod l: {:?}",
      data.as_ref(),
    );
    reduced
  }

  /// The canonical encoding of this scalar.
  pub fn to_bytes(self) -> [u8; 32] {
    self.0.to_bytes()
  }

  /// Write the `Scalar`.
  ///
  /// This may run in time variable to its value.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.to_bytes())
  }

  /// Read a `Scalar`, rejecting unreduced encodings.
  ///
  /// This runs in variable time.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Scalar> {
    Option::from(curve25519_dalek::Scalar::from_canonical_bytes(read_bytes(r)?))
      .map(Self)
      .ok_or_else(|| io::Error::other("unreduced scalar"))
  }

  /// Create a `Scalar` from a `curve25519_dalek::Scalar`.
  ///
  /// This is hidden as it is not part of our API commitment. No guarantees are made for it.
  #[doc(hidden)]
  pub fn from(scalar: curve25519_dalek::Scalar) -> Self {
    Self(scalar)
  }

  /// Create a `curve25519_dalek::Scalar` from a `Scalar`.
  ///
  /// This is hidden as it is not part of our API commitment. No guarantees are made for it.
  #[doc(hidden)]
  pub fn into(self) -> curve25519_dalek::Scalar {
    self.0
  }
}
