use subtle::{Choice, ConstantTimeEq, ConditionallySelectable};
use zeroize::Zeroize;

use crypto_bigint::{Encoding, modular::constant_mod::*, U256, impl_modulus, const_residue};

use monero_kit_primitives::keccak256;

use crate::CompressedPoint;

// Arithmetic over the field of 2^255 - 19, for the hash-to-point map below.
impl_modulus!(
  Curve25519Field,
  U256,
  "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed"
);
type FieldElement = Residue<Curve25519Field, { U256::LIMBS }>;

// Curve25519 is the Montgomery curve `v^2 = u^3 + A u^2 + u` with `A = 486662`
const MONTGOMERY_A_U256: U256 = U256::from_u64(486662);
const MONTGOMERY_A: FieldElement = const_residue!(MONTGOMERY_A_U256, Curve25519Field);
const MONTGOMERY_A_NEG: FieldElement = MONTGOMERY_A.neg();

// Whether the element is a square in the field, via the `sqrt8k5` structure RFC-8032 provides.
fn is_square(value: &FieldElement) -> Choice {
  // (p + 3) // 8
  const SQRT_EXP: U256 = Curve25519Field::MODULUS.shr_vartime(3).wrapping_add(&U256::ONE);
  // 2^{(p - 1) // 4}
  const Z: FieldElement =
    FieldElement::ONE.add(&FieldElement::ONE).pow(&Curve25519Field::MODULUS.shr_vartime(2));
  let candidate = value.pow(&SQRT_EXP);
  let other_candidate = candidate * Z;
  // If `value` is square, one of these is its square root
  candidate.square().ct_eq(value) | other_candidate.square().ct_eq(value)
}

/// A decompressed point on the Ed25519 elliptic curve.
#[derive(Clone, Copy, Eq, Debug, Zeroize)]
pub struct Point(curve25519_dalek::EdwardsPoint);

impl ConstantTimeEq for Point {
  fn ct_eq(&self, other: &Self) -> Choice {
    self.0.ct_eq(&other.0)
  }
}

impl ConditionallySelectable for Point {
  fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
    Self(<_>::conditional_select(&a.0, &b.0, choice))
  }
}

impl PartialEq for Point {
  /// This defers to `ConstantTimeEq::ct_eq`.
  fn eq(&self, other: &Self) -> bool {
    bool::from(self.ct_eq(other))
  }
}

impl Point {
  /// Map arbitrary bytes onto the prime-order subgroup, Monero's `hash_to_ec`.
  ///
  /// This implements Elligator 2 ("Elligator: Elliptic-curve points indistinguishable from
  /// uniform random strings", <https://eprint.iacr.org/2013/325>, Section 5.5's application to
  /// Curve25519), mapping the result from Montgomery form to Ed25519 and multiplying by the
  /// cofactor so the result lies within the prime-order subgroup. The map is applied once, so
  /// it's limited to the subset of points whose derivative `u` coordinates are quadratic
  /// residues, and biased accordingly. This implementation runs in constant time.
  pub fn hash_to_point(bytes: [u8; 32]) -> Self {
    /*
      A narrow reduction of the hash, so negligibly biased: each field element has a
      `2 / 2^256` chance of selection except the first 19, whose `3 / 2^256` third chance only
      arises when the hash exceeds `2^256 - 38`.
    */
    let hashed = FieldElement::new(&U256::from_le_bytes(keccak256(bytes)));

    // Per Section 5.5, take `u = 2`, the smallest non-square in the field
    let hashed_square = hashed.square();
    let u_times_square = hashed_square + hashed_square;

    // `1 + u r^2` is non-zero, as `(p - 1) / 2` is not a square
    let (denominator_inv, _was_zero) = (FieldElement::ONE + u_times_square).invert();
    let first_candidate = MONTGOMERY_A_NEG * denominator_inv;
    /*
      Section 5.5: "then \epsilon = 1 and x = \upsilon. Otherwise \epsilon = -1,
      x = \upsilon u r^2". Per Section 5.2's "Second case", `\upsilon u r^2 = -\upsilon - A`,
      and the negation with subtraction outperforms the multiplication.
    */
    let second_candidate = -first_candidate - MONTGOMERY_A;

    // The first candidate is a valid `u` coordinate iff `u^3 + A u^2 + u` is square
    let first_works = is_square(
      &(((first_candidate + MONTGOMERY_A) * first_candidate.square()) + first_candidate),
    );
    let u = FieldElement::conditional_select(&second_candidate, &first_candidate, first_works);

    /*
      Map from Curve25519 to Ed25519. Section 5.2 chooses the negative square root as the `v`
      coordinate when the first candidate was chosen; choosing the odd `y` coordinate here is
      functionally equivalent.
    */
    let edwards = curve25519_dalek::MontgomeryPoint(u.retrieve().to_le_bytes())
      .to_edwards(first_works.unwrap_u8())
      .expect("neither Elligator 2 candidate was a square");

    // Clear the cofactor, placing the result within the prime-order subgroup
    Self::from(edwards.mul_by_cofactor())
  }

  /// Compress a point to a `CompressedPoint`.
  pub fn compress(self) -> CompressedPoint {
    CompressedPoint::from_bytes(self.0.compress().to_bytes())
  }

  /// Create a `Point` from a `curve25519_dalek::EdwardsPoint`.
  ///
  /// This is hidden as it is not part of our API commitment. No guarantees are made for it.
  #[doc(hidden)]
  pub fn from(point: curve25519_dalek::EdwardsPoint) -> Self {
    Self(point)
  }

  /// Create a `curve25519_dalek::EdwardsPoint` from a `Point`.
  ///
  /// This is hidden as it is not part of our API commitment. No guarantees are made for it.
  #[doc(hidden)]
  pub fn into(self) -> curve25519_dalek::EdwardsPoint {
    self.0
  }

  /// Interpret this point as a key image, yielding `None` if it's unusable as one.
  ///
  /// Key images must not be the identity and must lie within the prime-order subgroup, or
  /// distinct images could be produced for a single output.
  #[doc(hidden)]
  pub fn key_image(self) -> Option<curve25519_dalek::EdwardsPoint> {
    use curve25519_dalek::traits::IsIdentity;
    if self.0.is_identity() || (!self.0.is_torsion_free()) {
      None?;
    }
    Some(self.0)
  }
}
