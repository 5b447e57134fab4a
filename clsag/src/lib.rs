#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

use core::ops::Deref;
use std_shims::{
  sync::LazyLock,
  vec::Vec,
  io::{self, Read, Write},
};

use rand_core::{RngCore, CryptoRng};

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};
use subtle::{ConstantTimeEq, ConditionallySelectable};

use curve25519_dalek::{
  constants::ED25519_BASEPOINT_POINT,
  traits::{IsIdentity, MultiscalarMul, VartimePrecomputedMultiscalarMul},
  edwards::{EdwardsPoint, VartimeEdwardsPrecomputation},
};

use monero_kit_io::*;
use monero_kit_ed25519::{Scalar, CompressedPoint, Point, Commitment};

mod decoys;
pub use decoys::Decoys;

#[cfg(test)]
mod tests;

// A vartime precomputation of the basepoint, used when verifying (public data only).
static BASEPOINT_PRECOMP: LazyLock<VartimeEdwardsPrecomputation> =
  LazyLock::new(|| VartimeEdwardsPrecomputation::new([ED25519_BASEPOINT_POINT]));

fn keccak256_to_scalar(data: &[u8]) -> curve25519_dalek::Scalar {
  Scalar::hash(data).into()
}

/// Errors when working with CLSAGs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ClsagError {
  /// The ring was invalid (such as being too small or too large).
  #[error("invalid ring")]
  InvalidRing,
  /// The commitment opening provided did not match the signer's ring member.
  #[error("invalid commitment")]
  InvalidCommitment,
  /// The private key provided did not match the signer's ring member.
  #[error("invalid key")]
  InvalidKey,
  /// The key image was invalid (the identity, or containing torsion).
  #[error("invalid key image")]
  InvalidImage,
  /// The `D` component was invalid.
  #[error("invalid D")]
  InvalidD,
  /// The `s` vector was invalid.
  #[error("invalid s")]
  InvalidS,
  /// The challenge walk did not close (the signature is forged or corrupt).
  #[error("invalid c1")]
  InvalidC1,
}

/// Context on the ring member being signed for.
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct ClsagContext {
  // The opening for the commitment of the signer's ring member
  commitment: Commitment,
  // The ring, the signer's position, and the positions' encoding
  decoys: Decoys,
}

impl ClsagContext {
  /// Create a new `ClsagContext`.
  ///
  /// The commitment must be the opening of the signer's ring member's commitment.
  pub fn new(decoys: Decoys, commitment: Commitment) -> Result<ClsagContext, ClsagError> {
    if decoys.len() > usize::from(u8::MAX) {
      Err(ClsagError::InvalidRing)?;
    }

    // Validate the commitment matches the signer's ring member
    if decoys.signer_ring_members()[1] != commitment.calculate() {
      Err(ClsagError::InvalidCommitment)?;
    }

    Ok(ClsagContext { commitment, decoys })
  }

  /// The ring signed over.
  pub fn decoys(&self) -> &Decoys {
    &self.decoys
  }
}

#[allow(clippy::large_enum_variant)]
enum Mode {
  Sign(usize, EdwardsPoint, EdwardsPoint),
  Verify(curve25519_dalek::Scalar),
}

// A CLSAG domain tag, padded to a full 32-byte transcript block.
fn domain_block(tag: &[u8]) -> [u8; 32] {
  const PREFIX: &[u8] = b"CLSAG_";
  let mut block = [0; 32];
  block[.. PREFIX.len()].copy_from_slice(PREFIX);
  block[PREFIX.len() .. (PREFIX.len() + tag.len())].copy_from_slice(tag);
  block
}

// Core of the CLSAG algorithm, shared by sign and verify, the minimal differences covered by
// `Mode`.
fn core(
  ring: &[[EdwardsPoint; 2]],
  I: &EdwardsPoint,
  pseudo_out: &EdwardsPoint,
  msg: &[u8; 32],
  D: &EdwardsPoint,
  s: &[curve25519_dalek::Scalar],
  mode: &Mode,
) -> ((EdwardsPoint, curve25519_dalek::Scalar, curve25519_dalek::Scalar), curve25519_dalek::Scalar)
{
  let n = ring.len();

  let images_precomp = match mode {
    Mode::Sign(..) => None,
    Mode::Verify(..) => Some(VartimeEdwardsPrecomputation::new([I, D])),
  };
  let D_inv_eight = D * Scalar::inv_eight().into();

  // The ring members' encodings, shared by every transcript: all keys, then all commitments
  let mut P = Vec::with_capacity(n);
  let mut C = Vec::with_capacity(n);
  let mut ring_bytes = Vec::with_capacity(2 * n * 32);
  for member in ring {
    P.push(member[0]);
    ring_bytes.extend(member[0].compress().to_bytes());
  }
  for member in ring {
    C.push(member[1] - pseudo_out);
    ring_bytes.extend(member[1].compress().to_bytes());
  }

  // The aggregation coefficients: H_s(tag || ring || I || D/8 || pseudo-out)
  let aggregation_coefficient = |tag: &[u8]| {
    let mut transcript = Vec::with_capacity(32 + ring_bytes.len() + (3 * 32));
    transcript.extend(domain_block(tag));
    transcript.extend(&ring_bytes);
    transcript.extend(I.compress().to_bytes());
    transcript.extend(D_inv_eight.compress().to_bytes());
    transcript.extend(pseudo_out.compress().to_bytes());
    keccak256_to_scalar(&transcript)
  };
  let mu_P = aggregation_coefficient(b"agg_0");
  let mu_C = aggregation_coefficient(b"agg_1");

  // Each round challenge is H_s(tag || ring || pseudo-out || msg || L || R)
  let round_prefix = {
    let mut prefix = Vec::with_capacity(32 + ring_bytes.len() + 32 + 32);
    prefix.extend(domain_block(b"round"));
    prefix.extend(&ring_bytes);
    prefix.extend(pseudo_out.compress().to_bytes());
    prefix.extend(msg);
    prefix
  };
  let round_challenge = |L: &EdwardsPoint, R: &EdwardsPoint| {
    let mut transcript = round_prefix.clone();
    transcript.extend(L.compress().to_bytes());
    transcript.extend(R.compress().to_bytes());
    keccak256_to_scalar(&transcript)
  };

  // Where the walk starts, and the challenge it starts with
  let (start, end, mut c) = match mode {
    // Signing opens at the true spend with the nonce commitments, walking the rest of the ring
    Mode::Sign(signer, A, AH) => (signer + 1, signer + n, round_challenge(A, AH)),
    // Verification replays the full walk from the claimed first challenge
    Mode::Verify(c1) => (0, n, *c1),
  };

  let mut c1 = c;
  for i in (start .. end).map(|i| i % n) {
    let c_p = mu_P * c;
    let c_c = mu_C * c;

    // L_i = (s_i G) + (c_p P_i) + (c_c C_i)
    let L = match mode {
      Mode::Sign(..) => {
        EdwardsPoint::multiscalar_mul([s[i], c_p, c_c], [ED25519_BASEPOINT_POINT, P[i], C[i]])
      }
      Mode::Verify(..) => {
        BASEPOINT_PRECOMP.vartime_mixed_multiscalar_mul([s[i]], [c_p, c_c], [P[i], C[i]])
      }
    };

    let hashed_key = Point::hash_to_point(P[i].compress().to_bytes()).into();

    // R_i = (c_p I) + (c_c D) + (s_i H_p(P_i))
    let R = match mode {
      Mode::Sign(..) => EdwardsPoint::multiscalar_mul([c_p, c_c, s[i]], [I, D, &hashed_key]),
      Mode::Verify(..) => images_precomp
        .as_ref()
        .expect("verifying yet no precomputation")
        .vartime_mixed_multiscalar_mul([c_p, c_c], [s[i]], [hashed_key]),
    };

    c = round_challenge(&L, &R);

    /*
      This captures the challenge which wraps around to index zero. It executes at most once,
      yet runs in constant time so branch prediction can't leak the signer's ring index.
    */
    c1.conditional_assign(&c, i.ct_eq(&(n - 1)));
  }

  ((D_inv_eight, c * mu_P, c * mu_C), c1)
}

/// A CLSAG signature, as used in the Monero protocol.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clsag {
  /// The commitment-difference auxiliary image, distributed multiplied by the inverse of eight.
  pub D: CompressedPoint,
  /// The responses for each ring member.
  pub s: Vec<Scalar>,
  /// The challenge for the first ring member.
  pub c1: Scalar,
}

struct ClsagSignCore {
  incomplete_clsag: Clsag,
  pseudo_out: EdwardsPoint,
  key_challenge: curve25519_dalek::Scalar,
  challenged_mask: curve25519_dalek::Scalar,
}

impl Clsag {
  // The core signing logic, leaving the true spend's response unfilled.
  fn sign_core<R: RngCore + CryptoRng>(
    rng: &mut R,
    I: &EdwardsPoint,
    context: &ClsagContext,
    mask: curve25519_dalek::Scalar,
    msg: &[u8; 32],
    A: EdwardsPoint,
    AH: EdwardsPoint,
  ) -> ClsagSignCore {
    let r: usize = context.decoys.signer_index().into();

    let pseudo_out =
      Commitment::new(Scalar::from(mask), context.commitment.amount).calculate().into();
    // The discrete log, over G, of the signer's commitment minus the pseudo-out
    let mask_delta = context.commitment.mask.into() - mask;

    let ring: Vec<[EdwardsPoint; 2]> =
      context.decoys.ring().iter().map(|member| [member[0].into(), member[1].into()]).collect();

    let H = Point::hash_to_point(ring[r][0].compress().to_bytes()).into();
    let D = H * mask_delta;
    let mut s = Vec::with_capacity(ring.len());
    for _ in 0 .. ring.len() {
      s.push(Scalar::random(rng).into());
    }
    let ((D, c_p, c_c), c1) = core(&ring, I, &pseudo_out, msg, &D, &s, &Mode::Sign(r, A, AH));

    ClsagSignCore {
      incomplete_clsag: Clsag {
        D: Point::from(D).compress(),
        s: s.into_iter().map(Scalar::from).collect(),
        c1: Scalar::from(c1),
      },
      pseudo_out,
      key_challenge: c_p,
      challenged_mask: c_c * mask_delta,
    }
  }

  /// Generate CLSAG signatures for the given inputs.
  ///
  /// `inputs` is a list of (one-time private key, context) pairs. `sum_outputs` is the sum of
  /// the outputs' commitment masks; the pseudo-out masks are balanced against it, the last
  /// pseudo-out closing the sum so input commitments minus output commitments (and the fee)
  /// cancel to the identity.
  ///
  /// Returns one (signature, pseudo-out commitment) pair per input.
  pub fn sign<R: RngCore + CryptoRng>(
    rng: &mut R,
    mut inputs: Vec<(Zeroizing<Scalar>, ClsagContext)>,
    sum_outputs: Scalar,
    msg: [u8; 32],
  ) -> Result<Vec<(Clsag, Point)>, ClsagError> {
    let sum_outputs: curve25519_dalek::Scalar = sum_outputs.into();

    // Validate the keys before signing anything
    for (key, context) in &inputs {
      let key: curve25519_dalek::Scalar = (**key).into();
      if (key * ED25519_BASEPOINT_POINT) != context.decoys.signer_ring_members()[0].into() {
        Err(ClsagError::InvalidKey)?;
      }
    }

    let mut res = Vec::with_capacity(inputs.len());
    let mut sum_pseudo_outs = curve25519_dalek::Scalar::ZERO;
    for i in 0 .. inputs.len() {
      let mask = if i == (inputs.len() - 1) {
        sum_outputs - sum_pseudo_outs
      } else {
        let mask = Scalar::random(rng).into();
        sum_pseudo_outs += mask;
        mask
      };

      let key: Zeroizing<curve25519_dalek::Scalar> = Zeroizing::new((*inputs[i].0).into());
      let signer_key: EdwardsPoint = inputs[i].1.decoys.signer_ring_members()[0].into();
      let I = key.deref() * Point::hash_to_point(signer_key.compress().to_bytes()).into();

      let mut nonce = Zeroizing::new(Scalar::random(rng).into());
      let ClsagSignCore { mut incomplete_clsag, pseudo_out, key_challenge, challenged_mask } =
        Clsag::sign_core(
          rng,
          &I,
          &inputs[i].1,
          mask,
          &msg,
          nonce.deref() * ED25519_BASEPOINT_POINT,
          nonce.deref() * Point::hash_to_point(signer_key.compress().to_bytes()).into(),
        );
      /*
        Effectively `nonce - c x`, except `c x` is `(c_p x) + (c_c z)`, where `z` is the delta
        between the signer's commitment and the pseudo-out (which only has a known discrete log
        over G as the amounts cancel).
      */
      incomplete_clsag.s[usize::from(inputs[i].1.decoys.signer_index())] =
        Scalar::from(nonce.deref() - ((key_challenge * key.deref()) + challenged_mask));
      let clsag = incomplete_clsag;

      inputs[i].0.zeroize();
      nonce.zeroize();

      res.push((clsag, Point::from(pseudo_out)));
    }

    Ok(res)
  }

  /// Verify a CLSAG signature.
  ///
  /// `msg` must be the signature hash of the transaction this is for, binding the signature to
  /// it. Misuse of this function, without understanding what the Fiat-Shamir transcript must
  /// contain, is dangerous.
  pub fn verify(
    &self,
    ring: &[[Point; 2]],
    key_image: &CompressedPoint,
    pseudo_out: &Point,
    msg: &[u8; 32],
  ) -> Result<(), ClsagError> {
    if ring.is_empty() {
      Err(ClsagError::InvalidRing)?;
    }
    if ring.len() != self.s.len() {
      Err(ClsagError::InvalidS)?;
    }

    let I = key_image
      .decompress()
      .and_then(Point::key_image)
      .ok_or(ClsagError::InvalidImage)?;

    // D is distributed multiplied by the inverse of eight, so multiplying by eight ensures it's
    // within the prime-order subgroup
    let D = self.D.decompress().ok_or(ClsagError::InvalidD)?.into().mul_by_cofactor();
    if D.is_identity() {
      Err(ClsagError::InvalidD)?;
    }

    let ring: Vec<[EdwardsPoint; 2]> =
      ring.iter().map(|member| [member[0].into(), member[1].into()]).collect();
    let s: Vec<curve25519_dalek::Scalar> = self.s.iter().map(|s| (*s).into()).collect();

    let (_, c1) =
      core(&ring, &I, &(*pseudo_out).into(), msg, &D, &s, &Mode::Verify(self.c1.into()));
    if c1 != self.c1.into() {
      Err(ClsagError::InvalidC1)?;
    }
    Ok(())
  }

  /// Write the `Clsag`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    write_items(Scalar::write, &self.s, w)?;
    self.c1.write(w)?;
    self.D.write(w)
  }

  /// Read a `Clsag` for a ring of the specified length.
  pub fn read<R: Read>(decoys: usize, r: &mut R) -> io::Result<Clsag> {
    Ok(Clsag {
      s: read_items(Scalar::read, decoys, r)?,
      c1: Scalar::read(r)?,
      D: CompressedPoint::read(r)?,
    })
  }
}
