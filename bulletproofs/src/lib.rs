#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

use std_shims::{
  vec,
  vec::Vec,
  io::{self, Read, Write},
};

use rand_core::{RngCore, CryptoRng};
use zeroize::{Zeroize, Zeroizing};

use curve25519_dalek::{
  constants::ED25519_BASEPOINT_POINT,
  traits::{IsIdentity, MultiscalarMul, VartimeMultiscalarMul},
  EdwardsPoint,
};

use monero_kit_io::*;
use monero_kit_ed25519::{Scalar, CompressedPoint, Point, Commitment};

mod generators;
use generators::{MAX_MN, GENERATORS};


/// The amount of bits a committed amount spans.
pub const COMMITMENT_BITS: usize = 64;
/// The maximum amount of commitments provable for within a single proof.
pub const MAX_COMMITMENTS: usize = 16;

type DScalar = curve25519_dalek::Scalar;

fn H() -> EdwardsPoint {
  CompressedPoint::H
    .decompress()
    .expect("couldn't decompress `CompressedPoint::H`")
    .into()
}

/// Errors when proving.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum BulletproofError {
  /// No commitments were provided.
  #[error("no commitments")]
  NoCommitments,
  /// More commitments were provided than one proof can cover.
  #[error("too many commitments")]
  TooManyCommitments,
}

// The Fiat-Shamir transcript. Each challenge hashes the running state with the new elements.
struct Transcript(DScalar);

impl Transcript {
  fn new() -> Transcript {
    Transcript(Scalar::hash(b"bulletproof_plus_transcript").into())
  }

  fn mash(&mut self, items: &[[u8; 32]]) -> DScalar {
    let mut buf = Vec::with_capacity(32 * (1 + items.len()));
    buf.extend(self.0.to_bytes());
    for item in items {
      buf.extend(item);
    }
    self.0 = Scalar::hash(&buf).into();
    self.0
  }
}

// y^1 ..= y^n
fn powers(y: DScalar, n: usize) -> Vec<DScalar> {
  let mut res = Vec::with_capacity(n);
  res.push(y);
  for i in 1 .. n {
    res.push(res[i - 1] * y);
  }
  res
}

// The weighted inner product: sum a_i y^{i+1} b_i.
fn weighted_inner_product(a: &[DScalar], b: &[DScalar], y_pows: &[DScalar]) -> DScalar {
  debug_assert_eq!(a.len(), b.len());
  let mut res = DScalar::ZERO;
  for i in 0 .. a.len() {
    res += a[i] * y_pows[i] * b[i];
  }
  res
}

// The state shared by all proofs within one batched verification.
struct BatchVerifier {
  g: DScalar,
  h: DScalar,
  g_bold: Vec<DScalar>,
  h_bold: Vec<DScalar>,
  other: Vec<(DScalar, EdwardsPoint)>,
}

impl BatchVerifier {
  fn new() -> BatchVerifier {
    BatchVerifier {
      g: DScalar::ZERO,
      h: DScalar::ZERO,
      g_bold: vec![DScalar::ZERO; MAX_MN],
      h_bold: vec![DScalar::ZERO; MAX_MN],
      other: vec![],
    }
  }

  fn check(self) -> bool {
    let mut scalars = Vec::with_capacity(2 + (2 * MAX_MN) + self.other.len());
    let mut points = Vec::with_capacity(2 + (2 * MAX_MN) + self.other.len());

    scalars.push(self.g);
    points.push(ED25519_BASEPOINT_POINT);
    scalars.push(self.h);
    points.push(H());
    for (scalar, point) in self.g_bold.into_iter().zip(GENERATORS.G.iter()) {
      scalars.push(scalar);
      points.push(*point);
    }
    for (scalar, point) in self.h_bold.into_iter().zip(GENERATORS.H.iter()) {
      scalars.push(scalar);
      points.push(*point);
    }
    for (scalar, point) in self.other {
      scalars.push(scalar);
      points.push(point);
    }

    EdwardsPoint::vartime_multiscalar_mul(scalars, points).is_identity()
  }
}

/// A Bulletproof+, proving each of a set of Pedersen commitments commits to an amount within
/// `[0, 2^64)`.
///
/// All proof elements, including the `L`/`R` folding commitments, are distributed multiplied by
/// the inverse of eight, letting the verifier clear any cofactor by multiplying back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Bulletproof {
  A: CompressedPoint,
  A1: CompressedPoint,
  B: CompressedPoint,
  r1: Scalar,
  s1: Scalar,
  d1: Scalar,
  L: Vec<CompressedPoint>,
  R: Vec<CompressedPoint>,
}

impl Bulletproof {
  /// The size penalty ('clawback') applied to the weight of transactions using an aggregated
  /// range proof, and the serialized size of such a proof.
  ///
  /// Aggregation makes proofs smaller than distinct proofs would be, yet costlier to verify
  /// than their size suggests. The clawback charges the difference back, scaled by 4/5.
  pub fn calculate_clawback(n_outputs: usize) -> (usize, usize) {
    let padded = n_outputs.next_power_of_two();

    // The size of a non-aggregated proof, per two outputs
    let base = (32 * (6 + (7 * 2))) / 2;
    let mut log_mn = 6;
    while (1 << (log_mn - 6)) < padded {
      log_mn += 1;
    }
    let size = 32 * (6 + (2 * log_mn));

    let clawback = if padded <= 2 { 0 } else { ((base * padded) - size) * 4 / 5 };
    (clawback, size)
  }

  /// Prove the amounts within the provided commitments are all within `[0, 2^64)`.
  pub fn prove<R: RngCore + CryptoRng>(
    rng: &mut R,
    outputs: Vec<Commitment>,
  ) -> Result<Bulletproof, BulletproofError> {
    if outputs.is_empty() {
      Err(BulletproofError::NoCommitments)?;
    }
    if outputs.len() > MAX_COMMITMENTS {
      Err(BulletproofError::TooManyCommitments)?;
    }

    let inv_eight: DScalar = Scalar::inv_eight().into();

    let M = outputs.len().next_power_of_two();
    let MN = M * COMMITMENT_BITS;
    let logMN = MN.ilog2();

    // The witness, padded to the power of two with zero openings
    let mut sv = Zeroizing::new(vec![0u64; M]);
    let mut gamma = Zeroizing::new(vec![DScalar::ZERO; M]);
    for (i, output) in outputs.iter().enumerate() {
      sv[i] = output.amount;
      gamma[i] = output.mask.into();
    }

    let V_wire: Vec<[u8; 32]> = outputs
      .iter()
      .map(|output| (output.calculate().into() * inv_eight).compress().to_bytes())
      .collect();

    // Decompose the amounts into their bits
    let mut aL = Zeroizing::new(vec![DScalar::ZERO; MN]);
    for j in 0 .. M {
      for i in 0 .. COMMITMENT_BITS {
        if ((sv[j] >> i) & 1) == 1 {
          aL[(j * COMMITMENT_BITS) + i] = DScalar::ONE;
        }
      }
    }
    let aR = Zeroizing::new(aL.iter().map(|aL| aL - DScalar::ONE).collect::<Vec<_>>());

    let alpha = Zeroizing::new(DScalar::random(rng));
    let A_wire = {
      let mut scalars = Vec::with_capacity((2 * MN) + 1);
      let mut points = Vec::with_capacity((2 * MN) + 1);
      scalars.extend(aL.iter().copied());
      points.extend(&GENERATORS.G[.. MN]);
      scalars.extend(aR.iter().copied());
      points.extend(&GENERATORS.H[.. MN]);
      scalars.push(*alpha);
      points.push(ED25519_BASEPOINT_POINT);
      (EdwardsPoint::multiscalar_mul(scalars, points) * inv_eight).compress()
    };

    // Transcript the commitments and A for the challenges
    let mut transcript = Transcript::new();
    transcript.mash(&V_wire);
    let y = transcript.mash(&[A_wire.to_bytes()]);
    let z: DScalar = Scalar::hash(y.to_bytes()).into();

    let y_pows = powers(y, MN + 1);
    let y_inv = y.invert();

    // d_{(j * 64) + i} = z^{2 (j + 1)} 2^i, powers() over z^2 yielding the z powers required
    let z_pows = powers(z * z, M);
    let two_pows = powers(DScalar::from(2u8), COMMITMENT_BITS);
    let mut d = vec![DScalar::ZERO; MN];
    for j in 0 .. M {
      d[j * COMMITMENT_BITS] = z_pows[j];
      for i in 1 .. COMMITMENT_BITS {
        d[(j * COMMITMENT_BITS) + i] = z_pows[j] * two_pows[i - 1];
      }
    }

    // a-hat, b-hat, and the blinding the weighted-inner-product argument opens
    let mut a = Zeroizing::new(aL.iter().map(|aL| aL - z).collect::<Vec<_>>());
    let mut b = Zeroizing::new(
      (0 .. MN).map(|i| aR[i] + z + (d[i] * y_pows[MN - i - 1])).collect::<Vec<_>>(),
    );
    let mut alpha1 = Zeroizing::new(*alpha);
    for j in 0 .. M {
      *alpha1 += z_pows[j] * gamma[j] * y_pows[MN];
    }
    sv.zeroize();
    gamma.zeroize();

    let mut G_bold = GENERATORS.G[.. MN].to_vec();
    let mut H_bold = GENERATORS.H[.. MN].to_vec();

    let mut L_vec = Vec::with_capacity(usize::try_from(logMN).expect("u32 exceeded usize"));
    let mut R_vec = Vec::with_capacity(usize::try_from(logMN).expect("u32 exceeded usize"));

    let mut nprime = MN;
    while nprime > 1 {
      nprime /= 2;

      let (aL_half, aR_half) = a.split_at(nprime);
      let (bL_half, bR_half) = b.split_at(nprime);
      let (G_L, G_R) = G_bold.split_at(nprime);
      let (H_L, H_R) = H_bold.split_at(nprime);

      let y_nprime = y_pows[nprime - 1];
      let y_inv_nprime = {
        let mut res = DScalar::ONE;
        // logMN iterations at most, so squaring is unnecessary
        for _ in 0 .. nprime {
          res *= y_inv;
        }
        res
      };

      let cL = weighted_inner_product(aL_half, bR_half, &y_pows);
      let cR = {
        let scaled: Vec<DScalar> = aR_half.iter().map(|a| a * y_nprime).collect();
        weighted_inner_product(&scaled, bL_half, &y_pows)
      };

      let dL = Zeroizing::new(DScalar::random(rng));
      let dR = Zeroizing::new(DScalar::random(rng));

      let L = {
        let mut scalars = Vec::with_capacity((2 * nprime) + 2);
        let mut points = Vec::with_capacity((2 * nprime) + 2);
        for i in 0 .. nprime {
          scalars.push(aL_half[i] * y_inv_nprime);
          points.push(G_R[i]);
          scalars.push(bR_half[i]);
          points.push(H_L[i]);
        }
        scalars.push(cL);
        points.push(H());
        scalars.push(*dL);
        points.push(ED25519_BASEPOINT_POINT);
        (EdwardsPoint::multiscalar_mul(scalars, points) * inv_eight).compress()
      };
      let R = {
        let mut scalars = Vec::with_capacity((2 * nprime) + 2);
        let mut points = Vec::with_capacity((2 * nprime) + 2);
        for i in 0 .. nprime {
          scalars.push(aR_half[i] * y_nprime);
          points.push(G_L[i]);
          scalars.push(bL_half[i]);
          points.push(H_R[i]);
        }
        scalars.push(cR);
        points.push(H());
        scalars.push(*dR);
        points.push(ED25519_BASEPOINT_POINT);
        (EdwardsPoint::multiscalar_mul(scalars, points) * inv_eight).compress()
      };

      let e = transcript.mash(&[L.to_bytes(), R.to_bytes()]);
      let e_inv = e.invert();
      let e_square = e * e;
      let e_inv_square = e_inv * e_inv;

      L_vec.push(CompressedPoint::from(L.to_bytes()));
      R_vec.push(CompressedPoint::from(R.to_bytes()));

      let mut new_G = Vec::with_capacity(nprime);
      let mut new_H = Vec::with_capacity(nprime);
      let mut new_a = Vec::with_capacity(nprime);
      let mut new_b = Vec::with_capacity(nprime);
      for i in 0 .. nprime {
        new_G.push(EdwardsPoint::multiscalar_mul(
          [e_inv, e * y_inv_nprime],
          [G_L[i], G_R[i]],
        ));
        new_H.push(EdwardsPoint::multiscalar_mul([e, e_inv], [H_L[i], H_R[i]]));
        new_a.push((aL_half[i] * e) + (aR_half[i] * y_nprime * e_inv));
        new_b.push((bL_half[i] * e_inv) + (bR_half[i] * e));
      }
      G_bold = new_G;
      H_bold = new_H;
      *a = new_a;
      *b = new_b;

      *alpha1 += (e_square * *dL) + (e_inv_square * *dR);
    }

    // The final round, blinding the last row
    let r = Zeroizing::new(DScalar::random(rng));
    let s = Zeroizing::new(DScalar::random(rng));
    let d_blind = Zeroizing::new(DScalar::random(rng));
    let eta = Zeroizing::new(DScalar::random(rng));

    let A1_wire = {
      let scalars =
        [*r, *s, (*r * y * b[0]) + (*s * y * a[0]), *d_blind];
      let points = [G_bold[0], H_bold[0], H(), ED25519_BASEPOINT_POINT];
      (EdwardsPoint::multiscalar_mul(scalars, points) * inv_eight).compress()
    };
    let B_wire = {
      (EdwardsPoint::multiscalar_mul(
        [*r * y * *s, *eta],
        [H(), ED25519_BASEPOINT_POINT],
      ) * inv_eight)
        .compress()
    };

    let e = transcript.mash(&[A1_wire.to_bytes(), B_wire.to_bytes()]);

    let r1 = *r + (e * a[0]);
    let s1 = *s + (e * b[0]);
    let d1 = *eta + (e * *d_blind) + (e * e * *alpha1);

    Ok(Bulletproof {
      A: CompressedPoint::from(A_wire.to_bytes()),
      A1: CompressedPoint::from(A1_wire.to_bytes()),
      B: CompressedPoint::from(B_wire.to_bytes()),
      r1: Scalar::from(r1),
      s1: Scalar::from(s1),
      d1: Scalar::from(d1),
      L: L_vec,
      R: R_vec,
    })
  }

  // Queue this proof's verification equation into the batch, multiplied by a random weight.
  //
  // Returns false if the proof is structurally invalid for the commitments.
  fn queue<R: RngCore + CryptoRng>(
    &self,
    rng: &mut R,
    verifier: &mut BatchVerifier,
    commitments: &[Point],
  ) -> bool {
    if commitments.is_empty() || (commitments.len() > MAX_COMMITMENTS) {
      return false;
    }

    let M = commitments.len().next_power_of_two();
    let MN = M * COMMITMENT_BITS;
    let rounds = usize::try_from(MN.ilog2()).expect("u32 exceeded usize");
    if (self.L.len() != rounds) || (self.R.len() != rounds) {
      return false;
    }

    let Some(A) = self.A.decompress() else { return false };
    let Some(A1) = self.A1.decompress() else { return false };
    let Some(B) = self.B.decompress() else { return false };
    let mut L = Vec::with_capacity(rounds);
    let mut R = Vec::with_capacity(rounds);
    for (L_i, R_i) in self.L.iter().zip(&self.R) {
      let (Some(L_i), Some(R_i)) = (L_i.decompress(), R_i.decompress()) else { return false };
      L.push(L_i);
      R.push(R_i);
    }

    // Replay the transcript
    let mut transcript = Transcript::new();
    let inv_eight: DScalar = Scalar::inv_eight().into();
    transcript.mash(
      &commitments
        .iter()
        .map(|commitment| ((*commitment).into() * inv_eight).compress().to_bytes())
        .collect::<Vec<_>>(),
    );
    let y = transcript.mash(&[self.A.to_bytes()]);
    let z: DScalar = Scalar::hash(y.to_bytes()).into();

    let mut challenges = Vec::with_capacity(rounds);
    for (L_i, R_i) in self.L.iter().zip(&self.R) {
      challenges.push(transcript.mash(&[L_i.to_bytes(), R_i.to_bytes()]));
    }
    let e = transcript.mash(&[self.A1.to_bytes(), self.B.to_bytes()]);

    let y_pows = powers(y, MN + 1);
    let y_inv = y.invert();
    let y_inv_pows = powers(y_inv, MN);
    let z_pows = powers(z * z, M);
    let two_pows = powers(DScalar::from(2u8), COMMITMENT_BITS);

    // The per-index products of the rounds' challenges, the first round contributing the
    // most-significant bit
    let mut challenge_products = vec![DScalar::ONE];
    for challenge in &challenges {
      let challenge_inv = challenge.invert();
      let mut expanded = Vec::with_capacity(challenge_products.len() * 2);
      for product in &challenge_products {
        expanded.push(product * challenge_inv);
        expanded.push(product * challenge);
      }
      challenge_products = expanded;
    }
    debug_assert_eq!(challenge_products.len(), MN);

    let r1: DScalar = self.r1.into();
    let s1: DScalar = self.s1.into();
    let d1: DScalar = self.d1.into();
    let e_square = e * e;

    // Every scalar in this proof's equation is multiplied by a uniform weight, so a forger must
    // satisfy this proof's equation itself, not merely the batch's sum
    let weight = DScalar::random(rng);

    // d_{(j * 64) + i} = z^{2 (j + 1)} 2^i, as within the prover
    let d = |i: usize| {
      let bit = i % COMMITMENT_BITS;
      let z_pow = z_pows[i / COMMITMENT_BITS];
      if bit == 0 {
        z_pow
      } else {
        z_pow * two_pows[bit - 1]
      }
    };
    // sum_i 2^i over a commitment's bits is 2^64 - 1
    let mut d_sum = DScalar::ZERO;
    for z_pow in &z_pows {
      d_sum += z_pow * (two_pows[COMMITMENT_BITS - 1] - DScalar::ONE);
    }

    for i in 0 .. MN {
      // G_i: e r1 y^-i (product of challenges) + e^2 z
      let mut g_scalar = e * r1 * challenge_products[i];
      if i > 0 {
        g_scalar *= y_inv_pows[i - 1];
      }
      g_scalar += e_square * z;
      verifier.g_bold[i] += weight * g_scalar;

      // H_i: e s1 (bit-flipped product of challenges) - e^2 (z + d_i y^{MN - i})
      let h_scalar = (e * s1 * challenge_products[MN - 1 - i]) -
        (e_square * (z + (d(i) * y_pows[MN - i - 1])));
      verifier.h_bold[i] += weight * h_scalar;
    }

    // H: y r1 s1 - e^2 ((z - z^2) sum(y^i) - z y^{MN+1} sum(d))
    {
      let mut y_sum = DScalar::ZERO;
      for y_pow in &y_pows[.. MN] {
        y_sum += y_pow;
      }
      let x_h = ((z - (z * z)) * y_sum) - (z * y_pows[MN] * d_sum);
      verifier.h += weight * ((y * r1 * s1) - (e_square * x_h));
    }

    // G: d1
    verifier.g += weight * d1;

    // The wire elements are multiplied by eight to clear any cofactor
    verifier.other.push((weight * -e_square, A.into().mul_by_cofactor()));
    verifier.other.push((weight * -e, A1.into().mul_by_cofactor()));
    verifier.other.push((-weight, B.into().mul_by_cofactor()));
    for (k, challenge) in challenges.iter().enumerate() {
      let challenge_inv = challenge.invert();
      verifier
        .other
        .push((weight * -(e_square * challenge * challenge), L[k].into().mul_by_cofactor()));
      verifier.other.push((
        weight * -(e_square * challenge_inv * challenge_inv),
        R[k].into().mul_by_cofactor(),
      ));
    }
    for (j, commitment) in commitments.iter().enumerate() {
      verifier
        .other
        .push((weight * -(e_square * y_pows[MN] * z_pows[j]), (*commitment).into()));
    }

    true
  }

  /// Verify this proof against the commitments it's for.
  ///
  /// The commitments are the actual commitments, not multiplied by the inverse of eight.
  pub fn verify<R: RngCore + CryptoRng>(&self, rng: &mut R, commitments: &[Point]) -> bool {
    let mut verifier = BatchVerifier::new();
    if !self.queue(rng, &mut verifier, commitments) {
      return false;
    }
    verifier.check()
  }

  /// Verify a batch of proofs, amortizing the multiscalar multiplication across the batch.
  ///
  /// This accepts if and only if every proof within the batch verifies.
  pub fn verify_batch<R: RngCore + CryptoRng>(
    rng: &mut R,
    proofs: &[(Bulletproof, Vec<Point>)],
  ) -> bool {
    let mut verifier = BatchVerifier::new();
    for (proof, commitments) in proofs {
      if !proof.queue(rng, &mut verifier, commitments) {
        return false;
      }
    }
    verifier.check()
  }

  /// Write the `Bulletproof`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    self.A.write(w)?;
    self.A1.write(w)?;
    self.B.write(w)?;
    self.r1.write(w)?;
    self.s1.write(w)?;
    self.d1.write(w)?;
    write_list(CompressedPoint::write, &self.L, w)?;
    write_list(CompressedPoint::write, &self.R, w)
  }

  /// Serialize the `Bulletproof` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut serialized = Vec::with_capacity(((6 + (2 * self.L.len())) * 32) + 2);
    self.write(&mut serialized).expect("writing to a Vec cannot fail");
    serialized
  }

  /// Read a `Bulletproof`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<Bulletproof> {
    // MAX_MN rows pad to at most 10 folding rounds
    let max_rounds = usize::try_from(MAX_MN.ilog2()).expect("u32 exceeded usize");
    let res = Bulletproof {
      A: CompressedPoint::read(r)?,
      A1: CompressedPoint::read(r)?,
      B: CompressedPoint::read(r)?,
      r1: Scalar::read(r)?,
      s1: Scalar::read(r)?,
      d1: Scalar::read(r)?,
      L: read_list(CompressedPoint::read, max_rounds, r)?,
      R: read_list(CompressedPoint::read, max_rounds, r)?,
    };
    if res.L.len() != res.R.len() {
      Err(io::Error::other("mismatched L/R lengths"))?;
    }
    if res.L.len() < usize::try_from(COMMITMENT_BITS.ilog2()).expect("u32 exceeded usize") {
      Err(io::Error::other("too few folding rounds"))?;
    }
    Ok(res)
  }
}
