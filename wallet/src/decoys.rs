use std_shims::{io, vec::Vec, string::ToString, collections::HashSet};

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use rand_core::{RngCore, CryptoRng};
use rand_distr::{Distribution, Gamma};
#[cfg(not(feature = "std"))]
use rand_distr::num_traits::Float;

use crate::{
  DEFAULT_LOCK_WINDOW, COINBASE_LOCK_WINDOW, BLOCK_TIME, RING_SIZE,
  ed25519::{Scalar, CompressedPoint, Point, Commitment},
  ringct::clsag::Decoys,
  provider::{ProviderError, OutputProvider},
  WalletOutput,
};

// Ages under this many seconds re-sample uniformly over the recent window, as the gamma
// distribution's tail would otherwise underweight the freshest spendable outputs
const RECENT_WINDOW_BLOCKS: u64 = 15;
const BLOCKS_PER_YEAR: usize = (365 * 24 * 60 * 60) / BLOCK_TIME;
#[allow(clippy::cast_precision_loss)]
const TIP_AGE_SECONDS: f64 = (DEFAULT_LOCK_WINDOW * BLOCK_TIME) as f64;

// The wallet-standard decoy distribution: output ages gamma-distributed on a log scale
const GAMMA_SHAPE: f64 = 19.28;
const GAMMA_RATE: f64 = 1.61;

// The chain context decoy sampling runs against, derived from the cumulative
// outputs-per-block distribution the provider serves.
struct ChainShape {
  distribution: Vec<u64>,
  // Outputs at or above this index are too young to appear in rings
  spendable_bound: u64,
  outputs_per_second: f64,
}

impl ChainShape {
  async fn fetch(provider: &impl OutputProvider, height: u64) -> Result<ChainShape, ProviderError> {
    let height_usize =
      usize::try_from(height).map_err(|_| ProviderError::InternalError("height exceeded usize".to_string()))?;
    if height_usize < DEFAULT_LOCK_WINDOW {
      Err(ProviderError::InternalError("not enough blocks to select decoys".to_string()))?;
    }
    if height > provider.get_output_distribution_end_height().await? {
      Err(ProviderError::InternalError(
        "decoys being requested from blocks this node doesn't have".to_string(),
      ))?;
    }

    let distribution = provider.get_output_distribution(height).await?;
    if distribution.len() < DEFAULT_LOCK_WINDOW {
      Err(ProviderError::InternalError("not enough blocks to select decoys".to_string()))?;
    }
    let spendable_bound = distribution[distribution.len() - DEFAULT_LOCK_WINDOW];
    // Check the spendable set suffices for a ring even with coinbase outputs excluded (one
    // per block, each under its own longer lock)
    if spendable_bound.saturating_sub(
      u64::try_from(COINBASE_LOCK_WINDOW).expect("coinbase lock window exceeded u64"),
    ) < u64::try_from(RING_SIZE).expect("ring size exceeded u64")
    {
      Err(ProviderError::InternalError("not enough decoy candidates".to_string()))?;
    }

    // The output rate, measured over at most the last year
    #[allow(clippy::cast_precision_loss)]
    let outputs_per_second = {
      let blocks = distribution.len().min(BLOCKS_PER_YEAR);
      let before = distribution[distribution.len().saturating_sub(blocks + 1)];
      let created = distribution[distribution.len() - 1].saturating_sub(before);
      (created as f64) / ((blocks * BLOCK_TIME) as f64)
    };

    Ok(ChainShape { distribution, spendable_bound, outputs_per_second })
  }

  // Sample one candidate index under the gamma age distribution, or None if the draw fell
  // outside the spendable set.
  fn sample(&self, rng: &mut (impl RngCore + CryptoRng)) -> Result<Option<u64>, ProviderError> {
    let mut age_seconds = Gamma::<f64>::new(GAMMA_SHAPE, 1.0 / GAMMA_RATE)
      .expect("constant Gamma distribution couldn't be instantiated")
      .sample(rng)
      .exp();
    #[allow(clippy::cast_precision_loss)]
    if age_seconds > TIP_AGE_SECONDS {
      age_seconds -= TIP_AGE_SECONDS;
    } else {
      // f64 lacks try_from, hence the `as`
      age_seconds = (rng.next_u64() %
        (RECENT_WINDOW_BLOCKS * u64::try_from(BLOCK_TIME).expect("BLOCK_TIME exceeded u64")))
        as f64;
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let age_in_outputs = (age_seconds * self.outputs_per_second) as u64;
    if age_in_outputs >= self.spendable_bound {
      return Ok(None);
    }

    // Locate the block spanning this index, then pick uniformly within it
    let target = self.spendable_bound - 1 - age_in_outputs;
    let block = self.distribution.partition_point(|cumulative| *cumulative < target);
    let start = if block == 0 { 0 } else { self.distribution[block - 1] };
    let span = self.distribution[block].checked_sub(start).ok_or_else(|| {
      ProviderError::InvalidNode("provider returned a non-monotonic distribution".to_string())
    })?;
    if span == 0 {
      return Ok(None);
    }
    Ok(Some(start + (rng.next_u64() % span)))
  }
}

async fn gather_decoys(
  rng: &mut (impl RngCore + CryptoRng),
  provider: &impl OutputProvider,
  height: u64,
  spend: &WalletOutput,
) -> Result<Vec<(u64, [Point; 2])>, ProviderError> {
  let shape = ChainShape::fetch(provider, height).await?;
  let spend_index = spend.index_on_blockchain();

  // Never pick the real spend, and never retry an index (used or not, it's burnt)
  let mut tried = HashSet::new();
  tried.insert(spend_index);

  let wanted = RING_SIZE - 1;
  let mut decoys = Vec::with_capacity(wanted);

  let mut fetched_real = false;
  let mut rounds = 0;
  while decoys.len() < wanted {
    #[cfg(not(test))]
    const MAX_ROUNDS: usize = 10;
    // Fresh test chains have few candidates, making longer searches worthwhile there
    #[cfg(test)]
    const MAX_ROUNDS: usize = 1000;
    rounds += 1;
    let exhausted = (shape.spendable_bound -
      u64::try_from(tried.len()).expect("tried candidates exceeded u64")) <
      u64::try_from(RING_SIZE).expect("ring size exceeded u64");
    if (rounds > MAX_ROUNDS) || exhausted {
      Err(ProviderError::InternalError("hit decoy selection round limit".to_string()))?;
    }

    // Draw fresh candidates for the still-missing decoys
    let mut candidates = Vec::with_capacity(wanted - decoys.len());
    while candidates.len() < (wanted - decoys.len()) {
      if let Some(index) = shape.sample(rng)? {
        if tried.insert(index) {
          candidates.push(index);
        }
      }
    }

    /*
      The first fetch includes the real spend, sorted in, so the provider never observes a
      set of requests which is exactly a published ring minus one member (which would pinpoint
      the member it wasn't asked for as the spend).
    */
    let real_position = if fetched_real {
      None
    } else {
      fetched_real = true;
      candidates.push(spend_index);
      candidates.sort_unstable();
      Some(candidates.binary_search(&spend_index).expect("the real spend wasn't a candidate"))
    };

    let outputs = provider.get_unlocked_outputs(&candidates, height).await?;
    for (i, fetched) in outputs.into_iter().enumerate() {
      if real_position == Some(i) {
        // Sanity-check the provider's view of the output being spent
        let consistent = fetched == Some([spend.key(), spend.commitment().calculate()]);
        if !consistent {
          Err(ProviderError::InvalidNode(
            "node presented a different view of the output being spent".to_string(),
          ))?;
        }
        continue;
      }

      let Some(member) = fetched else { continue };
      // Torsioned members don't appear in honestly-built rings; including one would
      // fingerprint this transaction
      if !(member[0].into().is_torsion_free() && member[1].into().is_torsion_free()) {
        continue;
      }
      decoys.push((candidates[i], member));
    }
  }

  Ok(decoys)
}

/// An output together with the ring it will be spent within.
///
/// The `Debug` implementation may reveal every value within its memory.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct OutputWithDecoys {
  pub(crate) key: Point,
  pub(crate) key_offset: Scalar,
  pub(crate) commitment: Commitment,
  pub(crate) decoys: Decoys,
}

impl PartialEq for OutputWithDecoys {
  fn eq(&self, other: &Self) -> bool {
    bool::from(
      self.key.ct_eq(&other.key) &
        self.key_offset.ct_eq(&other.key_offset) &
        self.commitment.ct_eq(&other.commitment) &
        self.decoys.ct_eq(&other.decoys),
    )
  }
}
impl Eq for OutputWithDecoys {}

impl OutputWithDecoys {
  /// Select a ring for this output, yielding it ready to spend.
  ///
  /// The sampling methodology SHOULD prevent a passive adversary controlling the provider from
  /// identifying the output being spent. An active adversary serving a malicious view of the
  /// blockchain may still manage to; only connect to trusted providers.
  ///
  /// The RNG is injected: cryptographically secure in production, seedable for deterministic
  /// replay in tests.
  pub async fn new(
    rng: &mut (impl Send + Sync + RngCore + CryptoRng),
    provider: &impl OutputProvider,
    height: u64,
    output: WalletOutput,
  ) -> Result<OutputWithDecoys, ProviderError> {
    let decoys = gather_decoys(rng, provider, height, &output).await?;

    // The ring is the decoys plus the spend, ascending by index
    let mut ring = decoys;
    ring.push((output.index_on_blockchain(), [output.key(), output.commitment().calculate()]));
    ring.sort_unstable_by_key(|member| member.0);
    let signer_index = ring
      .binary_search_by_key(&output.index_on_blockchain(), |member| member.0)
      .expect("the real spend wasn't within its own ring");

    // Offset-encode the members' positions
    let mut offsets = Vec::with_capacity(ring.len());
    let mut previous = 0;
    for (position, _) in &ring {
      offsets.push(position - previous);
      previous = *position;
    }

    let decoys = Decoys::new(
      offsets,
      u8::try_from(signer_index).expect("ring size exceeded u8"),
      ring.into_iter().map(|member| member.1).collect(),
    )
    .expect("selected a structurally-invalid ring");

    Ok(OutputWithDecoys {
      key: output.key(),
      key_offset: output.key_offset(),
      commitment: output.commitment().clone(),
      decoys,
    })
  }

  /// The key this output may be spent by.
  pub fn key(&self) -> Point {
    self.key
  }

  /// The scalar to add to the wallet's private spend key for it to be the discrete logarithm
  /// of this output's key.
  pub fn key_offset(&self) -> Scalar {
    self.key_offset
  }

  /// The opening of this output's commitment.
  pub fn commitment(&self) -> &Commitment {
    &self.commitment
  }

  /// The selected ring.
  pub fn decoys(&self) -> &Decoys {
    &self.decoys
  }

  /// Write the `OutputWithDecoys`.
  ///
  /// This layout is solely this library's, not a Monero protocol serialization, and may run in
  /// time variable to its value.
  pub fn write<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.key.compress().to_bytes())?;
    self.key_offset.write(w)?;
    self.commitment.write(w)?;
    self.decoys.write(w)
  }

  /// Serialize the `OutputWithDecoys` to a `Vec<u8>`.
  pub fn serialize(&self) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + (64 * self.decoys.len()));
    self.write(&mut buf).expect("writing to a Vec cannot fail");
    buf
  }

  /// Read an `OutputWithDecoys`.
  pub fn read<R: io::Read>(r: &mut R) -> io::Result<Self> {
    Ok(Self {
      key: CompressedPoint::read(r)?
        .decompress()
        .ok_or_else(|| io::Error::other("serialized input had an invalid key"))?,
      key_offset: Scalar::read(r)?,
      commitment: Commitment::read(r)?,
      decoys: Decoys::read(r)?,
    })
  }
}
