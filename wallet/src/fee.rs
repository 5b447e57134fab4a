//! The fee model: a rate in atomic units per byte of transaction weight, quantized, with
//! priority tiers multiplying the rate.

use std_shims::io::{self, Read, Write};

use zeroize::Zeroize;

use monero_kit::io::*;

use crate::provider::FeeEstimate;

/// The priority of a transaction, each tier multiplying the daemon's base rate.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub enum FeePriority {
  /// The default priority.
  Default,
  /// Medium priority, 4x the base rate.
  Medium,
  /// High priority, 20x the base rate.
  High,
  /// Highest priority, 166x the base rate.
  Highest,
}

impl FeePriority {
  /// The multiplier this priority applies to the base rate.
  pub fn multiplier(&self) -> u64 {
    match self {
      FeePriority::Default => 1,
      FeePriority::Medium => 4,
      FeePriority::High => 20,
      FeePriority::Highest => 166,
    }
  }
}

/// A fee rate: atomic units per byte of weight, with the mask fees are quantized by.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Zeroize)]
pub struct FeeRate {
  per_weight: u64,
  mask: u64,
}

impl FeeRate {
  /// Construct a new fee rate.
  pub fn new(per_weight: u64, mask: u64) -> Option<FeeRate> {
    if (per_weight == 0) || (mask == 0) {
      None?;
    }
    Some(FeeRate { per_weight, mask })
  }

  /// Construct a fee rate from the daemon's estimate, scaled by the specified priority.
  pub fn from_estimate(estimate: FeeEstimate, priority: FeePriority) -> Option<FeeRate> {
    FeeRate::new(
      estimate.fee_per_byte.checked_mul(priority.multiplier())?,
      estimate.quantization_mask.max(1),
    )
  }

  /// Calculate the fee for a transaction of the specified weight.
  ///
  /// The fee is `weight * rate`, rounded up to a multiple of the quantization mask.
  pub fn calculate_fee_from_weight(&self, weight: usize) -> u64 {
    let fee = self.per_weight * u64::try_from(weight).expect("weight exceeded u64::MAX");
    fee.div_ceil(self.mask) * self.mask
  }

  /// Write the `FeeRate`.
  pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
    w.write_all(&self.per_weight.to_le_bytes())?;
    w.write_all(&self.mask.to_le_bytes())
  }

  /// Read a `FeeRate`.
  pub fn read<R: Read>(r: &mut R) -> io::Result<FeeRate> {
    let per_weight = read_u64(r)?;
    let mask = read_u64(r)?;
    FeeRate::new(per_weight, mask).ok_or_else(|| io::Error::other("invalid fee rate"))
  }
}
