//! Input selection: choosing which owned outputs fund a transaction.
//!
//! The fee grows with the amount of inputs, so selection iterates: each added input re-raises
//! the fee the selection must cover.

use std_shims::vec::Vec;

use monero_kit::ringct::bulletproofs::Bulletproof;

use crate::{RING_SIZE, FeeRate, storage::OwnedOutput, transaction::TransactionPrefix};

/// The maximum amount of inputs a transaction may spend.
pub const MAX_INPUTS: usize = TransactionPrefix::INPUTS_UPPER_BOUND.0;

/// The strategy used to pick inputs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SelectionStrategy {
  /// Spend the smallest outputs first, consolidating dust at the cost of a larger transaction.
  SmallestFirst,
  /// Spend the largest outputs first, minimizing the amount of inputs.
  LargestFirst,
  /// Repeatedly spend the output closest to the amount still needed.
  ClosestMatch,
  /// Spend every spendable output, sending the entire balance (minus the fee).
  SweepAll,
}

/// An error when selecting inputs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SelectionError {
  /// The wallet lacks the funds for this selection.
  #[error("insufficient funds (available {available}, required {required})")]
  InsufficientFunds {
    /// The spendable balance available.
    available: u64,
    /// The amount required, inclusive of the fee.
    required: u64,
  },
  /// There were no spendable outputs at all.
  #[error("no spendable outputs")]
  NoSpendableOutputs,
}

/// The result of input selection.
#[derive(Clone, Debug)]
pub struct Selection {
  /// The outputs to spend.
  pub inputs: Vec<OwnedOutput>,
  /// The sum of the inputs' amounts.
  pub total: u64,
  /// The fee this transaction must pay.
  pub fee: u64,
  /// The amount returned to the wallet as change.
  pub change: u64,
  /// The amount delivered to the destinations.
  pub send: u64,
}

/// Estimate the weight of a transaction with the specified shape.
///
/// This is the weight the built transaction is expected to have, used to project the fee while
/// selecting inputs (before the decoys, proofs, and exact encodings exist).
pub fn estimate_tx_weight(inputs: usize, outputs: usize, extra: usize) -> usize {
  let mut size = 0;
  // Version and unlock time
  size += 1 + 1;
  // Inputs: type, amount, offset count, the offsets, and the key image
  // The first offset is an absolute position (up to 10 bytes); later ones are small deltas
  size += 1 + (inputs * (1 + 1 + 1 + 10 + ((RING_SIZE - 1) * 3) + 32));
  // Outputs: amount, type, key, view tag
  size += 1 + (outputs * (1 + 1 + 32 + 1));
  // Extra, with its length prefix
  size += 2 + extra;
  // RingCT base: type, fee, the compact encrypted amount and commitment per output
  size += 1 + 10 + (outputs * (8 + 32));
  // The aggregated range proof, its length prefix, and its aggregation clawback
  let (clawback, bp_size) = Bulletproof::calculate_clawback(outputs);
  size += 2 + bp_size + clawback;
  // A CLSAG (s vector, c1, D) and pseudo-out commitment per input
  size += inputs * ((RING_SIZE * 32) + 32 + 32 + 32);
  size
}

struct UnlockContext {
  height: u64,
  time: u64,
  confirmations: u64,
}

fn spendable(
  outputs: &[OwnedOutput],
  unlock: &UnlockContext,
  account: Option<u32>,
) -> Vec<OwnedOutput> {
  outputs
    .iter()
    .filter(|output| {
      if let Some(account) = account {
        let output_account = output.output().subaddress().map_or(0, |index| index.account());
        if output_account != account {
          return false;
        }
      }
      output.unlocked(unlock.height, unlock.time, unlock.confirmations)
    })
    .cloned()
    .collect()
}

/// Select the inputs to fund a send of `target` atomic units to `n_destinations` destinations.
///
/// `outputs` is the candidate set (as returned by storage). `current_height`/`current_time`
/// evaluate the unlock rules, requiring `confirmations` confirmations. `account`, if set,
/// restricts spending to outputs received by that account.
///
/// For `SweepAll`, `target` is ignored and the entire spendable balance is sent.
#[allow(clippy::too_many_arguments)]
pub fn select_inputs(
  outputs: &[OwnedOutput],
  target: u64,
  n_destinations: usize,
  strategy: SelectionStrategy,
  fee_rate: FeeRate,
  current_height: u64,
  current_time: u64,
  confirmations: u64,
  account: Option<u32>,
  max_inputs: usize,
) -> Result<Selection, SelectionError> {
  let max_inputs = max_inputs.min(MAX_INPUTS);
  let unlock = UnlockContext { height: current_height, time: current_time, confirmations };
  let mut candidates = spendable(outputs, &unlock, account);
  if candidates.is_empty() {
    Err(SelectionError::NoSpendableOutputs)?;
  }

  let fee_for = |inputs: usize, outputs: usize| {
    fee_rate.calculate_fee_from_weight(estimate_tx_weight(inputs, outputs, 64))
  };

  if strategy == SelectionStrategy::SweepAll {
    // Largest-first caps the input count without reducing the swept balance meaningfully
    candidates.sort_by(|a, b| b.amount().cmp(&a.amount()));
    candidates.truncate(max_inputs);

    let total = candidates.iter().map(OwnedOutput::amount).sum::<u64>();
    // A sweep has no change output
    let fee = fee_for(candidates.len(), n_destinations);
    let send = total.checked_sub(fee).ok_or(SelectionError::InsufficientFunds {
      available: total,
      required: fee,
    })?;
    if send == 0 {
      Err(SelectionError::InsufficientFunds { available: total, required: fee + 1 })?;
    }
    return Ok(Selection { inputs: candidates, total, fee, change: 0, send });
  }

  // The transaction will have a change output beyond the destinations
  let n_outputs = n_destinations + 1;
  let available = candidates.iter().map(OwnedOutput::amount).sum::<u64>();

  match strategy {
    SelectionStrategy::SmallestFirst => candidates.sort_by(|a, b| a.amount().cmp(&b.amount())),
    SelectionStrategy::LargestFirst => candidates.sort_by(|a, b| b.amount().cmp(&a.amount())),
    // ClosestMatch picks per-iteration below
    SelectionStrategy::ClosestMatch | SelectionStrategy::SweepAll => {}
  }

  let mut inputs: Vec<OwnedOutput> = Vec::new();
  let mut total = 0u64;
  loop {
    // The fee is recomputed with each addition, as it grows with the input count
    let fee = fee_for(inputs.len(), n_outputs);
    if (!inputs.is_empty()) && (total >= target.saturating_add(fee)) {
      let change = total - target - fee;
      return Ok(Selection { inputs, total, fee, change, send: target });
    }

    if inputs.len() == max_inputs {
      break;
    }

    let next = match strategy {
      SelectionStrategy::ClosestMatch => {
        // The output closest to the remaining requirement, preferring overshoot over undershoot
        let required = target.saturating_add(fee_for(inputs.len() + 1, n_outputs)) -
          total.min(target);
        let mut best: Option<usize> = None;
        for (i, candidate) in candidates.iter().enumerate() {
          let distance = candidate.amount().abs_diff(required);
          let better = match best {
            None => true,
            Some(best) => {
              let best_distance = candidates[best].amount().abs_diff(required);
              (distance < best_distance) ||
                ((distance == best_distance) && (candidate.amount() > candidates[best].amount()))
            }
          };
          if better {
            best = Some(i);
          }
        }
        best
      }
      _ => if candidates.is_empty() { None } else { Some(0) },
    };

    let Some(next) = next else { break };
    let output = candidates.remove(next);
    total += output.amount();
    inputs.push(output);
  }

  let fee = fee_for(inputs.len().max(1), n_outputs);
  Err(SelectionError::InsufficientFunds {
    available,
    required: target.saturating_add(fee),
  })
}
