use rand_core::OsRng;

use monero_kit_wallet::{
  storage::OwnedOutput,
  select::{SelectionStrategy, SelectionError, select_inputs},
};

mod runner;

const HEIGHT: u64 = 10_000;
const TIME: u64 = 1_700_000_000;
const CONFIRMATIONS: u64 = 10;

fn owned(amounts: &[u64]) -> (monero_kit_wallet::KeyPair, Vec<OwnedOutput>) {
  let keys = runner::wallet(&mut OsRng);
  let outputs = runner::scanned_outputs(&keys, amounts, 500);
  let owned = outputs
    .into_iter()
    .map(|output| OwnedOutput::new(&keys, output, HEIGHT - 100).unwrap())
    .collect();
  (keys, owned)
}

#[test]
fn sweep_all() {
  let (_, outputs) = owned(&[2_000_000_000, 3_000_000_000, 1_500_000_000]);

  let selection = select_inputs(
    &outputs,
    0,
    1,
    SelectionStrategy::SweepAll,
    runner::fee_rate(),
    HEIGHT,
    TIME,
    CONFIRMATIONS,
    None,
    128,
  )
  .unwrap();

  assert_eq!(selection.inputs.len(), 3);
  assert_eq!(selection.total, 6_500_000_000);
  assert!(selection.fee > 0);
  assert_eq!(selection.change, 0);
  assert_eq!(selection.send, selection.total - selection.fee);
  assert_eq!(selection.total, selection.send + selection.fee + selection.change);
}

#[test]
fn strategies() {
  let (_, outputs) = owned(&[2_000_000_000, 3_000_000_000, 1_500_000_000]);

  // Largest-first satisfies this target with a single input
  let selection = select_inputs(
    &outputs,
    2_000_000_000,
    1,
    SelectionStrategy::LargestFirst,
    runner::fee_rate(),
    HEIGHT,
    TIME,
    CONFIRMATIONS,
    None,
    128,
  )
  .unwrap();
  assert_eq!(selection.inputs.len(), 1);
  assert_eq!(selection.inputs[0].amount(), 3_000_000_000);
  assert_eq!(selection.send, 2_000_000_000);
  assert_eq!(selection.total, selection.send + selection.fee + selection.change);

  // Smallest-first consolidates the small outputs
  let selection = select_inputs(
    &outputs,
    2_000_000_000,
    1,
    SelectionStrategy::SmallestFirst,
    runner::fee_rate(),
    HEIGHT,
    TIME,
    CONFIRMATIONS,
    None,
    128,
  )
  .unwrap();
  assert_eq!(selection.inputs.len(), 2);
  assert_eq!(selection.inputs[0].amount(), 1_500_000_000);
  assert_eq!(selection.total, selection.send + selection.fee + selection.change);

  // Closest-match picks the output nearest the requirement
  let selection = select_inputs(
    &outputs,
    1_400_000_000,
    1,
    SelectionStrategy::ClosestMatch,
    runner::fee_rate(),
    HEIGHT,
    TIME,
    CONFIRMATIONS,
    None,
    128,
  )
  .unwrap();
  assert_eq!(selection.inputs.len(), 1);
  assert_eq!(selection.inputs[0].amount(), 1_500_000_000);
}

#[test]
fn unlock_rules() {
  let (_, mut outputs) = owned(&[1_000_000_000]);

  // Not enough confirmations
  assert_eq!(
    select_inputs(
      &outputs,
      1_000,
      1,
      SelectionStrategy::LargestFirst,
      runner::fee_rate(),
      // The outputs confirmed at HEIGHT - 100; 10 confirmations aren't met at HEIGHT - 95
      HEIGHT - 95,
      TIME,
      CONFIRMATIONS,
      None,
      128,
    )
    .map(|_| ()),
    Err(SelectionError::NoSpendableOutputs),
  );

  // Frozen outputs are excluded
  outputs[0].set_frozen(true);
  assert_eq!(
    select_inputs(
      &outputs,
      1_000,
      1,
      SelectionStrategy::LargestFirst,
      runner::fee_rate(),
      HEIGHT,
      TIME,
      CONFIRMATIONS,
      None,
      128,
    )
    .map(|_| ()),
    Err(SelectionError::NoSpendableOutputs),
  );
}

#[test]
fn insufficient_funds() {
  let (_, outputs) = owned(&[1_000_000, 2_000_000]);

  let res = select_inputs(
    &outputs,
    10_000_000_000,
    1,
    SelectionStrategy::SmallestFirst,
    runner::fee_rate(),
    HEIGHT,
    TIME,
    CONFIRMATIONS,
    None,
    128,
  );
  assert!(matches!(res, Err(SelectionError::InsufficientFunds { available: 3_000_000, .. })));
}
