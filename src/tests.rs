use crate::transaction::*;
use monero_kit_ed25519::CompressedPoint;

#[test]
fn miner_transaction_round_trip() {
  let tx = Transaction {
    prefix: TransactionPrefix {
      additional_timelock: Timelock::Block(1_000_060),
      inputs: vec![Input::Gen(1_000_000)],
      outputs: vec![Output { amount: Some(600_000_000_000), key: CompressedPoint::G, view_tag: None }],
      extra: vec![1, 2, 3],
    },
    proofs: None,
  };

  let blob = tx.serialize();
  let read = Transaction::read(&mut blob.as_slice()).unwrap();
  assert_eq!(read, tx);
  // Byte-for-byte idempotence
  assert_eq!(read.serialize(), blob);
  // A miner transaction's weight is its size
  assert_eq!(tx.weight(), blob.len());
  assert!(tx.signature_hash().is_none());
}

#[test]
fn input_output_round_trips() {
  let input = Input::ToKey {
    amount: None,
    key_offsets: vec![500, 1, 7, 130, 16000],
    key_image: CompressedPoint::H,
  };
  assert_eq!(Input::read(&mut input.serialize().as_slice()).unwrap(), input);

  for view_tag in [None, Some(0x2a)] {
    let output = Output { amount: None, key: CompressedPoint::G, view_tag };
    assert_eq!(Output::read(true, &mut output.serialize().as_slice()).unwrap(), output);
    // The tag byte distinguishes the two variants
    assert_eq!(output.serialize()[1], 2 + u8::from(view_tag.is_some()));
  }
}

#[test]
fn timelock() {
  for timelock in [Timelock::None, Timelock::Block(1234), Timelock::Time(1_700_000_000)] {
    assert_eq!(Timelock::read(&mut timelock.serialize().as_slice()).unwrap(), timelock);
  }
  assert!(Timelock::None < Timelock::Block(0));
  assert!(Timelock::Block(10) < Timelock::Block(11));
  assert!(Timelock::Block(10).partial_cmp(&Timelock::Time(10)).is_none());
}

#[test]
fn unsupported_version() {
  // A version 1 transaction is rejected
  assert!(Transaction::read(&mut [1u8, 0, 0, 0, 0].as_slice()).is_err());
}
