use rand_core::OsRng;

use monero_kit_wallet::storage::{
  OwnedOutput, OutputFilter, TransferDirection, TransactionRecord, WalletStorage, MemoryStorage,
};

mod runner;

#[test]
fn output_lifecycle() {
  let keys = runner::wallet(&mut OsRng);
  let outputs = runner::scanned_outputs(&keys, &[1_000, 2_000], 100);

  let mut storage = MemoryStorage::new();
  for output in outputs {
    storage.save_output(OwnedOutput::new(&keys, output, 50).unwrap()).unwrap();
  }

  let all = storage.get_outputs(&OutputFilter::default()).unwrap();
  assert_eq!(all.len(), 2);

  // Spending hides an output from the default filter
  let spent_image = all[0].key_image();
  storage.mark_spent(spent_image, [0xaa; 32]).unwrap();
  let unspent = storage.get_outputs(&OutputFilter::default()).unwrap();
  assert_eq!(unspent.len(), 1);
  assert!(unspent[0].key_image() != spent_image);

  // Yet it's visible when asked for
  let with_spent =
    storage.get_outputs(&OutputFilter { include_spent: true, ..Default::default() }).unwrap();
  assert_eq!(with_spent.len(), 2);
  let spent = with_spent.iter().find(|output| output.key_image() == spent_image).unwrap();
  assert_eq!(spent.spent(), Some([0xaa; 32]));

  // Marking an unknown key image errors
  let unknown = monero_kit_wallet::ed25519::CompressedPoint::G;
  assert!(storage.mark_spent(unknown, [0; 32]).is_err());

  // The serialization round-trips
  let serialized = with_spent[0].serialize();
  let read = OwnedOutput::read(&mut serialized.as_slice()).unwrap();
  assert_eq!(read.serialize(), serialized);
}

#[test]
fn sync_and_reorg() {
  let keys = runner::wallet(&mut OsRng);
  let outputs = runner::scanned_outputs(&keys, &[5_000, 7_000], 300);

  let mut storage = MemoryStorage::new();
  // One output before the fork point, one after
  let mut iter = outputs.into_iter();
  let before = OwnedOutput::new(&keys, iter.next().unwrap(), 90).unwrap();
  let before_image = before.key_image();
  let after = OwnedOutput::new(&keys, iter.next().unwrap(), 110).unwrap();
  storage.save_output(before).unwrap();
  storage.save_output(after).unwrap();

  // The 'before' output was spent by a transaction confirmed past the fork
  storage.mark_spent(before_image, [0xbb; 32]).unwrap();
  storage
    .save_transaction(TransactionRecord {
      hash: [0xbb; 32],
      direction: TransferDirection::Outgoing,
      amount: 5_000,
      fee: 10,
      block_height: Some(110),
    })
    .unwrap();

  for height in 100u64 .. 120 {
    storage.set_block_hash(height, [u8::try_from(height % 251).unwrap(); 32]).unwrap();
  }
  storage.set_sync_height(120).unwrap();

  // A reorg back to 100 drops everything past it
  storage.rollback_to_height(100).unwrap();

  assert_eq!(storage.get_sync_height().unwrap(), 100);
  assert_eq!(storage.get_block_hash(100).unwrap(), Some([100; 32]));
  assert_eq!(storage.get_block_hash(101).unwrap(), None);

  let remaining = storage.get_outputs(&OutputFilter {
    include_spent: true,
    ..Default::default()
  })
  .unwrap();
  // The output created past the fork is gone
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].key_image(), before_image);
  // And the spend of the surviving output, recorded past the fork, was reverted
  assert_eq!(remaining[0].spent(), None);
  assert!(storage.transactions().is_empty());
}

#[test]
fn transaction_records() {
  let record = TransactionRecord {
    hash: [3; 32],
    direction: TransferDirection::Incoming,
    amount: 12345,
    fee: 67,
    block_height: None,
  };
  let mut buf = vec![];
  record.write(&mut buf).unwrap();
  assert_eq!(TransactionRecord::read(&mut buf.as_slice()).unwrap(), record);

  let mut storage = MemoryStorage::new();
  storage.save_transaction(record.clone()).unwrap();
  // Re-saving (as when a pending transaction confirms) overwrites
  let confirmed = TransactionRecord { block_height: Some(42), ..record };
  storage.save_transaction(confirmed.clone()).unwrap();
  assert_eq!(storage.transactions(), &[confirmed]);
}
