use zeroize::Zeroizing;
use rand_core::{RngCore, OsRng};

use monero_kit_wallet::{
  ed25519::{Scalar, Commitment},
  ringct::{RctType, RctPrunable},
  transaction::{PrunedTransaction, Transaction},
  address::{Network, SubaddressIndex},
  Scanner, send::{Change, SendError, SignableTransaction},
};

mod runner;

fn outgoing_view_key() -> Zeroizing<[u8; 32]> {
  let mut key = Zeroizing::new([0; 32]);
  OsRng.fill_bytes(key.as_mut());
  key
}

#[test]
fn batch_transfer() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  // Two destinations against an available 6_500M, leaving change
  let inputs = vec![runner::fabricate_input(&mut OsRng, &sender, 6_500_000_000, 5000)];
  let payments = vec![
    (recipient.view_pair().legacy_address(Network::Mainnet), 500_000_000),
    (recipient.view_pair().subaddress(Network::Mainnet, SubaddressIndex::new(1, 0).unwrap()),
     800_000_000),
  ];

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    outgoing_view_key(),
    inputs,
    payments,
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();
  let fee = signable.necessary_fee();
  assert!(fee > 0);

  let tx = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();

  // Two destinations and the change
  assert_eq!(tx.prefix.outputs.len(), 3);
  // Every output carries a view tag
  assert!(tx.prefix.outputs.iter().all(|output| output.view_tag.is_some()));

  // The serialization round-trips byte-for-byte
  let blob = tx.serialize();
  let parsed = Transaction::read(&mut blob.as_slice()).unwrap();
  assert_eq!(parsed, tx);
  assert_eq!(parsed.serialize(), blob);

  let proofs = tx.proofs.as_ref().unwrap();
  assert_eq!(proofs.rct_type(), RctType::ClsagBulletproofPlus);
  assert_eq!(proofs.base.fee, fee);

  // The range proof verifies against the output commitments
  {
    let commitments = proofs
      .base
      .commitments
      .iter()
      .map(|commitment| commitment.decompress().unwrap())
      .collect::<Vec<_>>();
    let RctPrunable::Clsag { ref bulletproof, .. } = proofs.prunable;
    assert!(bulletproof.verify(&mut OsRng, &commitments));
  }

  // One CLSAG and pseudo-out per input, of the fixed ring size
  {
    let RctPrunable::Clsag { ref clsags, ref pseudo_outs, .. } = proofs.prunable;
    assert_eq!(clsags.len(), 1);
    assert_eq!(pseudo_outs.len(), 1);
    for clsag in clsags {
      assert_eq!(clsag.s.len(), 16);
    }
  }

  // Commitments balance: sum(pseudo-outs) - sum(commitments) - fee H = identity
  {
    use curve25519_dalek::traits::{Identity, IsIdentity};
    let RctPrunable::Clsag { ref pseudo_outs, .. } = proofs.prunable;
    let mut balance = curve25519_dalek::EdwardsPoint::identity();
    for pseudo_out in pseudo_outs {
      balance += pseudo_out.decompress().unwrap().into();
    }
    for commitment in &proofs.base.commitments {
      balance -= commitment.decompress().unwrap().into();
    }
    balance -= Commitment::new(Scalar::ZERO, proofs.base.fee).calculate().into();
    assert!(balance.is_identity());
  }

  // The recipient scans exactly their two outputs, with the right amounts and indexes
  {
    let mut scanner = Scanner::new(recipient.view_pair().clone());
    scanner.register_subaddresses(2, 2);
    let outputs = scanner
      .scan_transaction(10_000, tx.hash(), &PrunedTransaction::from(tx.clone()))
      .unwrap();
    assert_eq!(outputs.len(), 2);

    let mut amounts =
      outputs.iter().map(|output| output.commitment().amount).collect::<Vec<_>>();
    amounts.sort_unstable();
    assert_eq!(amounts, vec![500_000_000, 800_000_000]);

    for output in &outputs {
      match output.commitment().amount {
        500_000_000 => assert_eq!(output.subaddress(), None),
        800_000_000 => assert_eq!(output.subaddress(), SubaddressIndex::new(1, 0)),
        _ => panic!("scanned an output with an unexpected amount"),
      }
      // The on-chain index is the base index plus the output's position
      assert_eq!(
        output.index_on_blockchain(),
        10_000 + output.index_in_transaction(),
      );
    }
  }

  // The sender scans their change
  {
    let scanner = Scanner::new(sender.view_pair().clone());
    let outputs = scanner
      .scan_transaction(10_000, tx.hash(), &PrunedTransaction::from(tx.clone()))
      .unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(
      outputs[0].commitment().amount,
      6_500_000_000 - 500_000_000 - 800_000_000 - fee,
    );
  }

  // A foreign view key scans nothing
  {
    let foreign = runner::wallet(&mut OsRng);
    let mut scanner = Scanner::new(foreign.view_pair().clone());
    scanner.register_subaddresses(3, 3);
    let outputs = scanner
      .scan_transaction(10_000, tx.hash(), &PrunedTransaction::from(tx.clone()))
      .unwrap();
    assert!(outputs.is_empty());
  }
}

#[test]
fn scanned_output_is_spendable() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  let inputs = vec![runner::fabricate_input(&mut OsRng, &sender, 2_000_000_000, 700)];
  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    outgoing_view_key(),
    inputs,
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 1_000_000_000)],
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();
  let tx = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();

  let scanner = Scanner::new(recipient.view_pair().clone());
  let outputs = scanner
    .scan_transaction(0, tx.hash(), &PrunedTransaction::from(tx.clone()))
    .unwrap();
  assert_eq!(outputs.len(), 1);

  // The recovered key offset yields the output's one-time key
  let one_time = recipient.one_time_key(outputs[0].key_offset());
  use core::ops::Deref;
  assert_eq!(
    one_time.deref().into() * curve25519_dalek::constants::ED25519_BASEPOINT_POINT,
    outputs[0].key().into(),
  );
}

#[test]
fn rejections() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);
  let address = recipient.view_pair().legacy_address(Network::Mainnet);

  // No inputs
  assert_eq!(
    SignableTransaction::new(
      RctType::ClsagBulletproofPlus,
      outgoing_view_key(),
      vec![],
      vec![(address, 1000)],
      Change::new(sender.view_pair().clone(), None),
      vec![],
      runner::fee_rate(),
    )
    .map(|_| ()),
    Err(SendError::NoInputs),
  );

  // No payments
  assert_eq!(
    SignableTransaction::new(
      RctType::ClsagBulletproofPlus,
      outgoing_view_key(),
      vec![runner::fabricate_input(&mut OsRng, &sender, 1_000_000, 100)],
      vec![],
      Change::new(sender.view_pair().clone(), None),
      vec![],
      runner::fee_rate(),
    )
    .map(|_| ()),
    Err(SendError::NoOutputs),
  );

  // A single payment without change
  assert_eq!(
    SignableTransaction::new(
      RctType::ClsagBulletproofPlus,
      outgoing_view_key(),
      vec![runner::fabricate_input(&mut OsRng, &sender, 1_000_000, 100)],
      vec![(address, 1000)],
      Change::fingerprintable(None),
      vec![],
      runner::fee_rate(),
    )
    .map(|_| ()),
    Err(SendError::NoChange),
  );

  // Insufficient funds
  assert!(matches!(
    SignableTransaction::new(
      RctType::ClsagBulletproofPlus,
      outgoing_view_key(),
      vec![runner::fabricate_input(&mut OsRng, &sender, 1_000, 100)],
      vec![(address, 1_000_000_000)],
      Change::new(sender.view_pair().clone(), None),
      vec![],
      runner::fee_rate(),
    )
    .map(|_| ()),
    Err(SendError::NotEnoughFunds { .. }),
  ));

  // The legacy Bulletproof format isn't produced
  assert_eq!(
    SignableTransaction::new(
      RctType::ClsagBulletproof,
      outgoing_view_key(),
      vec![runner::fabricate_input(&mut OsRng, &sender, 1_000_000, 100)],
      vec![(address, 1000)],
      Change::new(sender.view_pair().clone(), None),
      vec![],
      runner::fee_rate(),
    )
    .map(|_| ()),
    Err(SendError::UnsupportedRctType),
  );

  // The wrong spend key can't sign
  {
    let signable = SignableTransaction::new(
      RctType::ClsagBulletproofPlus,
      outgoing_view_key(),
      vec![runner::fabricate_input(&mut OsRng, &sender, 1_000_000_000, 100)],
      vec![(address, 1000)],
      Change::new(sender.view_pair().clone(), None),
      vec![],
      runner::fee_rate(),
    )
    .unwrap();
    let wrong = runner::wallet(&mut OsRng);
    assert_eq!(
      signable.sign(&mut OsRng, wrong.spend_secret()).map(|_| ()),
      Err(SendError::WrongPrivateKey),
    );
  }
}

#[test]
fn signable_round_trip() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    outgoing_view_key(),
    vec![runner::fabricate_input(&mut OsRng, &sender, 3_000_000_000, 250)],
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 1_234_567)],
    Change::new(sender.view_pair().clone(), None),
    vec![b"arbitrary".to_vec()],
    runner::fee_rate(),
  )
  .unwrap();

  let read =
    SignableTransaction::read(&mut signable.serialize().as_slice()).unwrap();
  assert_eq!(read, signable);

  // The deterministic key streams make both sign to the same transaction, short of the
  // CLSAGs' (and pseudo-outs') fresh randomness
  let a = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();
  let b = read.sign(&mut OsRng, sender.spend_secret()).unwrap();
  assert_eq!(a.prefix, b.prefix);
  assert_eq!(a.signature_hash(), b.signature_hash());
}

#[test]
fn clsag_within_transaction_verifies() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  let input = runner::fabricate_input(&mut OsRng, &sender, 4_000_000_000, 900);
  let ring = input.decoys().ring().to_vec();

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    outgoing_view_key(),
    vec![input],
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 2_000_000_000)],
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();
  let tx = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();

  let msg = tx.signature_hash().unwrap();
  let proofs = tx.proofs.as_ref().unwrap();
  let RctPrunable::Clsag { ref clsags, ref pseudo_outs, .. } = proofs.prunable;

  let key_image = {
    let monero_kit_wallet::transaction::Input::ToKey { ref key_image, .. } =
      tx.prefix.inputs[0]
    else {
      panic!("input wasn't ToKey")
    };
    *key_image
  };

  clsags[0]
    .verify(&ring, &key_image, &pseudo_outs[0].decompress().unwrap(), &msg)
    .unwrap();

  // A tampered message fails
  assert!(clsags[0]
    .verify(&ring, &key_image, &pseudo_outs[0].decompress().unwrap(), &[0; 32])
    .is_err());
}
