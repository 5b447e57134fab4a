//! Shared fixtures: wallets with fabricated on-chain state, letting the full pipeline run
//! without a daemon.
#![allow(dead_code)]

use zeroize::Zeroizing;
use rand_core::{RngCore, CryptoRng, OsRng};

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;

use monero_kit_wallet::{
  io::write_varint,
  ed25519::{Scalar, Point, Commitment},
  RING_SIZE, FeeRate, KeyPair, OutputWithDecoys,
};

pub fn random_point(rng: &mut (impl RngCore + CryptoRng)) -> Point {
  Point::from(Scalar::random(rng).into() * ED25519_BASEPOINT_POINT)
}

/// Fabricate a spendable output for this wallet: a one-time key at a known offset from the
/// wallet's spend key, within a synthetic ring.
///
/// This crafts the `OutputWithDecoys` serialization by hand, the test's stand-in for the
/// scan-then-select-decoys path against a real chain.
pub fn fabricate_input(
  rng: &mut (impl RngCore + CryptoRng),
  keys: &KeyPair,
  amount: u64,
  first_position: u64,
) -> OutputWithDecoys {
  let key_offset = Scalar::random(rng);
  let key = Point::from(
    keys.view_pair().spend().into() + (key_offset.into() * ED25519_BASEPOINT_POINT),
  );
  let commitment = Commitment::new(Scalar::random(rng), amount);

  let real_index = usize::try_from(OsRng.next_u64()).unwrap() % RING_SIZE;

  let mut buf = vec![];
  // The output: key, key offset, commitment opening
  buf.extend(key.compress().to_bytes());
  key_offset.write(&mut buf).unwrap();
  commitment.write(&mut buf).unwrap();
  // The ring: the offsets, the signer index, the members
  write_varint(RING_SIZE, &mut buf).unwrap();
  for i in 0 .. RING_SIZE {
    // The first offset is absolute; the rest are deltas
    let offset = if i == 0 { first_position } else { 1 + (u64::try_from(i).unwrap() % 3) };
    write_varint(offset, &mut buf).unwrap();
  }
  buf.push(u8::try_from(real_index).unwrap());
  write_varint(RING_SIZE, &mut buf).unwrap();
  for i in 0 .. RING_SIZE {
    if i == real_index {
      buf.extend(key.compress().to_bytes());
      buf.extend(commitment.calculate().compress().to_bytes());
    } else {
      buf.extend(random_point(rng).compress().to_bytes());
      buf.extend(random_point(rng).compress().to_bytes());
    }
  }

  OutputWithDecoys::read(&mut buf.as_slice()).unwrap()
}

pub fn wallet(rng: &mut (impl RngCore + CryptoRng)) -> KeyPair {
  let mut seed = Zeroizing::new([0; 32]);
  rng.fill_bytes(seed.as_mut());
  KeyPair::from_seed(&seed)
}

pub fn fee_rate() -> FeeRate {
  FeeRate::new(20, 10000).unwrap()
}

/// Build, sign, and scan a transaction paying this wallet the specified amounts, yielding the
/// scanned outputs.
pub fn scanned_outputs(
  recipient: &KeyPair,
  amounts: &[u64],
  first_index_on_blockchain: u64,
) -> Vec<monero_kit_wallet::WalletOutput> {
  use monero_kit_wallet::{
    ringct::RctType,
    transaction::{PrunedTransaction, Transaction},
    address::Network,
    Scanner,
    send::{Change, SignableTransaction},
  };

  let sender = wallet(&mut OsRng);
  let total: u64 = amounts.iter().sum();

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    {
      let mut key = Zeroizing::new([0; 32]);
      OsRng.fill_bytes(key.as_mut());
      key
    },
    // Fund generously beyond the amounts, covering the fee with plenty of change
    vec![fabricate_input(&mut OsRng, &sender, (total * 2) + 1_000_000_000, 40)],
    amounts
      .iter()
      .map(|amount| (recipient.view_pair().legacy_address(Network::Mainnet), *amount))
      .collect(),
    Change::new(sender.view_pair().clone(), None),
    vec![],
    fee_rate(),
  )
  .unwrap();
  let tx = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();

  let scanner = Scanner::new(recipient.view_pair().clone());
  let mut outputs = scanner
    .scan_transaction(
      first_index_on_blockchain,
      tx.hash(),
      &PrunedTransaction::from(tx.clone()),
    )
    .unwrap();
  assert_eq!(outputs.len(), amounts.len());
  // Return them in the order requested
  outputs.sort_by_key(|output| {
    amounts
      .iter()
      .position(|amount| *amount == output.commitment().amount)
      .expect("scanned an amount which wasn't sent")
  });
  outputs
}
