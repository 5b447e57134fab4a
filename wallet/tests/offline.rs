use zeroize::Zeroizing;
use rand_core::{RngCore, OsRng};

use monero_kit_wallet::{
  ringct::RctType,
  address::Network,
  send::{Change, SignableTransaction, UnsignedTransaction},
};

mod runner;

#[test]
fn offline_round_trip() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  let input = runner::fabricate_input(&mut OsRng, &sender, 5_000_000_000, 1200);

  // The composer derives the key image for the spent output
  let key_image = {
    use core::ops::Deref;
    use monero_kit_wallet::ed25519::Point;
    let one_time = sender.one_time_key(input.key_offset());
    Point::from(
      (*one_time).into() *
        Point::hash_to_point(input.key().compress().to_bytes()).into(),
    )
    .compress()
  };

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    {
      let mut key = Zeroizing::new([0; 32]);
      OsRng.fill_bytes(key.as_mut());
      key
    },
    vec![input],
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 1_500_000_000)],
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();

  let unsigned = UnsignedTransaction::new(signable.clone(), vec![key_image]).unwrap();
  let document = unsigned.export();

  // The document is JSON with the spec'd fields
  let parsed: serde_json::Value = serde_json::from_str(&document).unwrap();
  assert_eq!(parsed["version"], 1);
  assert!(parsed["txPrefixHex"].as_str().unwrap().len() > 0);
  assert_eq!(parsed["inputs"].as_array().unwrap().len(), 1);
  assert_eq!(parsed["inputs"][0]["ringMembersHex"].as_array().unwrap().len(), 16);
  assert_eq!(parsed["outputs"].as_array().unwrap().len(), 2);
  assert!(parsed["fee"].as_u64().unwrap() > 0);
  assert!(parsed["changeAddress"].as_str().is_some());

  // Import on the 'signing device' and sign
  let imported = UnsignedTransaction::import(&document).unwrap();
  assert_eq!(imported.intent(), &signable);
  let signed = imported.sign(&mut OsRng, sender.spend_secret()).unwrap();

  // The directly-signed transaction matches in everything the deterministic streams cover
  let direct = signable.sign(&mut OsRng, sender.spend_secret()).unwrap();
  assert_eq!(signed.prefix, direct.prefix);
  assert_eq!(signed.signature_hash(), direct.signature_hash());
  assert_eq!(signed.serialize().len(), direct.serialize().len());
  assert_eq!(
    signed.proofs.as_ref().unwrap().rct_type(),
    direct.proofs.as_ref().unwrap().rct_type(),
  );
  assert_eq!(signed.proofs.as_ref().unwrap().base.fee, direct.proofs.as_ref().unwrap().base.fee);

  // The signed blob parses back identically
  let blob = signed.serialize();
  let parsed = monero_kit_wallet::transaction::Transaction::read(&mut blob.as_slice()).unwrap();
  assert_eq!(parsed, signed);
  assert_eq!(parsed.serialize(), blob);
}

#[test]
fn tampered_documents_are_rejected() {
  let sender = runner::wallet(&mut OsRng);
  let recipient = runner::wallet(&mut OsRng);

  let input = runner::fabricate_input(&mut OsRng, &sender, 5_000_000_000, 1200);
  let key_image = {
    use core::ops::Deref;
    use monero_kit_wallet::ed25519::Point;
    let one_time = sender.one_time_key(input.key_offset());
    Point::from(
      (*one_time).into() *
        Point::hash_to_point(input.key().compress().to_bytes()).into(),
    )
    .compress()
  };

  let signable = SignableTransaction::new(
    RctType::ClsagBulletproofPlus,
    {
      let mut key = Zeroizing::new([0; 32]);
      OsRng.fill_bytes(key.as_mut());
      key
    },
    vec![input],
    vec![(recipient.view_pair().legacy_address(Network::Mainnet), 1_000_000)],
    Change::new(sender.view_pair().clone(), None),
    vec![],
    runner::fee_rate(),
  )
  .unwrap();
  let document = UnsignedTransaction::new(signable, vec![key_image]).unwrap().export();

  // Lying about the fee is caught
  let mut tampered: serde_json::Value = serde_json::from_str(&document).unwrap();
  tampered["fee"] = serde_json::Value::from(1u64);
  assert!(UnsignedTransaction::import(&tampered.to_string()).is_err());

  // Lying about the prefix is caught
  let mut tampered: serde_json::Value = serde_json::from_str(&document).unwrap();
  tampered["txPrefixHex"] = serde_json::Value::from("02");
  assert!(UnsignedTransaction::import(&tampered.to_string()).is_err());

  // Garbage isn't accepted
  assert!(UnsignedTransaction::import("{}").is_err());
  assert!(UnsignedTransaction::import("not json").is_err());
}
