use rand_core::OsRng;

use monero_kit_wallet::{
  address::Network,
  storage::{OwnedOutput, TransferDirection, TransactionRecord},
  file::{WalletFileError, WalletKeys, SubaddressLabel, AddressBookEntry, WalletFile},
};

mod runner;

fn sample_wallet() -> WalletFile {
  let keys = runner::wallet(&mut OsRng);
  let outputs = runner::scanned_outputs(&keys, &[9_000_000], 800)
    .into_iter()
    .map(|output| OwnedOutput::new(&keys, output, 123).unwrap())
    .collect();

  WalletFile {
    network: Network::Mainnet,
    keys: WalletKeys::Full(keys),
    subaddress_labels: vec![SubaddressLabel {
      account: 0,
      address: 1,
      label: "savings".into(),
    }],
    outputs,
    transactions: vec![TransactionRecord {
      hash: [9; 32],
      direction: TransferDirection::Incoming,
      amount: 9_000_000,
      fee: 0,
      block_height: Some(123),
    }],
    address_book: vec![AddressBookEntry {
      address: runner::wallet(&mut OsRng).view_pair().legacy_address(Network::Mainnet).to_string(),
      label: "alice".into(),
    }],
    sync_height: 456,
  }
}

#[test]
fn round_trip() {
  let wallet = sample_wallet();
  let primary = wallet.keys.view_pair().legacy_address(Network::Mainnet);

  let sealed = wallet.seal(&mut OsRng, b"hunter2").unwrap();
  assert_eq!(&sealed[.. 4], b"MONE");
  assert_eq!(sealed[4], 1);

  let opened = WalletFile::open(&sealed, b"hunter2").unwrap();
  assert_eq!(opened.network, Network::Mainnet);
  assert_eq!(opened.keys.view_pair().legacy_address(Network::Mainnet), primary);
  assert_eq!(opened.subaddress_labels, wallet.subaddress_labels);
  assert_eq!(opened.outputs.len(), 1);
  assert_eq!(opened.outputs[0].amount(), 9_000_000);
  assert_eq!(opened.transactions, wallet.transactions);
  assert_eq!(opened.address_book, wallet.address_book);
  assert_eq!(opened.sync_height, 456);

  // A full wallet round-trips its spend authority
  assert!(matches!(opened.keys, WalletKeys::Full(_)));
}

#[test]
fn view_only_round_trip() {
  let keys = runner::wallet(&mut OsRng);
  let wallet = WalletFile {
    network: Network::Stagenet,
    keys: WalletKeys::ViewOnly(keys.view_pair().clone()),
    subaddress_labels: vec![],
    outputs: vec![],
    transactions: vec![],
    address_book: vec![],
    sync_height: 0,
  };

  let sealed = wallet.seal(&mut OsRng, b"").unwrap();
  let opened = WalletFile::open(&sealed, b"").unwrap();
  assert!(matches!(opened.keys, WalletKeys::ViewOnly(_)));
  assert_eq!(
    opened.keys.view_pair().legacy_address(Network::Stagenet),
    keys.view_pair().legacy_address(Network::Stagenet),
  );
}

#[test]
fn wrong_password_and_tampering() {
  let wallet = sample_wallet();
  let sealed = wallet.seal(&mut OsRng, b"correct horse").unwrap();

  // The wrong password fails as InvalidPassword, from the AEAD tag
  assert_eq!(
    WalletFile::open(&sealed, b"battery staple").map(|_| ()),
    Err(WalletFileError::InvalidPassword),
  );

  // So does any tampered ciphertext byte
  let mut tampered = sealed.clone();
  let last = tampered.len() - 1;
  tampered[last] ^= 1;
  assert_eq!(
    WalletFile::open(&tampered, b"correct horse").map(|_| ()),
    Err(WalletFileError::InvalidPassword),
  );

  // A bad magic is rejected before any key derivation
  let mut bad_magic = sealed.clone();
  bad_magic[0] = b'X';
  assert_eq!(
    WalletFile::open(&bad_magic, b"correct horse").map(|_| ()),
    Err(WalletFileError::InvalidMagic),
  );

  // An unknown version is rejected
  let mut bad_version = sealed;
  bad_version[4] = 2;
  assert_eq!(
    WalletFile::open(&bad_version, b"correct horse").map(|_| ()),
    Err(WalletFileError::UnsupportedVersion(2)),
  );
}
