use zeroize::Zeroizing;
use rand_core::OsRng;

use crate::*;

#[test]
fn wordlist() {
  let words = include!("./words/en.rs");
  assert_eq!(words.len(), 1626);

  // Every word is lowercase ASCII with a unique 3-character prefix
  let mut prefixes = std::collections::HashSet::new();
  for word in words {
    assert!(word.len() >= 3);
    assert!(word.chars().all(|c| c.is_ascii_lowercase()));
    assert!(prefixes.insert(&word[.. 3]));
  }
}

#[test]
fn round_trip() {
  for _ in 0 .. 64 {
    let seed = Seed::new(&mut OsRng, Language::English);
    let phrase = seed.to_string();
    assert_eq!(phrase.split_whitespace().count(), 25);

    let parsed = Seed::from_string(Language::English, phrase.clone()).unwrap();
    assert_eq!(seed, parsed);
    assert_eq!(seed.entropy(), parsed.entropy());
  }
}

#[test]
fn determinism() {
  let entropy = Zeroizing::new([0x42; 32]);
  let a = Seed::from_entropy(Language::English, entropy.clone());
  let b = Seed::from_entropy(Language::English, entropy.clone());
  assert_eq!(a.to_string(), b.to_string());
  assert_eq!(a.entropy(), entropy);

  // The 25th word is itself a word within the phrase, as it's one of the seed words
  let phrase = a.to_string();
  let words = phrase.split_whitespace().collect::<Vec<_>>();
  assert!(words[.. 24].contains(&words[24]));
}

#[test]
fn entropy_round_trip() {
  for entropy in [[0; 32], [0xff; 32], [0x42; 32], {
    let mut counting = [0; 32];
    for (i, byte) in counting.iter_mut().enumerate() {
      *byte = u8::try_from(i).unwrap();
    }
    counting
  }] {
    let entropy = Zeroizing::new(entropy);
    let seed = Seed::from_entropy(Language::English, entropy.clone());
    assert_eq!(seed.entropy(), entropy);
  }
}

#[test]
fn invalid_seeds() {
  let seed = Seed::new(&mut OsRng, Language::English);
  let phrase = seed.to_string();

  // Too few words
  let truncated = phrase.split_whitespace().take(24).collect::<Vec<_>>().join(" ");
  assert_eq!(
    Seed::from_string(Language::English, Zeroizing::new(truncated)),
    Err(SeedError::InvalidSeed),
  );

  // A word outside the wordlist
  let mut words = phrase.split_whitespace().collect::<Vec<_>>();
  words[3] = "qqqqq";
  assert_eq!(
    Seed::from_string(Language::English, Zeroizing::new(words.join(" "))),
    Err(SeedError::InvalidSeed),
  );

  // A corrupted checksum word
  let mut words = phrase.split_whitespace().map(String::from).collect::<Vec<_>>();
  let distinct = include!("./words/en.rs")
    .iter()
    .find(|w| !words.contains(&w.to_string()))
    .expect("seed contained the entire wordlist");
  words[24] = distinct.to_string();
  let res = Seed::from_string(Language::English, Zeroizing::new(words.join(" ")));
  assert_eq!(res, Err(SeedError::InvalidChecksum));
}
