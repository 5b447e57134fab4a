#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

use core::{fmt, ops::Deref};
use std_shims::{
  sync::LazyLock,
  collections::HashMap,
  vec::Vec,
  string::{String, ToString},
};

use zeroize::{Zeroize, Zeroizing};
use rand_core::{RngCore, CryptoRng};

#[cfg(test)]
mod tests;

// The amount of words in a seed, excluding the checksum word.
const SEED_LENGTH: usize = 24;
// The amount of words in a seed, including the checksum word.
const SEED_LENGTH_WITH_CHECKSUM: usize = 25;

/// An error when working with a seed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SeedError {
  /// The seed was invalid (wrong length, or a word outside the wordlist).
  #[error("invalid seed")]
  InvalidSeed,
  /// The checksum word did not match the rest of the seed.
  #[error("invalid checksum")]
  InvalidChecksum,
}

/// The language of a seed's wordlist.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Zeroize)]
pub enum Language {
  /// The English wordlist, the canonical list.
  English,
}

fn trim(word: &str, len: usize) -> Zeroizing<String> {
  Zeroizing::new(word.chars().take(len).collect())
}

struct WordList {
  word_list: &'static [&'static str],
  word_map: HashMap<&'static str, usize>,
  trimmed_word_map: HashMap<String, usize>,
  unique_prefix_length: usize,
}

impl WordList {
  fn new(word_list: &'static [&'static str], prefix_length: usize) -> WordList {
    let mut lang = WordList {
      word_list,
      word_map: HashMap::new(),
      trimmed_word_map: HashMap::new(),
      unique_prefix_length: prefix_length,
    };

    for (i, word) in lang.word_list.iter().enumerate() {
      lang.word_map.insert(word, i);
      lang.trimmed_word_map.insert(trim(word, lang.unique_prefix_length).deref().clone(), i);
    }

    lang
  }
}

static LANGUAGES: LazyLock<HashMap<Language, WordList>> = LazyLock::new(|| {
  HashMap::from([(Language::English, WordList::new(include!("./words/en.rs"), 3))])
});

#[allow(clippy::cast_possible_truncation)]
const fn crc32_table() -> [u32; 256] {
  let poly = 0xedb88320u32;

  let mut res = [0; 256];
  let mut i = 0;
  while i < 256 {
    let mut entry = i;
    let mut b = 0;
    while b < 8 {
      let trigger = entry & 1;
      entry >>= 1;
      if trigger == 1 {
        entry ^= poly;
      }
      b += 1;
    }
    res[i as usize] = entry;
    i += 1;
  }

  res
}
const CRC32_TABLE: [u32; 256] = crc32_table();

// The index of the word to use as the checksum: the CRC32 of the words' unique prefixes,
// reduced by the amount of words.
fn checksum_index(words: &[Zeroizing<String>], lang: &WordList) -> usize {
  let mut trimmed_words = Zeroizing::new(String::new());
  for w in words {
    *trimmed_words += &trim(w, lang.unique_prefix_length);
  }

  let trimmed_words = trimmed_words.as_bytes();
  let mut checksum = u32::MAX;
  for byte in trimmed_words {
    checksum =
      CRC32_TABLE[usize::from(u8::try_from(checksum % 256).expect("% 256 exceeded u8") ^ byte)] ^
        (checksum >> 8);
  }

  usize::try_from(!checksum).expect("u32 didn't fit in usize") % words.len()
}

// Convert entropy to a seed phrase.
fn entropy_to_seed(lang: Language, entropy: &Zeroizing<[u8; 32]>) -> Zeroizing<String> {
  let words = &LANGUAGES[&lang].word_list;
  let list_len = u64::try_from(words.len()).expect("wordlist length exceeded 2^64");

  let mut seed = Vec::with_capacity(SEED_LENGTH_WITH_CHECKSUM);

  // Each 4-byte chunk maps to three words
  let mut chunk = [0; 4];
  for i in 0 .. 8 {
    chunk.copy_from_slice(&entropy[(i * 4) .. ((i * 4) + 4)]);
    // As a u64 so the additions don't overflow
    let c = u64::from(u32::from_le_bytes(chunk));

    let w1 = c % list_len;
    let w2 = ((c / list_len) + w1) % list_len;
    let w3 = ((c / (list_len * list_len)) + w2) % list_len;

    for word in [w1, w2, w3] {
      seed.push(Zeroizing::new(
        words[usize::try_from(word).expect("wordlist index exceeded usize")].to_string(),
      ));
    }
  }
  chunk.zeroize();

  // Append the checksum word
  let checksum = seed[checksum_index(&seed, &LANGUAGES[&lang])].clone();
  seed.push(checksum);

  let mut res = Zeroizing::new(String::new());
  for (i, word) in seed.iter().enumerate() {
    if i != 0 {
      *res += " ";
    }
    *res += word;
  }
  res
}

// Convert a seed phrase back to entropy.
fn seed_to_entropy(lang: Language, words: &str) -> Result<Zeroizing<[u8; 32]>, SeedError> {
  let words = words.split_whitespace().map(|w| Zeroizing::new(w.to_string())).collect::<Vec<_>>();
  if words.len() != SEED_LENGTH_WITH_CHECKSUM {
    Err(SeedError::InvalidSeed)?;
  }

  let lang_word_list: &WordList = &LANGUAGES[&lang];
  let list_len = u64::try_from(lang_word_list.word_list.len()).expect("wordlist exceeded 2^64");

  // Match each word by its unique prefix, as the checksum algorithm solely binds prefixes
  let mut matched_indices = Zeroizing::new(Vec::with_capacity(SEED_LENGTH_WITH_CHECKSUM));
  for word in &words {
    let trimmed = trim(word, lang_word_list.unique_prefix_length);
    let Some(index) = lang_word_list.trimmed_word_map.get(trimmed.deref()) else {
      Err(SeedError::InvalidSeed)?
    };
    matched_indices.push(u64::try_from(*index).expect("wordlist index exceeded 2^64"));
  }

  // Validate the checksum word
  {
    let expected = words[checksum_index(&words[.. SEED_LENGTH], lang_word_list)].clone();
    if trim(&expected, lang_word_list.unique_prefix_length) !=
      trim(words.last().expect("25-word seed was empty"), lang_word_list.unique_prefix_length)
    {
      Err(SeedError::InvalidChecksum)?;
    }
  }

  let mut res = Zeroizing::new([0; 32]);
  for i in 0 .. 8 {
    let w1 = matched_indices[i * 3];
    let w2 = matched_indices[(i * 3) + 1];
    let w3 = matched_indices[(i * 3) + 2];

    // Invert `w2 = (c / N + w1) % N`, `w3 = (c / N^2 + w2) % N`
    let c = w1 +
      (list_len * ((list_len + w2 - w1) % list_len)) +
      (list_len * list_len * ((list_len + w3 - w2) % list_len));
    // The three-word tuple encodes values up to N^3, which exceeds the chunk's 32 bits
    let c = u32::try_from(c).map_err(|_| SeedError::InvalidSeed)?;

    res[(i * 4) .. ((i * 4) + 4)].copy_from_slice(&c.to_le_bytes());
  }

  Ok(res)
}

/// A wallet seed, as a mnemonic phrase.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct Seed(Language, Zeroizing<String>);

impl fmt::Debug for Seed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Seed").finish_non_exhaustive()
  }
}

impl Seed {
  /// Create a new seed from 32 bytes of fresh entropy.
  pub fn new<R: RngCore + CryptoRng>(rng: &mut R, lang: Language) -> Seed {
    let mut entropy = Zeroizing::new([0; 32]);
    rng.fill_bytes(entropy.as_mut());
    Self::from_entropy(lang, entropy)
  }

  /// Create a seed from existing entropy.
  pub fn from_entropy(lang: Language, entropy: Zeroizing<[u8; 32]>) -> Seed {
    Seed(lang, entropy_to_seed(lang, &entropy))
  }

  /// Parse a seed from a 25-word phrase.
  #[allow(clippy::needless_pass_by_value)]
  pub fn from_string(lang: Language, words: Zeroizing<String>) -> Result<Seed, SeedError> {
    let entropy = seed_to_entropy(lang, &words)?;
    // Re-encode so a prefix-only phrase becomes the full phrase
    Ok(Self::from_entropy(lang, entropy))
  }

  /// The language of this seed.
  pub fn language(&self) -> Language {
    self.0
  }

  /// The phrase for this seed.
  pub fn to_string(&self) -> Zeroizing<String> {
    self.1.clone()
  }

  /// The entropy underlying this seed.
  pub fn entropy(&self) -> Zeroizing<[u8; 32]> {
    seed_to_entropy(self.0, &self.1).expect("`Seed` held an invalid phrase")
  }
}
