#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[allow(unused_imports)]
use std_shims::prelude::*;
use std_shims::io::{self, Read, Write};

/// The longest encoding of a `u64` VarInt, ten bytes of seven value bits each.
pub const MAX_VARINT_LEN: usize = 10;

/// The amount of bytes the VarInt encoding of `value` spans.
///
/// Zero still takes one byte to encode.
pub fn varint_len(value: u64) -> usize {
  let value_bits = usize::try_from(u64::BITS - value.leading_zeros()).expect("u64 had 2^64 bits");
  value_bits.div_ceil(7).max(1)
}

/// Write a number as a VarInt: little-endian groups of seven bits, the high bit of each byte
/// flagging a successor byte.
pub fn write_varint<W: Write>(value: impl TryInto<u64>, w: &mut W) -> io::Result<()> {
  let mut remaining =
    value.try_into().map_err(|_| ()).expect("writing a VarInt exceeding u64::MAX");
  loop {
    let bits = remaining & 0x7f;
    remaining >>= 7;
    let flag = if remaining == 0 { 0 } else { 0x80 };
    w.write_all(&[u8::try_from(bits).expect("seven bits exceeded u8") | flag])?;
    if remaining == 0 {
      return Ok(());
    }
  }
}

/// Read a canonically-encoded VarInt.
///
/// An encoding with a trailing all-zero group, or one exceeding 64 bits, is rejected.
pub fn read_varint<R: Read>(r: &mut R) -> io::Result<u64> {
  let mut value = 0u64;
  let mut shift = 0u32;
  loop {
    let byte = read_byte(r)?;
    if (shift != 0) && (byte == 0) {
      Err(io::Error::other("VarInt had a trailing zero group"))?;
    }
    if (shift >= u64::BITS) || ((shift > (u64::BITS - 7)) && (u32::from(byte & 0x7f) >> (u64::BITS - shift)) != 0)
    {
      Err(io::Error::other("VarInt exceeded u64"))?;
    }
    value |= u64::from(byte & 0x7f) << shift;
    if (byte & 0x80) == 0 {
      return Ok(value);
    }
    shift += 7;
  }
}

/// Write a single byte.
pub fn write_byte<W: Write>(byte: &u8, w: &mut W) -> io::Result<()> {
  w.write_all(&[*byte])
}

/// Read a single byte.
pub fn read_byte<R: Read>(r: &mut R) -> io::Result<u8> {
  let mut byte = [0];
  r.read_exact(&mut byte)?;
  Ok(byte[0])
}

/// Read a fixed amount of bytes.
pub fn read_bytes<R: Read, const N: usize>(r: &mut R) -> io::Result<[u8; N]> {
  let mut bytes = [0; N];
  r.read_exact(&mut bytes)?;
  Ok(bytes)
}

/// Read a little-endian `u32`.
pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
  read_bytes(r).map(u32::from_le_bytes)
}

/// Read a little-endian `u64`.
pub fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
  read_bytes(r).map(u64::from_le_bytes)
}

/// Write a series of items, without a length prefix.
pub fn write_items<T, W: Write>(
  mut f: impl FnMut(&T, &mut W) -> io::Result<()>,
  items: &[T],
  w: &mut W,
) -> io::Result<()> {
  items.iter().try_for_each(|item| f(item, w))
}

/// Write a series of items, prefixed by their amount as a VarInt.
pub fn write_list<T, W: Write>(
  f: impl FnMut(&T, &mut W) -> io::Result<()>,
  items: &[T],
  w: &mut W,
) -> io::Result<()> {
  write_varint(items.len(), w)?;
  write_items(f, items, w)
}

/// Read a known amount of items.
pub fn read_items<R: Read, T>(
  mut f: impl FnMut(&mut R) -> io::Result<T>,
  count: usize,
  r: &mut R,
) -> io::Result<Vec<T>> {
  let mut items = Vec::with_capacity(count.min(256));
  for _ in 0 .. count {
    items.push(f(r)?);
  }
  Ok(items)
}

/// Read a VarInt-prefixed series of items, rejecting lengths above the bound.
///
/// The bound caps the allocation a declared length can trigger, regardless of how little data
/// actually follows it.
pub fn read_list<R: Read, T>(
  f: impl FnMut(&mut R) -> io::Result<T>,
  length_bound: usize,
  r: &mut R,
) -> io::Result<Vec<T>> {
  let len = read_varint(r)?;
  if len > u64::try_from(length_bound).expect("length bound exceeded u64::MAX") {
    Err(io::Error::other("list length exceeded its bound"))?;
  }
  read_items(f, usize::try_from(len).expect("bounded length exceeded usize::MAX"), r)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn varint_round_trip() {
    for value in [0u64, 1, 0x7f, 0x80, 0x3fff, 0x4000, u64::from(u32::MAX), u64::MAX] {
      let mut buf = vec![];
      write_varint(value, &mut buf).unwrap();
      assert_eq!(buf.len(), varint_len(value));
      assert_eq!(read_varint(&mut buf.as_slice()).unwrap(), value);
    }
    assert_eq!(varint_len(0), 1);
    assert_eq!(varint_len(u64::MAX), MAX_VARINT_LEN);
  }

  #[test]
  fn varint_non_canonical() {
    // `1`, followed by a zero continuation group
    assert!(read_varint(&mut [0x81, 0x00].as_slice()).is_err());
  }

  #[test]
  fn varint_overflow() {
    // One bit past u64::MAX
    let mut encoding = [0x80; MAX_VARINT_LEN].to_vec();
    encoding.push(0x02);
    assert!(read_varint(&mut encoding.as_slice()).is_err());
    // u64::MAX itself is accepted
    let mut max = vec![];
    write_varint(u64::MAX, &mut max).unwrap();
    assert_eq!(read_varint(&mut max.as_slice()).unwrap(), u64::MAX);
  }

  #[test]
  fn list_bound() {
    let mut buf = vec![];
    write_list(write_byte, &[1u8, 2, 3], &mut buf).unwrap();
    assert_eq!(read_list(read_byte, 3, &mut buf.as_slice()).unwrap(), vec![1, 2, 3]);
    assert!(read_list(read_byte, 2, &mut buf.as_slice()).is_err());
  }
}
