#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

mod scalar;
pub use scalar::Scalar;

mod compressed_point;
pub use compressed_point::CompressedPoint;

mod point;
pub use point::Point;

mod commitment;
pub use commitment::Commitment;
