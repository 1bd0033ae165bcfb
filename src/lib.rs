//! Time-ordered 128-bit unique identifiers in a compact, fixed-width base58 form
//!
//! ```rust
//! use hqid7::hqid7;
//!
//! let id = hqid7()?;
//! println!("{}", id); // e.g. "1BihbxwwQ4NZZpKRH9JDCz"
//! println!("{:?}", id.as_bytes()); // as 16-byte big-endian array
//! println!("{}", id.timestamp_ms()); // as Unix timestamp in milliseconds
//! # Ok::<(), hqid7::GenerateError>(())
//! ```
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout, which is
//! compatible with UUID version 7:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |   sub_ms_precision    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                       random_bits                         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          random_bits                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `sub_ms_precision` field accommodates the sequence counter that
//!   ensures the monotonic order of IDs generated within the same millisecond. The
//!   counter is incremented by one for each new ID generated within the same
//!   timestamp and is reset to zero whenever the `unix_ts_ms` changes.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `random_bits` are filled with a cryptographically strong
//!   random number.
//!
//! In the rare circumstances where the counter reaches 4095 and can no more be
//! incremented within the same timestamp, this library increments the
//! `unix_ts_ms`; therefore, the `unix_ts_ms` may have a larger value than that of
//! the real-time clock. This library goes on with such larger `unix_ts_ms` values
//! caused by counter overflows and system clock rollbacks as long as the difference
//! from the system clock is small enough. If the system clock moves back more than
//! ten seconds, the default generator resets its state and thus breaks the
//! monotonic order of generated identifiers.
//!
//! # String representation
//!
//! The canonical text form is exactly 22 characters of the Bitcoin base58 alphabet
//! (`123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz`), left-padded with
//! `1`. Since every string has the same length and the alphabet is in ASCII order,
//! sorting the strings sorts the identifiers by creation time.
//!
//! ```rust
//! let bytes = hqid7::decode_base58("1BihbxwwQ4NZZpKRH9JDCz")?;
//! assert_eq!(hqid7::encode_base58(&bytes), "1BihbxwwQ4NZZpKRH9JDCz");
//!
//! let id = hqid7::Hqid7::from(bytes);
//! assert_eq!(id.timestamp_ms(), 0x017f_22e2_79b0);
//! assert_eq!(id.sub_ms_precision(), 0xcc3);
//! # Ok::<(), hqid7::DecodeError>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `std` enables, among others, the system clock and owned string conversions.
//! - `global_gen` enables the process-wide default generator behind [`hqid7()`].
//! - `cli` builds the `hqid7` command-line tool.
//!
//! Optional features:
//!
//! - `serde` enables serialization/deserialization of [`Hqid7`] via serde.
//! - `uuid` enables conversion between [`Hqid7`] and `uuid::Uuid`.
//! - `tracing` emits trace spans and state-change events from the generator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::Hqid7;

mod error;
pub use error::{DecodeError, GenerateError};

pub mod base58;
pub use base58::decode_base58;
#[cfg(feature = "std")]
pub use base58::encode_base58;

pub mod generator;
#[doc(inline)]
pub use generator::Hqid7Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::hqid7;
