#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use fstr::FStr;

use crate::{base58, DecodeError};

/// Represents an hqid7 identifier.
///
/// The value is kept as a 16-byte big-endian array, so the derived `Ord` follows the generation
/// order of identifiers, and so does the lexicographic order of their string representations.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Hqid7([u8; 16]);

impl Hqid7 {
    /// Nil identifier (all bits cleared)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max identifier (all bits set)
    pub const MAX: Self = Self([0xff; 16]);

    /// Value of the 4-bit `ver` field set by this library.
    pub const VERSION: u8 = 0b0111;

    /// Value of the 2-bit `var` field set by this library.
    pub const VARIANT: u8 = 0b10;

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an identifier from field values, setting the version and variant bits.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer, `sub_ms_precision` is not a 12-bit
    /// integer, or `random_bits` is not a 62-bit integer.
    pub const fn from_fields(unix_ts_ms: u64, sub_ms_precision: u16, random_bits: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || sub_ms_precision >= 1 << 12 || random_bits >= 1 << 62 {
            panic!("invalid field value");
        }

        let hi = unix_ts_ms << 16 | (Self::VERSION as u64) << 12 | sub_ms_precision as u64;
        let lo = (Self::VARIANT as u64) << 62 | random_bits;
        Self((((hi as u128) << 64) | lo as u128).to_be_bytes())
    }

    /// Returns the most significant 64 bits as a big-endian integer.
    const fn hi(&self) -> u64 {
        (u128::from_be_bytes(self.0) >> 64) as u64
    }

    /// Returns the least significant 64 bits as a big-endian integer.
    const fn lo(&self) -> u64 {
        u128::from_be_bytes(self.0) as u64
    }

    /// Returns the 48-bit `unix_ts_ms` field value.
    pub const fn timestamp_ms(&self) -> u64 {
        self.hi() >> 16
    }

    /// Returns the 4-bit `ver` field value.
    pub const fn version(&self) -> u8 {
        ((self.hi() >> 12) & 0xf) as u8
    }

    /// Returns the 12-bit `sub_ms_precision` field value.
    pub const fn sub_ms_precision(&self) -> u16 {
        (self.hi() & 0xfff) as u16
    }

    /// Returns the 2-bit `var` field value.
    pub const fn variant(&self) -> u8 {
        (self.lo() >> 62) as u8
    }

    /// Returns the 62-bit `random_bits` field value.
    pub const fn random_bits(&self) -> u64 {
        self.lo() & ((1 << 62) - 1)
    }

    /// Returns the 22-character base58 representation stored in a stack-allocated string that
    /// can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hqid7::Hqid7;
    ///
    /// let x = "1BihbxwwQ4NZZpKRH9JDCz".parse::<Hqid7>()?;
    /// let y = x.encode();
    /// assert_eq!(y.as_str(), "1BihbxwwQ4NZZpKRH9JDCz");
    /// assert_eq!(format!("{}", y), "1BihbxwwQ4NZZpKRH9JDCz");
    /// # Ok::<(), hqid7::DecodeError>(())
    /// ```
    pub fn encode(&self) -> FStr<{ base58::ENCODED_LEN }> {
        base58::encode(&self.0)
    }
}

impl fmt::Display for Hqid7 {
    /// Returns the 22-character canonical base58 string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Hqid7 {
    type Err = DecodeError;

    /// Creates an object from the 22-character base58 string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        base58::decode(src).map(Self)
    }
}

impl From<Hqid7> for [u8; 16] {
    fn from(src: Hqid7) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Hqid7 {
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Hqid7 {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Hqid7> for u128 {
    fn from(src: Hqid7) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Hqid7 {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{DecodeError, Hqid7};

    impl From<Hqid7> for String {
        fn from(src: Hqid7) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Hqid7 {
        type Error = DecodeError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Hqid7;

    impl From<Hqid7> for uuid::Uuid {
        fn from(src: Hqid7) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Hqid7 {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Hqid7};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Hqid7 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Hqid7 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Hqid7;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an hqid7 representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::Hqid7;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("1111111111111111111111", &[0u8; 16]),
                (
                    "1BihbxwwQ4NZZpKRH9JDCz",
                    &[
                        1, 127, 34, 226, 121, 176, 124, 195, 152, 196, 220, 12, 12, 7, 57, 143,
                    ],
                ),
                (
                    "199dn6s7WUNkmYwDKFUcWS",
                    &[
                        1, 35, 69, 103, 137, 171, 115, 69, 129, 35, 69, 103, 137, 171, 205, 239,
                    ],
                ),
                ("YcVfxkQb6JRzqk5kF2tNLv", &[0xff; 16]),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<Hqid7>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
