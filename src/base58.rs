//! Fixed-width base58 codec for 128-bit values.
//!
//! Every 16-byte value maps to exactly [`ENCODED_LEN`] characters of the Bitcoin alphabet, padded
//! on the left with `1` (the zero digit). The alphabet is in ascending ASCII order, so comparing
//! two encoded strings gives the same result as comparing the underlying big-endian bytes.

use fstr::FStr;

use crate::DecodeError;

/// Bitcoin base58 alphabet (no `0`, `O`, `I`, or `l`).
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of every encoded string: the smallest `n` with `58^n >= 2^128`.
pub const ENCODED_LEN: usize = 22;

/// Maps ASCII code to digit value; `0xff` marks bytes outside the alphabet.
const DECODE_MAP: [u8; 128] = {
    let mut map = [0xff; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        map[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Encodes a 16-byte big-endian value into its 22-character representation stored in a
/// stack-allocated string.
///
/// # Examples
///
/// ```rust
/// use hqid7::base58;
///
/// assert_eq!(base58::encode(&[0u8; 16]).as_str(), "1111111111111111111111");
/// assert_eq!(base58::encode(&[0xff; 16]).as_str(), "YcVfxkQb6JRzqk5kF2tNLv");
/// ```
pub fn encode(bytes: &[u8; 16]) -> FStr<ENCODED_LEN> {
    let mut n = u128::from_be_bytes(*bytes);
    let mut buffer = [ALPHABET[0]; ENCODED_LEN];
    for e in buffer.iter_mut().rev() {
        *e = ALPHABET[(n % 58) as usize];
        n /= 58;
    }
    debug_assert_eq!(n, 0);
    debug_assert!(buffer.is_ascii());
    // SAFETY: every byte comes from the ASCII-only alphabet
    unsafe { FStr::from_inner_unchecked(buffer) }
}

/// Decodes a 22-character representation into a 16-byte big-endian value.
///
/// # Errors
///
/// Returns [`DecodeError`] if the string is not exactly [`ENCODED_LEN`] bytes long, contains a
/// byte outside [`ALPHABET`], or encodes a value larger than `2^128 - 1`.
pub fn decode(src: &str) -> Result<[u8; 16], DecodeError> {
    let src = src.as_bytes();
    if src.len() != ENCODED_LEN {
        return Err(DecodeError::InvalidLength { len: src.len() });
    }

    let mut n = 0u128;
    for (position, &byte) in src.iter().enumerate() {
        let digit = match DECODE_MAP.get(byte as usize) {
            Some(&d) if d < 58 => d,
            _ => return Err(DecodeError::InvalidDigit { byte, position }),
        };
        n = n
            .checked_mul(58)
            .and_then(|n| n.checked_add(digit as u128))
            .ok_or(DecodeError::Overflow)?;
    }
    Ok(n.to_be_bytes())
}

/// Encodes a 16-byte big-endian value into an owned 22-character string.
///
/// # Examples
///
/// ```rust
/// let text = hqid7::encode_base58(&[0u8; 16]);
/// assert_eq!(text, "1111111111111111111111");
/// ```
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub fn encode_base58(bytes: &[u8; 16]) -> String {
    encode(bytes).as_str().to_owned()
}

/// Decodes a 22-character representation into a 16-byte big-endian value.
///
/// This is an alias of [`decode`] provided for symmetry with [`encode_base58`].
pub fn decode_base58(src: &str) -> Result<[u8; 16], DecodeError> {
    decode(src)
}
