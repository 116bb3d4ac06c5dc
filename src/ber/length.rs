use crate::error::{BerError, BerResult};
use nom::bytes::streaming::take;
use nom::number::streaming::be_u8;
use rusticata_macros::custom_check;

/// Read the first length octet, split into (long form flag, value)
pub(crate) fn parse_ber_length_byte(i: &[u8]) -> BerResult<(u8, u8)> {
    let (rem, b) = be_u8::<_, BerError>(i)?;
    Ok((rem, (b >> 7, b & 0b0111_1111)))
}

/// Read big-endian bytes as a length
pub(crate) fn bytes_to_usize(s: &[u8]) -> Result<usize, BerError> {
    let mut u: usize = 0;
    for &c in s {
        if u.leading_zeros() < 8 {
            return Err(BerError::InvalidLength);
        }
        u = (u << 8) | usize::from(c);
    }
    Ok(u)
}

/// Parse the length octets of a BER object (X.690 8.1.3)
///
/// Only the definite form is accepted.
pub fn parse_ber_length(i: &[u8]) -> BerResult<usize> {
    let (i, (long, value)) = parse_ber_length_byte(i)?;
    if long == 0 {
        return Ok((i, usize::from(value)));
    }
    custom_check!(i, value == 0, BerError::IndefiniteLength)?;
    // 0xff is reserved (8.1.3.5)
    custom_check!(i, value == 0b0111_1111, BerError::InvalidLength)?;
    let (i, llen) = take::<_, _, BerError>(value)(i)?;
    let len = bytes_to_usize(llen)?;
    Ok((i, len))
}

/// Decode length octets
///
/// Returns the length and the number of octets it occupied. The caller must
/// check that the input actually holds `length` more bytes.
///
/// ```rust
/// # use der_codec::ber::decode_length;
/// assert_eq!(decode_length(&[0x05]), Ok((5, 1)));
/// assert_eq!(decode_length(&[0x82, 0x01, 0x00]), Ok((256, 3)));
/// ```
pub fn decode_length(i: &[u8]) -> Result<(usize, usize), BerError> {
    let (rem, len) = parse_ber_length(i)?;
    Ok((len, i.len() - rem.len()))
}

/// Encode a length in the definite form
///
/// Values below 128 use the short form, other values the long form with
/// the minimal number of length octets.
///
/// ```rust
/// # use der_codec::ber::encode_length;
/// assert_eq!(encode_length(127), vec![0x7f]);
/// assert_eq!(encode_length(128), vec![0x81, 0x80]);
/// ```
pub fn encode_length(len: usize) -> Vec<u8> {
    if len < 128 {
        // definite, short form
        return vec![len as u8];
    }
    // definite, long form
    let v: Vec<u8> = len
        .to_be_bytes()
        .iter()
        .copied()
        .skip_while(|&x| x == 0)
        .collect();
    let mut out = Vec::with_capacity(v.len() + 1);
    out.push(0b1000_0000 | (v.len() as u8));
    out.extend_from_slice(&v);
    out
}

#[cfg(feature = "serialize")]
pub(crate) fn ber_encode_length<'a, W: std::io::Write + 'a>(
    len: usize,
) -> impl cookie_factory::SerializeFn<W> + 'a {
    cookie_factory::combinator::slice(encode_length(len))
}
