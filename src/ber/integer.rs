use crate::error::*;
use num_bigint::BigInt;

/// Encode an integer as the minimal two's complement big-endian octets (X.690 8.3.2)
///
/// ```rust
/// # use der_codec::ber::encode_integer;
/// # use num_bigint::BigInt;
/// assert_eq!(encode_integer(&BigInt::from(128)), vec![0x00, 0x80]);
/// assert_eq!(encode_integer(&BigInt::from(-129)), vec![0xff, 0x7f]);
/// ```
#[inline]
pub fn encode_integer(i: &BigInt) -> Vec<u8> {
    i.to_signed_bytes_be()
}

/// Decode two's complement big-endian content octets
///
/// The content of an INTEGER shall consist of one or more octets (X.690 8.3.1).
pub fn decode_integer(bytes: &[u8]) -> Result<BigInt, BerError> {
    if bytes.is_empty() {
        return Err(BerError::InvalidLength);
    }
    Ok(BigInt::from_signed_bytes_be(bytes))
}

pub(crate) fn decode_array_uint8(mut bytes: &[u8]) -> Result<u64, BerError> {
    // Check if MSB is set *before* leading zeroes
    if is_highest_bit_set(bytes) {
        return Err(BerError::IntegerNegative);
    }
    // Remove leading zeroes
    while let [0, rest @ ..] = bytes {
        bytes = rest;
    }
    if bytes.len() > 8 {
        return Err(BerError::IntegerTooLarge);
    }

    // Input has leading zeroes removed, so we need to add them back
    let mut output = [0u8; 8];
    output[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(output))
}

pub(crate) fn decode_array_uint4(bytes: &[u8]) -> Result<u32, BerError> {
    let v = decode_array_uint8(bytes)?;
    if v > u64::from(u32::MAX) {
        return Err(BerError::IntegerTooLarge);
    }
    Ok(v as u32)
}

/// Is the highest bit of the first byte in the slice 1? (if present)
#[inline]
pub(crate) fn is_highest_bit_set(bytes: &[u8]) -> bool {
    bytes
        .get(0)
        .map(|byte| byte & 0b1000_0000 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_boundaries() {
        let cases: &[(i64, &[u8])] = &[
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x00, 0x80]),
            (256, &[0x01, 0x00]),
            (-1, &[0xff]),
            (-128, &[0x80]),
            (-129, &[0xff, 0x7f]),
            (65537, &[0x01, 0x00, 0x01]),
        ];
        for &(value, bytes) in cases {
            let n = BigInt::from(value);
            assert_eq!(encode_integer(&n), bytes, "encoding {}", value);
            assert_eq!(decode_integer(bytes), Ok(n), "decoding {}", value);
        }
    }

    #[test]
    fn test_decode_empty_integer() {
        assert_eq!(decode_integer(&[]), Err(BerError::InvalidLength));
    }

    #[test]
    fn test_decode_native() {
        assert_eq!(decode_array_uint8(&[0x01, 0x00, 0x01]), Ok(0x10001));
        assert_eq!(
            decode_array_uint8(&[0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok(u64::MAX)
        );
        assert_eq!(
            decode_array_uint8(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(BerError::IntegerTooLarge)
        );
        assert_eq!(decode_array_uint8(&[0x80]), Err(BerError::IntegerNegative));
        assert_eq!(decode_array_uint4(&[0x01, 0, 0, 0, 0]), Err(BerError::IntegerTooLarge));
        assert_eq!(decode_array_uint4(&[0x00, 0x80, 0, 0, 0]), Ok(0x8000_0000));
    }
}
