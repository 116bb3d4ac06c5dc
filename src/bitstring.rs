//! BIT STRING values
//!
//! A bit string is an ordered sequence of bits whose length is not necessarily a
//! multiple of 8. When packed into octets, the last octet carries `unused` padding
//! bits after the value bits.
use crate::error::BerError;
use std::fmt;

/// Number of padding bits required to complete the last octet of `len` bits
#[inline]
pub fn padding_len(len: usize) -> u8 {
    ((8 - len % 8) % 8) as u8
}

fn check_bits(s: &str) -> Result<(), BerError> {
    if s.bytes().all(|b| b == b'0' || b == b'1') {
        Ok(())
    } else {
        Err(BerError::InvalidBitString)
    }
}

/// Owned bit string, packed in octets
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    data: Vec<u8>,
    unused: u8,
}

impl BitString {
    /// Build a bit string from its textual form (`0` and `1` characters)
    ///
    /// If `padding` is given, it must contain exactly the number of bits needed to
    /// complete the last octet. Padding defaults to zero bits.
    ///
    /// ```rust
    /// # use der_codec::bitstring::BitString;
    /// let b = BitString::new("011011100101110111", None).expect("valid bit string");
    /// assert_eq!(b.unused_bits(), 6);
    /// assert_eq!(b.as_bytes(), &[0x6e, 0x5d, 0xc0]);
    /// ```
    pub fn new(bits: &str, padding: Option<&str>) -> Result<BitString, BerError> {
        check_bits(bits)?;
        let unused = padding_len(bits.len());
        let padding = match padding {
            Some(p) => {
                check_bits(p)?;
                if p.len() != usize::from(unused) {
                    return Err(BerError::InvalidPadding);
                }
                p
            }
            None => "",
        };
        let mut data = vec![0u8; (bits.len() + 7) / 8];
        for (idx, b) in bits.bytes().chain(padding.bytes()).enumerate() {
            if b == b'1' {
                data[idx / 8] |= 0x80 >> (idx % 8);
            }
        }
        Ok(BitString { data, unused })
    }

    /// Build a bit string from octets, the last `unused` bits being padding
    pub fn from_bytes(data: &[u8], unused: u8) -> Result<BitString, BerError> {
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(BerError::InvalidPadding);
        }
        Ok(BitString {
            data: data.to_vec(),
            unused,
        })
    }

    /// Number of value bits (padding excluded)
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() * 8 - usize::from(self.unused)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of padding bits in the last octet
    #[inline]
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Packed octets, padding bits included
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Test if bit `bitnum` is set
    pub fn is_set(&self, bitnum: usize) -> bool {
        if bitnum >= self.len() {
            return false;
        }
        let b = 7 - (bitnum % 8);
        (self.data[bitnum / 8] & (1 << b)) != 0
    }

    /// Value bits, as a string of `0` and `1`
    pub fn bits(&self) -> String {
        (0..self.len())
            .map(|n| if self.is_set(n) { '1' } else { '0' })
            .collect()
    }

    /// Padding bits, as a string of `0` and `1`
    pub fn padding(&self) -> String {
        let last = match self.data.last() {
            Some(b) => *b,
            None => return String::new(),
        };
        (0..self.unused)
            .rev()
            .map(|n| if last & (1 << n) != 0 { '1' } else { '0' })
            .collect()
    }

    /// Append a segment to this bit string
    ///
    /// Only possible if this bit string ends on an octet boundary.
    pub fn append(&mut self, other: &BitString) -> Result<(), BerError> {
        if self.unused != 0 {
            return Err(BerError::InvalidSegment);
        }
        self.data.extend_from_slice(&other.data);
        self.unused = other.unused;
        Ok(())
    }
}

impl AsRef<[u8]> for BitString {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(\"{}\", unused: {})", self.bits(), self.unused)
    }
}
