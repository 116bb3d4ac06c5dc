use super::integer::{decode_array_uint4, decode_array_uint8, decode_integer};
use super::length::parse_ber_length;
use super::node::{NodeOptions, Tagging};
use super::{Class, Encoding, Identifier, Tag};
use crate::bitstring::BitString;
use crate::error::{BerError, BerResult};
use crate::oid::Oid;
use log::{debug, trace};
use nom::bytes::streaming::take;
use nom::number::streaming::be_u8;
use num_bigint::BigInt;
use rusticata_macros::custom_check;
use std::fmt;
use std::marker::PhantomData;

/// Default maximum recursion limit
pub const MAX_RECURSION: usize = 50;

/// Encoding rules applied by a [`Deserializer`]
///
/// Rules only constrain BIT STRING and OCTET STRING values, the only types of
/// this codec for which BER allows more than one encoding.
pub trait Rules: Copy + Default + fmt::Debug {
    /// Check the encoding requested by the caller, before reading any input
    fn check_requested_encoding(requested: Option<Encoding>) -> Result<(), BerError>;

    /// Check the encoding found in the input
    fn check_encoding(found: Encoding) -> Result<(), BerError>;
}

/// Basic Encoding Rules: both string encodings are accepted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ber;

impl Rules for Ber {
    #[inline]
    fn check_requested_encoding(_requested: Option<Encoding>) -> Result<(), BerError> {
        Ok(())
    }

    #[inline]
    fn check_encoding(_found: Encoding) -> Result<(), BerError> {
        Ok(())
    }
}

/// Schema-driven decoder over a byte buffer
///
/// The caller knows the structure of the data and reads values one by one with
/// the typed accessors. Each accessor consumes one complete TLV. `sequence()`
/// returns a new deserializer restricted to the contents of the SEQUENCE.
///
/// On error, the position of the cursor is unspecified and the deserializer
/// should not be used anymore.
///
/// ```rust
/// # use der_codec::ber::{BerDeserializer, NodeOptions};
/// # use der_codec::error::BerError;
/// # fn main() -> Result<(), BerError> {
/// let bytes = [0x30, 0x06, 0x02, 0x03, 0x01, 0x00, 0x01, 0x05, 0x00];
/// let opts = NodeOptions::default();
/// let mut de = BerDeserializer::new(&bytes);
/// let mut seq = de.sequence(&opts)?;
/// assert_eq!(seq.integer_u32(&opts)?, 65537);
/// seq.null(&opts)?;
/// assert!(seq.is_empty());
/// assert!(de.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Deserializer<'a, R: Rules = Ber> {
    data: &'a [u8],
    offset: usize,
    depth: usize,
    rules: PhantomData<R>,
}

/// Deserializer using the Basic Encoding Rules
pub type BerDeserializer<'a> = Deserializer<'a, Ber>;

/// Parse a complete TLV with identifier octet `expected`, returning its content
fn parse_ber_section(i: &[u8], expected: u8) -> BerResult<&[u8]> {
    let (i, b0) = be_u8::<_, BerError>(i)?;
    custom_check!(i, b0 != expected, BerError::InvalidTag)?;
    let (i, len) = parse_ber_length(i)?;
    take::<_, _, BerError>(len)(i)
}

impl<'a, R: Rules> Deserializer<'a, R> {
    pub fn new(data: &'a [u8]) -> Self {
        Deserializer {
            data,
            offset: 0,
            depth: 0,
            rules: PhantomData,
        }
    }

    /// Deserializer for the content of a constructed value
    fn nested(&self, data: &'a [u8]) -> Result<Self, BerError> {
        if self.depth >= MAX_RECURSION {
            debug!("maximum recursion depth ({}) reached", MAX_RECURSION);
            return Err(BerError::BerMaxDepth);
        }
        Ok(Deserializer {
            data,
            offset: 0,
            depth: self.depth + 1,
            rules: PhantomData,
        })
    }

    /// Bytes not yet consumed
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    /// Test if all bytes have been consumed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Current position in the buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Nesting depth of this deserializer (0 for the outermost one)
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn peek_byte(&self) -> Result<u8, BerError> {
        self.remaining().first().copied().ok_or(BerError::Incomplete)
    }

    /// Unpack the next identifier octet without consuming it
    pub fn peek_identifier(&self) -> Result<Identifier, BerError> {
        Identifier::from_byte(self.peek_byte()?)
    }

    /// Consume `len` bytes
    pub fn displace(&mut self, len: usize) -> Result<&'a [u8], BerError> {
        let (_, b) = take::<_, _, BerError>(len)(self.remaining())?;
        self.offset += len;
        Ok(b)
    }

    /// Read `n` raw bytes, without any TLV framing
    #[inline]
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], BerError> {
        self.displace(n)
    }

    /// Consume a complete TLV whose identifier octet is `expected`
    ///
    /// Returns the content octets.
    pub fn slice(&mut self, expected: u8) -> Result<&'a [u8], BerError> {
        let input = self.remaining();
        let (rem, content) = parse_ber_section(input, expected).map_err(|e| {
            let e = BerError::from(e);
            debug!(
                "reading section 0x{:02x} at offset {} failed: {}",
                expected, self.offset, e
            );
            e
        })?;
        self.offset += input.len() - rem.len();
        Ok(content)
    }

    /// Locate and consume the section holding a value of type `tag`
    ///
    /// If the next identifier is Universal, the tagging options are ignored and the
    /// value is read as untagged. Otherwise it is read according to `opts`.
    fn section(&mut self, tag: Tag, opts: &NodeOptions) -> Result<&'a [u8], BerError> {
        let b0 = self.peek_byte()?;
        let encoding = opts.encoding.unwrap_or_else(|| tag.default_encoding());
        let universal = Identifier::universal(encoding, tag).to_byte()?;
        if Class::from_identifier(b0) == Class::Universal {
            trace!("{} at offset {} (untagged)", tag, self.offset);
            return self.slice(universal);
        }
        match opts.resolve_tagging()? {
            (class, Some(Tagging::Explicit(n))) => {
                trace!("{} at offset {} ([{}] EXPLICIT)", tag, self.offset, n);
                let wrapper = Identifier::new(class, Encoding::Constructed, Tag(n)).to_byte()?;
                let inner = self.slice(wrapper)?;
                let mut sub = self.nested(inner)?;
                let content = sub.slice(universal)?;
                if !sub.is_empty() {
                    debug!("trailing bytes after explicitly tagged {}", tag);
                    return Err(BerError::TrailingData);
                }
                Ok(content)
            }
            (class, Some(Tagging::Implicit(n))) => {
                // `encoding` falls back to the type's default form
                trace!("{} at offset {} ([{}] IMPLICIT)", tag, self.offset, n);
                let id = Identifier::new(class, encoding, Tag(n)).to_byte()?;
                self.slice(id)
            }
            (_, None) => {
                debug!("tagged value found at offset {}, but no tag configured", self.offset);
                Err(BerError::MissingTag)
            }
        }
    }

    /// Primitive/constructed flag of the next string value
    ///
    /// For an EXPLICIT tagged value, the flag of the inner value is returned.
    fn peek_encoding(&self, opts: &NodeOptions) -> Result<Encoding, BerError> {
        let b0 = self.peek_byte()?;
        if Class::from_identifier(b0) != Class::Universal {
            if let (class, Some(Tagging::Explicit(n))) = opts.resolve_tagging()? {
                let mut ahead = *self;
                let wrapper = Identifier::new(class, Encoding::Constructed, Tag(n)).to_byte()?;
                let inner = ahead.slice(wrapper)?;
                let b = inner.first().ok_or(BerError::Incomplete)?;
                return Ok(Encoding::from_identifier(*b));
            }
        }
        Ok(Encoding::from_identifier(b0))
    }

    /// Check the next value is a Universal segment of type `tag`
    fn check_segment(&self, tag: Tag) -> Result<(), BerError> {
        let id = self.peek_identifier()?;
        if !id.is_universal() || id.tag != tag {
            debug!("invalid segment at offset {}: {:?}", self.offset, id);
            return Err(BerError::InvalidSegment);
        }
        Ok(())
    }

    /// Read a BOOLEAN value
    ///
    /// Any non-zero content octet is `true`.
    pub fn boolean(&mut self, opts: &NodeOptions) -> Result<bool, BerError> {
        match self.section(Tag::Boolean, opts)? {
            [b] => Ok(*b != 0),
            _ => Err(BerError::InvalidLength),
        }
    }

    /// Read an INTEGER value of any size
    pub fn integer(&mut self, opts: &NodeOptions) -> Result<BigInt, BerError> {
        decode_integer(self.section(Tag::Integer, opts)?)
    }

    /// Read a non-negative INTEGER value fitting in a `u64`
    pub fn integer_u64(&mut self, opts: &NodeOptions) -> Result<u64, BerError> {
        match self.section(Tag::Integer, opts)? {
            [] => Err(BerError::InvalidLength),
            content => decode_array_uint8(content),
        }
    }

    /// Read a non-negative INTEGER value fitting in a `u32`
    pub fn integer_u32(&mut self, opts: &NodeOptions) -> Result<u32, BerError> {
        match self.section(Tag::Integer, opts)? {
            [] => Err(BerError::InvalidLength),
            content => decode_array_uint4(content),
        }
    }

    /// Read a NULL value
    pub fn null(&mut self, opts: &NodeOptions) -> Result<(), BerError> {
        if self.section(Tag::Null, opts)?.is_empty() {
            Ok(())
        } else {
            Err(BerError::InvalidLength)
        }
    }

    /// Read an OBJECT IDENTIFIER value
    pub fn object_identifier(&mut self, opts: &NodeOptions) -> Result<Oid, BerError> {
        Oid::from_der_content(self.section(Tag::Oid, opts)?)
    }

    /// Read a BIT STRING value
    ///
    /// The encoding is taken from the input. Segments of a constructed bit string
    /// are concatenated.
    pub fn bitstring(&mut self, opts: &NodeOptions) -> Result<BitString, BerError> {
        R::check_requested_encoding(opts.encoding)?;
        let encoding = self.peek_encoding(opts)?;
        R::check_encoding(encoding)?;
        let content = self.section(Tag::BitString, &opts.encoding(encoding))?;
        match encoding {
            Encoding::Primitive => match content.split_first() {
                Some((&unused, data)) => BitString::from_bytes(data, unused),
                None => Err(BerError::InvalidLength),
            },
            Encoding::Constructed => {
                let mut sub = self.nested(content)?;
                let mut value = BitString::default();
                while !sub.is_empty() {
                    sub.check_segment(Tag::BitString)?;
                    let segment = sub.bitstring(&NodeOptions::default())?;
                    value.append(&segment)?;
                }
                Ok(value)
            }
        }
    }

    /// Read an OCTET STRING value
    ///
    /// The encoding is taken from the input. Segments of a constructed octet
    /// string are concatenated.
    pub fn octetstring(&mut self, opts: &NodeOptions) -> Result<Vec<u8>, BerError> {
        R::check_requested_encoding(opts.encoding)?;
        let encoding = self.peek_encoding(opts)?;
        R::check_encoding(encoding)?;
        let content = self.section(Tag::OctetString, &opts.encoding(encoding))?;
        match encoding {
            Encoding::Primitive => Ok(content.to_vec()),
            Encoding::Constructed => {
                let mut sub = self.nested(content)?;
                let mut value = Vec::new();
                while !sub.is_empty() {
                    sub.check_segment(Tag::OctetString)?;
                    value.extend(sub.octetstring(&NodeOptions::default())?);
                }
                Ok(value)
            }
        }
    }

    /// Read a SEQUENCE, returning a deserializer over its contents
    ///
    /// The returned deserializer is independent: reading from it does not move
    /// this one, which is already positioned after the SEQUENCE.
    pub fn sequence(&mut self, opts: &NodeOptions) -> Result<Deserializer<'a, R>, BerError> {
        let content = self.section(Tag::Sequence, opts)?;
        self.nested(content)
    }
}
