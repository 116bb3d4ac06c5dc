use super::{Class, Encoding};
use crate::error::BerError;
use rusticata_macros::newtype_enum;

/// Highest tag number that fits in a single identifier octet
pub const MAX_TAG_NUMBER: u8 = 30;

/// BER/DER universal tag number, as defined in X.680 section 8.4
///
/// Only the types handled by the codec are named.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Tag(pub u8);

newtype_enum! {
impl debug Tag {
    Boolean = 0x1,
    Integer = 0x2,
    BitString = 0x3,
    OctetString = 0x4,
    Null = 0x05,
    Oid = 0x06,
    Sequence = 0x10,
}
}

impl Tag {
    /// Encoding used when a value of this type is not otherwise configured
    #[inline]
    pub fn default_encoding(self) -> Encoding {
        match self {
            Tag::Sequence => Encoding::Constructed,
            _ => Encoding::Primitive,
        }
    }
}

/// Universal type number of an identifier octet
///
/// Only meaningful for Universal class identifiers.
#[inline]
pub fn universal_type(b: u8) -> u8 {
    b & 0b0001_1111
}

/// Identifier octet: class, primitive/constructed flag and tag number (X.690 8.1.2)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub class: Class,
    pub encoding: Encoding,
    pub tag: Tag,
}

impl Identifier {
    pub const fn new(class: Class, encoding: Encoding, tag: Tag) -> Self {
        Identifier {
            class,
            encoding,
            tag,
        }
    }

    /// Identifier of an untagged Universal value
    #[inline]
    pub const fn universal(encoding: Encoding, tag: Tag) -> Self {
        Identifier::new(Class::Universal, encoding, tag)
    }

    /// Pack the identifier into its wire form
    ///
    /// Fails if the tag number requires the high tag number form.
    pub fn to_byte(&self) -> Result<u8, BerError> {
        if self.tag.0 > MAX_TAG_NUMBER {
            return Err(BerError::TagNumberTooLarge);
        }
        Ok(self.class.bits() | self.encoding.bits() | self.tag.0)
    }

    /// Unpack an identifier octet
    ///
    /// The high tag number marker (`0x1f`) is rejected.
    pub fn from_byte(b: u8) -> Result<Self, BerError> {
        let tag = universal_type(b);
        if tag > MAX_TAG_NUMBER {
            return Err(BerError::TagNumberTooLarge);
        }
        Ok(Identifier {
            class: Class::from_identifier(b),
            encoding: Encoding::from_identifier(b),
            tag: Tag(tag),
        })
    }

    /// Test if object class is Universal
    #[inline]
    pub fn is_universal(&self) -> bool {
        self.class == Class::Universal
    }

    /// Test if object is constructed
    #[inline]
    pub fn is_constructed(&self) -> bool {
        self.encoding == Encoding::Constructed
    }
}
