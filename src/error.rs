//! Error type and result aliases

use nom::error::{ErrorKind, ParseError};
use nom::IResult;
use std::fmt;

/// Holds the result of the internal parsing functions
///
/// The error type is [`BerError`], so parsers can be chained with `?` and the
/// codec never needs to convert between nom error types.
pub type BerResult<'a, O> = IResult<&'a [u8], O, BerError>;

/// Error returned by node construction, serialization and deserialization
///
/// A failed operation is never partially applied to its output. A failed
/// [`Deserializer`](../ber/struct.Deserializer.html) accessor, however, leaves the
/// cursor in an unspecified position and the decoder should be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BerError {
    /// Node does not have the expected type
    BerTypeError,

    /// Bit string characters must be `0` or `1`
    InvalidBitString,
    /// Padding bits do not match the length of the bit string, or an encoded
    /// unused-bit count is out of range
    InvalidPadding,
    /// Object identifier arcs are malformed or out of range
    InvalidOid,
    /// A SEQUENCE must contain at least one element
    EmptySequence,
    /// A constructed string contains a segment of the wrong type, or a non-final
    /// bit string segment that is not aligned on an octet
    InvalidSegment,

    /// `explicit` and `implicit` cannot be used together
    ConflictingTags,
    /// A tag number was given for a Universal class node
    UniversalTagged,
    /// A non-Universal class requires exactly one of `explicit` or `implicit`
    MissingTag,
    /// Tag numbers above 30 (high tag number form) are not supported
    TagNumberTooLarge,
    /// The type does not support the requested encoding
    UnsupportedEncoding,

    /// The identifier octet does not match the expected tag
    InvalidTag,
    /// Length octets are malformed, or a fixed-size value has the wrong length
    InvalidLength,
    /// The indefinite length form is not supported
    IndefiniteLength,
    /// Not enough input bytes
    Incomplete,
    /// Unparsed bytes remain in a section that must be consumed entirely
    TrailingData,
    /// Maximum nesting depth of constructed values was reached
    BerMaxDepth,

    /// Integer is too large to fit in the requested native type. Use `integer()`
    IntegerTooLarge,
    /// Integer is negative and was requested as an unsigned native type
    IntegerNegative,

    /// A DER canonical-form rule was violated
    DerConstraintFailed,
    /// The serializer failed to write its output
    SerializeError,

    /// A nom combinator failed for a reason not covered above
    NomError(ErrorKind),
}

impl BerError {
    /// Test if this error reports an invalid explicit/implicit/class combination
    ///
    /// Such errors come from the caller's schema, not from the data being decoded.
    pub fn is_tagging_error(&self) -> bool {
        matches!(
            self,
            BerError::ConflictingTags
                | BerError::UniversalTagged
                | BerError::MissingTag
                | BerError::TagNumberTooLarge
        )
    }
}

impl fmt::Display for BerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BerError::NomError(kind) => return write!(f, "nom error: {:?}", kind),
            BerError::BerTypeError => "node does not have the expected type",
            BerError::InvalidBitString => "bit string must only contain 0 and 1",
            BerError::InvalidPadding => "invalid bit string padding",
            BerError::InvalidOid => "invalid object identifier",
            BerError::EmptySequence => "sequence must not be empty",
            BerError::InvalidSegment => "invalid segment in constructed string",
            BerError::ConflictingTags => "explicit and implicit tags are mutually exclusive",
            BerError::UniversalTagged => "explicit/implicit tags require a non-Universal class",
            BerError::MissingTag => "non-Universal class requires an explicit or implicit tag",
            BerError::TagNumberTooLarge => "tag numbers greater than 30 are not supported",
            BerError::UnsupportedEncoding => "unsupported encoding for this type",
            BerError::InvalidTag => "unexpected tag",
            BerError::InvalidLength => "invalid length",
            BerError::IndefiniteLength => "indefinite length form is not supported",
            BerError::Incomplete => "unexpected end of input",
            BerError::TrailingData => "unexpected trailing data",
            BerError::BerMaxDepth => "maximum recursion depth reached",
            BerError::IntegerTooLarge => "integer too large",
            BerError::IntegerNegative => "integer is negative",
            BerError::DerConstraintFailed => "DER constraint failed",
            BerError::SerializeError => "serialization failed",
        };
        f.write_str(s)
    }
}

impl std::error::Error for BerError {}

impl<I> ParseError<I> for BerError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof => BerError::Incomplete,
            _ => BerError::NomError(kind),
        }
    }
    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<BerError> for nom::Err<BerError> {
    fn from(e: BerError) -> nom::Err<BerError> {
        nom::Err::Error(e)
    }
}

impl From<nom::Err<BerError>> for BerError {
    fn from(e: nom::Err<BerError>) -> BerError {
        match e {
            nom::Err::Incomplete(_) => BerError::Incomplete,
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

#[cfg(feature = "serialize")]
impl From<cookie_factory::GenError> for BerError {
    fn from(e: cookie_factory::GenError) -> BerError {
        log::debug!("serializer failure: {:?}", e);
        BerError::SerializeError
    }
}
