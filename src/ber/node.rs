use super::integer::{decode_array_uint4, decode_array_uint8, encode_integer};
use super::{Class, Encoding, Identifier, Tag, MAX_TAG_NUMBER};
use crate::bitstring::BitString;
use crate::error::BerError;
use crate::oid::Oid;
use num_bigint::BigInt;
use std::ops::Index;

/// Tagging options for node construction and deserialization
///
/// All fields are optional, but an `explicit` or `implicit` tag number needs a
/// non-Universal class, and a non-Universal class needs a tag number.
///
/// When decoding an IMPLICIT value, `encoding` selects the primitive or
/// constructed form expected on the wire. If it is not set, the type's default
/// encoding is used (constructed for SEQUENCE, primitive otherwise). BIT STRING
/// and OCTET STRING always take the encoding from the wire.
///
/// ```rust
/// # use der_codec::ber::{Class, Encoding, NodeOptions};
/// // [0] EXPLICIT
/// let opts = NodeOptions::new().class(Class::ContextSpecific).explicit(0);
/// // [APPLICATION 3] IMPLICIT, constructed
/// let opts = NodeOptions::new()
///     .class(Class::Application)
///     .implicit(3)
///     .encoding(Encoding::Constructed);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeOptions {
    pub encoding: Option<Encoding>,
    pub class: Option<Class>,
    pub explicit: Option<u8>,
    pub implicit: Option<u8>,
}

/// Resolved EXPLICIT or IMPLICIT tagging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tagging {
    Explicit(u8),
    Implicit(u8),
}

impl NodeOptions {
    pub fn new() -> Self {
        NodeOptions::default()
    }

    /// Set the primitive/constructed encoding
    #[inline]
    pub fn encoding(self, encoding: Encoding) -> Self {
        NodeOptions {
            encoding: Some(encoding),
            ..self
        }
    }

    /// Set the class
    #[inline]
    pub fn class(self, class: Class) -> Self {
        NodeOptions {
            class: Some(class),
            ..self
        }
    }

    /// Set an EXPLICIT tag number
    #[inline]
    pub fn explicit(self, tag: u8) -> Self {
        NodeOptions {
            explicit: Some(tag),
            ..self
        }
    }

    /// Set an IMPLICIT tag number
    #[inline]
    pub fn implicit(self, tag: u8) -> Self {
        NodeOptions {
            implicit: Some(tag),
            ..self
        }
    }

    /// Check the class/explicit/implicit combination
    pub(crate) fn resolve_tagging(&self) -> Result<(Class, Option<Tagging>), BerError> {
        let tagging = match (self.explicit, self.implicit) {
            (Some(_), Some(_)) => return Err(BerError::ConflictingTags),
            (Some(n), None) => Some(Tagging::Explicit(n)),
            (None, Some(n)) => Some(Tagging::Implicit(n)),
            (None, None) => None,
        };
        match (self.class, tagging) {
            (None, Some(_)) | (Some(Class::Universal), Some(_)) => {
                Err(BerError::UniversalTagged)
            }
            (Some(class), None) if class != Class::Universal => Err(BerError::MissingTag),
            (_, Some(Tagging::Explicit(n))) | (_, Some(Tagging::Implicit(n)))
                if n > MAX_TAG_NUMBER =>
            {
                Err(BerError::TagNumberTooLarge)
            }
            (Some(class), Some(t)) => Ok((class, Some(t))),
            (_, None) => Ok((Class::Universal, None)),
        }
    }
}

/// Tagging metadata carried by every node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub class: Class,
    pub encoding: Encoding,
    pub explicit: Option<u8>,
    pub implicit: Option<u8>,
}

impl Header {
    /// Validate options for a node of a type supporting the `allowed` encodings
    ///
    /// The first allowed encoding is the default one.
    fn from_options(opts: &NodeOptions, allowed: &[Encoding]) -> Result<Header, BerError> {
        let (class, tagging) = opts.resolve_tagging()?;
        let encoding = opts.encoding.unwrap_or(allowed[0]);
        if !allowed.contains(&encoding) {
            return Err(BerError::UnsupportedEncoding);
        }
        let (explicit, implicit) = match tagging {
            Some(Tagging::Explicit(n)) => (Some(n), None),
            Some(Tagging::Implicit(n)) => (None, Some(n)),
            None => (None, None),
        };
        Ok(Header {
            class,
            encoding,
            explicit,
            implicit,
        })
    }

    fn universal(encoding: Encoding) -> Header {
        Header {
            class: Class::Universal,
            encoding,
            explicit: None,
            implicit: None,
        }
    }

    /// Test if object class is Universal
    #[inline]
    pub fn is_universal(&self) -> bool {
        self.class == Class::Universal
    }

    /// Test if object is primitive
    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.encoding == Encoding::Primitive
    }

    /// Test if object is constructed
    #[inline]
    pub fn is_constructed(&self) -> bool {
        self.encoding == Encoding::Constructed
    }

    /// Identifier of the outermost TLV of a node of type `tag`
    pub fn identifier(&self, tag: Tag) -> Identifier {
        match self.explicit {
            Some(n) => Identifier::new(self.class, Encoding::Constructed, Tag(n)),
            None => self.content_identifier(tag),
        }
    }

    /// Identifier of the TLV holding the content octets
    ///
    /// Same as `identifier`, except for EXPLICIT tagging where this is the
    /// universal identifier of the wrapped value.
    pub fn content_identifier(&self, tag: Tag) -> Identifier {
        match self.implicit {
            Some(n) => Identifier::new(self.class, self.encoding, Tag(n)),
            None => Identifier::universal(self.encoding, tag),
        }
    }
}

/// Content of a BIT STRING node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BitStringContent {
    Primitive(BitString),
    /// Segments, each a Universal BIT STRING node
    Constructed(Vec<Node>),
}

/// Content of an OCTET STRING node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OctetStringContent {
    Primitive(Vec<u8>),
    /// Segments, each a Universal OCTET STRING node
    Constructed(Vec<Node>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeContent {
    Boolean(bool),
    Integer(BigInt),
    BitString(BitStringContent),
    OctetString(OctetStringContent),
    Null,
    ObjectIdentifier(Oid),
    Sequence(Vec<Node>),
}

impl NodeContent {
    #[rustfmt::skip]
    pub fn tag(&self) -> Tag {
        match *self {
            NodeContent::Boolean(_)          => Tag::Boolean,
            NodeContent::Integer(_)          => Tag::Integer,
            NodeContent::BitString(_)        => Tag::BitString,
            NodeContent::OctetString(_)      => Tag::OctetString,
            NodeContent::Null                => Tag::Null,
            NodeContent::ObjectIdentifier(_) => Tag::Oid,
            NodeContent::Sequence(_)         => Tag::Sequence,
        }
    }
}

/// An ASN.1 value with its tagging metadata
///
/// Nodes are immutable once built. All constructors validate their options and
/// payload, and never adjust invalid input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    header: Header,
    content: NodeContent,
}

const PRIMITIVE: &[Encoding] = &[Encoding::Primitive];
const CONSTRUCTED: &[Encoding] = &[Encoding::Constructed];

impl Node {
    /// Build a BOOLEAN node
    pub fn boolean(value: bool, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::Boolean(value),
        })
    }

    /// Build an INTEGER node
    pub fn integer<I: Into<BigInt>>(value: I, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::Integer(value.into()),
        })
    }

    /// Build a primitive BIT STRING node
    ///
    /// ```rust
    /// # use der_codec::ber::{Node, NodeOptions};
    /// # use der_codec::bitstring::BitString;
    /// let bits = BitString::new("011011100101110111", None).expect("valid bits");
    /// let node = Node::bit_string(bits, &NodeOptions::default()).expect("valid node");
    /// ```
    pub fn bit_string(value: BitString, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::BitString(BitStringContent::Primitive(value)),
        })
    }

    /// Build a constructed BIT STRING node from segments
    ///
    /// Each segment must be a Universal BIT STRING node, and every segment but the
    /// last must end on an octet boundary.
    pub fn constructed_bit_string(segments: Vec<Node>, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, CONSTRUCTED)?;
        let count = segments.len();
        for (idx, s) in segments.iter().enumerate() {
            if !s.header.is_universal() {
                return Err(BerError::InvalidSegment);
            }
            let len = s.bit_len().ok_or(BerError::InvalidSegment)?;
            if idx + 1 < count && len % 8 != 0 {
                return Err(BerError::InvalidSegment);
            }
        }
        Ok(Node {
            header,
            content: NodeContent::BitString(BitStringContent::Constructed(segments)),
        })
    }

    /// Build a primitive OCTET STRING node
    pub fn octet_string<B: Into<Vec<u8>>>(value: B, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::OctetString(OctetStringContent::Primitive(value.into())),
        })
    }

    /// Build a constructed OCTET STRING node from segments
    ///
    /// Each segment must be a Universal OCTET STRING node.
    pub fn constructed_octet_string(segments: Vec<Node>, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, CONSTRUCTED)?;
        let valid = segments.iter().all(|s| {
            s.header.is_universal() && matches!(s.content, NodeContent::OctetString(_))
        });
        if !valid {
            return Err(BerError::InvalidSegment);
        }
        Ok(Node {
            header,
            content: NodeContent::OctetString(OctetStringContent::Constructed(segments)),
        })
    }

    /// Build a NULL node
    pub fn null(opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::Null,
        })
    }

    /// Build an OBJECT IDENTIFIER node from its dotted-decimal form
    ///
    /// ```rust
    /// # use der_codec::ber::{Node, NodeOptions};
    /// let rsa = Node::object_identifier("1.2.840.113549.1.1.1", &NodeOptions::default());
    /// assert!(rsa.is_ok());
    /// let bad = Node::object_identifier("3.1", &NodeOptions::default());
    /// assert!(bad.is_err());
    /// ```
    pub fn object_identifier(oid: &str, opts: &NodeOptions) -> Result<Node, BerError> {
        let oid: Oid = oid.parse()?;
        Node::from_oid(oid, opts)
    }

    /// Build an OBJECT IDENTIFIER node
    pub fn from_oid(oid: Oid, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, PRIMITIVE)?;
        Ok(Node {
            header,
            content: NodeContent::ObjectIdentifier(oid),
        })
    }

    /// Build a SEQUENCE node
    pub fn sequence(items: Vec<Node>, opts: &NodeOptions) -> Result<Node, BerError> {
        let header = Header::from_options(opts, CONSTRUCTED)?;
        if items.is_empty() {
            return Err(BerError::EmptySequence);
        }
        Ok(Node {
            header,
            content: NodeContent::Sequence(items),
        })
    }

    /// Build an untagged BOOLEAN node
    pub fn from_bool(value: bool) -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::Boolean(value),
        }
    }

    /// Build an untagged INTEGER node
    pub fn from_int<I: Into<BigInt>>(value: I) -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::Integer(value.into()),
        }
    }

    /// Build an untagged primitive OCTET STRING node
    pub fn from_bytes(value: &[u8]) -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::OctetString(OctetStringContent::Primitive(value.to_vec())),
        }
    }

    /// Build an untagged NULL node
    pub fn new_null() -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::Null,
        }
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[inline]
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Universal type of the node, regardless of tagging
    #[inline]
    pub fn tag(&self) -> Tag {
        self.content.tag()
    }

    /// Number of bits of a BIT STRING node, segments included
    pub fn bit_len(&self) -> Option<usize> {
        match self.content {
            NodeContent::BitString(BitStringContent::Primitive(ref b)) => Some(b.len()),
            NodeContent::BitString(BitStringContent::Constructed(ref v)) => {
                v.iter().map(Node::bit_len).sum()
            }
            _ => None,
        }
    }

    /// Attempt to read a boolean value from the node.
    pub fn as_bool(&self) -> Result<bool, BerError> {
        match self.content {
            NodeContent::Boolean(b) => Ok(b),
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Attempt to read an integer value from the node.
    pub fn as_bigint(&self) -> Result<&BigInt, BerError> {
        match self.content {
            NodeContent::Integer(ref i) => Ok(i),
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Attempt to read an integer value from the node.
    /// This can fail if the node is not an integer, or if it is too large.
    ///
    /// ```rust
    /// # use der_codec::ber::Node;
    /// let node = Node::from_int(0x10001);
    /// assert_eq!(node.as_u64(), Ok(0x10001));
    /// ```
    pub fn as_u64(&self) -> Result<u64, BerError> {
        self.as_bigint()
            .and_then(|i| decode_array_uint8(&encode_integer(i)))
    }

    /// Attempt to read an integer value from the node.
    /// This can fail if the node is not an integer, or if it is too large.
    pub fn as_u32(&self) -> Result<u32, BerError> {
        self.as_bigint()
            .and_then(|i| decode_array_uint4(&encode_integer(i)))
    }

    /// Attempt to read an OID value from the node.
    pub fn as_oid(&self) -> Result<&Oid, BerError> {
        match self.content {
            NodeContent::ObjectIdentifier(ref o) => Ok(o),
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Attempt to read a BIT STRING value from the node.
    ///
    /// Constructed bit strings are concatenated, so the value is owned.
    pub fn as_bitstring(&self) -> Result<BitString, BerError> {
        match self.content {
            NodeContent::BitString(BitStringContent::Primitive(ref b)) => Ok(b.clone()),
            NodeContent::BitString(BitStringContent::Constructed(ref v)) => {
                let mut out = BitString::default();
                for s in v {
                    out.append(&s.as_bitstring()?)?;
                }
                Ok(out)
            }
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Attempt to read an OCTET STRING value from the node.
    ///
    /// Constructed octet strings are concatenated, so the value is owned.
    pub fn as_octetstring(&self) -> Result<Vec<u8>, BerError> {
        match self.content {
            NodeContent::OctetString(OctetStringContent::Primitive(ref b)) => Ok(b.clone()),
            NodeContent::OctetString(OctetStringContent::Constructed(ref v)) => {
                let mut out = Vec::new();
                for s in v {
                    out.extend(s.as_octetstring()?);
                }
                Ok(out)
            }
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Attempt to extract the list of nodes from a SEQUENCE.
    pub fn as_sequence(&self) -> Result<&[Node], BerError> {
        match self.content {
            NodeContent::Sequence(ref v) => Ok(v),
            _ => Err(BerError::BerTypeError),
        }
    }

    /// Test if the node is NULL
    #[inline]
    pub fn is_null(&self) -> bool {
        self.content == NodeContent::Null
    }
}

impl From<Oid> for Node {
    fn from(oid: Oid) -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::ObjectIdentifier(oid),
        }
    }
}

impl From<BitString> for Node {
    fn from(b: BitString) -> Node {
        Node {
            header: Header::universal(Encoding::Primitive),
            content: NodeContent::BitString(BitStringContent::Primitive(b)),
        }
    }
}

impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, idx: usize) -> &Node {
        match self.content {
            NodeContent::Sequence(ref v) if idx < v.len() => &v[idx],
            _ => panic!("Try to index Node which is not a sequence"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagging_invariants() {
        let opts = NodeOptions::new().explicit(0).implicit(1);
        assert_eq!(Node::null(&opts), Err(BerError::ConflictingTags));
        let opts = NodeOptions::new().class(Class::Application);
        assert_eq!(Node::null(&opts), Err(BerError::MissingTag));
        let opts = NodeOptions::new().class(Class::Universal).explicit(0);
        assert_eq!(Node::null(&opts), Err(BerError::UniversalTagged));
        let opts = NodeOptions::new().class(Class::ContextSpecific).implicit(31);
        assert_eq!(Node::null(&opts), Err(BerError::TagNumberTooLarge));
        let opts = NodeOptions::new().class(Class::Universal);
        assert!(Node::null(&opts).is_ok());
    }

    #[test]
    fn test_tag_number_requires_class() {
        assert_eq!(
            Node::null(&NodeOptions::new().explicit(0)),
            Err(BerError::UniversalTagged)
        );
        assert_eq!(
            Node::boolean(true, &NodeOptions::new().implicit(2)),
            Err(BerError::UniversalTagged)
        );
        assert_eq!(
            Node::sequence(vec![Node::new_null()], &NodeOptions::new().explicit(1)),
            Err(BerError::UniversalTagged)
        );
    }

    #[test]
    fn test_header_identifiers() {
        let opts = NodeOptions::new().class(Class::ContextSpecific).explicit(2);
        let node = Node::boolean(true, &opts).unwrap();
        assert_eq!(node.header().class, Class::ContextSpecific);
        assert_eq!(node.header().explicit, Some(2));
        assert_eq!(node.header().identifier(Tag::Boolean).to_byte(), Ok(0xa2));
        assert_eq!(node.header().content_identifier(Tag::Boolean).to_byte(), Ok(0x01));
        let node = Node::boolean(true, &NodeOptions::new().class(Class::Private).implicit(4)).unwrap();
        assert_eq!(node.header().class, Class::Private);
        assert_eq!(node.header().identifier(Tag::Boolean).to_byte(), Ok(0xc4));
        assert_eq!(node.header().content_identifier(Tag::Boolean).to_byte(), Ok(0xc4));
        let node = Node::from_int(3);
        assert_eq!(node.header().identifier(Tag::Integer).to_byte(), Ok(0x02));
    }

    #[test]
    fn test_unsupported_encoding() {
        let opts = NodeOptions::new().encoding(Encoding::Constructed);
        assert_eq!(Node::integer(1, &opts), Err(BerError::UnsupportedEncoding));
        assert_eq!(Node::boolean(true, &opts), Err(BerError::UnsupportedEncoding));
        assert_eq!(Node::null(&opts), Err(BerError::UnsupportedEncoding));
        let opts = NodeOptions::new().encoding(Encoding::Primitive);
        assert_eq!(
            Node::sequence(vec![Node::new_null()], &opts),
            Err(BerError::UnsupportedEncoding)
        );
        assert_eq!(
            Node::constructed_octet_string(vec![], &opts),
            Err(BerError::UnsupportedEncoding)
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(
            Node::sequence(vec![], &NodeOptions::default()),
            Err(BerError::EmptySequence)
        );
    }

    #[test]
    fn test_constructed_bitstring_alignment() {
        let opts = NodeOptions::default();
        let seg = |s: &str| Node::from(BitString::new(s, None).unwrap());
        let node = Node::constructed_bit_string(vec![seg("10101010"), seg("101")], &opts).unwrap();
        assert_eq!(node.bit_len(), Some(11));
        assert_eq!(node.as_bitstring().unwrap().bits(), "10101010101");
        assert_eq!(
            Node::constructed_bit_string(vec![seg("101"), seg("10101010")], &opts),
            Err(BerError::InvalidSegment)
        );
        // segments must be universal bit strings
        let tagged = Node::bit_string(BitString::default(), &NodeOptions::new().class(Class::ContextSpecific).implicit(0)).unwrap();
        assert_eq!(
            Node::constructed_bit_string(vec![tagged], &opts),
            Err(BerError::InvalidSegment)
        );
        assert_eq!(
            Node::constructed_bit_string(vec![Node::new_null()], &opts),
            Err(BerError::InvalidSegment)
        );
    }

    #[test]
    fn test_constructed_octetstring() {
        let opts = NodeOptions::default();
        let node = Node::constructed_octet_string(
            vec![Node::from_bytes(b"ab"), Node::from_bytes(b"cd")],
            &opts,
        )
        .unwrap();
        assert_eq!(node.as_octetstring(), Ok(b"abcd".to_vec()));
        assert_eq!(
            Node::constructed_octet_string(vec![Node::from_int(1)], &opts),
            Err(BerError::InvalidSegment)
        );
    }

    #[test]
    fn test_accessors() {
        let node = Node::sequence(
            vec![Node::from_int(65537), Node::new_null(), Node::from_bool(true)],
            &NodeOptions::default(),
        )
        .unwrap();
        assert_eq!(node[0].as_u32(), Ok(65537));
        assert!(node[1].is_null());
        assert_eq!(node[2].as_bool(), Ok(true));
        assert_eq!(node[2].as_u64(), Err(BerError::BerTypeError));
        assert_eq!(node.as_sequence().map(|s| s.len()), Ok(3));
        assert_eq!(Node::from_int(-1).as_u64(), Err(BerError::IntegerNegative));
    }
}
