use super::length::ber_encode_length;
use super::*;
use crate::error::BerError;
use cookie_factory::bytes::be_u8;
use cookie_factory::combinator::slice;
use cookie_factory::gen_simple;
use cookie_factory::sequence::tuple;
use cookie_factory::{GenError, SerializeFn, WriteContext};
use std::io::Write;

/// Custom error code: identifier cannot be packed in a single octet
pub const SERIALIZE_TAG_ERROR: u32 = 1;

/// Encode an identifier octet (X.690 8.1.2)
fn ber_encode_identifier<'a, W: Write + 'a>(id: Identifier) -> impl SerializeFn<W> + 'a {
    move |out: WriteContext<W>| {
        let b0 = id
            .to_byte()
            .map_err(|_| GenError::CustomError(SERIALIZE_TAG_ERROR))?;
        be_u8(b0)(out)
    }
}

/// Encode a complete TLV from an identifier and already encoded content
fn ber_encode_tlv<'a, W: Write + AsRef<[u8]> + 'a>(
    id: Identifier,
    content: W,
) -> impl SerializeFn<W> + 'a {
    move |out: WriteContext<W>| {
        let len = content.as_ref().len();
        tuple((
            ber_encode_identifier(id),
            ber_encode_length(len),
            slice(content.as_ref()),
        ))(out)
    }
}

fn ber_encode_nodes<'a, W: Write + Default + AsRef<[u8]> + 'a>(
    v: &'a [Node],
) -> impl SerializeFn<W> + 'a {
    move |mut out: WriteContext<W>| {
        for node in v {
            out = ber_encode_node(node)(out)?;
        }
        Ok(out)
    }
}

fn ber_encode_node_content<'a, W: Write + Default + AsRef<[u8]> + 'a>(
    c: &'a NodeContent,
) -> impl SerializeFn<W> + 'a {
    move |out: WriteContext<W>| match c {
        NodeContent::Boolean(b) => {
            let b0 = if *b { 0xff } else { 0x00 };
            be_u8(b0)(out)
        }
        NodeContent::Integer(i) => slice(encode_integer(i))(out),
        NodeContent::BitString(BitStringContent::Primitive(b)) => {
            tuple((be_u8(b.unused_bits()), slice(b.as_bytes())))(out)
        }
        NodeContent::OctetString(OctetStringContent::Primitive(s)) => slice(s)(out),
        NodeContent::Null => Ok(out),
        NodeContent::ObjectIdentifier(oid) => slice(oid.to_der_content())(out),
        NodeContent::BitString(BitStringContent::Constructed(v))
        | NodeContent::OctetString(OctetStringContent::Constructed(v))
        | NodeContent::Sequence(v) => ber_encode_nodes(v)(out),
    }
}

/// Encode a node and its children
///
/// An IMPLICIT tag replaces the universal identifier, an EXPLICIT tag wraps the
/// untagged encoding in a constructed TLV (X.690 8.14).
pub fn ber_encode_node<'a, 'b: 'a, W: Write + Default + AsRef<[u8]> + 'a>(
    node: &'b Node,
) -> impl SerializeFn<W> + 'a {
    move |out: WriteContext<W>| {
        let header = node.header();
        let content = gen_simple(ber_encode_node_content(node.content()), W::default())?;
        let id = header.content_identifier(node.tag());
        if header.explicit.is_some() {
            let inner = gen_simple(ber_encode_tlv(id, content), W::default())?;
            ber_encode_tlv(header.identifier(node.tag()), inner)(out)
        } else {
            ber_encode_tlv(id, content)(out)
        }
    }
}

/// Encode a node using the Basic Encoding Rules
///
/// ```rust
/// # use der_codec::ber::{to_ber_vec, Node, NodeOptions};
/// let node = Node::sequence(
///     vec![Node::from_int(65537), Node::new_null()],
///     &NodeOptions::default(),
/// ).expect("valid sequence");
/// let v = to_ber_vec(&node).expect("serialization failed");
/// assert_eq!(&v, &[0x30, 0x06, 0x02, 0x03, 0x01, 0x00, 0x01, 0x05, 0x00]);
/// ```
pub fn to_ber_vec(node: &Node) -> Result<Vec<u8>, BerError> {
    let v = gen_simple(ber_encode_node(node), Vec::new())?;
    Ok(v)
}

impl Node {
    /// Encode the node using the Basic Encoding Rules
    pub fn to_ber(&self) -> Result<Vec<u8>, BerError> {
        to_ber_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstring::BitString;
    use hex_literal::hex;

    #[test]
    fn test_encode_bool() {
        assert_eq!(Node::from_bool(true).to_ber(), Ok(vec![0x01, 0x01, 0xff]));
        assert_eq!(Node::from_bool(false).to_ber(), Ok(vec![0x01, 0x01, 0x00]));
    }

    #[test]
    fn test_encode_bitstring() {
        let b = BitString::new("011011100101110111", None).unwrap();
        assert_eq!(Node::from(b).to_ber(), Ok(hex!("03 04 06 6e 5d c0").to_vec()));
    }

    #[test]
    fn test_encode_implicit() {
        let opts = NodeOptions::new().class(Class::ContextSpecific).implicit(2);
        let node = Node::integer(0x10001, &opts).unwrap();
        assert_eq!(node.to_ber(), Ok(hex!("82 03 01 00 01").to_vec()));
        let opts = NodeOptions::new().class(Class::Application).implicit(1);
        let node = Node::sequence(vec![Node::new_null()], &opts).unwrap();
        assert_eq!(node.to_ber(), Ok(hex!("61 02 05 00").to_vec()));
    }

    #[test]
    fn test_encode_explicit() {
        let opts = NodeOptions::new().class(Class::ContextSpecific).explicit(0);
        let node = Node::integer(2, &opts).unwrap();
        assert_eq!(node.to_ber(), Ok(hex!("a0 03 02 01 02").to_vec()));
        let opts = NodeOptions::new().class(Class::Application).explicit(4);
        let node = Node::sequence(vec![Node::from_bool(true)], &opts).unwrap();
        let v = node.to_ber().unwrap();
        assert_eq!(&v, &hex!("64 05 30 03 01 01 ff"));
        assert_eq!(node.header().identifier(node.tag()).to_byte(), Ok(v[0]));
    }

    #[test]
    fn test_encode_long_content() {
        let node = Node::from_bytes(&[0x41; 200]);
        let v = node.to_ber().unwrap();
        assert_eq!(&v[..3], &hex!("04 81 c8"));
        assert_eq!(v.len(), 203);
    }
}
