#![cfg(feature = "serialize")]

use der_codec::ber::*;
use der_codec::bitstring::BitString;
use der_codec::der::*;
use der_codec::error::BerError;
use der_codec::num_bigint::BigInt;
use hex_literal::hex;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_encode_sequence() {
    let node = Node::sequence(
        vec![Node::from_int(65537), Node::new_null()],
        &NodeOptions::default(),
    )
    .unwrap();
    let expected = hex!("30 06 02 03 01 00 01 05 00");
    assert_eq!(node.to_der(), Ok(expected.to_vec()));
    assert_eq!(to_ber_vec(&node), Ok(expected.to_vec()));
}

#[test_case(0, &hex!("02 01 00") ; "zero")]
#[test_case(127, &hex!("02 01 7f") ; "127")]
#[test_case(128, &hex!("02 02 00 80") ; "128")]
#[test_case(256, &hex!("02 02 01 00") ; "256")]
#[test_case(-1, &hex!("02 01 ff") ; "minus-1")]
#[test_case(-128, &hex!("02 01 80") ; "minus-128")]
#[test_case(-129, &hex!("02 02 ff 7f") ; "minus-129")]
fn tc_encode_integer(value: i64, out: &[u8]) {
    assert_eq!(Node::from_int(value).to_der(), Ok(out.to_vec()));
}

#[test_case(Node::boolean(true, &NodeOptions::new().class(Class::ContextSpecific).explicit(1)), &hex!("a1 03 01 01 ff") ; "explicit-boolean")]
#[test_case(Node::octet_string(&b"AB"[..], &NodeOptions::new().class(Class::Application).implicit(5)), &hex!("45 02 41 42") ; "application-octetstring")]
#[test_case(Node::null(&NodeOptions::new().class(Class::ContextSpecific).implicit(0)), &hex!("80 00") ; "implicit-null")]
#[test_case(Node::null(&NodeOptions::new().class(Class::Private).explicit(30)), &hex!("fe 02 05 00") ; "private-explicit-null")]
#[test_case(Node::object_identifier("1.2.840.113549.1.1.1", &NodeOptions::default()), &hex!("06 09 2a 86 48 86 f7 0d 01 01 01") ; "oid")]
#[test_case(Node::object_identifier("2.999.3", &NodeOptions::new().class(Class::ContextSpecific).implicit(6)), &hex!("86 03 88 37 03") ; "oid-large-first-arc")]
#[test_case(Node::bit_string(BitString::default(), &NodeOptions::default()), &hex!("03 01 00") ; "empty-bitstring")]
#[test_case(Node::sequence(vec![Node::from_bool(false)], &NodeOptions::new().class(Class::ContextSpecific).explicit(0)), &hex!("a0 05 30 03 01 01 00") ; "explicit-sequence")]
#[test_case(Node::sequence(vec![Node::from_bool(false)], &NodeOptions::new().class(Class::ContextSpecific).implicit(0)), &hex!("a0 03 01 01 00") ; "implicit-sequence")]
fn tc_encode_tagged(node: Result<Node, BerError>, out: &[u8]) {
    let node = node.expect("valid node");
    assert_eq!(node.to_ber(), Ok(out.to_vec()));
}

#[test]
fn test_encode_bitstring_padding() {
    let b = BitString::new("011011100101110111", Some("000111")).unwrap();
    let node = Node::bit_string(b, &NodeOptions::default()).unwrap();
    assert_eq!(node.to_der(), Ok(hex!("03 04 06 6e 5d c7").to_vec()));
}

#[test]
fn test_encode_constructed_strings() {
    let opts = NodeOptions::default();
    let node = Node::constructed_octet_string(
        vec![Node::from_bytes(b"AB"), Node::from_bytes(b"CD")],
        &opts,
    )
    .unwrap();
    assert_eq!(node.to_ber(), Ok(hex!("24 08 04 02 41 42 04 02 43 44").to_vec()));
    let seg = |s: &str| Node::from(BitString::new(s, None).unwrap());
    let node = Node::constructed_bit_string(vec![seg("10101010"), seg("101")], &opts).unwrap();
    let bytes = node.to_ber().unwrap();
    assert_eq!(&bytes, &hex!("23 08 03 02 00 aa 03 02 05 a0"));
    let mut de = BerDeserializer::new(&bytes);
    assert_eq!(de.bitstring(&opts), node.as_bitstring());
}

#[test]
fn test_encode_long_sequence() {
    let items = vec![Node::new_null(); 100];
    let node = Node::sequence(items, &NodeOptions::default()).unwrap();
    let bytes = node.to_der().unwrap();
    assert_eq!(&bytes[..3], &hex!("30 81 c8"));
    assert_eq!(bytes.len(), 203);
    let mut de = DerDeserializer::new(&bytes);
    let mut seq = de.sequence(&NodeOptions::default()).unwrap();
    let mut count = 0;
    while !seq.is_empty() {
        seq.null(&NodeOptions::default()).unwrap();
        count += 1;
    }
    assert_eq!(count, 100);
}

/// Serialize a structure using every type and tagging mode, then read it back
/// with the same options
#[test]
fn test_schema_roundtrip() {
    let default = NodeOptions::default();
    let version = NodeOptions::new().class(Class::ContextSpecific).explicit(0);
    let serial = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
    let key_id = NodeOptions::new().class(Class::ContextSpecific).implicit(1);
    let flags = NodeOptions::new().class(Class::Application).implicit(2);
    let bits = BitString::new("011011100101110111", None).unwrap();

    let node = Node::sequence(
        vec![
            Node::integer(2, &version).unwrap(),
            Node::from_int(serial.clone()),
            Node::sequence(
                vec![
                    Node::object_identifier("1.2.840.113549.1.1.11", &default).unwrap(),
                    Node::new_null(),
                ],
                &default,
            )
            .unwrap(),
            Node::octet_string(vec![0xde, 0xad, 0xbe, 0xef], &key_id).unwrap(),
            Node::bit_string(bits.clone(), &flags).unwrap(),
            Node::boolean(true, &default).unwrap(),
        ],
        &default,
    )
    .unwrap();
    let bytes = node.to_der().expect("serialization");

    let mut de = DerDeserializer::new(&bytes);
    let mut seq = de.sequence(&default).unwrap();
    let v = seq.integer_u32(&version).unwrap();
    let n = seq.integer(&default).unwrap();
    let mut alg = seq.sequence(&default).unwrap();
    let oid = alg.object_identifier(&default).unwrap();
    alg.null(&default).unwrap();
    assert!(alg.is_empty());
    let id = seq.octetstring(&key_id).unwrap();
    let b = seq.bitstring(&flags).unwrap();
    let flag = seq.boolean(&default).unwrap();
    assert!(seq.is_empty());
    assert!(de.is_empty());

    assert_eq!(v, 2);
    assert_eq!(n, serial);
    assert_eq!(oid.to_string(), "1.2.840.113549.1.1.11");
    assert_eq!(b, bits);

    // rebuild the tree from the decoded values
    let rebuilt = Node::sequence(
        vec![
            Node::integer(v, &version).unwrap(),
            Node::from_int(n),
            Node::sequence(vec![Node::from(oid), Node::new_null()], &default).unwrap(),
            Node::octet_string(id, &key_id).unwrap(),
            Node::bit_string(b, &flags).unwrap(),
            Node::boolean(flag, &default).unwrap(),
        ],
        &default,
    )
    .unwrap();
    assert_eq!(rebuilt, node);
    assert_eq!(rebuilt.to_ber(), Ok(bytes));
}

#[test]
fn test_node_accessors_after_encoding() {
    let node = Node::sequence(
        vec![Node::from_bytes(b"abc"), Node::from_int(-5)],
        &NodeOptions::default(),
    )
    .unwrap();
    assert_eq!(node[0].as_octetstring(), Ok(b"abc".to_vec()));
    assert_eq!(node[1].as_bigint(), Ok(&BigInt::from(-5)));
    assert_eq!(node[1].as_u32(), Err(BerError::IntegerNegative));
    assert_eq!(node[0].as_bool(), Err(BerError::BerTypeError));
}
