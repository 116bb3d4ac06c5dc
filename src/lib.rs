//! # BER/DER Codec
//!
//! A typed encoder and decoder for Basic Encoding Rules (BER [[X.690]]) and Distinguished
//! Encoding Rules (DER [[X.690]]), with parsing implemented using the
//! [nom](https://github.com/Geal/nom) parser combinator framework and serialization using
//! [cookie-factory](https://github.com/Geal/cookie-factory).
//!
//! # Design
//!
//! Values are represented as immutable [`Node`](ber/struct.Node.html) trees. Every node
//! carries its universal type, its content, and its tagging metadata (class, primitive or
//! constructed encoding, EXPLICIT or IMPLICIT tag number). Constructors validate all
//! options, so a node that exists can always be serialized.
//!
//! ```rust
//! use der_codec::ber::{Node, NodeOptions};
//!
//! let opts = NodeOptions::default();
//! let node = Node::sequence(vec![Node::from_int(65537), Node::new_null()], &opts)
//!     .expect("valid sequence");
//! let bytes = node.to_der().expect("serialization failed");
//! assert_eq!(&bytes, &[0x30, 0x06, 0x02, 0x03, 0x01, 0x00, 0x01, 0x05, 0x00]);
//! ```
//!
//! Decoding is schema driven: the caller knows the expected structure, and reads values in
//! order using a [`Deserializer`](ber/struct.Deserializer.html). Each read takes the same
//! tagging options as node construction.
//!
//! ```rust
//! use der_codec::ber::{Class, NodeOptions};
//! use der_codec::der::DerDeserializer;
//!
//! let bytes = [0x30, 0x08, 0xa0, 0x03, 0x02, 0x01, 0x02, 0x01, 0x01, 0xff];
//! let mut de = DerDeserializer::new(&bytes);
//! let mut seq = de.sequence(&NodeOptions::default()).expect("sequence");
//! let version_opts = NodeOptions::new().class(Class::ContextSpecific).explicit(0);
//! let version = seq.integer_u32(&version_opts).expect("version");
//! let flag = seq.boolean(&NodeOptions::default()).expect("flag");
//! assert_eq!(version, 2);
//! assert!(flag);
//! ```
//!
//! All fallible functions return a [`BerError`](error/enum.BerError.html).
//!
//! # Notes
//!
//! - Only the definite length form is supported, and tag numbers must not be greater
//!   than 30 (single identifier octet).
//! - `BerDeserializer` and `DerDeserializer` are the same type with different rules. The
//!   only difference is the verification of constraints on strings *during parsing*.
//! - INTEGER values can be of any size and are stored as `BigInt`. To get a simple value,
//!   use [`Node::as_u32`](ber/struct.Node.html#method.as_u32) or
//!   [`Deserializer::integer_u64`](ber/struct.Deserializer.html#method.integer_u64), which
//!   will return an error if the integer is too large or negative.
//!
//! # References
//!
//! - [[X.680]] Abstract Syntax Notation One (ASN.1): Specification of basic notation.
//! - [[X.690]] ASN.1 encoding rules: Specification of Basic Encoding Rules (BER), Canonical
//!   Encoding Rules (CER) and Distinguished Encoding Rules (DER).
//!
//! [X.680]: http://www.itu.int/rec/T-REC-X.680/en "Abstract Syntax Notation One (ASN.1):
//!   Specification of basic notation."
//! [X.690]: https://www.itu.int/rec/T-REC-X.690/en "ASN.1 encoding rules: Specification of
//!   Basic Encoding Rules (BER), Canonical Encoding Rules (CER) and Distinguished Encoding Rules
//!   (DER)."

#![deny(/*missing_docs,*/unsafe_code,
        unstable_features,
        unused_import_braces, unused_qualifications)]

pub mod ber;
pub mod bitstring;
pub mod der;
pub mod error;
pub mod oid;

pub use num_bigint;
