//! Distinguished Encoding Rules (DER) serializer and deserializer
//!
//! All functions in this module use the BER functions (see the `ber` module)
//! internally, adding constraints verification where needed.
//!
//! The only DER constraint enforced is that BIT STRING and OCTET STRING values
//! must use the primitive encoding. Other canonical-form rules (minimal
//! integer encoding, minimal length octets) are already satisfied by the
//! serializer, and are not verified by the deserializer.

use crate::ber::{Deserializer, Encoding, Node, NodeContent, Rules};
use crate::error::BerError;
use log::debug;

/// Distinguished Encoding Rules: strings must be primitive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Der;

impl Rules for Der {
    fn check_requested_encoding(requested: Option<Encoding>) -> Result<(), BerError> {
        if requested == Some(Encoding::Constructed) {
            debug!("DER: constructed encoding requested for a string");
            return Err(BerError::DerConstraintFailed);
        }
        Ok(())
    }

    fn check_encoding(found: Encoding) -> Result<(), BerError> {
        if found == Encoding::Constructed {
            debug!("DER: constructed string found in input");
            return Err(BerError::DerConstraintFailed);
        }
        Ok(())
    }
}

/// Deserializer using the Distinguished Encoding Rules
///
/// ```rust
/// # use der_codec::der::DerDeserializer;
/// # use der_codec::ber::NodeOptions;
/// # use der_codec::error::BerError;
/// let opts = NodeOptions::default();
/// let mut de = DerDeserializer::new(&[0x04, 0x02, 0x41, 0x42]);
/// assert_eq!(de.octetstring(&opts), Ok(b"AB".to_vec()));
///
/// // constructed OCTET STRING
/// let mut de = DerDeserializer::new(&[0x24, 0x04, 0x04, 0x02, 0x41, 0x42]);
/// assert_eq!(de.octetstring(&opts), Err(BerError::DerConstraintFailed));
/// ```
pub type DerDeserializer<'a> = Deserializer<'a, Der>;

/// Verify DER constraints on a node and its children
pub fn der_check_node(node: &Node) -> Result<(), BerError> {
    match node.content() {
        NodeContent::BitString(_) | NodeContent::OctetString(_)
            if node.header().is_constructed() =>
        {
            debug!("DER: constructed {} cannot be serialized", node.tag());
            Err(BerError::DerConstraintFailed)
        }
        NodeContent::Sequence(v) => v.iter().try_for_each(der_check_node),
        _ => Ok(()),
    }
}

/// Encode a node using the Distinguished Encoding Rules
///
/// The whole tree is checked before any output is produced.
#[cfg(feature = "serialize")]
pub fn to_der_vec(node: &Node) -> Result<Vec<u8>, BerError> {
    der_check_node(node)?;
    crate::ber::to_ber_vec(node)
}

#[cfg(feature = "serialize")]
impl Node {
    /// Encode the node using the Distinguished Encoding Rules
    ///
    /// Fails with `DerConstraintFailed` if the node, or any of its children,
    /// is a constructed BIT STRING or OCTET STRING.
    pub fn to_der(&self) -> Result<Vec<u8>, BerError> {
        to_der_vec(self)
    }
}
