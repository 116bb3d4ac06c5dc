//! Object Identifiers (OIDs) in ASN.1 are a sequence of non-negative integers (arcs),
//! written in dotted-decimal notation.
//!
//! ```rust
//! # use der_codec::oid::Oid;
//! let oid: Oid = "1.2.840.113549.1.1.1".parse().expect("valid oid");
//! assert_eq!(oid.to_string(), "1.2.840.113549.1.1.1");
//! assert_eq!(&oid.to_der_content()[..3], &[0x2a, 0x86, 0x48]);
//! ```
use crate::error::BerError;
use std::fmt;
use std::slice;
use std::str::FromStr;

/// Object ID (OID) representation
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Oid(Vec<u64>);

impl Oid {
    /// Build an OID from an array of arcs
    ///
    /// The first arc must be 0, 1 or 2, the second one below 40 unless the first
    /// is 2, and at least two arcs are required (X.690 8.19.4).
    pub fn from(s: &[u64]) -> Result<Oid, BerError> {
        if s.len() < 2 || s[0] > 2 || (s[0] < 2 && s[1] >= 40) {
            return Err(BerError::InvalidOid);
        }
        // the first subidentifier must not overflow
        s[0].checked_mul(40)
            .and_then(|x| x.checked_add(s[1]))
            .ok_or(BerError::InvalidOid)?;
        Ok(Oid(s.to_vec()))
    }

    /// Decode the content octets of an OBJECT IDENTIFIER
    pub fn from_der_content(i: &[u8]) -> Result<Oid, BerError> {
        let mut arcs = Vec::new();
        let mut acc: u64 = 0;
        let mut pending = false;
        for &c in i {
            // leading 0x80 octets are forbidden (8.19.2)
            if !pending && c == 0x80 {
                return Err(BerError::InvalidOid);
            }
            if acc.leading_zeros() < 7 {
                return Err(BerError::InvalidOid);
            }
            acc = (acc << 7) | u64::from(c & 0b0111_1111);
            pending = c & 0b1000_0000 != 0;
            if !pending {
                if arcs.is_empty() {
                    // first subidentifier = X*40 + Y
                    let x = (acc / 40).min(2);
                    arcs.push(x);
                    arcs.push(acc - 40 * x);
                } else {
                    arcs.push(acc);
                }
                acc = 0;
            }
        }
        if pending || arcs.is_empty() {
            return Err(BerError::InvalidOid);
        }
        Ok(Oid(arcs))
    }

    /// Encode the OID as content octets (base-128 subidentifiers)
    pub fn to_der_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let first = self.0[0] * 40 + self.0[1];
        for &arc in std::iter::once(&first).chain(self.0[2..].iter()) {
            encode_base128(arc, &mut out);
        }
        out
    }

    /// Return an iterator over the arcs
    pub fn iter(&self) -> slice::Iter<u64> {
        self.0.iter()
    }

    /// Return the arcs as a slice
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Dotted-decimal representation of the OID
    pub fn to_id_string(&self) -> String {
        let v: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        v.join(".")
    }
}

/// Emit 7-bit groups, most significant first, with the continuation bit on all but the last
fn encode_base128(mut arc: u64, out: &mut Vec<u8>) {
    let mut groups = [0u8; 10];
    let mut n = 0;
    loop {
        groups[n] = (arc & 0x7f) as u8;
        n += 1;
        arc >>= 7;
        if arc == 0 {
            break;
        }
    }
    for idx in (0..n).rev() {
        let cont = if idx > 0 { 0x80 } else { 0x00 };
        out.push(groups[idx] | cont);
    }
}

impl FromStr for Oid {
    type Err = BerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs: Result<Vec<u64>, _> = s
            .split('.')
            .map(|a| {
                // u64::from_str accepts a leading '+'
                if a.is_empty() || !a.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(BerError::InvalidOid);
                }
                a.parse::<u64>().map_err(|_| BerError::InvalidOid)
            })
            .collect();
        Oid::from(&arcs?)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_id_string())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OID({})", self.to_id_string())
    }
}
