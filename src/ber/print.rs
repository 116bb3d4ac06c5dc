use super::{BitStringContent, Node, NodeContent, OctetStringContent};
use rusticata_macros::debug;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrettyPrinterFlag {
    /// Print class, encoding and tagging of each node
    ShowHeader,
}

/// Pretty-print a node tree, one node per line
///
/// ```rust
/// # use der_codec::ber::{Node, NodeOptions};
/// let node = Node::sequence(
///     vec![Node::from_int(65537), Node::new_null()],
///     &NodeOptions::default(),
/// ).expect("valid sequence");
/// let s = format!("{:?}", node.as_pretty(0, 2));
/// assert_eq!(s, "Sequence\n  Integer(65537)\n  Null\n");
/// ```
pub struct PrettyNode<'a> {
    obj: &'a Node,
    indent: usize,
    inc: usize,

    flags: Vec<PrettyPrinterFlag>,
}

impl Node {
    pub fn as_pretty(&self, indent: usize, increment: usize) -> PrettyNode<'_> {
        PrettyNode {
            obj: self,
            indent,
            inc: increment,

            flags: Vec::new(),
        }
    }
}

impl<'a> PrettyNode<'a> {
    pub fn set_flag(&mut self, flag: PrettyPrinterFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    pub fn next_indent<'b>(&self, obj: &'b Node) -> PrettyNode<'b> {
        PrettyNode {
            obj,
            indent: self.indent + self.inc,
            inc: self.inc,
            flags: self.flags.to_vec(),
        }
    }

    fn print_children(&self, f: &mut fmt::Formatter, v: &[Node]) -> fmt::Result {
        for o in v {
            write!(f, "{:?}", self.next_indent(o))?;
        }
        Ok(())
    }
}

impl<'a> fmt::Debug for PrettyNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.indent > 0 {
            write!(f, "{:1$}", " ", self.indent)?;
        };
        if self.flags.contains(&PrettyPrinterFlag::ShowHeader) {
            let hdr = self.obj.header();
            write!(f, "[c:{}, e:{}", hdr.class, hdr.encoding)?;
            if let Some(n) = hdr.explicit {
                write!(f, ", explicit:{}", n)?;
            }
            if let Some(n) = hdr.implicit {
                write!(f, ", implicit:{}", n)?;
            }
            write!(f, "] ")?;
        };
        match self.obj.content() {
            NodeContent::Boolean(b) => writeln!(f, "Boolean({:?})", b),
            NodeContent::Integer(i) => writeln!(f, "Integer({})", i),
            NodeContent::Null => writeln!(f, "Null"),
            NodeContent::ObjectIdentifier(oid) => writeln!(f, "{:?}", oid),
            NodeContent::BitString(BitStringContent::Primitive(b)) => writeln!(
                f,
                "BitString({},{:?})",
                b.unused_bits(),
                debug::HexSlice(b.as_bytes())
            ),
            NodeContent::OctetString(OctetStringContent::Primitive(v)) => {
                writeln!(f, "OctetString({:?})", debug::HexSlice(v))
            }
            NodeContent::BitString(BitStringContent::Constructed(v)) => {
                writeln!(f, "BitString (constructed)")?;
                self.print_children(f, v)
            }
            NodeContent::OctetString(OctetStringContent::Constructed(v)) => {
                writeln!(f, "OctetString (constructed)")?;
                self.print_children(f, v)
            }
            NodeContent::Sequence(v) => {
                writeln!(f, "Sequence")?;
                self.print_children(f, v)
            }
        }
    }
}
