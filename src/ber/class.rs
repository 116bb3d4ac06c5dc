use core::fmt;

/// BER Object class of tag
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Class {
    Universal = 0b00,
    Application = 0b01,
    ContextSpecific = 0b10,
    Private = 0b11,
}

impl Class {
    /// Class bits, as placed in the identifier octet
    #[inline]
    pub const fn bits(self) -> u8 {
        (self as u8) << 6
    }

    /// Extract the class from an identifier octet
    #[inline]
    pub fn from_identifier(b: u8) -> Class {
        match b >> 6 {
            0b00 => Class::Universal,
            0b01 => Class::Application,
            0b10 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::ContextSpecific => "CONTEXT-SPECIFIC",
            Class::Private => "PRIVATE",
        };
        write!(f, "{}", s)
    }
}

/// Primitive/constructed flag of an identifier (X.690 8.1.2.5)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Encoding {
    Primitive = 0,
    Constructed = 1,
}

impl Encoding {
    /// Encoding bit, as placed in the identifier octet
    #[inline]
    pub const fn bits(self) -> u8 {
        (self as u8) << 5
    }

    /// Extract the encoding from an identifier octet
    #[inline]
    pub fn from_identifier(b: u8) -> Encoding {
        if b & 0b0010_0000 != 0 {
            Encoding::Constructed
        } else {
            Encoding::Primitive
        }
    }

    #[inline]
    pub fn is_constructed(self) -> bool {
        self == Encoding::Constructed
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Primitive => f.write_str("PRIMITIVE"),
            Encoding::Constructed => f.write_str("CONSTRUCTED"),
        }
    }
}
