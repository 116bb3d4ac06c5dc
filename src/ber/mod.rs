//! Basic Encoding Rules (BER) node model, serializer and deserializer

mod class;
mod deserializer;
mod integer;
mod length;
mod node;
mod print;
#[cfg(feature = "serialize")]
mod serialize;
mod tag;

pub use crate::ber::class::*;
pub use crate::ber::deserializer::*;
pub use crate::ber::integer::{decode_integer, encode_integer};
pub use crate::ber::length::{decode_length, encode_length, parse_ber_length};
pub use crate::ber::node::*;
pub use crate::ber::print::*;
#[cfg(feature = "serialize")]
pub use crate::ber::serialize::*;
pub use crate::ber::tag::*;
