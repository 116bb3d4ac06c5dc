#![no_main]
use der_codec::ber::{BerDeserializer, Deserializer, NodeOptions, Rules, Tag};
use libfuzzer_sys::fuzz_target;

/// Read universal values until the input is exhausted or invalid
fn walk<R: Rules>(mut de: Deserializer<R>) {
    let opts = NodeOptions::default();
    while let Ok(id) = de.peek_identifier() {
        let ok = match id.tag {
            Tag::Boolean => de.boolean(&opts).is_ok(),
            Tag::Integer => de.integer(&opts).is_ok(),
            Tag::BitString => de.bitstring(&opts).is_ok(),
            Tag::OctetString => de.octetstring(&opts).is_ok(),
            Tag::Null => de.null(&opts).is_ok(),
            Tag::Oid => de.object_identifier(&opts).is_ok(),
            Tag::Sequence => match de.sequence(&opts) {
                Ok(sub) => {
                    walk(sub);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        };
        if !ok {
            break;
        }
    }
}

fuzz_target!(|data: &[u8]| {
    walk(BerDeserializer::new(data));
});
