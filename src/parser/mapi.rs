//! Minimal MAPI property-block reader.
//!
//! The `ATT_MAPI_PROPS` attribute embeds a flat block of MAPI properties:
//! a 32-bit property count, then per property a 16-bit type code, a 16-bit
//! property tag, and a value whose size follows from the type code. Fixed
//! scalar types have table-driven sizes; string and binary types carry a
//! 32-bit length prefix. The cursor is rounded up to a 4-byte boundary
//! after every value.
//!
//! Only the two body-bearing tags are materialized. Everything else is
//! parsed for size so the cursor stays correct, then discarded.

use std::collections::HashMap;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Plain-text message body (PR_BODY).
pub const PROP_BODY: u16 = 0x1000;
/// HTML message body (PR_BODY_HTML).
pub const PROP_BODY_HTML: u16 = 0x1013;

/// Attribute-map key for the plain-text body.
pub const KEY_BODY: &str = "MAPIBody";
/// Attribute-map key for the HTML body.
pub const KEY_BODY_HTML: &str = "MAPIBodyHTML";

/// Storage class of a MAPI property value.
enum ValueSize {
    /// The value occupies exactly this many bytes. Unrecognized type codes
    /// land here with size 0: nothing is read for them, only the trailing
    /// alignment applies.
    Fixed(usize),
    /// The value is preceded by a 32-bit byte length.
    Variable,
}

/// Size table for the property types this decoder understands.
fn value_size(vtype: u16) -> ValueSize {
    match vtype {
        0x0002 | 0x000B => ValueSize::Fixed(2), // i2, boolean
        0x0003 | 0x0004 | 0x000A => ValueSize::Fixed(4), // i4, r4, error
        0x0005 | 0x0040 => ValueSize::Fixed(8), // r8, systime
        0x0048 => ValueSize::Fixed(16),         // guid
        0x001E | 0x001F | 0x0102 => ValueSize::Variable, // string8, unicode, binary
        _ => ValueSize::Fixed(0),
    }
}

/// Decode a MAPI property block into a name-to-bytes map.
///
/// Returns `None` only when the block is too short to hold the leading
/// property count. Running out of bytes mid-loop is a soft stop: whatever
/// was collected up to that point is returned.
pub fn decode_properties(data: &[u8]) -> Option<HashMap<String, Vec<u8>>> {
    if data.len() < 4 {
        return None;
    }
    let count = LittleEndian::read_u32(&data[..4]);
    let mut pos = 4usize;
    let mut attributes = HashMap::new();

    for _ in 0..count {
        if pos + 4 > data.len() {
            debug!(pos, count, "MAPI block ran out of bytes mid-property");
            break;
        }
        let vtype = LittleEndian::read_u16(&data[pos..pos + 2]);
        let tag = LittleEndian::read_u16(&data[pos + 2..pos + 4]);
        pos += 4;

        match value_size(vtype) {
            ValueSize::Fixed(size) => {
                if size > 0 {
                    if let Some(key) = body_key(tag) {
                        if let Some(value) = data.get(pos..pos + size) {
                            attributes.insert(key.to_string(), value.to_vec());
                        }
                    }
                }
                pos += size;
            }
            ValueSize::Variable => {
                // TODO: a body tag stored as string8/unicode/binary is
                // skipped here instead of captured; decide whether the
                // capture should cover this branch too.
                if pos + 4 > data.len() {
                    break;
                }
                let len = LittleEndian::read_u32(&data[pos..pos + 4]) as usize;
                pos += 4 + len;
            }
        }

        // Values are padded out to 4-byte boundaries.
        pos = (pos + 3) & !3;
    }

    Some(attributes)
}

/// Map a property tag to its attribute-map key, for the two tags we keep.
fn body_key(tag: u16) -> Option<&'static str> {
    match tag {
        PROP_BODY => Some(KEY_BODY),
        PROP_BODY_HTML => Some(KEY_BODY_HTML),
        _ => None,
    }
}
