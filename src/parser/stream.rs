//! TNEF attribute stream reader.
//!
//! A TNEF stream is a flat sequence of self-describing records, each carrying
//! a level byte, a 16-bit attribute id, a 16-bit declared type, a 32-bit
//! payload length, the payload, and a 2-byte checksum. All integers are
//! little-endian. The reader is a pure function of `(buffer, offset)` and
//! holds no state between calls.

use byteorder::{LittleEndian, ReadBytesExt};

/// Record level: attribute belongs to the message.
pub const LEVEL_MESSAGE: u8 = 0x01;
/// Record level: attribute belongs to the current attachment.
pub const LEVEL_ATTACHMENT: u8 = 0x02;

/// Attachment title (filename).
pub const ATT_ATTACH_TITLE: u16 = 0x8010;
/// Attachment payload bytes.
pub const ATT_ATTACH_DATA: u16 = 0x800F;
/// Render-data marker: opens a new attachment attribute group.
pub const ATT_ATTACH_REND_DATA: u16 = 0x9002;
/// Encapsulated MAPI property block.
pub const ATT_MAPI_PROPS: u16 = 0x9003;

/// Fixed record header: level (1) + id (2) + type (2) + length (4).
const HEADER_LEN: usize = 9;
/// Trailing per-record checksum, carried in the stream but not validated.
const CHECKSUM_LEN: usize = 2;

/// One decoded attribute record.
///
/// The payload borrows from the input buffer; records are consumed one at a
/// time and never retained past the dispatch that handles them.
#[derive(Debug, Clone, Copy)]
pub struct TnefObject<'a> {
    /// Message- or attachment-level marker.
    pub level: u8,
    /// Attribute identifier selecting the record's meaning.
    pub name: u16,
    /// Declared value type. Carried through but not interpreted.
    pub vtype: u16,
    /// Raw attribute payload of the declared length.
    pub payload: &'a [u8],
    /// Total bytes this record occupies in the stream, checksum included.
    /// The caller advances its cursor by exactly this much.
    pub consumed: usize,
}

/// Decode the record starting at `offset`.
///
/// Returns `None` when no complete record fits in the remaining bytes,
/// either because the fixed header or the declared payload-plus-checksum
/// would run past the end of the buffer. A partial record is never
/// returned; stream processing stops at the first one.
pub fn decode_object(data: &[u8], offset: usize) -> Option<TnefObject<'_>> {
    let mut rdr = data.get(offset..)?;

    let level = rdr.read_u8().ok()?;
    let name = rdr.read_u16::<LittleEndian>().ok()?;
    let vtype = rdr.read_u16::<LittleEndian>().ok()?;
    let length = rdr.read_u32::<LittleEndian>().ok()? as usize;

    let start = offset + HEADER_LEN;
    let end = start.checked_add(length)?;
    if end + CHECKSUM_LEN > data.len() {
        return None;
    }

    Some(TnefObject {
        level,
        name,
        vtype,
        payload: &data[start..end],
        consumed: HEADER_LEN + length + CHECKSUM_LEN,
    })
}
