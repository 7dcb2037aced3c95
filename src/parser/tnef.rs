//! Top-level TNEF decoding: signature gate and attribute dispatch.
//!
//! The decoder folds the attribute record stream into a [`TnefMessage`].
//! It is deliberately tolerant: a stream that truncates mid-record yields
//! whatever was assembled up to that point. Only a missing signature is a
//! hard failure.

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, warn};

use crate::error::{Result, TnefError};
use crate::model::attachment::TnefAttachment;
use crate::model::message::TnefMessage;
use crate::parser::mapi;
use crate::parser::stream::{
    decode_object, TnefObject, ATT_ATTACH_DATA, ATT_ATTACH_REND_DATA, ATT_ATTACH_TITLE,
    ATT_MAPI_PROPS, LEVEL_ATTACHMENT,
};

/// First four bytes of every TNEF stream, little-endian.
pub const TNEF_SIGNATURE: u32 = 0x223E9F78;

/// Bytes preceding the first record: 4-byte signature + 2-byte attach key.
/// The key is carried but not validated.
const STREAM_START: usize = 6;

/// Decode a complete TNEF byte buffer into a message.
///
/// Fails only when the buffer is shorter than the signature or does not
/// start with it. A well-signed stream always produces a message, possibly
/// empty: truncated records, malformed MAPI blocks, and undecodable text
/// all degrade to partial results rather than errors.
pub fn decode(data: &[u8]) -> Result<TnefMessage> {
    if data.len() < 4 || LittleEndian::read_u32(&data[..4]) != TNEF_SIGNATURE {
        return Err(TnefError::InvalidSignature);
    }

    let mut message = TnefMessage::default();
    // Index of the attachment currently being filled, if any. Attachment-
    // level records that arrive before the first render-data marker have
    // nowhere to go and are dropped.
    let mut current: Option<usize> = None;
    let mut offset = STREAM_START;

    while offset < data.len() {
        let Some(obj) = decode_object(data, offset) else {
            // Truncated or malformed tail: keep what we have.
            debug!(offset, "attribute stream stopped short of buffer end");
            break;
        };
        offset += obj.consumed;

        if obj.name == ATT_ATTACH_REND_DATA {
            // The marker itself carries render metadata we do not keep;
            // its only effect is opening a new attachment group.
            message.attachments.push(TnefAttachment::default());
            current = Some(message.attachments.len() - 1);
        } else if obj.level == LEVEL_ATTACHMENT {
            if let Some(idx) = current {
                apply_attachment_attribute(&obj, &mut message.attachments[idx]);
            }
        } else if obj.name == ATT_MAPI_PROPS {
            if let Some(props) = mapi::decode_properties(obj.payload) {
                if let Some(body) = props.get(mapi::KEY_BODY) {
                    message.body = String::from_utf8(body.clone()).unwrap_or_default();
                }
                if let Some(html) = props.get(mapi::KEY_BODY_HTML) {
                    message.body_html = String::from_utf8(html.clone()).unwrap_or_default();
                }
                message.attributes = props;
            }
        }
        // Any other record is consumed without effect.
    }

    Ok(message)
}

/// Route one attachment-level record into the attachment being filled.
fn apply_attachment_attribute(obj: &TnefObject<'_>, attachment: &mut TnefAttachment) {
    match obj.name {
        ATT_ATTACH_TITLE => match std::str::from_utf8(obj.payload) {
            // Titles arrive NUL-terminated; strip the terminators.
            Ok(title) => attachment.title = title.replace('\0', ""),
            Err(_) => warn!(
                len = obj.payload.len(),
                "attachment title is not valid UTF-8, leaving it empty"
            ),
        },
        ATT_ATTACH_DATA => attachment.data = obj.payload.to_vec(),
        _ => {}
    }
}
