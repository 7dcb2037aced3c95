//! Decoded message type.

use std::collections::HashMap;

use super::attachment::TnefAttachment;

/// Everything recovered from one TNEF stream.
///
/// A freshly decoded message is fully owned by the caller; the decoder keeps
/// no references into it. The default value is the empty-but-valid message
/// that a signature-only stream decodes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TnefMessage {
    /// Attachments in encounter order.
    pub attachments: Vec<TnefAttachment>,

    /// Plain-text body from the MAPI property block, empty if absent.
    pub body: String,

    /// HTML body from the MAPI property block, empty if absent.
    pub body_html: String,

    /// Recognized MAPI properties by name, raw value bytes.
    /// Replaced wholesale each time a MAPI property block decodes.
    pub attributes: HashMap<String, Vec<u8>>,
}

impl TnefMessage {
    /// `true` when nothing at all was recovered from the stream.
    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
            && self.body.is_empty()
            && self.body_html.is_empty()
            && self.attributes.is_empty()
    }
}
