//! Decoded attachment payloads.

/// A single file attachment recovered from a TNEF stream.
///
/// Both fields start empty when the attachment's render-data marker is seen
/// and are filled in by later attachment-level records. A TNEF stream may
/// legitimately leave either one empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TnefAttachment {
    /// Attachment filename as carried on the wire, NUL terminators removed.
    /// Empty when the stream never provided one or it was not valid UTF-8.
    pub title: String,

    /// Raw decoded payload bytes.
    pub data: Vec<u8>,
}
