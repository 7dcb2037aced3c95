//! Integration tests for the TNEF decoder over synthetic streams.

use tnefextract::model::message::TnefMessage;
use tnefextract::parser::mapi::{KEY_BODY, KEY_BODY_HTML, PROP_BODY, PROP_BODY_HTML};
use tnefextract::parser::stream::{
    ATT_ATTACH_DATA, ATT_ATTACH_REND_DATA, ATT_ATTACH_TITLE, ATT_MAPI_PROPS, LEVEL_ATTACHMENT,
    LEVEL_MESSAGE,
};
use tnefextract::parser::tnef::{decode, TNEF_SIGNATURE};

// ─── Stream builders ────────────────────────────────────────────────

/// Encode one attribute record: header, payload, 2-byte checksum.
fn record(level: u8, name: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(level);
    out.extend_from_slice(&name.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&[0, 0]);
    out
}

/// Prepend signature and attach key to a record sequence.
fn tnef_stream(records: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = TNEF_SIGNATURE.to_le_bytes().to_vec();
    buf.extend_from_slice(&[0xAB, 0xCD]);
    for r in records {
        buf.extend_from_slice(r);
    }
    buf
}

/// Build a MAPI property block: count, then 4-byte-aligned properties.
fn mapi_block(props: &[(u16, u16, &[u8])]) -> Vec<u8> {
    let mut buf = (props.len() as u32).to_le_bytes().to_vec();
    for (vtype, tag, value) in props {
        buf.extend_from_slice(&vtype.to_le_bytes());
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(value);
        while buf.len() % 4 != 0 {
            buf.push(0);
        }
    }
    buf
}

fn one_attachment(title: &[u8], data: &[u8]) -> Vec<Vec<u8>> {
    vec![
        record(LEVEL_ATTACHMENT, ATT_ATTACH_REND_DATA, &[0; 14]),
        record(LEVEL_ATTACHMENT, ATT_ATTACH_TITLE, title),
        record(LEVEL_ATTACHMENT, ATT_ATTACH_DATA, data),
    ]
}

// ─── Test 1: Signature gate ─────────────────────────────────────────

#[test]
fn test_signature_gate() {
    assert!(decode(&[0, 0, 0, 0]).is_err());
    assert!(decode(b"MIME-Version: 1.0").is_err());
    assert!(decode(&[]).is_err());

    // Correct bytes in the wrong order must not pass either.
    let reversed: Vec<u8> = TNEF_SIGNATURE.to_be_bytes().to_vec();
    assert!(decode(&reversed).is_err());
}

// ─── Test 2: Empty-but-valid stream ─────────────────────────────────

#[test]
fn test_signature_and_key_only_decodes_to_empty_message() {
    let buf = tnef_stream(&[]);
    assert_eq!(buf.len(), 6);
    let message = decode(&buf).expect("empty stream is still valid TNEF");
    assert!(message.attachments.is_empty());
    assert!(message.body.is_empty());
    assert!(message.body_html.is_empty());
    assert!(message.attributes.is_empty());
}

// ─── Test 3: Attachment boundary detection ──────────────────────────

#[test]
fn test_single_attachment_assembly() {
    let buf = tnef_stream(&one_attachment(b"report.pdf\0", b"%PDF-1.4 fake"));
    let message = decode(&buf).unwrap();

    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].title, "report.pdf");
    assert_eq!(message.attachments[0].data, b"%PDF-1.4 fake");
}

// ─── Test 4: Multiple attachments, no cross-contamination ───────────

#[test]
fn test_two_attachments_stay_separate() {
    let mut records = one_attachment(b"first.txt", b"alpha");
    records.extend(one_attachment(b"second.txt", b"beta"));
    let message = decode(&tnef_stream(&records)).unwrap();

    assert_eq!(message.attachments.len(), 2);
    assert_eq!(message.attachments[0].title, "first.txt");
    assert_eq!(message.attachments[0].data, b"alpha");
    assert_eq!(message.attachments[1].title, "second.txt");
    assert_eq!(message.attachments[1].data, b"beta");
}

// ─── Test 5: MAPI bodies end to end ─────────────────────────────────

#[test]
fn test_mapi_bodies_are_installed() {
    let block = mapi_block(&[
        (0x0003, PROP_BODY, b"Hi!\n"),
        (0x0048, PROP_BODY_HTML, b"<p>Hi TNEF</p>\n\n"),
    ]);
    let buf = tnef_stream(&[record(LEVEL_MESSAGE, ATT_MAPI_PROPS, &block)]);
    let message = decode(&buf).unwrap();

    assert_eq!(message.body, "Hi!\n");
    assert_eq!(message.body_html, "<p>Hi TNEF</p>\n\n");
    assert_eq!(message.attributes.len(), 2);
    assert_eq!(
        message.attributes.get(KEY_BODY).map(Vec::as_slice),
        Some(&b"Hi!\n"[..])
    );
    assert!(message.attributes.contains_key(KEY_BODY_HTML));
}

// ─── Test 6: Non-UTF-8 body bytes stay out of the string fields ─────

#[test]
fn test_invalid_utf8_body_leaves_field_empty() {
    let block = mapi_block(&[(0x0003, PROP_BODY, &[0xFF, 0xFE, 0xFD, 0xFC])]);
    let buf = tnef_stream(&[record(LEVEL_MESSAGE, ATT_MAPI_PROPS, &block)]);
    let message = decode(&buf).unwrap();

    assert!(message.body.is_empty());
    // The raw bytes are still available through the attribute map.
    assert_eq!(
        message.attributes.get(KEY_BODY).map(Vec::as_slice),
        Some(&[0xFF, 0xFE, 0xFD, 0xFC][..])
    );
}

// ─── Test 7: Unknown records are consumed without effect ────────────

#[test]
fn test_unknown_records_are_skipped() {
    let mut records = vec![
        record(LEVEL_MESSAGE, 0x8008, b"whatever"),
        record(LEVEL_MESSAGE, 0x9006, &[0xEE; 9]),
    ];
    records.extend(one_attachment(b"doc.txt", b"payload"));
    let message = decode(&tnef_stream(&records)).unwrap();

    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].data, b"payload");
    assert!(message.attributes.is_empty());
}

// ─── Test 8: Truncation tolerance ───────────────────────────────────

#[test]
fn test_truncation_after_first_attachment_keeps_it() {
    let mut records = one_attachment(b"kept.txt", b"still here");
    let intact_len: usize = 6 + records.iter().map(Vec::len).sum::<usize>();
    records.extend(one_attachment(b"lost.txt", b"gone"));

    let mut buf = tnef_stream(&records);
    // Cut mid-way through the second attachment's render-data record.
    buf.truncate(intact_len + 5);

    let message = decode(&buf).unwrap();
    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].title, "kept.txt");
    assert_eq!(message.attachments[0].data, b"still here");
}

#[test]
fn test_truncated_payload_stops_cleanly() {
    let mut buf = tnef_stream(&one_attachment(b"partial.txt", b"0123456789"));
    buf.truncate(buf.len() - 3);
    let message = decode(&buf).unwrap();

    // The title record landed; the data record did not fully fit.
    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].title, "partial.txt");
    assert!(message.attachments[0].data.is_empty());
}

// ─── Test 9: Idempotence ────────────────────────────────────────────

#[test]
fn test_decoding_twice_yields_identical_messages() {
    let mut records = one_attachment(b"a.bin", &[0x42; 64]);
    records.push(record(
        LEVEL_MESSAGE,
        ATT_MAPI_PROPS,
        &mapi_block(&[(0x0003, PROP_BODY, b"once")]),
    ));
    let buf = tnef_stream(&records);

    let first: TnefMessage = decode(&buf).unwrap();
    let second: TnefMessage = decode(&buf).unwrap();
    assert_eq!(first, second);
}

// ─── Test 10: Later MAPI block replaces the earlier one ─────────────

#[test]
fn test_second_mapi_block_replaces_attributes_wholesale() {
    let first = mapi_block(&[
        (0x0003, PROP_BODY, b"old!"),
        (0x0048, PROP_BODY_HTML, b"<p>old body</p>\n"),
    ]);
    let second = mapi_block(&[(0x0003, PROP_BODY, b"new!")]);
    let buf = tnef_stream(&[
        record(LEVEL_MESSAGE, ATT_MAPI_PROPS, &first),
        record(LEVEL_MESSAGE, ATT_MAPI_PROPS, &second),
    ]);
    let message = decode(&buf).unwrap();

    assert_eq!(message.body, "new!");
    // Wholesale replacement drops the HTML entry entirely; the string field
    // set from the first block is not cleared, only overwritten on match.
    assert!(!message.attributes.contains_key(KEY_BODY_HTML));
    assert_eq!(message.attributes.len(), 1);
    assert_eq!(message.body_html, "<p>old body</p>\n");
}
