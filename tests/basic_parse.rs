use mp4tree::boxes::{BoxHeader, FourCC};
use mp4tree::cursor::Cursor;
use mp4tree::error::DecodeError;
use mp4tree::parser::{read_box_header, read_full_box_header, walk_children};

fn make_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

#[test]
fn read_single_ftyp_header() {
    let mut data = Vec::new();
    data.extend_from_slice(&24u32.to_be_bytes());
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(b"isom");
    data.extend_from_slice(&512u32.to_be_bytes());
    data.extend_from_slice(b"isom");

    let mut cur = Cursor::new(&data);
    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.size, 24);
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(hdr.header_size, 8);
    assert_eq!(cur.position(), 8);
}

#[test]
fn size_escape_reads_64_bit_extension() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&32u64.to_be_bytes());
    data.extend_from_slice(&[0u8; 16]);

    let mut cur = Cursor::new(&data);
    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.size, 32);
    assert_eq!(hdr.header_size, 16);
    assert_eq!(hdr.typ, FourCC(*b"mdat"));
}

#[test]
fn plain_size_keeps_8_byte_header() {
    let data = make_box(b"free", &[0u8; 4]);
    let mut cur = Cursor::new(&data);
    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.size, 12);
    assert_eq!(hdr.header_size, 8);
}

#[test]
fn size_zero_extends_to_end_of_region() {
    let mut data = Vec::new();
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(b"free");
    data.extend_from_slice(&[0u8; 12]);

    let mut cur = Cursor::new(&data);
    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.size, 20);
    assert_eq!(hdr.header_size, 8);
}

#[test]
fn short_buffer_is_truncated_header() {
    let data = [0u8, 0, 0, 8, b'f'];
    let mut cur = Cursor::new(&data);
    let err = read_box_header(&mut cur).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedHeader { needed: 8, .. }));
}

#[test]
fn missing_size_extension_is_truncated_header() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"mdat");

    let mut cur = Cursor::new(&data);
    let err = read_box_header(&mut cur).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedHeader { needed: 16, .. }));
}

#[test]
fn size_below_header_is_malformed() {
    let mut data = Vec::new();
    data.extend_from_slice(&4u32.to_be_bytes());
    data.extend_from_slice(b"free");

    let mut cur = Cursor::new(&data);
    let err = read_box_header(&mut cur).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedBox { .. }));
}

#[test]
fn full_box_header_packs_flags() {
    let data = [1u8, 0, 0, 7];
    let mut cur = Cursor::new(&data);
    let full = read_full_box_header(&mut cur).expect("read_full_box_header failed");
    assert_eq!(full.version, 1);
    assert_eq!(full.flags, 7);
}

#[test]
fn walker_visits_children_in_order() {
    let mut body = make_box(b"free", &[0u8; 4]);
    body.extend_from_slice(&make_box(b"skip", &[]));
    let parent = BoxHeader {
        size: 8 + body.len() as u64,
        typ: FourCC(*b"moov"),
        header_size: 8,
    };

    let mut seen = Vec::new();
    walk_children(&body, &parent, |child, data| {
        seen.push((child.typ, data.len()));
        Ok(())
    })
    .expect("walk_children failed");

    assert_eq!(seen, vec![(FourCC(*b"free"), 4), (FourCC(*b"skip"), 0)]);
}

#[test]
fn walker_rejects_child_crossing_parent_end() {
    // child claims 100 bytes inside a 24-byte parent
    let mut body = Vec::new();
    body.extend_from_slice(&100u32.to_be_bytes());
    body.extend_from_slice(b"free");
    body.extend_from_slice(&[0u8; 8]);
    let parent = BoxHeader {
        size: 24,
        typ: FourCC(*b"moov"),
        header_size: 8,
    };

    let err = walk_children(&body, &parent, |_, _| Ok(())).unwrap_err();
    assert!(matches!(err, DecodeError::SizeMismatch { declared: 24, .. }));
}

#[test]
fn walker_rejects_child_larger_than_buffer() {
    // parent says there is room, but the buffer runs out first
    let mut body = Vec::new();
    body.extend_from_slice(&50u32.to_be_bytes());
    body.extend_from_slice(b"free");
    body.extend_from_slice(&[0u8; 8]);
    let parent = BoxHeader {
        size: 200,
        typ: FourCC(*b"moov"),
        header_size: 8,
    };

    let err = walk_children(&body, &parent, |_, _| Ok(())).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedChild { needed: 42, .. }));
}

#[test]
fn walker_child_with_size_zero_consumes_rest() {
    let mut body = make_box(b"skip", &[0u8; 2]);
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(b"free");
    body.extend_from_slice(&[0u8; 6]);
    let parent = BoxHeader {
        size: 8 + body.len() as u64,
        typ: FourCC(*b"moov"),
        header_size: 8,
    };

    let mut seen = Vec::new();
    walk_children(&body, &parent, |child, data| {
        seen.push((child.typ, child.size, data.len()));
        Ok(())
    })
    .expect("walk_children failed");

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], (FourCC(*b"free"), 14, 6));
}
