use mp4tree::boxes::{BoxHeader, FourCC};
use mp4tree::error::DecodeError;
use mp4tree::leaves;

fn hdr(typ: &[u8; 4], body_len: usize) -> BoxHeader {
    BoxHeader {
        size: 8 + body_len as u64,
        typ: FourCC(*typ),
        header_size: 8,
    }
}

fn table_body(entries: &[u32]) -> Vec<u8> {
    let mut v = vec![0u8; 4]; // version + flags
    for e in entries {
        v.extend_from_slice(&e.to_be_bytes());
    }
    v
}

#[test]
fn stts_parallel_arrays() {
    let body = table_body(&[2, 3, 100, 2, 200]);
    let stts = leaves::decode_stts(&body, hdr(b"stts", body.len())).expect("decode_stts failed");

    assert_eq!(stts.entry_count, 2);
    assert_eq!(stts.sample_count, vec![3, 2]);
    assert_eq!(stts.sample_delta, vec![100, 200]);
}

#[test]
fn ctts_keeps_signed_offsets() {
    let mut body = vec![0u8; 4];
    body.extend_from_slice(&2u32.to_be_bytes()); // entry_count
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&(-200i32).to_be_bytes());
    body.extend_from_slice(&4u32.to_be_bytes());
    body.extend_from_slice(&100i32.to_be_bytes());

    let ctts = leaves::decode_ctts(&body, hdr(b"ctts", body.len())).expect("decode_ctts failed");

    assert_eq!(ctts.entry_count, 2);
    assert_eq!(ctts.sample_count, vec![1, 4]);
    assert_eq!(ctts.sample_offset, vec![-200, 100]);
}

#[test]
fn stss_sample_numbers() {
    let body = table_body(&[3, 1, 31, 61]);
    let stss = leaves::decode_stss(&body, hdr(b"stss", body.len())).expect("decode_stss failed");

    assert_eq!(stss.entry_count, 3);
    assert_eq!(stss.sample_number, vec![1, 31, 61]);
}

#[test]
fn stsc_triples() {
    let body = table_body(&[2, 1, 10, 1, 5, 4, 1]);
    let stsc = leaves::decode_stsc(&body, hdr(b"stsc", body.len())).expect("decode_stsc failed");

    assert_eq!(stsc.entry_count, 2);
    assert_eq!(stsc.first_chunk, vec![1, 5]);
    assert_eq!(stsc.samples_per_chunk, vec![10, 4]);
    assert_eq!(stsc.sample_desc_index, vec![1, 1]);
}

#[test]
fn stsz_fixed_size_reads_no_entries() {
    // sample_size != 0: the per-sample array is absent no matter the count
    let body = table_body(&[1024, 5]);
    let stsz = leaves::decode_stsz(&body, hdr(b"stsz", body.len())).expect("decode_stsz failed");

    assert_eq!(stsz.sample_size, 1024);
    assert_eq!(stsz.sample_count, 5);
    assert!(stsz.entry_size.is_empty());
}

#[test]
fn stsz_variable_size_reads_count_entries() {
    let body = table_body(&[0, 5, 10, 11, 12, 13, 14]);
    let stsz = leaves::decode_stsz(&body, hdr(b"stsz", body.len())).expect("decode_stsz failed");

    assert_eq!(stsz.sample_size, 0);
    assert_eq!(stsz.sample_count, 5);
    assert_eq!(stsz.entry_size, vec![10, 11, 12, 13, 14]);
}

#[test]
fn stsz_variable_size_truncated_table_fails() {
    let body = table_body(&[0, 5, 10, 11, 12]);
    let err = leaves::decode_stsz(&body, hdr(b"stsz", body.len())).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedChild { .. }));
}

#[test]
fn stco_offsets() {
    let body = table_body(&[3, 48, 4096, 65536]);
    let stco = leaves::decode_stco(&body, hdr(b"stco", body.len())).expect("decode_stco failed");

    assert_eq!(stco.entry_count, 3);
    assert_eq!(stco.chunk_offset, vec![48, 4096, 65536]);
}

#[test]
fn co64_offsets_are_64_bit() {
    let mut body = vec![0u8; 4];
    body.extend_from_slice(&2u32.to_be_bytes());
    body.extend_from_slice(&(u32::MAX as u64 + 48).to_be_bytes());
    body.extend_from_slice(&(u32::MAX as u64 + 4096).to_be_bytes());

    let co64 = leaves::decode_co64(&body, hdr(b"co64", body.len())).expect("decode_co64 failed");

    assert_eq!(co64.entry_count, 2);
    assert_eq!(
        co64.chunk_offset,
        vec![u32::MAX as u64 + 48, u32::MAX as u64 + 4096]
    );
}
