use mp4tree::reader::decode_stream;
use serde_json::{json, Value};
use std::io::Cursor;

fn make_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

fn decode_to_json(data: Vec<u8>) -> Value {
    let mut cur = Cursor::new(data);
    let roots = decode_stream(&mut cur).expect("decode_stream failed");
    serde_json::to_value(&roots).expect("serialization failed")
}

#[test]
fn ftyp_serializes_with_stable_field_names() {
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"isom");
    ftyp.extend_from_slice(&512u32.to_be_bytes());
    ftyp.extend_from_slice(b"iso2");

    let v = decode_to_json(make_box(b"ftyp", &ftyp));

    assert_eq!(v[0]["FileType"]["major_brand"], json!("isom"));
    assert_eq!(v[0]["FileType"]["minor_version"], json!(512));
    assert_eq!(v[0]["FileType"]["compatible_brands"], json!(["iso2"]));
    assert_eq!(v[0]["FileType"]["header"]["size"], json!(20));
    assert_eq!(v[0]["FileType"]["header"]["typ"], json!("ftyp"));
    assert_eq!(v[0]["FileType"]["header"]["header_size"], json!(8));
}

#[test]
fn opaque_payloads_serialize_as_hex() {
    let mut data = make_box(b"free", &[0u8; 4]);
    data.extend_from_slice(&make_box(b"mdat", &[0xDE, 0xAD, 0xBE, 0xEF]));

    let v = decode_to_json(data);

    assert_eq!(v[0]["FreeSpace"]["data"], json!("00000000"));
    assert_eq!(v[1]["MediaData"]["data"], json!("deadbeef"));
}

#[test]
fn unknown_box_serializes_header_only() {
    let v = decode_to_json(make_box(b"wide", &[]));
    assert_eq!(v[0]["Unknown"]["header"]["typ"], json!("wide"));
    assert_eq!(v[0]["Unknown"]["header"]["size"], json!(8));
}

#[test]
fn movie_serializes_nested_fields() {
    let mut mvhd_payload = vec![0u8; 4]; // version + flags
    mvhd_payload.extend_from_slice(&0u32.to_be_bytes());
    mvhd_payload.extend_from_slice(&0u32.to_be_bytes());
    mvhd_payload.extend_from_slice(&1000u32.to_be_bytes());
    mvhd_payload.extend_from_slice(&5000u32.to_be_bytes());
    mvhd_payload.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    mvhd_payload.extend_from_slice(&0x0100u16.to_be_bytes());
    mvhd_payload.extend_from_slice(&[0u8; 10]);
    mvhd_payload.extend_from_slice(&[0u8; 36]);
    mvhd_payload.extend_from_slice(&[0u8; 24]);
    mvhd_payload.extend_from_slice(&1u32.to_be_bytes());
    let moov = make_box(b"moov", &make_box(b"mvhd", &mvhd_payload));

    let v = decode_to_json(moov);

    assert_eq!(v[0]["Movie"]["mvhd"]["timescale"], json!(1000));
    assert_eq!(v[0]["Movie"]["mvhd"]["duration"], json!(5000));
    assert_eq!(v[0]["Movie"]["mvhd"]["rate"], json!(1.0));
    assert_eq!(v[0]["Movie"]["tracks"], json!([]));
}
