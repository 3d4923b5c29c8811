use crate::boxes::{
    AvcConfigBox, BoxHeader, ElementaryStreamDescBox, EsDescriptor, PixelAspectRatioBox,
    SampleDescription, SampleDescriptionBox, SampleEntry, SampleEntryExtension,
    SoundSampleDescription, VideoSampleDescription,
};
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::known_boxes::KnownBox;
use crate::parser::{read_box_header, read_full_box_header, walk_region};
use crate::scalars;

pub const ES_DESCR_TAG: u8 = 0x03;
pub const DECODER_CONFIG_TAG: u8 = 0x04;
pub const DECODER_SPECIFIC_TAG: u8 = 0x05;

/// Fixed-format VisualSampleEntry fields past the 8-byte sample-entry prefix.
const VISUAL_ENTRY_LEN: usize = 70;
/// Fixed-format AudioSampleEntry fields past the 8-byte sample-entry prefix.
const AUDIO_ENTRY_LEN: usize = 20;

/// stsd: entry_count, then that many sample-entry child boxes.
pub fn decode_stsd(body: &[u8], header: BoxHeader) -> Result<SampleDescriptionBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut entries = Vec::new();
    for _ in 0..entry_count {
        let child = read_box_header(&mut cur)?;
        let body_len = (child.size - child.header_size as u64) as usize;
        if body_len > cur.remaining() {
            return Err(DecodeError::TruncatedChild {
                needed: body_len as u64,
                available: cur.remaining() as u64,
            });
        }
        let child_body = cur.take(body_len)?;
        entries.push(decode_sample_entry(child_body, child)?);
    }

    Ok(SampleDescriptionBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        entries,
    })
}

fn decode_sample_entry(body: &[u8], header: BoxHeader) -> Result<SampleEntry> {
    let mut cur = Cursor::new(body);
    cur.skip(6)?; // reserved
    let data_ref_index = cur.read_u16()?;

    let (sample_desc, extensions) = match KnownBox::from(header.typ) {
        KnownBox::Avc1 => {
            let desc = read_visual_description(&mut cur)?;
            let exts = read_extensions(&mut cur, &header, VISUAL_ENTRY_LEN)?;
            (SampleDescription::Video(desc), exts)
        }
        KnownBox::Mp4a => {
            let desc = read_sound_description(&mut cur)?;
            let exts = read_extensions(&mut cur, &header, AUDIO_ENTRY_LEN)?;
            (SampleDescription::Sound(desc), exts)
        }
        // Unhandled codecs keep their header; the body is skipped by size.
        _ => (SampleDescription::Unknown, Vec::new()),
    };

    Ok(SampleEntry { header, data_ref_index, sample_desc, extensions })
}

fn read_visual_description(cur: &mut Cursor) -> Result<VideoSampleDescription> {
    cur.skip(16)?; // pre_defined + reserved
    let width = cur.read_u16()?;
    let height = cur.read_u16()?;
    cur.skip(46)?; // resolution, frame count, compressor name
    let depth = cur.read_u16()?;
    cur.skip(2)?; // pre_defined
    Ok(VideoSampleDescription { width, height, depth })
}

fn read_sound_description(cur: &mut Cursor) -> Result<SoundSampleDescription> {
    cur.skip(8)?; // reserved
    let channels = cur.read_u16()?;
    let sample_size = cur.read_u16()?;
    cur.skip(4)?; // pre_defined + reserved
    let sample_rate = scalars::fixed16_16(cur.read_u32()?);
    Ok(SoundSampleDescription { channels, sample_size, sample_rate })
}

/// Trailing extension boxes of a sample entry (avcC, pasp, esds, ...), walked
/// with the ordinary container loop starting past the fixed-format fields.
fn read_extensions(
    cur: &mut Cursor,
    entry: &BoxHeader,
    fixed_len: usize,
) -> Result<Vec<SampleEntryExtension>> {
    let consumed = entry.header_size as u64 + 8 + fixed_len as u64;
    let mut extensions = Vec::new();
    walk_region(cur.rest(), entry, consumed, |child, data| {
        let ext = match KnownBox::from(child.typ) {
            KnownBox::Avcc => SampleEntryExtension::AvcConfig(decode_avcc(data, *child)?),
            KnownBox::Pasp => SampleEntryExtension::PixelAspectRatio(decode_pasp(data, *child)?),
            KnownBox::Esds => SampleEntryExtension::Esds(decode_esds(data, *child)?),
            _ => SampleEntryExtension::Unknown { header: *child },
        };
        extensions.push(ext);
        Ok(())
    })?;
    Ok(extensions)
}

// avcC: profile/level plus length-prefixed SPS and PPS NAL units
pub fn decode_avcc(body: &[u8], header: BoxHeader) -> Result<AvcConfigBox> {
    let mut cur = Cursor::new(body);
    let configuration_version = cur.read_u8()?;
    let profile = cur.read_u8()?;
    let profile_compatibility = cur.read_u8()?;
    let level = cur.read_u8()?;
    let nal_length_size = (cur.read_u8()? & 0x03) + 1;

    let sps_count = (cur.read_u8()? & 0x1F) as usize;
    let mut sps = Vec::new();
    for _ in 0..sps_count {
        let len = cur.read_u16()? as usize;
        sps.push(cur.take(len)?.to_vec());
    }

    let pps_count = cur.read_u8()? as usize;
    let mut pps = Vec::new();
    for _ in 0..pps_count {
        let len = cur.read_u16()? as usize;
        pps.push(cur.take(len)?.to_vec());
    }

    Ok(AvcConfigBox {
        header,
        configuration_version,
        profile,
        profile_compatibility,
        level,
        nal_length_size,
        sps,
        pps,
    })
}

pub fn decode_pasp(body: &[u8], header: BoxHeader) -> Result<PixelAspectRatioBox> {
    let mut cur = Cursor::new(body);
    let h_spacing = cur.read_u32()?;
    let v_spacing = cur.read_u32()?;
    Ok(PixelAspectRatioBox { header, h_spacing, v_spacing })
}

/// esds: a bad tag anywhere in the descriptor chain records the descriptor
/// as absent instead of failing the sample entry.
pub fn decode_esds(body: &[u8], header: BoxHeader) -> Result<ElementaryStreamDescBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let descriptor = match read_es_descriptor(&mut cur) {
        Ok(desc) => Some(desc),
        Err(DecodeError::InvalidDescriptorTag { .. }) => None,
        Err(e) => return Err(e),
    };

    Ok(ElementaryStreamDescBox {
        header,
        version: full.version,
        flags: full.flags,
        descriptor,
    })
}

fn expect_tag(cur: &mut Cursor, expected: u8) -> Result<()> {
    let found = cur.read_u8()?;
    if found != expected {
        return Err(DecodeError::InvalidDescriptorTag { expected, found });
    }
    Ok(())
}

fn skip_descriptor_length(cur: &mut Cursor) -> Result<u32> {
    let (value, consumed) = scalars::descriptor_length(cur.rest())?;
    cur.skip(consumed)?;
    Ok(value)
}

/// ES_Descriptor (0x03) wrapping DecoderConfigDescriptor (0x04, 13 fixed
/// bytes) wrapping DecoderSpecificInfo (0x05, raw codec config).
fn read_es_descriptor(cur: &mut Cursor) -> Result<EsDescriptor> {
    expect_tag(cur, ES_DESCR_TAG)?;
    skip_descriptor_length(cur)?;
    let es_id = cur.read_u16()?;
    cur.skip(1)?; // stream priority

    expect_tag(cur, DECODER_CONFIG_TAG)?;
    skip_descriptor_length(cur)?;
    let object_type = cur.read_u8()?;
    let stream_type = cur.read_u8()? >> 2;
    let buffer_size = cur.read_u24()?;
    let max_bitrate = cur.read_u32()?;
    let avg_bitrate = cur.read_u32()?;

    expect_tag(cur, DECODER_SPECIFIC_TAG)?;
    let dsi_len = skip_descriptor_length(cur)?;
    let decoder_config = cur.take(dsi_len as usize)?.to_vec();

    Ok(EsDescriptor {
        es_id,
        object_type,
        stream_type,
        buffer_size,
        max_bitrate,
        avg_bitrate,
        decoder_config,
    })
}
