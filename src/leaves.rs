use crate::boxes::{
    BoxHeader, ChunkOffset64Box, ChunkOffsetBox, CompTimeToSampleBox, FileTypeBox, FreeSpaceBox,
    HandlerBox, MediaDataBox, MediaHeaderBox, MovieHeaderBox, SampleSizeBox, SampleToChunkBox,
    SyncSampleBox, TimeToSampleBox, TrackHeaderBox,
};
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::parser::read_full_box_header;
use crate::scalars;

// ftyp: major + minor + compatible brands
pub fn decode_ftyp(body: &[u8], header: BoxHeader) -> Result<FileTypeBox> {
    let mut cur = Cursor::new(body);
    let major_brand = cur.read_fourcc()?;
    let minor_version = cur.read_u32()?;

    let rest = header.size.saturating_sub(header.header_size as u64 + 8);
    if rest % 4 != 0 {
        return Err(DecodeError::MalformedBox {
            typ: header.typ,
            reason: format!("compatible brands region of {rest} bytes is not a multiple of 4"),
        });
    }

    let mut compatible_brands = Vec::new();
    for _ in 0..rest / 4 {
        compatible_brands.push(cur.read_fourcc()?);
    }

    Ok(FileTypeBox { header, major_brand, minor_version, compatible_brands })
}

pub fn decode_free(body: &[u8], header: BoxHeader) -> Result<FreeSpaceBox> {
    Ok(FreeSpaceBox { header, data: body.to_vec() })
}

pub fn decode_mdat(body: &[u8], header: BoxHeader) -> Result<MediaDataBox> {
    Ok(MediaDataBox { header, data: body.to_vec() })
}

// mvhd: timescale/duration plus presentation defaults (rate, volume, matrix)
pub fn decode_mvhd(body: &[u8], header: BoxHeader) -> Result<MovieHeaderBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let (creation_time, modification_time, timescale, duration) = if full.version == 1 {
        let creation = cur.read_u64()?;
        let modification = cur.read_u64()?;
        let timescale = cur.read_u32()?;
        let duration = cur.read_u64()?;
        (creation, modification, timescale, duration)
    } else {
        let creation = cur.read_u32()? as u64;
        let modification = cur.read_u32()? as u64;
        let timescale = cur.read_u32()?;
        let duration = cur.read_u32()? as u64;
        (creation, modification, timescale, duration)
    };

    let rate = scalars::fixed16_16(cur.read_u32()?);
    let volume = scalars::fixed8_8(cur.read_u16()?);
    cur.skip(10)?; // reserved

    let mut matrix = [[0.0f64; 3]; 3];
    for row in matrix.iter_mut() {
        row[0] = scalars::fixed16_16(cur.read_u32()?);
        row[1] = scalars::fixed16_16(cur.read_u32()?);
        row[2] = scalars::fixed2_30(cur.read_u32()?);
    }

    cur.skip(24)?; // pre_defined
    let next_track_id = cur.read_u32()?;

    Ok(MovieHeaderBox {
        header,
        version: full.version,
        flags: full.flags,
        creation_time,
        modification_time,
        timescale,
        duration,
        rate,
        volume,
        matrix,
        next_track_id,
    })
}

// tkhd: track id, duration, presentation width/height
pub fn decode_tkhd(body: &[u8], header: BoxHeader) -> Result<TrackHeaderBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let (creation_time, modification_time, track_id, duration) = if full.version == 1 {
        let creation = cur.read_u64()?;
        let modification = cur.read_u64()?;
        let track_id = cur.read_u32()?;
        cur.skip(4)?; // reserved
        let duration = cur.read_u64()?;
        (creation, modification, track_id, duration)
    } else {
        let creation = cur.read_u32()? as u64;
        let modification = cur.read_u32()? as u64;
        let track_id = cur.read_u32()?;
        cur.skip(4)?; // reserved
        let duration = cur.read_u32()? as u64;
        (creation, modification, track_id, duration)
    };

    cur.skip(16)?; // reserved, layer, alternate_group, volume, reserved
    cur.skip(36)?; // matrix
    let width = scalars::fixed16_16(cur.read_u32()?);
    let height = scalars::fixed16_16(cur.read_u32()?);

    Ok(TrackHeaderBox {
        header,
        version: full.version,
        flags: full.flags,
        creation_time,
        modification_time,
        track_id,
        duration,
        width,
        height,
    })
}

// mdhd: timescale, duration, language
pub fn decode_mdhd(body: &[u8], header: BoxHeader) -> Result<MediaHeaderBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let (creation_time, modification_time, timescale, duration) = if full.version == 1 {
        let creation = cur.read_u64()?;
        let modification = cur.read_u64()?;
        let timescale = cur.read_u32()?;
        let duration = cur.read_u64()?;
        (creation, modification, timescale, duration)
    } else {
        let creation = cur.read_u32()? as u64;
        let modification = cur.read_u32()? as u64;
        let timescale = cur.read_u32()?;
        let duration = cur.read_u32()? as u64;
        (creation, modification, timescale, duration)
    };

    let language = scalars::language(cur.read_u16()?);

    Ok(MediaHeaderBox {
        header,
        version: full.version,
        flags: full.flags,
        creation_time,
        modification_time,
        timescale,
        duration,
        language,
    })
}

// hdlr: handler type + name
pub fn decode_hdlr(body: &[u8], header: BoxHeader) -> Result<HandlerBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    cur.skip(4)?; // pre_defined
    let handler_type = cur.read_fourcc()?;
    cur.skip(12)?; // reserved

    let mut name_bytes = cur.rest().to_vec();
    while name_bytes.last() == Some(&0) {
        name_bytes.pop();
    }
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    Ok(HandlerBox { header, version: full.version, flags: full.flags, handler_type, name })
}

// stts: run-length sample duration table
pub fn decode_stts(body: &[u8], header: BoxHeader) -> Result<TimeToSampleBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut sample_count = Vec::new();
    let mut sample_delta = Vec::new();
    for _ in 0..entry_count {
        sample_count.push(cur.read_u32()?);
        sample_delta.push(cur.read_u32()?);
    }

    Ok(TimeToSampleBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        sample_count,
        sample_delta,
    })
}

// stss: 1-based sync sample numbers
pub fn decode_stss(body: &[u8], header: BoxHeader) -> Result<SyncSampleBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut sample_number = Vec::new();
    for _ in 0..entry_count {
        sample_number.push(cur.read_u32()?);
    }

    Ok(SyncSampleBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        sample_number,
    })
}

// ctts: signed composition offsets
pub fn decode_ctts(body: &[u8], header: BoxHeader) -> Result<CompTimeToSampleBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut sample_count = Vec::new();
    let mut sample_offset = Vec::new();
    for _ in 0..entry_count {
        sample_count.push(cur.read_u32()?);
        sample_offset.push(cur.read_i32()?);
    }

    Ok(CompTimeToSampleBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        sample_count,
        sample_offset,
    })
}

// stsc: run-length chunk layout
pub fn decode_stsc(body: &[u8], header: BoxHeader) -> Result<SampleToChunkBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut first_chunk = Vec::new();
    let mut samples_per_chunk = Vec::new();
    let mut sample_desc_index = Vec::new();
    for _ in 0..entry_count {
        first_chunk.push(cur.read_u32()?);
        samples_per_chunk.push(cur.read_u32()?);
        sample_desc_index.push(cur.read_u32()?);
    }

    Ok(SampleToChunkBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        first_chunk,
        samples_per_chunk,
        sample_desc_index,
    })
}

// stsz: fixed size, or one entry per sample when sample_size == 0
pub fn decode_stsz(body: &[u8], header: BoxHeader) -> Result<SampleSizeBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let sample_size = cur.read_u32()?;
    let sample_count = cur.read_u32()?;
    let mut entry_size = Vec::new();
    if sample_size == 0 {
        for _ in 0..sample_count {
            entry_size.push(cur.read_u32()?);
        }
    }

    Ok(SampleSizeBox {
        header,
        version: full.version,
        flags: full.flags,
        sample_size,
        sample_count,
        entry_size,
    })
}

// stco: 32-bit absolute chunk offsets
pub fn decode_stco(body: &[u8], header: BoxHeader) -> Result<ChunkOffsetBox> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut chunk_offset = Vec::new();
    for _ in 0..entry_count {
        chunk_offset.push(cur.read_u32()?);
    }

    Ok(ChunkOffsetBox {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        chunk_offset,
    })
}

// co64: 64-bit variant
pub fn decode_co64(body: &[u8], header: BoxHeader) -> Result<ChunkOffset64Box> {
    let mut cur = Cursor::new(body);
    let full = read_full_box_header(&mut cur)?;

    let entry_count = cur.read_u32()?;
    let mut chunk_offset = Vec::new();
    for _ in 0..entry_count {
        chunk_offset.push(cur.read_u64()?);
    }

    Ok(ChunkOffset64Box {
        header,
        version: full.version,
        flags: full.flags,
        entry_count,
        chunk_offset,
    })
}
