use crate::boxes::{
    BoxHeader, FullBoxHeader, MediaBox, MediaInfoBox, MovieBox, RootBox, SampleTableBox, TrackBox,
    BOX_HDR_SZ, BOX_HDR_SZ_EXT,
};
use crate::cursor::Cursor;
use crate::error::{DecodeError, Result};
use crate::known_boxes::KnownBox;
use crate::{leaves, sample_desc};

/// Resolve a box header at the cursor's current position.
///
/// Reads the 8-byte header (big-endian size + FourCC); a wire size of 1 pulls
/// a further 64-bit size, a wire size of 0 resolves to "the rest of the
/// enclosing region".
pub fn read_box_header(cur: &mut Cursor) -> Result<BoxHeader> {
    if cur.remaining() < BOX_HDR_SZ as usize {
        return Err(DecodeError::TruncatedHeader {
            needed: BOX_HDR_SZ as usize,
            available: cur.remaining(),
        });
    }
    let size32 = cur.read_u32()?;
    let typ = cur.read_fourcc()?;

    let (mut size, header_size) = if size32 == 1 {
        if cur.remaining() < 8 {
            return Err(DecodeError::TruncatedHeader {
                needed: BOX_HDR_SZ_EXT as usize,
                available: BOX_HDR_SZ as usize + cur.remaining(),
            });
        }
        (cur.read_u64()?, BOX_HDR_SZ_EXT)
    } else {
        (size32 as u64, BOX_HDR_SZ)
    };

    if size == 0 {
        size = header_size as u64 + cur.remaining() as u64;
    }

    if size < header_size as u64 {
        return Err(DecodeError::MalformedBox {
            typ,
            reason: format!("declared size {size} smaller than {header_size}-byte header"),
        });
    }

    Ok(BoxHeader { size, typ, header_size })
}

/// Read the version + 24-bit flags prefix of a FullBox body.
pub fn read_full_box_header(cur: &mut Cursor) -> Result<FullBoxHeader> {
    let version = cur.read_u8()?;
    let flags = cur.read_u24()?;
    Ok(FullBoxHeader { version, flags })
}

/// Walk the child boxes in `body`, which holds everything of `parent` past
/// its header. Each child's header and body slice are handed to `on_child`;
/// unrecognized children are the callback's business to skip (their size is
/// accounted for here either way).
pub fn walk_children<F>(body: &[u8], parent: &BoxHeader, on_child: F) -> Result<()>
where
    F: FnMut(&BoxHeader, &[u8]) -> Result<()>,
{
    walk_region(body, parent, parent.header_size as u64, on_child)
}

/// Same loop over a partial region of `parent`, with `consumed` bytes of the
/// parent already accounted for (the sample-entry extension lists start past
/// a fixed-format prefix, not right after the header).
pub(crate) fn walk_region<F>(
    region: &[u8],
    parent: &BoxHeader,
    mut consumed: u64,
    mut on_child: F,
) -> Result<()>
where
    F: FnMut(&BoxHeader, &[u8]) -> Result<()>,
{
    let mut cur = Cursor::new(region);
    while consumed < parent.size {
        let child = read_box_header(&mut cur)?;
        let next = consumed
            .checked_add(child.size)
            .filter(|&n| n <= parent.size)
            .ok_or(DecodeError::SizeMismatch {
                consumed: consumed.saturating_add(child.size),
                declared: parent.size,
            })?;
        let body_len = (child.size - child.header_size as u64) as usize;
        if body_len > cur.remaining() {
            return Err(DecodeError::TruncatedChild {
                needed: body_len as u64,
                available: cur.remaining() as u64,
            });
        }
        let child_body = cur.take(body_len)?;
        on_child(&child, child_body)?;
        consumed = next;
    }
    Ok(())
}

pub fn decode_moov(body: &[u8], header: BoxHeader) -> Result<MovieBox> {
    let mut mvhd = None;
    let mut tracks = Vec::new();
    walk_children(body, &header, |child, data| {
        match KnownBox::from(child.typ) {
            KnownBox::Mvhd => mvhd = Some(leaves::decode_mvhd(data, *child)?),
            KnownBox::Trak => tracks.push(decode_trak(data, *child)?),
            _ => {}
        }
        Ok(())
    })?;
    Ok(MovieBox { header, mvhd, tracks })
}

pub fn decode_trak(body: &[u8], header: BoxHeader) -> Result<TrackBox> {
    let mut tkhd = None;
    let mut mdia = None;
    walk_children(body, &header, |child, data| {
        match KnownBox::from(child.typ) {
            KnownBox::Tkhd => tkhd = Some(leaves::decode_tkhd(data, *child)?),
            KnownBox::Mdia => mdia = Some(decode_mdia(data, *child)?),
            _ => {}
        }
        Ok(())
    })?;
    Ok(TrackBox { header, tkhd, mdia })
}

pub fn decode_mdia(body: &[u8], header: BoxHeader) -> Result<MediaBox> {
    let mut mdhd = None;
    let mut hdlr = None;
    let mut minf = None;
    walk_children(body, &header, |child, data| {
        match KnownBox::from(child.typ) {
            KnownBox::Mdhd => mdhd = Some(leaves::decode_mdhd(data, *child)?),
            KnownBox::Hdlr => hdlr = Some(leaves::decode_hdlr(data, *child)?),
            KnownBox::Minf => minf = Some(decode_minf(data, *child)?),
            _ => {}
        }
        Ok(())
    })?;
    Ok(MediaBox { header, mdhd, hdlr, minf })
}

pub fn decode_minf(body: &[u8], header: BoxHeader) -> Result<MediaInfoBox> {
    let mut stbl = None;
    walk_children(body, &header, |child, data| {
        if let KnownBox::Stbl = KnownBox::from(child.typ) {
            stbl = Some(decode_stbl(data, *child)?);
        }
        Ok(())
    })?;
    Ok(MediaInfoBox { header, stbl })
}

pub fn decode_stbl(body: &[u8], header: BoxHeader) -> Result<SampleTableBox> {
    let mut stbl = SampleTableBox {
        header,
        stsd: None,
        stts: None,
        stss: None,
        ctts: None,
        stsc: None,
        stsz: None,
        stco: None,
        co64: None,
    };
    walk_children(body, &header, |child, data| {
        match KnownBox::from(child.typ) {
            KnownBox::Stsd => stbl.stsd = Some(sample_desc::decode_stsd(data, *child)?),
            KnownBox::Stts => stbl.stts = Some(leaves::decode_stts(data, *child)?),
            KnownBox::Stss => stbl.stss = Some(leaves::decode_stss(data, *child)?),
            KnownBox::Ctts => stbl.ctts = Some(leaves::decode_ctts(data, *child)?),
            KnownBox::Stsc => stbl.stsc = Some(leaves::decode_stsc(data, *child)?),
            KnownBox::Stsz => stbl.stsz = Some(leaves::decode_stsz(data, *child)?),
            KnownBox::Stco => stbl.stco = Some(leaves::decode_stco(data, *child)?),
            KnownBox::Co64 => stbl.co64 = Some(leaves::decode_co64(data, *child)?),
            _ => {}
        }
        Ok(())
    })?;
    Ok(stbl)
}

/// Decode one top-level box from its body bytes and resolved header.
///
/// Dispatches purely on the FourCC; anything unrecognized keeps its header
/// and leaves the body alone.
pub fn decode_root(body: &[u8], header: BoxHeader) -> Result<RootBox> {
    let root = match KnownBox::from(header.typ) {
        KnownBox::Ftyp => RootBox::FileType(leaves::decode_ftyp(body, header)?),
        KnownBox::Free | KnownBox::Skip => RootBox::FreeSpace(leaves::decode_free(body, header)?),
        KnownBox::Mdat => RootBox::MediaData(leaves::decode_mdat(body, header)?),
        KnownBox::Moov => RootBox::Movie(decode_moov(body, header)?),
        _ => RootBox::Unknown { header },
    };
    Ok(root)
}
