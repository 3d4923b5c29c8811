use crate::boxes::FourCC;

/// Typed view over the MP4 / ISOBMFF boxes this crate decodes.
///
/// Anything not in this list becomes `KnownBox::Unknown(fourcc)` and is
/// skipped by size wherever it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBox {
    // File-level / top-level
    Ftyp,
    Free,
    Skip,
    Mdat,
    Moov,

    // moov children
    Mvhd,
    Trak,

    // trak children
    Tkhd,
    Mdia,

    // mdia children
    Mdhd,
    Hdlr,
    Minf,

    // minf children
    Stbl,

    // stbl children
    Stsd,
    Stts,
    Ctts,
    Stsc,
    Stsz,
    Stco,
    Co64,
    Stss,

    // Sample entries
    Avc1,
    Mp4a,

    // Sample entry extensions
    Avcc,
    Pasp,
    Esds,

    // Anything else
    Unknown(FourCC),
}

impl From<FourCC> for KnownBox {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"ftyp" => KnownBox::Ftyp,
            b"free" => KnownBox::Free,
            b"skip" => KnownBox::Skip,
            b"mdat" => KnownBox::Mdat,
            b"moov" => KnownBox::Moov,

            b"mvhd" => KnownBox::Mvhd,
            b"trak" => KnownBox::Trak,

            b"tkhd" => KnownBox::Tkhd,
            b"mdia" => KnownBox::Mdia,

            b"mdhd" => KnownBox::Mdhd,
            b"hdlr" => KnownBox::Hdlr,
            b"minf" => KnownBox::Minf,

            b"stbl" => KnownBox::Stbl,

            b"stsd" => KnownBox::Stsd,
            b"stts" => KnownBox::Stts,
            b"ctts" => KnownBox::Ctts,
            b"stsc" => KnownBox::Stsc,
            b"stsz" => KnownBox::Stsz,
            b"stco" => KnownBox::Stco,
            b"co64" => KnownBox::Co64,
            b"stss" => KnownBox::Stss,

            b"avc1" => KnownBox::Avc1,
            b"mp4a" => KnownBox::Mp4a,

            b"avcC" => KnownBox::Avcc,
            b"pasp" => KnownBox::Pasp,
            b"esds" => KnownBox::Esds,

            _ => KnownBox::Unknown(cc),
        }
    }
}

impl KnownBox {
    /// Human-readable box name, for summaries and diagnostics.
    pub fn full_name(&self) -> &'static str {
        match self {
            KnownBox::Ftyp => "File Type Box",
            KnownBox::Free => "Free Space Box",
            KnownBox::Skip => "Free Space Box",
            KnownBox::Mdat => "Media Data Box",
            KnownBox::Moov => "Movie Box",

            KnownBox::Mvhd => "Movie Header Box",
            KnownBox::Trak => "Track Box",

            KnownBox::Tkhd => "Track Header Box",
            KnownBox::Mdia => "Media Box",

            KnownBox::Mdhd => "Media Header Box",
            KnownBox::Hdlr => "Handler Reference Box",
            KnownBox::Minf => "Media Information Box",

            KnownBox::Stbl => "Sample Table Box",

            KnownBox::Stsd => "Sample Description Box",
            KnownBox::Stts => "Decoding Time-to-Sample Box",
            KnownBox::Ctts => "Composition Time-to-Sample Box",
            KnownBox::Stsc => "Sample-to-Chunk Box",
            KnownBox::Stsz => "Sample Size Box",
            KnownBox::Stco => "Chunk Offset Box",
            KnownBox::Co64 => "64-bit Chunk Offset Box",
            KnownBox::Stss => "Sync Sample Box",

            KnownBox::Avc1 => "AVC Sample Entry",
            KnownBox::Mp4a => "MPEG-4 Audio Sample Entry",

            KnownBox::Avcc => "AVC Configuration Box",
            KnownBox::Pasp => "Pixel Aspect Ratio Box",
            KnownBox::Esds => "Elementary Stream Descriptor Box",

            KnownBox::Unknown(_) => "Unknown Box",
        }
    }

    /// Does this box *contain* child boxes (container semantics)?
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KnownBox::Moov | KnownBox::Trak | KnownBox::Mdia | KnownBox::Minf | KnownBox::Stbl
        )
    }
}
