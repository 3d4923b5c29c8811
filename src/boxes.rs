use serde::{Serialize, Serializer};
use std::fmt;

pub const BOX_HDR_SZ: u32 = 8;
pub const BOX_HDR_SZ_EXT: u32 = 16;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(FourCC([b[0], b[1], b[2], b[3]]))
        } else { None }
    }
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str_lossy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxHeader {
    /// Total size including the header. A wire size of 0 ("to end of the
    /// enclosing region") is resolved before this struct is built.
    pub size: u64,
    pub typ: FourCC,
    /// 8, or 16 when the wire size field was the 64-bit escape value 1.
    pub header_size: u32,
}

/// Version + 24-bit flags prefix shared by every FullBox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FullBoxHeader {
    pub version: u8,
    pub flags: u32,
}

fn ser_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn ser_hex_seq<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter().map(hex::encode))
}

/// File Type Box (ftyp)
#[derive(Debug, Clone, Serialize)]
pub struct FileTypeBox {
    pub header: BoxHeader,
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

/// Free Space Box (free / skip)
#[derive(Debug, Clone, Serialize)]
pub struct FreeSpaceBox {
    pub header: BoxHeader,
    #[serde(serialize_with = "ser_hex")]
    pub data: Vec<u8>,
}

/// Media Data Box (mdat) — payload is opaque, never decoded further.
#[derive(Debug, Clone, Serialize)]
pub struct MediaDataBox {
    pub header: BoxHeader,
    #[serde(serialize_with = "ser_hex")]
    pub data: Vec<u8>,
}

/// Movie Header Box (mvhd)
#[derive(Debug, Clone, Serialize)]
pub struct MovieHeaderBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub rate: f64,
    pub volume: f64,
    /// 3x3 transform; first two columns are 16.16, the third 2.30.
    pub matrix: [[f64; 3]; 3],
    pub next_track_id: u32,
}

/// Track Header Box (tkhd)
#[derive(Debug, Clone, Serialize)]
pub struct TrackHeaderBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub track_id: u32,
    pub duration: u64,
    pub width: f64,
    pub height: f64,
}

/// Media Header Box (mdhd)
#[derive(Debug, Clone, Serialize)]
pub struct MediaHeaderBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub creation_time: u64,
    pub modification_time: u64,
    pub timescale: u32,
    pub duration: u64,
    pub language: String,
}

/// Handler Reference Box (hdlr)
#[derive(Debug, Clone, Serialize)]
pub struct HandlerBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub handler_type: FourCC,
    pub name: String,
}

/// AVC Decoder Configuration Box (avcC)
#[derive(Debug, Clone, Serialize)]
pub struct AvcConfigBox {
    pub header: BoxHeader,
    pub configuration_version: u8,
    pub profile: u8,
    pub profile_compatibility: u8,
    pub level: u8,
    /// Size in bytes of the NAL length prefix (1, 2 or 4).
    pub nal_length_size: u8,
    #[serde(serialize_with = "ser_hex_seq")]
    pub sps: Vec<Vec<u8>>,
    #[serde(serialize_with = "ser_hex_seq")]
    pub pps: Vec<Vec<u8>>,
}

/// Pixel Aspect Ratio Box (pasp)
#[derive(Debug, Clone, Serialize)]
pub struct PixelAspectRatioBox {
    pub header: BoxHeader,
    pub h_spacing: u32,
    pub v_spacing: u32,
}

/// MPEG-4 ES descriptor: the outer tag-0x03 record plus the fields of its
/// nested DecoderConfigDescriptor (0x04) and the raw DecoderSpecificInfo
/// bytes (0x05).
#[derive(Debug, Clone, Serialize)]
pub struct EsDescriptor {
    pub es_id: u16,
    pub object_type: u8,
    pub stream_type: u8,
    pub buffer_size: u32,
    pub max_bitrate: u32,
    pub avg_bitrate: u32,
    #[serde(serialize_with = "ser_hex")]
    pub decoder_config: Vec<u8>,
}

/// Elementary Stream Descriptor Box (esds). `descriptor` is `None` when the
/// descriptor chain had a bad tag; the enclosing sample entry stays valid.
#[derive(Debug, Clone, Serialize)]
pub struct ElementaryStreamDescBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub descriptor: Option<EsDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoSampleDescription {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoundSampleDescription {
    pub channels: u16,
    pub sample_size: u16,
    pub sample_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub enum SampleDescription {
    Video(VideoSampleDescription),
    Sound(SoundSampleDescription),
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub enum SampleEntryExtension {
    AvcConfig(AvcConfigBox),
    PixelAspectRatio(PixelAspectRatioBox),
    Esds(ElementaryStreamDescBox),
    Unknown { header: BoxHeader },
}

/// One codec configuration record inside stsd.
#[derive(Debug, Clone, Serialize)]
pub struct SampleEntry {
    pub header: BoxHeader,
    pub data_ref_index: u16,
    pub sample_desc: SampleDescription,
    pub extensions: Vec<SampleEntryExtension>,
}

/// Sample Description Box (stsd)
#[derive(Debug, Clone, Serialize)]
pub struct SampleDescriptionBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub entries: Vec<SampleEntry>,
}

/// Decoding Time-to-Sample Box (stts)
#[derive(Debug, Clone, Serialize)]
pub struct TimeToSampleBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub sample_count: Vec<u32>,
    pub sample_delta: Vec<u32>,
}

/// Sync Sample Box (stss)
#[derive(Debug, Clone, Serialize)]
pub struct SyncSampleBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub sample_number: Vec<u32>,
}

/// Composition Time-to-Sample Box (ctts)
#[derive(Debug, Clone, Serialize)]
pub struct CompTimeToSampleBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub sample_count: Vec<u32>,
    pub sample_offset: Vec<i32>,
}

/// Sample-to-Chunk Box (stsc)
#[derive(Debug, Clone, Serialize)]
pub struct SampleToChunkBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub first_chunk: Vec<u32>,
    pub samples_per_chunk: Vec<u32>,
    pub sample_desc_index: Vec<u32>,
}

/// Sample Size Box (stsz). `entry_size` is empty when `sample_size != 0`.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSizeBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub sample_size: u32,
    pub sample_count: u32,
    pub entry_size: Vec<u32>,
}

/// Chunk Offset Box (stco)
#[derive(Debug, Clone, Serialize)]
pub struct ChunkOffsetBox {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub chunk_offset: Vec<u32>,
}

/// 64-bit Chunk Offset Box (co64)
#[derive(Debug, Clone, Serialize)]
pub struct ChunkOffset64Box {
    pub header: BoxHeader,
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub chunk_offset: Vec<u64>,
}

/// Sample Table Box (stbl)
#[derive(Debug, Clone, Serialize)]
pub struct SampleTableBox {
    pub header: BoxHeader,
    pub stsd: Option<SampleDescriptionBox>,
    pub stts: Option<TimeToSampleBox>,
    pub stss: Option<SyncSampleBox>,
    pub ctts: Option<CompTimeToSampleBox>,
    pub stsc: Option<SampleToChunkBox>,
    pub stsz: Option<SampleSizeBox>,
    pub stco: Option<ChunkOffsetBox>,
    pub co64: Option<ChunkOffset64Box>,
}

/// Media Information Box (minf)
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfoBox {
    pub header: BoxHeader,
    pub stbl: Option<SampleTableBox>,
}

/// Media Box (mdia)
#[derive(Debug, Clone, Serialize)]
pub struct MediaBox {
    pub header: BoxHeader,
    pub mdhd: Option<MediaHeaderBox>,
    pub hdlr: Option<HandlerBox>,
    pub minf: Option<MediaInfoBox>,
}

/// Track Box (trak)
#[derive(Debug, Clone, Serialize)]
pub struct TrackBox {
    pub header: BoxHeader,
    pub tkhd: Option<TrackHeaderBox>,
    pub mdia: Option<MediaBox>,
}

/// Movie Box (moov)
#[derive(Debug, Clone, Serialize)]
pub struct MovieBox {
    pub header: BoxHeader,
    pub mvhd: Option<MovieHeaderBox>,
    pub tracks: Vec<TrackBox>,
}

/// A decoded top-level box.
#[derive(Debug, Clone, Serialize)]
pub enum RootBox {
    FileType(FileTypeBox),
    FreeSpace(FreeSpaceBox),
    MediaData(MediaDataBox),
    Movie(MovieBox),
    Unknown { header: BoxHeader },
}

impl RootBox {
    pub fn header(&self) -> &BoxHeader {
        match self {
            RootBox::FileType(b) => &b.header,
            RootBox::FreeSpace(b) => &b.header,
            RootBox::MediaData(b) => &b.header,
            RootBox::Movie(b) => &b.header,
            RootBox::Unknown { header } => header,
        }
    }
}
