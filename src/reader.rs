use crate::boxes::{BoxHeader, FourCC, RootBox, BOX_HDR_SZ, BOX_HDR_SZ_EXT};
use crate::error::{DecodeError, Result};
use crate::parser::decode_root;
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{ErrorKind, Read};

/// Decode every top-level box from `r` until end of input.
///
/// For each box the reader resolves the header, buffers exactly
/// `size - header_size` body bytes, and hands both to
/// [`decode_root`](crate::parser::decode_root). End of input at a box
/// boundary is success; end of input mid-box is `TruncatedInput`.
///
/// # Example
/// ```no_run
/// use std::fs::File;
///
/// fn main() -> anyhow::Result<()> {
///     let mut f = File::open("video.mp4")?;
///     let boxes = mp4tree::decode_stream(&mut f)?;
///     println!("{}", serde_json::to_string_pretty(&boxes)?);
///     Ok(())
/// }
/// ```
pub fn decode_stream<R: Read>(r: &mut R) -> Result<Vec<RootBox>> {
    let mut roots = Vec::new();
    while let Some(root) = decode_next(r)? {
        roots.push(root);
    }
    Ok(roots)
}

/// Decode a single top-level box, or `None` at a clean end of input.
pub fn decode_next<R: Read>(r: &mut R) -> Result<Option<RootBox>> {
    let mut first = [0u8; 8];
    let got = read_up_to(r, &mut first)?;
    if got == 0 {
        return Ok(None);
    }
    if got < first.len() {
        return Err(DecodeError::TruncatedInput {
            expected: first.len() as u64,
            read: got as u64,
        });
    }

    let size32 = BigEndian::read_u32(&first[0..4]);
    let typ = FourCC([first[4], first[5], first[6], first[7]]);

    let (size, header_size) = if size32 == 1 {
        let size64 = r.read_u64::<BigEndian>().map_err(map_eof)?;
        (size64, BOX_HDR_SZ_EXT)
    } else {
        (size32 as u64, BOX_HDR_SZ)
    };

    let mut header = BoxHeader { size, typ, header_size };

    let body = if size == 0 {
        // box runs to the end of the stream
        let mut data = Vec::new();
        r.read_to_end(&mut data)?;
        header.size = header_size as u64 + data.len() as u64;
        data
    } else {
        if size < header_size as u64 {
            return Err(DecodeError::MalformedBox {
                typ,
                reason: format!("declared size {size} smaller than {header_size}-byte header"),
            });
        }
        let body_len = size - header_size as u64;
        let mut data = Vec::new();
        let got = r.by_ref().take(body_len).read_to_end(&mut data)?;
        if (got as u64) < body_len {
            return Err(DecodeError::TruncatedInput {
                expected: body_len,
                read: got as u64,
            });
        }
        data
    };

    decode_root(&body, header).map(Some)
}

fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DecodeError::Io(e)),
        }
    }
    Ok(filled)
}

fn map_eof(e: std::io::Error) -> DecodeError {
    if e.kind() == ErrorKind::UnexpectedEof {
        DecodeError::TruncatedInput { expected: 8, read: 0 }
    } else {
        DecodeError::Io(e)
    }
}
