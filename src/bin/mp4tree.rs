use anyhow::Context;
use clap::Parser;
use mp4tree::known_boxes::KnownBox;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Decode an MP4/ISOBMFF file's box tree to JSON")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut f = File::open(&args.path)
        .with_context(|| format!("opening {}", args.path.display()))?;

    let boxes = mp4tree::decode_stream(&mut f)
        .with_context(|| format!("decoding {}", args.path.display()))?;

    // Tree on stdout, summary on stderr so the JSON stays pipeable.
    println!("{}", serde_json::to_string_pretty(&boxes)?);

    for b in &boxes {
        let hdr = b.header();
        eprintln!(
            "{} ({}, {} bytes)",
            hdr.typ,
            KnownBox::from(hdr.typ).full_name(),
            hdr.size
        );
    }
    eprintln!("decoded {} top-level boxes", boxes.len());

    Ok(())
}
