// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use demos::{decode_reader, EventPrinter, JsonWriter};

/// Stream a bencoded file through the decoder and print what it sees
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Bencoded input file
    file: PathBuf,

    /// Render the document as JSON instead of listing events
    #[arg(long)]
    json: bool,

    /// Bytes read from the file per chunk
    #[arg(long, value_name = "BYTES", default_value_t = 1024)]
    chunk_size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = File::open(&cli.file)
        .with_context(|| format!("unable to open {}", cli.file.display()))?;
    log::info!(
        "decoding {} in chunks of {} bytes",
        cli.file.display(),
        cli.chunk_size
    );

    let out = BufWriter::new(io::stdout().lock());
    let context = || format!("failed to decode {}", cli.file.display());
    let mut out = if cli.json {
        let mut out = decode_reader(input, JsonWriter::new(out), cli.chunk_size)
            .and_then(JsonWriter::finish)
            .with_context(context)?;
        writeln!(out)?;
        out
    } else {
        decode_reader(input, EventPrinter::new(out), cli.chunk_size)
            .and_then(EventPrinter::finish)
            .with_context(context)?
    };
    out.flush()?;
    Ok(())
}
