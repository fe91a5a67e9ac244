// SPDX-License-Identifier: Apache-2.0

//! Ready-made [`BencodeHandler`]s for dumping bencoded files, and a helper
//! that drives a [`PushDecoder`] from any [`std::io::Read`].

use std::fmt;
use std::io::{self, Write};

use base64::Engine;
use bencode_stream::{BencodeHandler, Integer, ParseError, PushDecoder, ReadError, Reader};
use thiserror::Error;

/// Everything that can go wrong while dumping a document.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input is not valid bencode.
    #[error("invalid bencode: {0}")]
    Parse(#[from] ParseError),
    /// A dictionary key is not ASCII and has no JSON form.
    #[error("dictionary key \"{}\" is not ASCII", .0.escape_ascii())]
    NonAsciiKey(Vec<u8>),
}

impl From<ReadError<io::Error>> for DumpError {
    fn from(e: ReadError<io::Error>) -> Self {
        match e {
            ReadError::Parse(e) => DumpError::Parse(e),
            ReadError::Reader(e) => DumpError::Io(e),
        }
    }
}

/// Adapts a [`std::io::Read`] to the decoder's [`Reader`].
pub struct IoReader<R>(pub R);

impl<R: io::Read> Reader for IoReader<R> {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.0.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

/// Decodes everything `input` yields, `chunk_size` bytes at a time, and
/// returns the handler.
pub fn decode_reader<R, H>(input: R, handler: H, chunk_size: usize) -> Result<H, DumpError>
where
    R: io::Read,
    H: BencodeHandler,
{
    let mut scratch = vec![0u8; chunk_size.max(1)];
    let mut decoder = PushDecoder::new(handler);
    decoder.drain_reader(&mut IoReader(input), &mut scratch)?;
    log::debug!("decoded {} bytes", decoder.position());
    Ok(decoder.into_handler())
}

/// Writes one line per decoder event.
///
/// Write errors cannot be raised from a handler, so the first one is kept
/// and returned by [`finish`](Self::finish).
pub struct EventPrinter<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> EventPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn finish(self) -> Result<W, DumpError> {
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_none() {
            self.error = writeln!(self.out, "{args}").err();
        }
    }
}

impl<W: Write> BencodeHandler for EventPrinter<W> {
    fn integer(&mut self, value: Integer) {
        self.line(format_args!("integer: {value}"));
    }
    fn list_start(&mut self) {
        self.line(format_args!("list_start"));
    }
    fn list_end(&mut self) {
        self.line(format_args!("list_end"));
    }
    fn dict_start(&mut self) {
        self.line(format_args!("dict_start"));
    }
    fn dict_end(&mut self) {
        self.line(format_args!("dict_end"));
    }
    fn key(&mut self, key: &[u8]) {
        self.line(format_args!("key: \"{}\"", key.escape_ascii()));
    }
    fn string_start(&mut self, len: usize) {
        self.line(format_args!("string_start: {len}"));
    }
    fn string_chunk(&mut self, chunk: &[u8]) {
        self.line(format_args!("string_chunk: \"{}\"", chunk.escape_ascii()));
    }
    fn string_end(&mut self) {
        self.line(format_args!("string_end"));
    }
    fn list_item_start(&mut self) {
        self.line(format_args!("list_item_start"));
    }
    fn list_item_end(&mut self) {
        self.line(format_args!("list_item_end"));
    }
    fn dict_value_start(&mut self) {
        self.line(format_args!("dict_value_start"));
    }
    fn dict_value_end(&mut self) {
        self.line(format_args!("dict_value_end"));
    }
}

/// Renders a document as JSON.
///
/// ASCII byte strings become JSON strings. Any other byte string value is
/// written as `"base64:<standard base64>"`. Dictionary keys have no such
/// escape hatch: a non-ASCII key is written base64-encoded so the output
/// stays well-formed, and [`finish`](Self::finish) reports it as
/// [`DumpError::NonAsciiKey`].
///
/// Unlike the decoder, this handler buffers each string value whole.
pub struct JsonWriter<W> {
    out: W,
    /// No separator is needed before the next element.
    first: bool,
    value: Vec<u8>,
    error: Option<DumpError>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            first: true,
            value: Vec::new(),
            error: None,
        }
    }

    /// Returns the writer, or the first error seen while rendering.
    pub fn finish(self) -> Result<W, DumpError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn record(&mut self, error: DumpError) {
        if self.error.is_none() {
            log::warn!("json output: {error}");
            self.error = Some(error);
        }
    }

    fn raw(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            self.record(e.into());
        }
    }

    fn separator(&mut self) {
        if !self.first {
            self.raw(", ");
        }
        self.first = false;
    }

    fn json_string(&mut self, text: &str) {
        if let Err(e) = serde_json::to_writer(&mut self.out, text) {
            self.record(io::Error::from(e).into());
        }
    }
}

fn ascii_str(bytes: &[u8]) -> Option<&str> {
    if bytes.is_ascii() {
        std::str::from_utf8(bytes).ok()
    } else {
        None
    }
}

fn base64_tagged(bytes: &[u8]) -> String {
    format!(
        "base64:{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

impl<W: Write> BencodeHandler for JsonWriter<W> {
    fn integer(&mut self, value: Integer) {
        self.raw(&value.to_string());
    }

    fn list_start(&mut self) {
        self.raw("[");
        self.first = true;
    }

    fn list_end(&mut self) {
        self.raw("]");
        self.first = false;
    }

    fn dict_start(&mut self) {
        self.raw("{");
        self.first = true;
    }

    fn dict_end(&mut self) {
        self.raw("}");
        self.first = false;
    }

    fn key(&mut self, key: &[u8]) {
        self.separator();
        match ascii_str(key) {
            Some(text) => self.json_string(text),
            None => {
                self.record(DumpError::NonAsciiKey(key.to_vec()));
                self.json_string(&base64_tagged(key));
            }
        }
        self.raw(": ");
    }

    fn string_start(&mut self, len: usize) {
        self.value.clear();
        self.value.reserve(len.min(64 * 1024));
    }

    fn string_chunk(&mut self, chunk: &[u8]) {
        self.value.extend_from_slice(chunk);
    }

    fn string_end(&mut self) {
        let value = std::mem::take(&mut self.value);
        match ascii_str(&value) {
            Some(text) => self.json_string(text),
            None => self.json_string(&base64_tagged(&value)),
        }
        self.value = value;
    }

    fn list_item_start(&mut self) {
        self.separator();
    }
}
