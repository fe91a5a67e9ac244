// SPDX-License-Identifier: Apache-2.0

//! A convenience Reader implementation for in-memory input.
//!
//! This module provides [`ChunkReader`], a [`Reader`] over a byte slice. It
//! can hand the whole document to the decoder at once or simulate streaming
//! by releasing it in fixed-size chunks.
//!
//! For real I/O, implement [`Reader`] for your own source (a file, a socket,
//! a UART) and pass it to [`PushDecoder::drain_reader`](crate::PushDecoder::drain_reader).
//!
//! # Examples
//!
//! ```rust
//! use bencode_stream::{ChunkReader, PushDecoder};
//!
//! let torrent = b"d8:announce18:udp://tracker:80804:infod6:lengthi1024eee";
//! // Deliver three bytes at a time, as a slow network might
//! let mut reader = ChunkReader::new(torrent, 3);
//! let mut scratch = [0u8; 64];
//! let mut decoder = PushDecoder::new(());
//! decoder.drain_reader(&mut reader, &mut scratch).unwrap();
//! assert!(decoder.is_complete());
//! ```

use core::convert::Infallible;

use crate::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// [`ChunkReader::full_slice()`] releases as much as the caller's buffer
/// holds; [`ChunkReader::new()`] caps every read at `chunk_size` bytes.
///
/// It is also an [`Iterator`] over those chunks, which is handy for feeding
/// a decoder directly without a scratch buffer:
///
/// ```rust
/// use bencode_stream::{ChunkReader, PushDecoder};
///
/// let mut decoder = PushDecoder::new(());
/// for chunk in ChunkReader::new(b"l4:spam4:eggse", 2) {
///     decoder.feed(chunk).unwrap();
/// }
/// decoder.finish().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte slice containing bencoded data
    /// * `chunk_size` - Maximum bytes to return per read (minimum 1)
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a new reader that consumes the entire byte slice at once.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.remaining();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);
        if let (Some(dest), Some(src)) = (buf.get_mut(..to_copy), remaining.get(..to_copy)) {
            dest.copy_from_slice(src);
            self.pos = self.pos.saturating_add(to_copy);
            return Ok(to_copy);
        }
        Ok(0)
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.remaining();
        if remaining.is_empty() {
            return None;
        }
        let (chunk, _) = remaining.split_at(remaining.len().min(self.chunk_size));
        self.pos = self.pos.saturating_add(chunk.len());
        Some(chunk)
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::{BencodeHandler, ErrorKind, Integer, PushDecoder, ReadError};

    #[derive(Default)]
    struct Totals {
        integers: Vec<Integer>,
        string_bytes: usize,
        chunks: usize,
    }

    impl BencodeHandler for Totals {
        fn integer(&mut self, value: Integer) {
            self.integers.push(value);
        }
        fn string_chunk(&mut self, chunk: &[u8]) {
            self.string_bytes += chunk.len();
            self.chunks += 1;
        }
    }

    #[test]
    fn test_drain_reader_with_tiny_chunks() {
        let data = b"li1ei22ei333e10:0123456789e";
        let mut reader = ChunkReader::new(data, 1);
        let mut scratch = [0u8; 16];
        let mut decoder = PushDecoder::new(Totals::default());
        decoder.drain_reader(&mut reader, &mut scratch).unwrap();

        let totals = decoder.into_handler();
        assert_eq!(totals.integers, [1, 22, 333]);
        assert_eq!(totals.string_bytes, 10);
        // One chunk event per input byte of the body
        assert_eq!(totals.chunks, 10);
    }

    #[test]
    fn test_drain_reader_scratch_bounds_chunks() {
        let data = b"20:abcdefghijklmnopqrst";
        let mut reader = ChunkReader::full_slice(data);
        let mut scratch = [0u8; 8];
        let mut decoder = PushDecoder::new(Totals::default());
        decoder.drain_reader(&mut reader, &mut scratch).unwrap();

        let totals = decoder.into_handler();
        assert_eq!(totals.string_bytes, 20);
        // "20:abcde" "fghijklm" "nopqrst"
        assert_eq!(totals.chunks, 3);
    }

    #[test]
    fn test_drain_reader_truncated() {
        let mut reader = ChunkReader::new(b"l4:spa", 4);
        let mut scratch = [0u8; 8];
        let mut decoder = PushDecoder::new(());
        let err = decoder.drain_reader(&mut reader, &mut scratch).unwrap_err();
        match err {
            ReadError::Parse(e) => {
                assert_eq!(e.kind(), ErrorKind::IncompleteDocument);
                assert_eq!(e.position(), 6);
            }
            ReadError::Reader(never) => match never {},
        }
    }

    #[test]
    fn test_drain_reader_clamps_overlong_read_counts() {
        /// Fills the buffer but claims a few more bytes than it holds.
        struct Overreporting<'a> {
            inner: ChunkReader<'a>,
        }

        impl Reader for Overreporting<'_> {
            type Error = Infallible;

            fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
                let n = self.inner.read(buf)?;
                Ok(if n == 0 { 0 } else { n + 5 })
            }
        }

        let mut reader = Overreporting {
            inner: ChunkReader::full_slice(b"li1ei22ei4444ei1ee"),
        };
        // Every read fills the scratch buffer
        let mut scratch = [0u8; 6];
        let mut decoder = PushDecoder::new(Totals::default());
        decoder.drain_reader(&mut reader, &mut scratch).unwrap();
        assert!(decoder.is_complete());
        assert_eq!(decoder.into_handler().integers, [1, 22, 4444, 1]);
    }

    #[test]
    fn test_drain_reader_reports_reader_errors() {
        struct Broken;

        impl Reader for Broken {
            type Error = &'static str;

            fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
                Err("disk on fire")
            }
        }

        let mut decoder = PushDecoder::new(());
        let err = decoder.drain_reader(&mut Broken, &mut [0u8; 4]).unwrap_err();
        assert_eq!(err, ReadError::Reader("disk on fire"));
        // Nothing was fed, so the decoder is still usable
        assert!(!decoder.is_failed());
    }
}
