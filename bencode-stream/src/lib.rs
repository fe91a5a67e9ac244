// SPDX-License-Identifier: Apache-2.0

//! A resumable, push-style bencode decoder.
//!
//! Input is fed in chunks of any size through [`PushDecoder::feed`]. The
//! decoder reports values to a [`BencodeHandler`] as soon as they are
//! recognized and keeps only the state needed to resume at the next byte:
//! the container stack, the digits of an unfinished integer or length
//! prefix, and the dictionary key currently being read. String values are
//! never buffered; they are handed to the handler as borrowed slices of the
//! caller's input.
//!
//! ```rust
//! use bencode_stream::{BencodeHandler, Integer, PushDecoder};
//!
//! #[derive(Default)]
//! struct Sum(Integer);
//!
//! impl BencodeHandler for Sum {
//!     fn integer(&mut self, value: Integer) {
//!         self.0 += value;
//!     }
//! }
//!
//! let mut decoder = PushDecoder::new(Sum::default());
//! decoder.feed(b"li4ei3").unwrap();
//! decoder.feed(b"8ee").unwrap();
//! decoder.finish().unwrap();
//! assert_eq!(decoder.into_handler().0, 42);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

// Compile-time configuration validation
mod config_check;

mod chunk_reader;
mod container_stack;
mod handler;
mod int_parser;
mod options;
mod parse_error;
mod push_decoder;
mod tokenizer;

pub use chunk_reader::ChunkReader;
pub use handler::BencodeHandler;
pub use options::DecoderOptions;
pub use parse_error::{ErrorKind, ParseError};
pub use push_decoder::{PushDecoder, ReadError, Reader};

/// The signed integer type produced for `i...e` values.
///
/// Selected with the `int32` / `int64` cargo features.
#[cfg(feature = "int32")]
pub type Integer = i32;
/// The signed integer type produced for `i...e` values.
///
/// Selected with the `int32` / `int64` cargo features.
#[cfg(feature = "int64")]
pub type Integer = i64;
