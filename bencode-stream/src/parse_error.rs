// SPDX-License-Identifier: Apache-2.0

/// The reason a document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value started with a byte that cannot begin any bencode value.
    InvalidLeadingByte(u8),
    /// An `i...e` literal was empty, carried a bad sign, a leading zero, or a non-digit.
    MalformedInteger,
    /// An `i...e` literal does not fit in the configured [`Integer`](crate::Integer).
    IntegerOverflow,
    /// A string length prefix had a leading zero, a non-digit, or does not fit in `usize`.
    MalformedLengthPrefix,
    /// An `e` with nothing open, or an `e` where a dictionary value was expected.
    UnmatchedEnd,
    /// A dictionary key position held something other than a byte string.
    DictKeyNotString,
    /// A dictionary key was not strictly greater than the previous key.
    DictKeyOrderViolation,
    /// End of input was signalled before the top-level value was complete.
    IncompleteDocument,
    /// Bytes followed the complete top-level value.
    TrailingData,
    /// Opening a container would exceed [`DecoderOptions::max_depth`](crate::DecoderOptions).
    MaxDepthExceeded,
    /// A dictionary key is longer than [`DecoderOptions::max_key_len`](crate::DecoderOptions).
    KeyTooLong,
}

/// An error produced while decoding, with the stream offset it was detected at.
///
/// Every error is terminal: once a [`PushDecoder`](crate::PushDecoder) has
/// returned one, all further calls return the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    position: usize,
}

impl ParseError {
    pub(crate) fn new<T>(kind: ErrorKind, position: usize) -> Result<T, Self> {
        Err(Self { kind, position })
    }

    /// What went wrong.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Absolute byte offset in the stream of the offending byte.
    ///
    /// For [`ErrorKind::IncompleteDocument`] this is the total input length.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::InvalidLeadingByte(byte) if byte.is_ascii_graphic() => {
                write!(f, "invalid leading byte '{}'", *byte as char)
            }
            ErrorKind::InvalidLeadingByte(byte) => write!(f, "invalid leading byte 0x{byte:02x}"),
            ErrorKind::MalformedInteger => f.write_str("malformed integer"),
            ErrorKind::IntegerOverflow => f.write_str("integer out of range"),
            ErrorKind::MalformedLengthPrefix => f.write_str("malformed string length prefix"),
            ErrorKind::UnmatchedEnd => f.write_str("unmatched end token"),
            ErrorKind::DictKeyNotString => f.write_str("dictionary key is not a byte string"),
            ErrorKind::DictKeyOrderViolation => {
                f.write_str("dictionary key out of order or duplicated")
            }
            ErrorKind::IncompleteDocument => f.write_str("input ended with an unfinished value"),
            ErrorKind::TrailingData => f.write_str("trailing data after top-level value"),
            ErrorKind::MaxDepthExceeded => f.write_str("maximum nesting depth exceeded"),
            ErrorKind::KeyTooLong => f.write_str("dictionary key exceeds maximum length"),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.position)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
