// SPDX-License-Identifier: Apache-2.0

/// Optional resource limits for a [`PushDecoder`](crate::PushDecoder).
///
/// Bencode itself has no limits. A decoder built with the default options
/// accepts any nesting depth and any key length; set these when decoding
/// untrusted input.
///
/// # Default
///
/// All limits default to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum number of simultaneously open lists and dictionaries.
    ///
    /// Opening a container beyond this depth fails with
    /// [`ErrorKind::MaxDepthExceeded`](crate::ErrorKind::MaxDepthExceeded).
    /// `Some(0)` admits only scalar documents.
    pub max_depth: Option<usize>,

    /// Maximum length in bytes of a dictionary key.
    ///
    /// Keys are the only strings the decoder buffers, so this bounds the key
    /// buffer. Checked against the declared length before any key byte is
    /// read; exceeding it fails with
    /// [`ErrorKind::KeyTooLong`](crate::ErrorKind::KeyTooLong).
    pub max_key_len: Option<usize>,
}

impl DecoderOptions {
    /// Options with no limits.
    pub const fn new() -> Self {
        Self {
            max_depth: None,
            max_key_len: None,
        }
    }

    /// Sets [`max_depth`](Self::max_depth).
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets [`max_key_len`](Self::max_key_len).
    pub const fn with_max_key_len(mut self, len: usize) -> Self {
        self.max_key_len = Some(len);
        self
    }
}
