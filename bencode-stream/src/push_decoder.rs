// SPDX-License-Identifier: Apache-2.0

//! A push-style, resumable bencode decoder.

use alloc::vec::Vec;

use crate::container_stack::{Closed, ContainerStack, Slot};
use crate::handler::BencodeHandler;
use crate::options::DecoderOptions;
use crate::parse_error::{ErrorKind, ParseError};
use crate::tokenizer::{IntegerToken, LengthToken, Step, StringBody};

/// Where the bytes of a string body go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringTarget {
    /// Streamed to the handler as `string_chunk` events.
    Value,
    /// Collected in the key buffer for ordering validation.
    Key,
}

/// An error found while advancing, with the offset of the offending byte
/// within the slice being advanced over.
struct Fault {
    kind: ErrorKind,
    offset: usize,
}

impl From<ErrorKind> for Fault {
    fn from(kind: ErrorKind) -> Self {
        Fault { kind, offset: 0 }
    }
}

/// Manages the decoder's state.
#[derive(Debug, Clone)]
enum ParserState {
    /// The next byte begins a value, or closes a container.
    AwaitingValue,
    ParsingInteger(IntegerToken),
    ParsingLengthPrefix {
        token: LengthToken,
        target: StringTarget,
    },
    ParsingStringBody {
        body: StringBody,
        target: StringTarget,
    },
    /// The top-level value is done.
    Complete,
    /// Terminal; every call returns the stored error.
    Failed(ParseError),
}

/// A push-style bencode decoder.
///
/// Bytes are pushed in with [`feed`](Self::feed), in chunks of any size, and
/// reported to the handler `H` as soon as they form complete tokens. When the
/// input runs out, [`finish`](Self::finish) confirms that exactly one
/// complete top-level value was seen.
///
/// The decoder owns its handler; use [`handler`](Self::handler) to look at
/// it mid-stream and [`into_handler`](Self::into_handler) to get it back. To
/// keep ownership elsewhere, pass `&mut handler`.
///
/// Retained memory is one frame per open container, the previous key of
/// every open dictionary, the key currently being read, and a few bytes for
/// an unfinished number. String values are never retained.
///
/// # Example
///
/// ```rust
/// use bencode_stream::{BencodeHandler, PushDecoder};
///
/// #[derive(Default)]
/// struct Keys(Vec<Vec<u8>>);
///
/// impl BencodeHandler for Keys {
///     fn key(&mut self, key: &[u8]) {
///         self.0.push(key.to_vec());
///     }
/// }
///
/// let mut keys = Keys::default();
/// let mut decoder = PushDecoder::new(&mut keys);
/// for chunk in [&b"d4:name3:foo12:pie"[..], b"ce lengthi3", b"ee"] {
///     decoder.feed(chunk)?;
/// }
/// decoder.finish()?;
/// assert_eq!(keys.0, [b"name".to_vec(), b"piece length".to_vec()]);
/// # Ok::<(), bencode_stream::ParseError>(())
/// ```
pub struct PushDecoder<H> {
    handler: H,
    state: ParserState,
    stack: ContainerStack,
    /// The dictionary key being read. Only ever holds key bytes.
    key_buffer: Vec<u8>,
    options: DecoderOptions,
    /// Absolute offset of the first byte of the next chunk.
    position: usize,
}

impl<H: BencodeHandler> PushDecoder<H> {
    /// Creates a decoder with no resource limits.
    pub fn new(handler: H) -> Self {
        Self::with_options(handler, DecoderOptions::default())
    }

    /// Creates a decoder with the given limits.
    pub fn with_options(handler: H, options: DecoderOptions) -> Self {
        Self {
            handler,
            state: ParserState::AwaitingValue,
            stack: ContainerStack::new(options.max_depth),
            key_buffer: Vec::new(),
            options,
            position: 0,
        }
    }

    /// Processes a chunk of input data.
    ///
    /// Empty chunks are accepted at any point before a failure, including
    /// after the document is complete.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParseError> {
        if let ParserState::Failed(err) = self.state {
            return Err(err);
        }

        let mut consumed = 0;
        while let Some(rest) = chunk.get(consumed..).filter(|rest| !rest.is_empty()) {
            match self.advance(rest) {
                Ok(n) => consumed += n,
                Err(fault) => {
                    return self.fail(fault.kind, self.position + consumed + fault.offset)
                }
            }
        }

        self.position += chunk.len();
        Ok(())
    }

    /// Signals end of input.
    ///
    /// Fails with [`ErrorKind::IncompleteDocument`] unless a complete
    /// top-level value has been decoded. Calling it again returns the same
    /// result.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParserState::Complete => Ok(()),
            ParserState::Failed(err) => Err(err),
            _ => self.fail(ErrorKind::IncompleteDocument, self.position),
        }
    }

    /// Reads `reader` to its end through `scratch`, feeding every read, then
    /// calls [`finish`](Self::finish).
    ///
    /// `scratch` sets the largest chunk handed to [`feed`](Self::feed). An
    /// empty `scratch` reads nothing. A read count larger than `scratch` is
    /// taken as a full buffer.
    pub fn drain_reader<R: Reader>(
        &mut self,
        reader: &mut R,
        scratch: &mut [u8],
    ) -> Result<(), ReadError<R::Error>> {
        if !scratch.is_empty() {
            loop {
                let n = reader.read(scratch).map_err(ReadError::Reader)?;
                if n == 0 {
                    break;
                }
                // A reader cannot have filled more than it was given
                self.feed(scratch.get(..n).unwrap_or(&scratch[..]))?;
            }
        }
        self.finish()?;
        Ok(())
    }

    /// Consumes one token's worth of `input` and returns how many bytes were used.
    ///
    /// `input` is never empty. String bodies take as many bytes as are
    /// available; everything else takes exactly one.
    fn advance(&mut self, input: &[u8]) -> Result<usize, Fault> {
        let byte = input[0];
        match &mut self.state {
            ParserState::AwaitingValue => {
                self.handle_value_start(byte)?;
                Ok(1)
            }
            ParserState::ParsingInteger(token) => {
                if let Step::Done(value) = token.push(byte)? {
                    self.handler.integer(value);
                    self.value_complete();
                }
                Ok(1)
            }
            ParserState::ParsingLengthPrefix { token, target } => {
                let target = *target;
                if let Step::Done(len) = token.push(byte)? {
                    self.begin_string(len, target)?;
                }
                Ok(1)
            }
            ParserState::ParsingStringBody { body, target } => {
                let target = *target;
                let n = body.take(input.len());
                let done = body.is_done();
                let bytes = &input[..n];
                match target {
                    StringTarget::Value => self.handler.string_chunk(bytes),
                    StringTarget::Key => self.key_buffer.extend_from_slice(bytes),
                }
                if done {
                    // A bad key is reported at its last byte
                    self.end_string(target).map_err(|kind| Fault {
                        kind,
                        offset: n - 1,
                    })?;
                }
                Ok(n)
            }
            // Failed never reaches here: feed returns before dispatching.
            ParserState::Complete | ParserState::Failed(_) => Err(ErrorKind::TrailingData.into()),
        }
    }

    /// Handles the first byte of a value, or an `e` closing a container.
    fn handle_value_start(&mut self, byte: u8) -> Result<(), ErrorKind> {
        let slot = self.stack.slot();
        match byte {
            b'e' => return self.handle_end(),
            b'0'..=b'9' => {
                let target = if slot == Slot::DictKey {
                    StringTarget::Key
                } else {
                    self.item_start(slot);
                    StringTarget::Value
                };
                let mut token = LengthToken::new();
                token.push(byte)?;
                self.state = ParserState::ParsingLengthPrefix { token, target };
            }
            b'i' | b'l' | b'd' if slot == Slot::DictKey => {
                return Err(ErrorKind::DictKeyNotString)
            }
            b'i' => {
                self.item_start(slot);
                self.state = ParserState::ParsingInteger(IntegerToken::new());
            }
            b'l' => {
                self.stack.enter_list()?;
                self.item_start(slot);
                self.handler.list_start();
            }
            b'd' => {
                self.stack.enter_dict()?;
                self.item_start(slot);
                self.handler.dict_start();
            }
            _ => return Err(ErrorKind::InvalidLeadingByte(byte)),
        }
        Ok(())
    }

    fn handle_end(&mut self) -> Result<(), ErrorKind> {
        match self.stack.exit()? {
            Closed::List => self.handler.list_end(),
            Closed::Dict => self.handler.dict_end(),
        }
        self.value_complete();
        Ok(())
    }

    fn begin_string(&mut self, len: usize, target: StringTarget) -> Result<(), ErrorKind> {
        match target {
            StringTarget::Key => {
                if self.options.max_key_len.is_some_and(|max| len > max) {
                    return Err(ErrorKind::KeyTooLong);
                }
            }
            StringTarget::Value => self.handler.string_start(len),
        }

        let body = StringBody::new(len);
        if body.is_done() {
            return self.end_string(target);
        }
        self.state = ParserState::ParsingStringBody { body, target };
        Ok(())
    }

    fn end_string(&mut self, target: StringTarget) -> Result<(), ErrorKind> {
        match target {
            StringTarget::Value => {
                self.handler.string_end();
                self.value_complete();
            }
            StringTarget::Key => {
                let key = self.stack.accept_key(&mut self.key_buffer)?;
                self.handler.key(key);
                self.state = ParserState::AwaitingValue;
            }
        }
        Ok(())
    }

    fn item_start(&mut self, slot: Slot) {
        match slot {
            Slot::ListItem => self.handler.list_item_start(),
            Slot::DictValue => self.handler.dict_value_start(),
            Slot::TopLevel | Slot::DictKey => {}
        }
    }

    /// Advances the enclosing container after a value finished.
    fn value_complete(&mut self) {
        match self.stack.slot() {
            Slot::TopLevel => {
                log::trace!("top-level value complete at depth 0");
                self.state = ParserState::Complete;
                return;
            }
            Slot::ListItem => self.handler.list_item_end(),
            Slot::DictValue => self.handler.dict_value_end(),
            // Keys finish through end_string
            Slot::DictKey => {}
        }
        self.stack.value_done();
        self.state = ParserState::AwaitingValue;
    }

    fn fail<T>(&mut self, kind: ErrorKind, position: usize) -> Result<T, ParseError> {
        ParseError::new(kind, position).map_err(|err| {
            log::debug!("decoder failed: {err}");
            self.state = ParserState::Failed(err);
            self.key_buffer = Vec::new();
            err
        })
    }
}

impl<H> PushDecoder<H> {
    /// Whether a complete top-level value has been decoded.
    pub fn is_complete(&self) -> bool {
        matches!(self.state, ParserState::Complete)
    }

    /// Whether the decoder has failed. A failed decoder rejects all input.
    pub fn is_failed(&self) -> bool {
        matches!(self.state, ParserState::Failed(_))
    }

    /// Number of currently open lists and dictionaries.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Total number of bytes fed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Borrows the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrows the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Destroys the decoder and returns the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}

/// A source of input chunks for [`PushDecoder::drain_reader`].
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// An error from [`PushDecoder::drain_reader`].
#[derive(Debug, PartialEq)]
pub enum ReadError<E> {
    /// The input was not a valid document.
    Parse(ParseError),
    /// The reader failed.
    Reader(E),
}

impl<E> From<ParseError> for ReadError<E> {
    fn from(e: ParseError) -> Self {
        ReadError::Parse(e)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for ReadError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReadError::Parse(e) => write!(f, "{e}"),
            ReadError::Reader(e) => write!(f, "read failed: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for ReadError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Parse(e) => Some(e),
            ReadError::Reader(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use test_log::test;

    /// Records every event as a short string.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl BencodeHandler for Recorder {
        fn integer(&mut self, value: crate::Integer) {
            self.events.push(format!("int {value}"));
        }
        fn list_start(&mut self) {
            self.events.push("[".into());
        }
        fn list_end(&mut self) {
            self.events.push("]".into());
        }
        fn dict_start(&mut self) {
            self.events.push("{".into());
        }
        fn dict_end(&mut self) {
            self.events.push("}".into());
        }
        fn key(&mut self, key: &[u8]) {
            self.events
                .push(format!("key {}", String::from_utf8_lossy(key)));
        }
        fn string_start(&mut self, len: usize) {
            self.events.push(format!("str {len}"));
        }
        fn string_chunk(&mut self, chunk: &[u8]) {
            self.events
                .push(format!("chunk {}", String::from_utf8_lossy(chunk)));
        }
        fn string_end(&mut self) {
            self.events.push("str end".into());
        }
    }

    fn decode(input: &[u8]) -> Result<Vec<String>, ParseError> {
        let mut decoder = PushDecoder::new(Recorder::default());
        decoder.feed(input)?;
        decoder.finish()?;
        Ok(decoder.into_handler().events)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode(b"i0e").unwrap(), vec!["int 0"]);
        assert_eq!(decode(b"i-5e").unwrap(), vec!["int -5"]);
        assert_eq!(
            decode(b"4:spam").unwrap(),
            vec!["str 4", "chunk spam", "str end"]
        );
        assert_eq!(decode(b"0:").unwrap(), vec!["str 0", "str end"]);
    }

    #[test]
    fn test_state_transitions() {
        let mut decoder = PushDecoder::new(());
        assert!(matches!(decoder.state, ParserState::AwaitingValue));

        decoder.feed(b"d").unwrap();
        assert_eq!(decoder.depth(), 1);
        decoder.feed(b"1").unwrap();
        assert!(matches!(
            decoder.state,
            ParserState::ParsingLengthPrefix {
                target: StringTarget::Key,
                ..
            }
        ));
        decoder.feed(b"0:abc").unwrap();
        assert!(matches!(
            decoder.state,
            ParserState::ParsingStringBody {
                target: StringTarget::Key,
                ..
            }
        ));
        assert_eq!(decoder.key_buffer, b"abc");
        decoder.feed(b"defghij").unwrap();
        assert!(decoder.key_buffer.is_empty());
        decoder.feed(b"i1").unwrap();
        assert!(matches!(decoder.state, ParserState::ParsingInteger(_)));
        decoder.feed(b"e").unwrap();
        assert!(matches!(decoder.state, ParserState::AwaitingValue));
        assert!(!decoder.is_complete());
        decoder.feed(b"e").unwrap();
        assert!(decoder.is_complete());
        assert_eq!(decoder.depth(), 0);
        assert_eq!(decoder.position(), 18);
        decoder.finish().unwrap();
    }

    #[test]
    fn test_string_values_are_not_buffered() {
        let mut decoder = PushDecoder::new(());
        decoder.feed(b"l1048576:").unwrap();
        let block = [b'x'; 4096];
        for _ in 0..256 {
            decoder.feed(&block).unwrap();
            assert_eq!(decoder.key_buffer.capacity(), 0);
        }
        decoder.feed(b"e").unwrap();
        decoder.finish().unwrap();
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut decoder = PushDecoder::new(Recorder::default());
        let err = decoder.feed(b"li1ex").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLeadingByte(b'x'));
        assert_eq!(err.position(), 4);
        assert!(decoder.is_failed());

        assert_eq!(decoder.feed(b"e"), Err(err));
        assert_eq!(decoder.feed(b""), Err(err));
        assert_eq!(decoder.finish(), Err(err));
        // Events emitted before the failure are kept; nothing after it
        assert_eq!(
            decoder.into_handler().events,
            vec!["[", "int 1"]
        );
    }

    #[test]
    fn test_error_positions_span_chunks() {
        let mut decoder = PushDecoder::new(());
        decoder.feed(b"d3:foo").unwrap();
        decoder.feed(b"i1e3:ba").unwrap();
        let err = decoder.feed(b"r").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DictKeyOrderViolation);
        assert_eq!(err.position(), 13);

        // Same document in one chunk: still the key's last byte
        let mut decoder = PushDecoder::new(());
        let err = decoder.feed(b"d3:fooi1e3:bari2ee").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DictKeyOrderViolation);
        assert_eq!(err.position(), 13);
    }

    #[test]
    fn test_trailing_data() {
        let mut decoder = PushDecoder::new(());
        let err = decoder.feed(b"i1ei2e").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrailingData);
        assert_eq!(err.position(), 3);

        let mut decoder = PushDecoder::new(());
        decoder.feed(b"le").unwrap();
        decoder.feed(b"").unwrap();
        decoder.finish().unwrap();
        let err = decoder.feed(b"e").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrailingData);
        assert_eq!(decoder.finish(), Err(err));
    }

    #[test]
    fn test_finish_reports_end_position() {
        let mut decoder = PushDecoder::new(());
        decoder.feed(b"i12").unwrap();
        let err = decoder.finish().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompleteDocument);
        assert_eq!(err.position(), 3);
    }

    #[test]
    fn test_key_too_long() {
        let options = DecoderOptions::new().with_max_key_len(4);
        let mut decoder = PushDecoder::with_options((), options);
        decoder.feed(b"d4:spami1e").unwrap();
        let err = decoder.feed(b"5:").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyTooLong);
        assert_eq!(err.position(), 11);

        // Values are not keys
        let mut decoder = PushDecoder::with_options((), options);
        decoder.feed(b"d1:a10:0123456789e").unwrap();
        decoder.finish().unwrap();
    }
}
