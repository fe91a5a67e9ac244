// SPDX-License-Identifier: Apache-2.0

//! The callback interface a [`PushDecoder`](crate::PushDecoder) reports to.

use crate::Integer;

/// Receives decoding events from a [`PushDecoder`](crate::PushDecoder).
///
/// Every method has a no-op default, so a handler only implements the events
/// it cares about. Events arrive synchronously, in document order, exactly
/// once each.
///
/// Byte strings in value position are streamed: `string_start` announces the
/// declared length, then zero or more `string_chunk` calls deliver the body
/// as it arrives, split wherever the input chunks happened to split it, and
/// `string_end` closes it. Dictionary keys are delivered whole through `key`.
///
/// For `d3:cow3:mooe` a handler sees:
///
/// ```text
/// dict_start
/// key(b"cow")
/// dict_value_start
/// string_start(3)
/// string_chunk(b"moo")
/// string_end
/// dict_value_end
/// dict_end
/// ```
///
/// Handler methods cannot fail. A handler that needs to reject input records
/// the problem itself and the caller checks it once decoding returns.
pub trait BencodeHandler {
    /// An integer value.
    fn integer(&mut self, _value: Integer) {}

    /// A list was opened.
    fn list_start(&mut self) {}

    /// The innermost list was closed.
    fn list_end(&mut self) {}

    /// A dictionary was opened.
    fn dict_start(&mut self) {}

    /// The innermost dictionary was closed.
    fn dict_end(&mut self) {}

    /// A complete dictionary key, already checked to sort after the previous key.
    fn key(&mut self, _key: &[u8]) {}

    /// A byte string value of `len` bytes begins.
    fn string_start(&mut self, _len: usize) {}

    /// The next piece of the current byte string.
    ///
    /// Never empty. The slice borrows the caller's input chunk.
    fn string_chunk(&mut self, _chunk: &[u8]) {}

    /// The current byte string is complete.
    fn string_end(&mut self) {}

    /// A list element begins. Sent before the element's own first event.
    fn list_item_start(&mut self) {}

    /// A list element ended. Sent after the element's own last event.
    fn list_item_end(&mut self) {}

    /// A dictionary value begins. Sent after its `key` and before the value's first event.
    fn dict_value_start(&mut self) {}

    /// A dictionary value ended.
    fn dict_value_end(&mut self) {}
}

/// Validates without observing anything.
impl BencodeHandler for () {}

impl<H: BencodeHandler + ?Sized> BencodeHandler for &mut H {
    fn integer(&mut self, value: Integer) {
        (**self).integer(value);
    }

    fn list_start(&mut self) {
        (**self).list_start();
    }

    fn list_end(&mut self) {
        (**self).list_end();
    }

    fn dict_start(&mut self) {
        (**self).dict_start();
    }

    fn dict_end(&mut self) {
        (**self).dict_end();
    }

    fn key(&mut self, key: &[u8]) {
        (**self).key(key);
    }

    fn string_start(&mut self, len: usize) {
        (**self).string_start(len);
    }

    fn string_chunk(&mut self, chunk: &[u8]) {
        (**self).string_chunk(chunk);
    }

    fn string_end(&mut self) {
        (**self).string_end();
    }

    fn list_item_start(&mut self) {
        (**self).list_item_start();
    }

    fn list_item_end(&mut self) {
        (**self).list_item_end();
    }

    fn dict_value_start(&mut self) {
        (**self).dict_value_start();
    }

    fn dict_value_end(&mut self) {
        (**self).dict_value_end();
    }
}
