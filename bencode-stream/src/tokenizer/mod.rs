// SPDX-License-Identifier: Apache-2.0

mod digit_buffer;
mod scalar;

pub(crate) use scalar::{IntegerToken, LengthToken, StringBody};

/// Outcome of handing one more byte to a tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step<T> {
    /// The token is still open; feed it the next byte.
    Pending,
    /// The byte closed the token.
    Done(T),
}
