// SPDX-License-Identifier: Apache-2.0

//! Resumable tokenizers for the three scalar pieces of bencode: integer
//! literals, string length prefixes and string bodies.
//!
//! Each tokenizer looks at exactly one byte per call and keeps nothing but
//! its own digits between calls, so a token may be split across any number
//! of input chunks. Canonical form is enforced as soon as it can be decided:
//! `i03e` is rejected at the `3`, not at the `e`.

use super::digit_buffer::DigitBuffer;
use super::Step;
use crate::int_parser;
use crate::parse_error::ErrorKind;
use crate::Integer;

/// Decimal width of the largest magnitude, plus one so that a literal one
/// digit too long still reaches the range check at its terminator.
const INTEGER_CAPACITY: usize = Integer::MAX.ilog10() as usize + 2;
const LENGTH_CAPACITY: usize = usize::MAX.ilog10() as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntPhase {
    /// Nothing after the `i` yet.
    Start,
    /// Saw `-`, need a non-zero digit.
    Sign,
    /// Saw a lone `0`; only `e` may follow.
    Zero,
    /// Inside a run of digits that began with 1-9.
    Digits,
}

/// Tokenizes the body of an `i...e` literal (the `i` has already been consumed).
///
/// Only digits enter `digits`; the sign is kept apart.
#[derive(Debug, Clone)]
pub(crate) struct IntegerToken {
    digits: DigitBuffer<INTEGER_CAPACITY>,
    negative: bool,
    phase: IntPhase,
}

impl IntegerToken {
    pub fn new() -> Self {
        Self {
            digits: DigitBuffer::new(),
            negative: false,
            phase: IntPhase::Start,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<Step<Integer>, ErrorKind> {
        self.phase = match (self.phase, byte) {
            (IntPhase::Start, b'-') => {
                self.negative = true;
                self.phase = IntPhase::Sign;
                return Ok(Step::Pending);
            }
            (IntPhase::Start, b'0') => IntPhase::Zero,
            (IntPhase::Start | IntPhase::Sign | IntPhase::Digits, b'1'..=b'9')
            | (IntPhase::Digits, b'0') => IntPhase::Digits,
            (IntPhase::Zero, b'e') => return Ok(Step::Done(0)),
            (IntPhase::Digits, b'e') => {
                return int_parser::parse_integer(self.negative, self.digits.as_slice())
                    .map(Step::Done)
                    .map_err(|_| ErrorKind::IntegerOverflow);
            }
            // `ie`, `i-e`, `i-0`, `i01`, and any stray byte
            _ => return Err(ErrorKind::MalformedInteger),
        };
        self.digits
            .push(byte)
            .map_err(|_| ErrorKind::IntegerOverflow)?;
        Ok(Step::Pending)
    }
}

/// Tokenizes the `<digits>:` prefix of a byte string.
#[derive(Debug, Clone)]
pub(crate) struct LengthToken {
    digits: DigitBuffer<LENGTH_CAPACITY>,
}

impl LengthToken {
    pub fn new() -> Self {
        Self {
            digits: DigitBuffer::new(),
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<Step<usize>, ErrorKind> {
        match byte {
            b':' if !self.digits.as_slice().is_empty() => {
                int_parser::parse_length(self.digits.as_slice())
                    .map(Step::Done)
                    .map_err(|_| ErrorKind::MalformedLengthPrefix)
            }
            b'0'..=b'9' if self.digits.as_slice() == b"0" => {
                Err(ErrorKind::MalformedLengthPrefix)
            }
            b'0'..=b'9' => {
                self.digits
                    .push(byte)
                    .map_err(|_| ErrorKind::MalformedLengthPrefix)?;
                Ok(Step::Pending)
            }
            _ => Err(ErrorKind::MalformedLengthPrefix),
        }
    }
}

/// Counts down the bytes of a string body whose length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringBody {
    remaining: usize,
}

impl StringBody {
    pub fn new(len: usize) -> Self {
        Self { remaining: len }
    }

    /// Claims up to `available` bytes for this string and returns how many
    /// belong to it.
    pub fn take(&mut self, available: usize) -> usize {
        let n = available.min(self.remaining);
        self.remaining -= n;
        n
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
