// SPDX-License-Identifier: Apache-2.0

/// Inline, fixed-capacity storage for the text of a number being tokenized.
///
/// `N` is the widest canonical literal the target type can hold, so a push
/// that does not fit means the value is out of range.
#[derive(Debug, Clone)]
pub(crate) struct DigitBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

/// The buffer is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Full;

impl<const N: usize> DigitBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Full> {
        let slot = self.bytes.get_mut(self.len).ok_or(Full)?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
