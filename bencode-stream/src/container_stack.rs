// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use crate::parse_error::ErrorKind;

/// Which half of a dictionary entry comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DictSlot {
    Key,
    Value,
}

#[derive(Debug, Clone)]
pub(crate) struct DictFrame {
    /// Last accepted key; `None` until the first key is read.
    previous_key: Option<Vec<u8>>,
    expect: DictSlot,
}

#[derive(Debug, Clone)]
pub(crate) enum Frame {
    List,
    Dict(DictFrame),
}

/// Where the next value lands, as seen from the innermost open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    TopLevel,
    ListItem,
    DictKey,
    DictValue,
}

/// Kind of container closed by an `e`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closed {
    List,
    Dict,
}

/// Dictionary keys must be strictly increasing in unsigned byte order.
///
/// Slice ordering is lexicographic with a proper prefix sorting first,
/// which is exactly the bencode rule. Equal keys are duplicates and fail the
/// same way.
pub(crate) fn check_key_order(previous: Option<&[u8]>, key: &[u8]) -> Result<(), ErrorKind> {
    match previous {
        Some(previous) if key <= previous => Err(ErrorKind::DictKeyOrderViolation),
        _ => Ok(()),
    }
}

/// Explicit stack of open containers. Nesting never recurses on the call
/// stack, so depth is limited only by memory or by `max_depth`.
#[derive(Debug, Clone)]
pub(crate) struct ContainerStack {
    frames: Vec<Frame>,
    max_depth: Option<usize>,
}

impl ContainerStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn slot(&self) -> Slot {
        match self.frames.last() {
            None => Slot::TopLevel,
            Some(Frame::List) => Slot::ListItem,
            Some(Frame::Dict(dict)) => match dict.expect {
                DictSlot::Key => Slot::DictKey,
                DictSlot::Value => Slot::DictValue,
            },
        }
    }

    fn push(&mut self, frame: Frame) -> Result<(), ErrorKind> {
        if self.max_depth.is_some_and(|max| self.frames.len() >= max) {
            return Err(ErrorKind::MaxDepthExceeded);
        }
        self.frames.push(frame);
        log::trace!("enter container, depth {}", self.frames.len());
        Ok(())
    }

    pub fn enter_list(&mut self) -> Result<(), ErrorKind> {
        self.push(Frame::List)
    }

    pub fn enter_dict(&mut self) -> Result<(), ErrorKind> {
        self.push(Frame::Dict(DictFrame {
            previous_key: None,
            expect: DictSlot::Key,
        }))
    }

    /// Pops the innermost container for an `e` token.
    ///
    /// A dictionary can only close where a key would start; closing it after
    /// a key but before its value is an unmatched end.
    pub fn exit(&mut self) -> Result<Closed, ErrorKind> {
        let closed = match self.frames.last() {
            None => return Err(ErrorKind::UnmatchedEnd),
            Some(Frame::Dict(dict)) if dict.expect == DictSlot::Value => {
                return Err(ErrorKind::UnmatchedEnd)
            }
            Some(Frame::Dict(_)) => Closed::Dict,
            Some(Frame::List) => Closed::List,
        };
        self.frames.pop();
        log::trace!("exit {:?}, depth {}", closed, self.frames.len());
        Ok(closed)
    }

    /// Validates a completed key against the innermost dictionary and makes
    /// it the new previous key. Returns the stored key.
    ///
    /// `key` is swapped into the frame; the caller gets back the old
    /// allocation, cleared, to reuse for the next key.
    pub fn accept_key(&mut self, key: &mut Vec<u8>) -> Result<&[u8], ErrorKind> {
        let Some(Frame::Dict(dict)) = self.frames.last_mut() else {
            return Err(ErrorKind::DictKeyNotString);
        };
        check_key_order(dict.previous_key.as_deref(), key)?;
        let stored = dict.previous_key.get_or_insert_with(Vec::new);
        core::mem::swap(stored, key);
        key.clear();
        dict.expect = DictSlot::Value;
        Ok(stored.as_slice())
    }

    /// Records that a list item or dictionary value finished.
    pub fn value_done(&mut self) {
        if let Some(Frame::Dict(dict)) = self.frames.last_mut() {
            dict.expect = DictSlot::Key;
        }
    }
}
