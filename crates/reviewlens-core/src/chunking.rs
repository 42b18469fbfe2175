//! Order-preserving fixed-size chunking of review texts.

use std::num::NonZeroUsize;

use crate::{Error, Result};

/// A contiguous slice of the input sequence, processed as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a, T> {
    /// 0-based position of this chunk in the sequence.
    pub index: usize,
    pub items: &'a [T],
}

impl<'a, T> Chunk<'a, T> {
    /// 1-based position, as used in artifact names and progress logs.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: AsRef<str>> Chunk<'a, T> {
    /// Concatenate the chunk's texts with `separator`.
    pub fn join(&self, separator: &str) -> String {
        let mut out = String::new();
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(item.as_ref());
        }
        out
    }
}

/// Split `items` into `⌈N/S⌉` chunks of `size`, the last possibly shorter.
///
/// Empty input yields no chunks.
pub fn chunk_items<T>(items: &[T], size: NonZeroUsize) -> Vec<Chunk<'_, T>> {
    items
        .chunks(size.get())
        .enumerate()
        .map(|(index, items)| Chunk { index, items })
        .collect()
}

/// Validate a user-supplied chunk size.
pub fn chunk_size(size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(size)
        .ok_or_else(|| Error::InvalidInput("chunk size must be at least 1".to_string()))
}
