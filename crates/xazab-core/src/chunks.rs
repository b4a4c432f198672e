use std::iter::FusedIterator;

use crate::error::{CoreError, Result};

/// Splits `items` into consecutive slices of `size` elements; the last slice
/// may be shorter. A zero `size` is rejected here, before anything is read.
pub fn chunks<T>(items: &[T], size: usize) -> Result<Chunks<'_, T>> {
    if size == 0 {
        return Err(CoreError::contract("chunk size must be greater than zero"));
    }

    Ok(Chunks {
        items,
        size,
        offset: 0,
    })
}

/// Single-pass iterator returned by [`chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a, T> {
    items: &'a [T],
    size: usize,
    offset: usize,
}

impl<'a, T> Iterator for Chunks<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.items.len() {
            return None;
        }

        let end = self.items.len().min(self.offset + self.size);
        let chunk = &self.items[self.offset..end];
        self.offset = end;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.offset;
        let count = remaining.div_ceil(self.size);
        (count, Some(count))
    }
}

impl<T> ExactSizeIterator for Chunks<'_, T> {}

impl<T> FusedIterator for Chunks<'_, T> {}
