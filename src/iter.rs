//! By-value traversal of a [`ResizableArray`](crate::ResizableArray).

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use core::slice;

use crate::array::release_block;

/// Owning iterator returned by `ResizableArray::into_iter`.
///
/// Takes over the array's block. Slots `[front, back)` are still live; anything not
/// yielded is dropped together with the block when the iterator goes away.
pub struct IntoIter<T> {
    block: NonNull<T>,
    capacity: usize,
    front: usize,
    back: usize,
    _marker: PhantomData<T>,
}

// SAFETY: same ownership story as the array itself.
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    /// # Safety
    ///
    /// `block` must come from `allocate_block::<T>(capacity)`, its first `len` slots must
    /// be initialised, and nobody else may drop or release them.
    pub(crate) unsafe fn from_raw_parts(block: NonNull<T>, capacity: usize, len: usize) -> Self {
        Self {
            block,
            capacity,
            front: 0,
            back: len,
            _marker: PhantomData,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[front, back)` is live.
        unsafe { slice::from_raw_parts(self.block.as_ptr().add(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: `front < back`, so the slot is live; advancing `front` gives it away.
        let value = unsafe { ptr::read(self.block.as_ptr().add(self.front)) };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: the slot at the new `back` was live and is now outside `[front, back)`.
        Some(unsafe { ptr::read(self.block.as_ptr().add(self.back)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: `[front, back)` is live; the block is released exactly once, here.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.block.as_ptr().add(self.front),
                self.back - self.front,
            ));
            release_block(self.block, self.capacity);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
