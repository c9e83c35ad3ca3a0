//! Contiguous, heap-allocated array that grows by doubling.
//!
//! Provides [`ResizableArray`]: a single owned block of `capacity` slots, of which the
//! first `len` hold live values and the rest are uninitialised. Allocation and
//! construction are kept apart: the block is obtained raw from the global allocator,
//! values are written into slots one at a time, and live slots are dropped explicitly
//! before the block is handed back.
//!
//! Because it `Deref`s to `[T]`, all standard slice methods are available without
//! conversion. The checked accessors ([`ResizableArray::at`], [`ResizableArray::insert`],
//! [`ResizableArray::pop`], ...) report an [`ArrayError`] instead of panicking.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;
use std::alloc::{self, Layout};

use log::{debug, trace};

use crate::Result;
use crate::error::ArrayError;
use crate::iter::IntoIter;

/// Capacity of an array created with [`ResizableArray::new`], and the floor for every
/// other constructor.
pub const DEFAULT_CAPACITY: usize = 1;

/// Factor applied to the capacity when a full array has to grow.
pub const GROWTH_FACTOR: usize = 2;

/// Why a block could not be obtained.
pub(crate) enum AllocFailure {
    /// `capacity * size_of::<T>()` does not fit in `isize`.
    CapacityOverflow,
    /// The global allocator returned null.
    Exhausted(Layout),
}

impl AllocFailure {
    /// Treats the failure as fatal, the way `std::vec::Vec` does.
    fn abort(self) -> ! {
        match self {
            AllocFailure::CapacityOverflow => capacity_overflow(),
            AllocFailure::Exhausted(layout) => alloc::handle_alloc_error(layout),
        }
    }
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[inline(always)]
const fn is_zst<T>() -> bool {
    mem::size_of::<T>() == 0
}

/// Obtains uninitialised storage for `capacity` values of `T`.
///
/// Zero-sized types and zero capacities never touch the allocator; they get a
/// dangling, well-aligned pointer instead.
pub(crate) fn allocate_block<T>(capacity: usize) -> core::result::Result<NonNull<T>, AllocFailure> {
    if is_zst::<T>() || capacity == 0 {
        return Ok(NonNull::dangling());
    }
    let layout = Layout::array::<T>(capacity).map_err(|_| AllocFailure::CapacityOverflow)?;
    // SAFETY: `layout` has a non-zero size.
    let raw = unsafe { alloc::alloc(layout) };
    NonNull::new(raw.cast::<T>()).ok_or(AllocFailure::Exhausted(layout))
}

/// Hands a block back to the allocator. Live values in it are NOT dropped.
///
/// # Safety
///
/// `block` must have been returned by `allocate_block::<T>(capacity)` and not
/// released since.
pub(crate) unsafe fn release_block<T>(block: NonNull<T>, capacity: usize) {
    if is_zst::<T>() || capacity == 0 {
        return;
    }
    // SAFETY: this exact layout was validated by `Layout::array` on allocation.
    unsafe {
        let layout =
            Layout::from_size_align_unchecked(mem::size_of::<T>() * capacity, mem::align_of::<T>());
        alloc::dealloc(block.as_ptr().cast::<u8>(), layout);
    }
}

/// Capacity to grow to so that at least `required` slots exist.
#[inline]
fn grown_capacity(current: usize, required: usize) -> usize {
    current
        .saturating_mul(GROWTH_FACTOR)
        .max(required)
        .max(DEFAULT_CAPACITY)
}

/// A growable array that exclusively owns one contiguous heap block.
///
/// Invariants: `len <= capacity`; slots `[0, len)` are initialised; slots
/// `[len, capacity)` are not. `capacity` is at least [`DEFAULT_CAPACITY`] for every
/// array reachable through the public API.
pub struct ResizableArray<T> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the array owns its elements outright, like `Box<[T]>`.
unsafe impl<T: Send> Send for ResizableArray<T> {}
// SAFETY: `&ResizableArray<T>` only ever hands out `&T`.
unsafe impl<T: Sync> Sync for ResizableArray<T> {}

impl<T> ResizableArray<T> {
    /// Creates an empty array with room for [`DEFAULT_CAPACITY`] elements.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty array with room for `max(1, capacity)` elements.
    ///
    /// # Panics
    ///
    /// Panics if the byte size of the block overflows `isize`; aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocator fails.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        let ptr = allocate_block::<T>(capacity).unwrap_or_else(|failure| failure.abort());
        Self {
            ptr,
            len: 0,
            capacity,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `value`, doubling the capacity first if the array is full.
    ///
    /// Amortised O(1). Growing moves every element into a fresh block.
    #[inline(always)]
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity {
            self.grow_for(1);
        }
        // SAFETY: `len < capacity`, so the slot is allocated and uninitialised.
        unsafe {
            ptr::write(self.ptr.as_ptr().add(self.len), value);
        }
        self.len += 1;
    }

    /// Removes the last element and returns it.
    ///
    /// Capacity is never reduced.
    pub fn pop(&mut self) -> Result<T> {
        if self.len == 0 {
            return Err(ArrayError::EmptyContainer);
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live and is now outside `[0, len)`.
        Ok(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    /// Inserts `value` at `index`, shifting `[index, len)` one slot to the right.
    ///
    /// `index == len` appends. Growth, if needed, completes before any element moves.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        if self.len == self.capacity {
            self.grow_for(1);
        }
        // SAFETY: `index <= len < capacity`. `ptr::copy` is an overlapping move, so the
        // tail is carried up without clobbering sources that have not been moved yet.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes the element at `index`, shifting the tail down by one.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        // SAFETY: `index < len`; the tail move stays within the live range.
        let value = unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Bounds-checked shared access.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        if index < self.len {
            // SAFETY: checked above.
            Ok(unsafe { &*self.ptr.as_ptr().add(index) })
        } else {
            Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Bounds-checked exclusive access.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        if index < self.len {
            // SAFETY: checked above.
            Ok(unsafe { &mut *self.ptr.as_ptr().add(index) })
        } else {
            Err(ArrayError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Access without bounds validation.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.ptr.as_ptr().add(index) }
    }

    /// Exclusive access without bounds validation.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Self::len).
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.ptr.as_ptr().add(index) }
    }

    pub fn front(&self) -> Result<&T> {
        self.at(0).map_err(|_| ArrayError::EmptyContainer)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.at_mut(0).map_err(|_| ArrayError::EmptyContainer)
    }

    pub fn back(&self) -> Result<&T> {
        match self.len.checked_sub(1) {
            Some(last) => self.at(last),
            None => Err(ArrayError::EmptyContainer),
        }
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        match self.len.checked_sub(1) {
            Some(last) => self.at_mut(last),
            None => Err(ArrayError::EmptyContainer),
        }
    }

    /// Drops every element from `len` onwards. No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail_len = self.len - len;
        // Shorten first: a panicking destructor must not lead to a double drop.
        self.len = len;
        // SAFETY: `[len, len + tail_len)` was live and is now outside `[0, self.len)`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(len),
                tail_len,
            ));
        }
    }

    /// Drops every live element. The allocation is retained for reuse; call
    /// [`shrink_to_fit`](Self::shrink_to_fit) afterwards to give it back.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensures room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; aborts if the allocator fails.
    pub fn reserve(&mut self, additional: usize) {
        self.grow_for(additional);
    }

    /// Like [`reserve`](Self::reserve) but reports exhaustion instead of aborting.
    /// The array is untouched on failure.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let exhausted = ArrayError::ResourceExhaustion {
            requested: additional,
        };
        let Some(required) = self.len.checked_add(additional) else {
            debug!("resizable array: reserve of {additional} overflows length {}", self.len);
            return Err(exhausted);
        };
        if required <= self.capacity {
            return Ok(());
        }
        self.relocate(grown_capacity(self.capacity, required))
            .map_err(|_| {
                debug!(
                    "resizable array: could not grow from capacity {} to fit {required}",
                    self.capacity
                );
                exhausted
            })
    }

    /// Reallocates down to `max(1, len)` slots.
    pub fn shrink_to_fit(&mut self) {
        let target = self.len.max(DEFAULT_CAPACITY);
        if target < self.capacity {
            if let Err(failure) = self.relocate(target) {
                failure.abort();
            }
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is initialised; `ptr` is non-null and aligned even when dangling.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Borrowing traversal in index order. Any mutation of the array ends it.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Infallible growth used by `push`, `insert` and `reserve`.
    #[inline(never)]
    fn grow_for(&mut self, additional: usize) {
        let required = self
            .len
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow());
        if required <= self.capacity {
            return;
        }
        if let Err(failure) = self.relocate(grown_capacity(self.capacity, required)) {
            failure.abort();
        }
    }

    /// Moves the live elements into a freshly allocated block of `new_capacity` slots
    /// and releases the old block. On failure nothing has changed.
    fn relocate(&mut self, new_capacity: usize) -> core::result::Result<(), AllocFailure> {
        debug_assert!(new_capacity >= self.len);
        let new_ptr = allocate_block::<T>(new_capacity)?;
        // SAFETY: the blocks are distinct and the new one has room for `len` values.
        // After the bitwise move the old slots are logically uninitialised.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
            release_block(self.ptr, self.capacity);
        }
        trace!(
            "resizable array: relocated {} elements, capacity {} -> {}",
            self.len,
            self.capacity,
            new_capacity
        );
        self.ptr = new_ptr;
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<T: Clone> ResizableArray<T> {
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());
        for item in other {
            self.push(item.clone());
        }
    }

    /// Grows with clones of `value` or truncates so that `len() == new_len`.
    pub fn resize(&mut self, new_len: usize, value: T) {
        if new_len > self.len {
            self.reserve(new_len - self.len);
            while self.len < new_len {
                self.push(value.clone());
            }
        } else {
            self.truncate(new_len);
        }
    }
}

impl<T> Deref for ResizableArray<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for ResizableArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Drop for ResizableArray<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` is live and the block came from `allocate_block`.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            release_block(self.ptr, self.capacity);
        }
    }
}

/// Deep copy: the clone owns a new block of the same capacity.
impl<T: Clone> Clone for ResizableArray<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.capacity);
        for item in self.iter() {
            copy.push(item.clone());
        }
        copy
    }

    /// Builds the replacement completely before the current block is released.
    fn clone_from(&mut self, source: &Self) {
        let replacement = source.clone();
        *self = replacement;
    }
}

impl<T: fmt::Debug> fmt::Debug for ResizableArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T> Default for ResizableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq<U>, U> PartialEq<ResizableArray<U>> for ResizableArray<T> {
    fn eq(&self, other: &ResizableArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ResizableArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for ResizableArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for ResizableArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for ResizableArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for ResizableArray<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for ResizableArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: PartialOrd> PartialOrd for ResizableArray<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord> Ord for ResizableArray<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> Extend<T> for ResizableArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for ResizableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity(iter.size_hint().0);
        array.extend(iter);
        array
    }
}

impl<T> From<Vec<T>> for ResizableArray<T> {
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for ResizableArray<T> {
    fn from(slice: &[T]) -> Self {
        let mut array = Self::with_capacity(slice.len());
        array.extend_from_slice(slice);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for ResizableArray<T> {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T> IntoIterator for ResizableArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the iterator becomes the sole owner of the
        // block and of the `len` live values at its front.
        unsafe { IntoIter::from_raw_parts(this.ptr, this.capacity, this.len) }
    }
}

impl<'a, T> IntoIterator for &'a ResizableArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ResizableArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> AsRef<[T]> for ResizableArray<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for ResizableArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> std::borrow::Borrow<[T]> for ResizableArray<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::borrow::BorrowMut<[T]> for ResizableArray<T> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> core::ops::Index<usize> for ResizableArray<T> {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> core::ops::IndexMut<usize> for ResizableArray<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}
