//! Shared array with checked cursors.
//!
//! [`SharedArray`] puts one [`ResizableArray`] behind a reference-counted handle so that
//! several owners can append to and read from the same storage. [`ArrayCursor`] walks
//! such an array through a weak back-reference: it never keeps the array alive, and
//! every dereference re-resolves the handle, so a cursor survives reallocation and
//! reports [`ArrayError::DetachedCursor`] once the last owner is gone.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::Result;
use crate::array::ResizableArray;
use crate::error::ArrayError;

type Storage<T> = Rc<RefCell<ResizableArray<T>>>;

/// A [`ResizableArray`] with shared ownership.
///
/// Cloning a `SharedArray` clones the handle, not the elements. Use
/// `shared.borrow().clone()` for an independent deep copy.
pub struct SharedArray<T> {
    storage: Storage<T>,
}

impl<T> SharedArray<T> {
    pub fn new() -> Self {
        Self::from_array(ResizableArray::new())
    }

    pub fn from_array(array: ResizableArray<T>) -> Self {
        Self {
            storage: Rc::new(RefCell::new(array)),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.borrow().is_empty()
    }

    pub fn push(&self, value: T) {
        self.storage.borrow_mut().push(value);
    }

    pub fn pop(&self) -> Result<T> {
        self.storage.borrow_mut().pop()
    }

    pub fn front(&self) -> Result<Ref<'_, T>> {
        Ref::filter_map(self.storage.borrow(), |array| array.front().ok())
            .map_err(|_| ArrayError::EmptyContainer)
    }

    pub fn back(&self) -> Result<Ref<'_, T>> {
        Ref::filter_map(self.storage.borrow(), |array| array.back().ok())
            .map_err(|_| ArrayError::EmptyContainer)
    }

    /// Shared view of the whole array.
    ///
    /// # Panics
    ///
    /// Panics if a [`borrow_mut`](Self::borrow_mut) guard is alive.
    pub fn borrow(&self) -> Ref<'_, ResizableArray<T>> {
        self.storage.borrow()
    }

    /// Exclusive view of the whole array.
    ///
    /// # Panics
    ///
    /// Panics if any other guard is alive.
    pub fn borrow_mut(&self) -> RefMut<'_, ResizableArray<T>> {
        self.storage.borrow_mut()
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> ArrayCursor<T> {
        ArrayCursor::new(&self.storage, 0)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> ArrayCursor<T> {
        ArrayCursor::new(&self.storage, self.len())
    }

    /// Number of `SharedArray` handles to this storage. Cursors are not counted.
    pub fn owner_count(&self) -> usize {
        Rc::strong_count(&self.storage)
    }
}

impl<T> Clone for SharedArray<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Rc::clone(&self.storage),
        }
    }
}

impl<T> Default for SharedArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<ResizableArray<T>> for SharedArray<T> {
    fn from(array: ResizableArray<T>) -> Self {
        Self::from_array(array)
    }
}

impl<T> FromIterator<T> for SharedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_array(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.storage.try_borrow() {
            Ok(array) => f.debug_tuple("SharedArray").field(&*array).finish(),
            Err(_) => f.write_str("SharedArray(<borrowed>)"),
        }
    }
}

/// Position inside a [`SharedArray`], held through a weak reference.
pub struct ArrayCursor<T> {
    storage: Weak<RefCell<ResizableArray<T>>>,
    position: usize,
}

impl<T> ArrayCursor<T> {
    fn new(storage: &Storage<T>, position: usize) -> Self {
        Self {
            storage: Rc::downgrade(storage),
            position,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// `false` once every owning [`SharedArray`] has been dropped.
    pub fn is_attached(&self) -> bool {
        self.storage.strong_count() > 0
    }

    /// Resolves the back-reference and checks that the position names a live element.
    fn check(&self) -> Result<Storage<T>> {
        let storage = self.storage.upgrade().ok_or(ArrayError::DetachedCursor)?;
        let len = storage.borrow().len();
        if self.position >= len {
            return Err(ArrayError::IndexOutOfRange {
                index: self.position,
                len,
            });
        }
        Ok(storage)
    }

    /// Runs `f` on the element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `f` tries to mutate the same array, or if a `borrow_mut` guard on it
    /// is alive.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let storage = self.check()?;
        let array = storage.borrow();
        Ok(f(&array[self.position]))
    }

    /// Clone of the element under the cursor.
    pub fn read(&self) -> Result<T>
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Moves to the next element. Fails without moving when the cursor is detached
    /// or already past the end.
    pub fn advance(&mut self) -> Result<()> {
        self.check()?;
        self.position += 1;
        Ok(())
    }
}

impl<T> Clone for ArrayCursor<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Weak::clone(&self.storage),
            position: self.position,
        }
    }
}

/// Cursors are equal when they point at the same position of the same array.
impl<T> PartialEq for ArrayCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && Weak::ptr_eq(&self.storage, &other.storage)
    }
}

impl<T> Eq for ArrayCursor<T> {}

impl<T> fmt::Debug for ArrayCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayCursor")
            .field("position", &self.position)
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> SharedArray<String> {
        ["hello", "world", "test"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shared_handles_see_same_storage() {
        let a = SharedArray::new();
        let b = a.clone();
        a.push(1);
        b.push(2);
        assert_eq!(a.len(), 2);
        assert_eq!(*b.borrow(), [1, 2]);
        assert_eq!(a.owner_count(), 2);
    }

    #[test]
    fn test_shared_front_back_and_pop() {
        let shared = words();
        assert_eq!(*shared.front().unwrap(), "hello");
        assert_eq!(*shared.back().unwrap(), "test");
        assert_eq!(shared.pop().unwrap(), "test");
        assert_eq!(shared.pop().unwrap(), "world");
        assert_eq!(shared.pop().unwrap(), "hello");
        assert!(shared.is_empty());
        assert_eq!(shared.pop(), Err(ArrayError::EmptyContainer));
        assert!(matches!(shared.front(), Err(ArrayError::EmptyContainer)));
        assert!(matches!(shared.back(), Err(ArrayError::EmptyContainer)));
    }

    #[test]
    fn test_cursor_walks_and_rejects_past_end() {
        let shared = words();
        let mut cursor = shared.begin();
        assert_eq!(cursor.read().unwrap(), "hello");
        cursor.advance().unwrap();
        assert_eq!(cursor.read().unwrap(), "world");
        cursor.advance().unwrap();
        assert_eq!(cursor.with(|s| s.len()).unwrap(), 4);
        cursor.advance().unwrap();
        assert_eq!(cursor, shared.end());
        assert_eq!(
            cursor.read(),
            Err(ArrayError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            cursor.advance(),
            Err(ArrayError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_cursor_survives_reallocation() {
        let shared = SharedArray::from_array(ResizableArray::with_capacity(1));
        shared.push(10);
        let cursor = shared.begin();
        for i in 0..100 {
            shared.push(i);
        }
        assert_eq!(cursor.read(), Ok(10));
    }

    #[test]
    fn test_cursor_detaches_when_array_dropped() {
        let shared = words();
        let cursor = shared.begin();
        assert!(cursor.is_attached());
        let other = shared.clone();
        drop(shared);
        assert!(cursor.is_attached());
        drop(other);
        assert!(!cursor.is_attached());
        assert_eq!(cursor.read(), Err(ArrayError::DetachedCursor));
        let mut cursor = cursor;
        assert_eq!(cursor.advance(), Err(ArrayError::DetachedCursor));
    }

    #[test]
    fn test_cursor_sees_shrunk_array() {
        let shared: SharedArray<i32> = (0..3).collect();
        let mut cursor = shared.begin();
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        shared.borrow_mut().clear();
        assert_eq!(
            cursor.read(),
            Err(ArrayError::IndexOutOfRange { index: 2, len: 0 })
        );
    }

    #[test]
    fn test_cursors_compare_by_array_and_position() {
        let a: SharedArray<i32> = (0..2).collect();
        let b: SharedArray<i32> = (0..2).collect();
        assert_eq!(a.begin(), a.begin());
        assert_ne!(a.begin(), b.begin());
        assert_ne!(a.begin(), a.end());
    }

    #[test]
    fn test_shared_debug() {
        let shared: SharedArray<i32> = (1..3).collect();
        assert_eq!(format!("{shared:?}"), "SharedArray([1, 2])");
        let cursor = shared.begin();
        assert_eq!(
            format!("{cursor:?}"),
            "ArrayCursor { position: 0, attached: true }"
        );
    }
}
