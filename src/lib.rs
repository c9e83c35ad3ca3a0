//! # Resizable Array
//!
//! A growable, heap-allocated contiguous array with explicit control over allocation,
//! growth and element lifetime.
//!
//! This crate provides `ResizableArray`, an owned buffer that doubles its capacity when
//! it fills up, and `SharedArray`/`ArrayCursor`, a reference-counted wrapper with cursors
//! that refuse to dereference once the array is gone.
//!
//! ## Key Features
//!
//! * **Allocation apart from construction:** Storage is obtained raw and values are
//!   written into it slot by slot; unused capacity is never treated as initialised.
//! * **Amortised growth:** A full array grows to twice its capacity, so `push` is O(1)
//!   on average.
//! * **Checked and unchecked access:** `at`, `insert`, `pop` and `remove` return an
//!   [`ArrayError`]; `get_unchecked` skips validation for call sites that already did it.
//! * **Value semantics:** `Clone` is a deep copy into a new block of the same capacity.
//!
//! ## Capacity
//!
//! * Every array holds at least [`DEFAULT_CAPACITY`] (1) slot.
//! * Growth multiplies the capacity by [`GROWTH_FACTOR`] (2), or jumps straight to the
//!   requested size when `reserve` asks for more.
//! * `clear` keeps the allocation. `shrink_to_fit` hands surplus capacity back.
//!
//! ## Examples
//!
//! ### ResizableArray
//!
//! ```rust
//! use resizable_array::{ArrayError, ResizableArray};
//!
//! let mut arr = ResizableArray::new();
//! arr.push(1);
//! arr.push(2);
//! arr.push(3);
//! assert_eq!(arr.len(), 3);
//!
//! arr.insert(1, 99).unwrap();
//! assert_eq!(arr.as_slice(), &[1, 99, 2, 3]);
//!
//! assert_eq!(arr.pop(), Ok(3));
//! assert_eq!(arr.as_slice(), &[1, 99, 2]);
//!
//! assert_eq!(arr.at(7), Err(ArrayError::IndexOutOfRange { index: 7, len: 3 }));
//! ```
//!
//! ### Deep copies
//!
//! ```rust
//! use resizable_array::ResizableArray;
//!
//! let original = ResizableArray::from([1, 2, 3]);
//! let mut copy = original.clone();
//! copy.push(50);
//!
//! assert_eq!(original.len(), 3);
//! assert_eq!(copy.len(), 4);
//! ```
//!
//! ### SharedArray
//!
//! ```rust
//! use resizable_array::{ArrayError, SharedArray};
//!
//! let blob: SharedArray<String> = ["hello", "world"].iter().map(|s| s.to_string()).collect();
//! let mut cursor = blob.begin();
//!
//! assert_eq!(cursor.read().unwrap(), "hello");
//! cursor.advance().unwrap();
//! assert_eq!(cursor.read().unwrap(), "world");
//! cursor.advance().unwrap();
//! assert!(cursor.advance().is_err());
//!
//! drop(blob);
//! assert_eq!(cursor.read(), Err(ArrayError::DetachedCursor));
//! ```

// --- Module Declarations ---

pub mod array;
pub mod error;
pub mod iter;
pub mod shared;

// --- Re-exports ---

pub use array::{DEFAULT_CAPACITY, GROWTH_FACTOR, ResizableArray};
pub use error::ArrayError;
pub use iter::IntoIter;
pub use shared::{ArrayCursor, SharedArray};

/// Result type used by every fallible operation in this crate.
pub type Result<T, E = ArrayError> = core::result::Result<T, E>;
