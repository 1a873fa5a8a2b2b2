//! Insert an element into a partially initialized buffer.
//!
//! # Examples
//! ```
//! use std::mem::MaybeUninit;
//!
//! use slice_insertion::slice_insert;
//!
//! let mut buf: Vec<MaybeUninit<String>> =
//!     (0..10).map(|_| MaybeUninit::uninit()).collect();
//! buf[0].write("A".to_owned());
//! buf[1].write("B".to_owned());
//! buf[2].write("C".to_owned());
//! buf[3].write("E".to_owned());
//! buf[4].write("F".to_owned());
//!
//! unsafe {
//!     slice_insert(&mut buf, 3, 5, "D".to_owned());
//!
//!     let init = &*(&buf[..6] as *const [_] as *const [String]);
//!     assert_eq!(init, ["A", "B", "C", "D", "E", "F"]);
//!
//!     for e in &mut buf[..6] {
//!         e.assume_init_drop();
//!     }
//! }
//! ```

use std::{mem::MaybeUninit, ptr};

/// Insert an element into the buffer.
///
/// # Safety
/// - `buf[..len]` is initialized,
/// - `buf[len..]` is uninitialized,
/// - `len < buf.len()`, and
/// - `i <= len`.
pub unsafe fn slice_insert<T>(
    buf: &mut [MaybeUninit<T>],
    i: usize,
    len: usize,
    elt: T,
) {
    debug_assert!(i <= len && len < buf.len());
    let count = len - i;
    let dst = buf[i + 1..][..count].as_mut_ptr();
    // `src` should be after `dst` for Stacked Borrows.
    let src = buf[i..][..count].as_ptr();
    ptr::copy(src, dst, count);
    buf[i].write(elt);
}
