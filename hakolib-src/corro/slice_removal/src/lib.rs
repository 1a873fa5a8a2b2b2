//! Remove an element from a partially initialized buffer.
//!
//! # Examples
//! ```
//! use std::mem::MaybeUninit;
//!
//! use slice_removal::slice_remove;
//!
//! let mut buf: Vec<MaybeUninit<String>> =
//!     (0..10).map(|_| MaybeUninit::uninit()).collect();
//! buf[0].write("A".to_owned());
//! buf[1].write("B".to_owned());
//! buf[2].write("C".to_owned());
//! buf[3].write("X".to_owned());
//! buf[4].write("D".to_owned());
//! buf[5].write("E".to_owned());
//!
//! unsafe {
//!     let elt = slice_remove(&mut buf, 3, 6);
//!     assert_eq!(elt, "X");
//!
//!     let init = &*(&buf[..5] as *const [_] as *const [String]);
//!     assert_eq!(init, ["A", "B", "C", "D", "E"]);
//!
//!     for e in &mut buf[..5] {
//!         e.assume_init_drop();
//!     }
//! }
//! ```

use std::{mem::MaybeUninit, ptr};

/// Remove an element from the buffer.
///
/// # Safety
/// - `buf[..len]` is initialized,
/// - `len <= buf.len()`, and
/// - `i < len`.
pub unsafe fn slice_remove<T>(
    buf: &mut [MaybeUninit<T>],
    i: usize,
    len: usize,
) -> T {
    debug_assert!(i < len && len <= buf.len());
    let elt = buf[i].assume_init_read();
    let count = len - i - 1;
    let dst = buf[i..][..count].as_mut_ptr();
    let src = buf[i + 1..][..count].as_ptr();
    ptr::copy(src, dst, count);
    elt
}
