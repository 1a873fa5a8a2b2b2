//! Standard containers built from scratch.
//!
//! Sequence containers ([`seq`]: growable vector, fixed array, doubly
//! linked list), adapters over the list ([`adapter`]: stack, queue), and
//! ordered associative containers ([`ord`]: map, set, multiset) backed
//! by one red-black tree engine. [`ops`] holds the comparison capability
//! and the error types; [`corro`] the raw-buffer helpers; [`naive`] and
//! [`random`] the reference models and input generators the tests lean
//! on.

#[doc(inline)]
pub use {adapter, corro, naive, ops, ord, random, seq};
