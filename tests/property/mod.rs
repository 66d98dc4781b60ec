//! Property-based tests
//!
//! Invariants of the list model and the access gates under arbitrary
//! operation sequences

mod items_proptest;
