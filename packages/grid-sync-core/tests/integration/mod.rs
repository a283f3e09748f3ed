//! Integration test suite for sheet sync.
//!
//! 1. Update transactions against an in-memory grid
//! 2. File-backed grid round trips
//! 3. Property checks on the diff

pub mod property_tests;
pub mod sync_tests;
