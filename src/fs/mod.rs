//! Filesystem helpers for plume.
//!
//! Durable state (history, current post, config) is always written through
//! `atomic_write_file` so a crash mid-write never leaves a truncated file.

mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
