//! Errors that can occur using this crate.
//!
//! Loading and execution have separate enums because the binary reports them
//! at different points of its lifecycle.

use displaydoc::Display;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Possible errors while placing a program image into memory.
///
/// `Display` and `Debug` both render the diagnostic the command line
/// interface prints before exiting.
#[derive(Display, PartialEq, Eq)]
pub enum LoadImageError {
    /// failed to load image: {0}
    Unreadable(String),
}
impl Debug for LoadImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for LoadImageError {}

/// Possible errors during program execution.
///
/// Reserved opcodes and unknown trap vectors execute as no-ops, so the only
/// way a running program can fail is through the host I/O it is bridged to.
#[derive(Display, PartialEq, Eq)]
pub enum ExecutionError {
    /// keyboard or console I/O failed: {0}
    Io(String),
}
impl Debug for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for ExecutionError {}

impl From<std::io::Error> for ExecutionError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
