//! Domain logic for Web Remote input processing.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of the application.  Domain code has **no** imports
//! from timers, sockets or UI toolkits, so it can be compiled and tested on
//! any platform without external setup.  Time is always passed in explicitly
//! as a millisecond timestamp instead of being read from a clock.

/// Ring of recent motion samples and the speed/displacement math built on it.
pub mod motion;

/// Touch/pointer gesture state machine.
pub mod gesture;

/// Sentinel-buffer text-edit differ.
pub mod text_edit;
