//! Tracklist curation library - shared modules for both binaries.

pub mod config;
pub mod console;
pub mod diff;
pub mod error;
pub mod input;
pub mod matching;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod segment;
