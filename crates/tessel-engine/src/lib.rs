//! Tessel engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the demo binaries, plus the
//! CPU-side shader build step (stage compilation and program linking).

pub mod device;
pub mod window;
pub mod input;
pub mod core;
pub mod error;

pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;
