//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, wires them to the GPU
//! layer, and drives the Running -> ShuttingDown render loop.

mod geometry;
mod runtime;

pub use geometry::{constrain_square, initial_geometry, next_square_request, WindowGeometry};
pub use runtime::{ExitReason, Runtime, RuntimeConfig};
