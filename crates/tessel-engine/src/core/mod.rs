//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the application: one-time setup against the GPU context, a per-frame
//! callback, and an explicit teardown hook.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
