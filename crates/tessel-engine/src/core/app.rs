use crate::device::Gpu;
use crate::error::StartupError;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once, after the window and GPU context exist and before the
    /// first frame. An error aborts startup.
    fn init(&mut self, gpu: &Gpu<'_>) -> Result<(), StartupError>;

    /// Called once per frame while the loop is running.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases GPU resources. Called once when the loop shuts down, before
    /// the GPU context and the window are dropped.
    fn shutdown(&mut self) {}
}
