//! CPU-side shader build step.
//!
//! Stage sources are compiled (parsed + validated) with naga and linked by
//! checking the vertex/fragment interface and the resource bindings each stage
//! uses. Nothing here touches the GPU: a [`LinkedProgram`] is turned into a
//! render pipeline later by [`crate::render::GpuProgram`].
//!
//! Failures carry a [`Diagnostic`], a log bounded to [`MAX_DIAGNOSTIC_LEN`]
//! bytes.

mod diagnostic;
mod error;
mod interface;
mod program;
mod source;
mod stage;

pub use diagnostic::{Diagnostic, MAX_DIAGNOSTIC_LEN};
pub use error::ShaderError;
pub use interface::{InterfaceVar, ResourceKind, ResourceSlot};
pub use program::{link, LinkedProgram};
pub use source::{ShaderSource, StageKind};
pub use stage::{compile, CompiledStage};
