//! GPU-side objects for the quad demos.
//!
//! Each type owns exactly one kind of GPU resource and is created once at
//! startup: the program (render pipeline built from a [`LinkedProgram`]), the
//! static mesh (vertex buffer), and the optional texture. `release` consumes
//! the value, so every resource is freed exactly once.
//!
//! [`LinkedProgram`]: crate::shader::LinkedProgram

mod mesh;
mod program;
mod texture;

/// A GPU resource freed by consuming it.
pub trait Release {
    fn release(self);
}

pub use mesh::{StaticMesh, Vertex};
pub use program::GpuProgram;
pub use texture::{decode_image, load_image, QuadTexture, TextureImage, TextureLoadError};
