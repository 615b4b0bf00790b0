use std::fmt;
use std::path::Path;

use tessel_engine::paint::Color;
use tessel_engine::shader::ShaderSource;

/// Which of the two demos to run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DemoVariant {
    /// One orange quad.
    Solid,
    /// `crate.png` mapped onto the quad.
    Textured,
}

impl DemoVariant {
    pub fn title(self) -> &'static str {
        match self {
            DemoVariant::Solid => "tessel quad",
            DemoVariant::Textured => "tessel textured quad",
        }
    }

    /// Vertex and fragment source, in that order.
    pub fn shaders(self) -> (ShaderSource, ShaderSource) {
        match self {
            DemoVariant::Solid => (
                ShaderSource::vertex("solid.vert", include_str!("../shaders/solid.vert.wgsl")),
                ShaderSource::fragment("solid.frag", include_str!("../shaders/solid.frag.wgsl")),
            ),
            DemoVariant::Textured => (
                ShaderSource::vertex("textured.vert", include_str!("../shaders/textured.vert.wgsl")),
                ShaderSource::fragment(
                    "textured.frag",
                    include_str!("../shaders/textured.frag.wgsl"),
                ),
            ),
        }
    }

    pub fn background(self) -> Color {
        match self {
            DemoVariant::Solid => Color::rgb(0.2, 0.3, 0.3),
            DemoVariant::Textured => Color::BLACK,
        }
    }

    /// Image read at startup, relative to the working directory.
    pub fn texture_path(self) -> Option<&'static Path> {
        match self {
            DemoVariant::Solid => None,
            DemoVariant::Textured => Some(Path::new("crate.png")),
        }
    }
}

impl fmt::Display for DemoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
