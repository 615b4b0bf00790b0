use std::borrow::Cow;
use std::fmt;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub fn wgpu_stages(self) -> wgpu::ShaderStages {
        match self {
            StageKind::Vertex => wgpu::ShaderStages::VERTEX,
            StageKind::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Immutable WGSL source for one stage.
///
/// Built once (typically from `include_str!`) and handed explicitly to
/// [`compile`](super::compile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub kind: StageKind,
    pub text: Cow<'static, str>,
}

impl ShaderSource {
    pub const fn vertex(label: &'static str, text: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
            kind: StageKind::Vertex,
            text: Cow::Borrowed(text),
        }
    }

    pub const fn fragment(label: &'static str, text: &'static str) -> Self {
        Self {
            label: Cow::Borrowed(label),
            kind: StageKind::Fragment,
            text: Cow::Borrowed(text),
        }
    }
}
