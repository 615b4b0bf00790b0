//! Stage interface reflection over validated naga IR.
//!
//! Everything the linker compares lives here: `@location` inputs/outputs,
//! builtins, and the resource bindings an entry point actually uses.

use naga::{
    Binding, BuiltIn, ImageClass, ImageDimension, Interpolation, Sampling, ScalarKind, TypeInner,
    VectorSize,
};

use super::CompiledStage;

/// One `@location` slot of a stage interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceVar {
    pub location: u32,
    pub name: Option<String>,
    pub ty: TypeInner,
    pub interpolation: Option<Interpolation>,
    pub sampling: Option<Sampling>,
}

impl InterfaceVar {
    /// Whether a value written as `self` reaches a stage reading `other`
    /// unchanged. Sampling is irrelevant for flat values.
    pub fn qualifiers_match(&self, other: &InterfaceVar) -> bool {
        self.interpolation == other.interpolation
            && (self.interpolation == Some(Interpolation::Flat) || self.sampling == other.sampling)
    }

    /// Qualifiers as written in WGSL, e.g. `@interpolate(linear, center)`.
    pub fn describe_qualifiers(&self) -> String {
        let lower = |s: String| s.to_lowercase();
        match (self.interpolation, self.sampling) {
            (None, _) => "no @interpolate".to_owned(),
            (Some(i), None) => format!("@interpolate({})", lower(format!("{i:?}"))),
            (Some(i), Some(s)) => format!(
                "@interpolate({}, {})",
                lower(format!("{i:?}")),
                lower(format!("{s:?}"))
            ),
        }
    }
}

/// Resource types the quad programs can bind.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResourceKind {
    /// `texture_2d<f32>`
    Texture2d,
    /// `sampler` (non-comparison)
    Sampler,
}

/// A resource binding used by the linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSlot {
    pub group: u32,
    pub binding: u32,
    pub kind: ResourceKind,
    pub name: Option<String>,
    /// Stages that access the binding.
    pub visibility: wgpu::ShaderStages,
}

/// Flattened `@location` variables and builtins on one side of an entry point.
#[derive(Debug, Default)]
pub(crate) struct Interface {
    pub vars: Vec<InterfaceVar>,
    pub builtins: Vec<BuiltIn>,
}

impl Interface {
    pub fn location(&self, location: u32) -> Option<&InterfaceVar> {
        self.vars.iter().find(|v| v.location == location)
    }

    pub fn writes_position(&self) -> bool {
        self.builtins
            .iter()
            .any(|b| matches!(b, BuiltIn::Position { .. }))
    }
}

pub(crate) fn entry_inputs(stage: &CompiledStage) -> Interface {
    let module = &stage.module;
    let mut iface = Interface::default();
    for arg in &stage.entry_point().function.arguments {
        flatten(module, arg.ty, arg.binding.as_ref(), arg.name.as_deref(), &mut iface);
    }
    iface
}

pub(crate) fn entry_outputs(stage: &CompiledStage) -> Interface {
    let module = &stage.module;
    let mut iface = Interface::default();
    if let Some(result) = &stage.entry_point().function.result {
        flatten(module, result.ty, result.binding.as_ref(), None, &mut iface);
    }
    iface
}

fn flatten(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    name: Option<&str>,
    out: &mut Interface,
) {
    match binding {
        Some(Binding::BuiltIn(b)) => out.builtins.push(*b),
        Some(Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => out.vars.push(InterfaceVar {
            location: *location,
            name: name.map(str::to_owned),
            ty: module.types[ty].inner.clone(),
            interpolation: *interpolation,
            sampling: *sampling,
        }),
        // Unbound entry-point values are structs whose members carry the bindings.
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    flatten(module, m.ty, m.binding.as_ref(), m.name.as_deref(), out);
                }
            }
        }
    }
}

/// A resource binding as seen from a single stage, before merging.
#[derive(Debug)]
pub(crate) struct StageResource {
    pub group: u32,
    pub binding: u32,
    pub name: Option<String>,
    pub kind: Result<ResourceKind, String>,
}

/// Resource bindings the stage's entry point actually uses.
pub(crate) fn used_resources(stage: &CompiledStage) -> Vec<StageResource> {
    let module = &stage.module;
    let ep_info = stage.entry_info();

    module
        .global_variables
        .iter()
        .filter_map(|(handle, var)| {
            let rb = var.binding.as_ref()?;
            if ep_info[handle].is_empty() {
                return None;
            }
            let inner = &module.types[var.ty].inner;
            Some(StageResource {
                group: rb.group,
                binding: rb.binding,
                name: var.name.clone(),
                kind: classify_resource(inner).ok_or_else(|| describe_type(inner)),
            })
        })
        .collect()
}

fn classify_resource(inner: &TypeInner) -> Option<ResourceKind> {
    match inner {
        TypeInner::Image {
            dim: ImageDimension::D2,
            arrayed: false,
            class: ImageClass::Sampled { kind: ScalarKind::Float, multi: false },
        } => Some(ResourceKind::Texture2d),
        TypeInner::Sampler { comparison: false } => Some(ResourceKind::Sampler),
        _ => None,
    }
}

/// Short WGSL-like spelling of a type, for diagnostics.
pub(crate) fn describe_type(inner: &TypeInner) -> String {
    match inner {
        TypeInner::Scalar(s) => scalar_name(s).to_owned(),
        TypeInner::Vector { size, scalar } => {
            format!("vec{}<{}>", vector_len(*size), scalar_name(scalar))
        }
        TypeInner::Matrix { columns, rows, scalar } => format!(
            "mat{}x{}<{}>",
            vector_len(*columns),
            vector_len(*rows),
            scalar_name(scalar)
        ),
        TypeInner::Sampler { comparison: true } => "sampler_comparison".to_owned(),
        TypeInner::Sampler { comparison: false } => "sampler".to_owned(),
        other => format!("{other:?}"),
    }
}

fn scalar_name(s: &naga::Scalar) -> &'static str {
    match (s.kind, s.width) {
        (ScalarKind::Float, 2) => "f16",
        (ScalarKind::Float, 8) => "f64",
        (ScalarKind::Float, _) => "f32",
        (ScalarKind::Sint, _) => "i32",
        (ScalarKind::Uint, _) => "u32",
        (ScalarKind::Bool, _) => "bool",
        _ => "abstract",
    }
}

fn vector_len(size: VectorSize) -> u8 {
    match size {
        VectorSize::Bi => 2,
        VectorSize::Tri => 3,
        VectorSize::Quad => 4,
    }
}

/// Whether `ty` can be written to a float color target.
pub(crate) fn is_float_color(ty: &TypeInner) -> bool {
    match ty {
        TypeInner::Scalar(s) | TypeInner::Vector { scalar: s, .. } => s.kind == ScalarKind::Float,
        _ => false,
    }
}

/// Whether a vertex buffer attribute format can feed a vertex input of type `ty`.
pub(crate) fn vertex_format_matches(ty: &TypeInner, format: wgpu::VertexFormat) -> bool {
    let f32_scalar = naga::Scalar::F32;
    match (ty, format) {
        (TypeInner::Scalar(s), wgpu::VertexFormat::Float32) => *s == f32_scalar,
        (TypeInner::Vector { size, scalar }, _) if *scalar == f32_scalar => matches!(
            (size, format),
            (VectorSize::Bi, wgpu::VertexFormat::Float32x2)
                | (VectorSize::Tri, wgpu::VertexFormat::Float32x3)
                | (VectorSize::Quad, wgpu::VertexFormat::Float32x4)
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_f32(size: VectorSize) -> TypeInner {
        TypeInner::Vector { size, scalar: naga::Scalar::F32 }
    }

    #[test]
    fn describes_vectors_wgsl_style() {
        assert_eq!(describe_type(&vec_f32(VectorSize::Tri)), "vec3<f32>");
        assert_eq!(describe_type(&TypeInner::Scalar(naga::Scalar::U32)), "u32");
    }

    #[test]
    fn float_vertex_formats_match_by_width() {
        assert!(vertex_format_matches(&vec_f32(VectorSize::Bi), wgpu::VertexFormat::Float32x2));
        assert!(vertex_format_matches(&vec_f32(VectorSize::Quad), wgpu::VertexFormat::Float32x4));
        assert!(vertex_format_matches(
            &TypeInner::Scalar(naga::Scalar::F32),
            wgpu::VertexFormat::Float32
        ));
    }

    #[test]
    fn mismatched_vertex_formats_are_rejected() {
        assert!(!vertex_format_matches(&vec_f32(VectorSize::Bi), wgpu::VertexFormat::Float32x3));
        assert!(!vertex_format_matches(
            &TypeInner::Vector { size: VectorSize::Bi, scalar: naga::Scalar::U32 },
            wgpu::VertexFormat::Float32x2
        ));
    }
}
