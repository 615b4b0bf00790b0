use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use super::{Diagnostic, ShaderError, ShaderSource, StageKind};

/// A successfully compiled (parsed + validated) shader stage.
///
/// Consumed by [`link`](super::link).
#[derive(Debug)]
pub struct CompiledStage {
    kind: StageKind,
    label: String,
    pub(crate) module: naga::Module,
    pub(crate) info: ModuleInfo,
    pub(crate) entry_index: usize,
}

impl CompiledStage {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_point_name(&self) -> &str {
        &self.entry_point().name
    }

    pub(crate) fn entry_point(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    pub(crate) fn entry_info(&self) -> &naga::valid::FunctionInfo {
        self.info.get_entry_point(self.entry_index)
    }
}

/// Compiles one stage: WGSL front end, full IR validation, and a check that the
/// module declares exactly one entry point for `source.kind`.
///
/// A single attempt; failures are returned with a bounded log and are meant to
/// be fatal for the caller.
pub fn compile(source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
    let fail = |log: String| ShaderError::Compile {
        kind: source.kind,
        label: source.label.to_string(),
        log: Diagnostic::new(log),
    };

    let text: &str = &source.text;

    let module = naga::front::wgsl::parse_str(text).map_err(|e| fail(e.emit_to_string(text)))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| fail(e.emit_to_string(text)))?;

    let stage = source.kind.naga_stage();
    let mut matching = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| ep.stage == stage)
        .map(|(i, _)| i);

    let entry_index = match (matching.next(), matching.next()) {
        (Some(i), None) => i,
        (None, _) => {
            return Err(fail(format!(
                "error: no @{} entry point in `{}`",
                source.kind, source.label
            )));
        }
        (Some(_), Some(_)) => {
            return Err(fail(format!(
                "error: more than one @{} entry point in `{}`",
                source.kind, source.label
            )));
        }
    };

    let compiled = CompiledStage {
        kind: source.kind,
        label: source.label.to_string(),
        module,
        info,
        entry_index,
    };

    log::debug!(
        "compiled {} stage '{}' (entry point `{}`)",
        compiled.kind,
        compiled.label,
        compiled.entry_point_name()
    );

    Ok(compiled)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shader::MAX_DIAGNOSTIC_LEN;

    pub(crate) const PLAIN_VS: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tint: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    out.tint = vec3<f32>(1.0, 0.5, 0.2);
    return out;
}
"#;

    pub(crate) const PLAIN_FS: &str = r#"
@fragment
fn fs_main(@location(0) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
"#;

    fn vs(text: &'static str) -> ShaderSource {
        ShaderSource::vertex("test.vert", text)
    }

    fn fs(text: &'static str) -> ShaderSource {
        ShaderSource::fragment("test.frag", text)
    }

    fn compile_log(src: ShaderSource) -> String {
        match compile(&src) {
            Ok(_) => panic!("expected `{}` to fail", src.label),
            Err(e) => e.log().as_str().to_owned(),
        }
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn valid_vertex_stage_compiles() {
        let stage = compile(&vs(PLAIN_VS)).unwrap();
        assert_eq!(stage.kind(), StageKind::Vertex);
        assert_eq!(stage.entry_point_name(), "vs_main");
        assert_eq!(stage.label(), "test.vert");
    }

    #[test]
    fn valid_fragment_stage_compiles() {
        let stage = compile(&fs(PLAIN_FS)).unwrap();
        assert_eq!(stage.kind(), StageKind::Fragment);
        assert_eq!(stage.entry_point_name(), "fs_main");
    }

    // ── failure ───────────────────────────────────────────────────────────

    #[test]
    fn syntax_error_fails_with_log() {
        let log = compile_log(fs("@fragment fn fs_main( -> @location(0) vec4<f32> {"));
        assert!(!log.is_empty());
    }

    #[test]
    fn type_error_fails_validation() {
        let log = compile_log(fs(r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec3<f32>(1.0, 0.5, 0.2);
}
"#));
        assert!(!log.is_empty());
    }

    #[test]
    fn empty_source_has_no_entry_point() {
        let log = compile_log(vs(""));
        assert!(log.contains("no @vertex entry point"));
    }

    #[test]
    fn wrong_stage_kind_is_rejected() {
        // A valid fragment module compiled as a vertex stage.
        let log = compile_log(vs(PLAIN_FS));
        assert!(log.contains("no @vertex entry point"));
    }

    #[test]
    fn duplicate_entry_points_are_rejected() {
        let log = compile_log(fs(r#"
@fragment fn a() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
@fragment fn b() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }
"#));
        assert!(log.contains("more than one @fragment entry point"));
    }

    #[test]
    fn error_names_stage_and_label() {
        let err = compile(&fs("not wgsl at all")).unwrap_err();
        match &err {
            ShaderError::Compile { kind, label, .. } => {
                assert_eq!(*kind, StageKind::Fragment);
                assert_eq!(label, "test.frag");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("fragment shader compilation failed"));
    }

    #[test]
    fn long_compiler_log_is_bounded() {
        // The compiler echoes the offending identifier and its source line.
        let ident = format!("undefined_{}", "x".repeat(3 * MAX_DIAGNOSTIC_LEN));
        let text = format!(
            "@fragment fn fs_main() -> @location(0) vec4<f32> {{\n    return {ident};\n}}\n"
        );

        let src = ShaderSource {
            label: "long.frag".into(),
            kind: StageKind::Fragment,
            text: text.into(),
        };
        let err = compile(&src).unwrap_err();
        assert!(err.log().was_truncated());
        // Annotations may contain multi-byte box-drawing characters.
        assert!(err.log().len() <= MAX_DIAGNOSTIC_LEN);
        assert!(err.log().len() > MAX_DIAGNOSTIC_LEN - 4);
    }
}
